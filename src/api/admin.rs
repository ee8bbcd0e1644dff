use axum::{
    Json,
    extract::{Path, State},
};
use std::sync::Arc;

use super::{ApiError, ApiResponse, AppState, UserDto, validation};
use crate::auth::Actor;

/// GET /allusers
/// List all non-admin accounts (admin only)
pub async fn list_users(
    State(state): State<Arc<AppState>>,
    actor: Actor,
) -> Result<Json<ApiResponse<Vec<UserDto>>>, ApiError> {
    actor.require_admin()?;

    let users = state
        .store()
        .list_non_admin_users()
        .await
        .map_err(|e| ApiError::internal(format!("Failed to list users: {e}")))?
        .into_iter()
        .map(UserDto::from)
        .collect();

    Ok(Json(ApiResponse::success(
        "Users retrieved successfully!",
        users,
    )))
}

/// GET /user/{id}
/// Fetch a user by id (admin only)
pub async fn get_user(
    State(state): State<Arc<AppState>>,
    actor: Actor,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<UserDto>>, ApiError> {
    actor.require_admin()?;
    let id = validation::validate_id("user", id)?;

    let user = state
        .store()
        .get_user_by_id(id)
        .await
        .map_err(|e| ApiError::internal(format!("Failed to fetch user: {e}")))?
        .ok_or_else(|| ApiError::not_found("User", id))?;

    Ok(Json(ApiResponse::success(
        "User retrieved successfully!",
        user.into(),
    )))
}

/// PATCH /user/{id}/suspend
/// Suspend an account (admin only, never one's own)
pub async fn suspend_user(
    State(state): State<Arc<AppState>>,
    actor: Actor,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<UserDto>>, ApiError> {
    actor.require_admin()?;
    let id = validation::validate_id("user", id)?;

    let user = state
        .store()
        .get_user_by_id(id)
        .await
        .map_err(|e| ApiError::internal(format!("Failed to fetch user: {e}")))?
        .ok_or_else(|| ApiError::not_found("User", id))?;

    actor.require_not_self(user.id, "suspend")?;

    let user = state
        .store()
        .suspend_user(user)
        .await
        .map_err(|e| ApiError::internal(format!("Failed to suspend user: {e}")))?;

    tracing::info!(user_id = id, admin_id = actor.user_id, "User suspended");

    Ok(Json(ApiResponse::success(
        "User suspended successfully!",
        user.into(),
    )))
}

/// DELETE /user/{id}
/// Delete an account (admin only, never one's own). Cascades sessions
/// and comments.
pub async fn delete_user(
    State(state): State<Arc<AppState>>,
    actor: Actor,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<()>>, ApiError> {
    actor.require_admin()?;
    let id = validation::validate_id("user", id)?;

    let user = state
        .store()
        .get_user_by_id(id)
        .await
        .map_err(|e| ApiError::internal(format!("Failed to fetch user: {e}")))?
        .ok_or_else(|| ApiError::not_found("User", id))?;

    actor.require_not_self(user.id, "delete")?;

    state
        .store()
        .delete_user(user.id)
        .await
        .map_err(|e| ApiError::internal(format!("Failed to delete user: {e}")))?;

    tracing::info!(user_id = id, admin_id = actor.user_id, "User deleted");

    Ok(Json(ApiResponse::message("User deleted successfully!")))
}
