use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde::Deserialize;
use std::sync::Arc;

use super::{ApiError, ApiResponse, AppState, validation};
use crate::auth::Actor;
use crate::entities::comments;

#[derive(Deserialize)]
pub struct CommentRequest {
    pub comment: String,
}

/// POST /blog/{id}/comments
/// Add a comment to a blog (any authenticated user)
pub async fn add_comment(
    State(state): State<Arc<AppState>>,
    actor: Actor,
    Path(id): Path<i32>,
    Json(payload): Json<CommentRequest>,
) -> Result<(StatusCode, Json<ApiResponse<comments::Model>>), ApiError> {
    let id = validation::validate_id("blog", id)?;
    let text = validation::validate_comment_text(&payload.comment)?;

    let blog = state
        .store()
        .get_blog(id)
        .await
        .map_err(|e| ApiError::internal(format!("Failed to fetch blog: {e}")))?
        .ok_or_else(|| ApiError::NotFound("Blog not found.".to_string()))?;

    let comment = state
        .store()
        .create_comment(blog.id, actor.user_id, text)
        .await
        .map_err(|e| ApiError::internal(format!("Failed to add comment: {e}")))?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success("Comment added successfully!", comment)),
    ))
}

/// PUT /comment/{id}
/// Edit a comment. Author only; an admin role grants no override here.
pub async fn update_comment(
    State(state): State<Arc<AppState>>,
    actor: Actor,
    Path(id): Path<i32>,
    Json(payload): Json<CommentRequest>,
) -> Result<Json<ApiResponse<comments::Model>>, ApiError> {
    let id = validation::validate_id("comment", id)?;
    let text = validation::validate_comment_text(&payload.comment)?;

    let comment = state
        .store()
        .get_comment(id)
        .await
        .map_err(|e| ApiError::internal(format!("Failed to fetch comment: {e}")))?
        .ok_or_else(|| ApiError::NotFound("Comment not found.".to_string()))?;

    if !actor.can_edit_comment(&comment) {
        return Err(ApiError::forbidden("Unauthorized access"));
    }

    let comment = state
        .store()
        .update_comment_text(comment, text)
        .await
        .map_err(|e| ApiError::internal(format!("Failed to update comment: {e}")))?;

    Ok(Json(ApiResponse::success(
        "Comment updated successfully!",
        comment,
    )))
}

/// DELETE /comment/{id}
/// Remove a comment. Author or admin.
pub async fn delete_comment(
    State(state): State<Arc<AppState>>,
    actor: Actor,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<()>>, ApiError> {
    let id = validation::validate_id("comment", id)?;

    let comment = state
        .store()
        .get_comment(id)
        .await
        .map_err(|e| ApiError::internal(format!("Failed to fetch comment: {e}")))?
        .ok_or_else(|| ApiError::NotFound("Comment not found.".to_string()))?;

    if !actor.can_delete_comment(&comment) {
        return Err(ApiError::forbidden("Unauthorized access"));
    }

    state
        .store()
        .delete_comment(comment.id)
        .await
        .map_err(|e| ApiError::internal(format!("Failed to delete comment: {e}")))?;

    Ok(Json(ApiResponse::message("Comment deleted successfully!")))
}
