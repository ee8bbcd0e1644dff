use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde::Deserialize;
use std::sync::Arc;

use super::{ApiError, ApiResponse, AppState, validation};
use crate::auth::Actor;
use crate::entities::tags;

#[derive(Deserialize)]
pub struct TagRequest {
    pub name: String,
}

/// POST /blog/{id}/tags
/// Create a tag under a blog (admin only). Names are unique across all
/// tags, not per blog.
pub async fn create_tag(
    State(state): State<Arc<AppState>>,
    actor: Actor,
    Path(id): Path<i32>,
    Json(payload): Json<TagRequest>,
) -> Result<(StatusCode, Json<ApiResponse<tags::Model>>), ApiError> {
    actor.require_admin()?;
    let id = validation::validate_id("blog", id)?;
    let name = validation::validate_tag_name(&payload.name)?;

    if state
        .store()
        .get_tag_by_name(name)
        .await
        .map_err(|e| ApiError::internal(format!("Failed to check tag name: {e}")))?
        .is_some()
    {
        return Err(ApiError::validation("The name has already been taken."));
    }

    let blog = state
        .store()
        .get_blog(id)
        .await
        .map_err(|e| ApiError::internal(format!("Failed to fetch blog: {e}")))?
        .ok_or_else(|| ApiError::NotFound("Blog not found.".to_string()))?;

    // Pre-check above, unique index below if two writers race
    let tag = state
        .store()
        .create_tag(blog.id, name)
        .await
        .map_err(|_| ApiError::validation("The name has already been taken."))?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success("Tag created successfully!", tag)),
    ))
}

/// GET /tags
/// List all tags
pub async fn list_tags(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse<Vec<tags::Model>>>, ApiError> {
    let tags = state
        .store()
        .list_tags()
        .await
        .map_err(|e| ApiError::internal(format!("Failed to list tags: {e}")))?;

    Ok(Json(ApiResponse::success(
        "All tags retrieved successfully!",
        tags,
    )))
}

/// PUT /tag/{id}
/// Rename a tag; uniqueness re-checked excluding the tag itself
pub async fn update_tag(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
    Json(payload): Json<TagRequest>,
) -> Result<Json<ApiResponse<tags::Model>>, ApiError> {
    let id = validation::validate_id("tag", id)?;
    let name = validation::validate_tag_name(&payload.name)?;

    let tag = state
        .store()
        .get_tag(id)
        .await
        .map_err(|e| ApiError::internal(format!("Failed to fetch tag: {e}")))?
        .ok_or_else(|| ApiError::NotFound("Tag not found.".to_string()))?;

    if let Some(existing) = state
        .store()
        .get_tag_by_name(name)
        .await
        .map_err(|e| ApiError::internal(format!("Failed to check tag name: {e}")))?
        && existing.id != tag.id
    {
        return Err(ApiError::validation("The name has already been taken."));
    }

    let tag = state
        .store()
        .rename_tag(tag, name)
        .await
        .map_err(|e| ApiError::internal(format!("Failed to update tag: {e}")))?;

    Ok(Json(ApiResponse::success("Tag updated successfully!", tag)))
}

/// DELETE /tag/{id}
pub async fn delete_tag(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<()>>, ApiError> {
    let id = validation::validate_id("tag", id)?;

    let deleted = state
        .store()
        .delete_tag(id)
        .await
        .map_err(|e| ApiError::internal(format!("Failed to delete tag: {e}")))?;

    if !deleted {
        return Err(ApiError::NotFound("Tag not found.".to_string()));
    }

    Ok(Json(ApiResponse::message("Tag deleted successfully!")))
}
