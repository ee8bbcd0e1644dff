use axum::{
    Json,
    extract::{Multipart, Path, State},
    http::StatusCode,
};
use serde::Deserialize;
use std::sync::Arc;

use super::{ApiError, ApiResponse, AppState, BlogDto, validation};
use crate::auth::Actor;
use crate::entities::blog_images;

#[derive(Deserialize)]
pub struct CreateBlogRequest {
    pub title: String,
    pub message: String,
}

/// GET /blogs
/// List every blog with its images, tags and comments eagerly loaded
pub async fn list_blogs(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse<Vec<BlogDto>>>, ApiError> {
    let blogs = state
        .store()
        .list_blogs_with_related()
        .await
        .map_err(|e| ApiError::internal(format!("Failed to list blogs: {e}")))?
        .into_iter()
        .map(BlogDto::from)
        .collect();

    Ok(Json(ApiResponse::success("All blogs", blogs)))
}

/// POST /blog
/// Create a blog (admin only); the author name is snapshotted from the
/// acting admin
pub async fn create_blog(
    State(state): State<Arc<AppState>>,
    actor: Actor,
    Json(payload): Json<CreateBlogRequest>,
) -> Result<(StatusCode, Json<ApiResponse<BlogDto>>), ApiError> {
    actor.require_admin()?;
    validation::validate_blog_fields(&payload.title, &payload.message)?;

    let blog = state
        .store()
        .create_blog(&actor.full_name, &payload.title, &payload.message)
        .await
        .map_err(|e| ApiError::internal(format!("Failed to create blog: {e}")))?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success("Blog Created successfully!", blog.into())),
    ))
}

/// GET /blog/{id}
/// Fetch one blog by id
pub async fn get_blog(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<BlogDto>>, ApiError> {
    let id = validation::validate_id("blog", id)?;

    let blog = state
        .store()
        .get_blog_with_related(id)
        .await
        .map_err(|e| ApiError::internal(format!("Failed to fetch blog: {e}")))?
        .ok_or_else(|| ApiError::not_found("Blog", id))?;

    Ok(Json(ApiResponse::success(
        "Single blog retrieved successfully!",
        blog.into(),
    )))
}

/// POST /blog/{id}/images
/// Multipart image upload; the file lands in the served images dir and
/// the row stores its relative path
pub async fn upload_image(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
    mut multipart: Multipart,
) -> Result<Json<ApiResponse<blog_images::Model>>, ApiError> {
    let id = validation::validate_id("blog", id)?;

    let blog = state
        .store()
        .get_blog(id)
        .await
        .map_err(|e| ApiError::internal(format!("Failed to fetch blog: {e}")))?
        .ok_or_else(|| ApiError::NotFound("Blog not found.".to_string()))?;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::validation(format!("Malformed multipart body: {e}")))?
    {
        if field.name() != Some("image") {
            continue;
        }

        let file_name = field
            .file_name()
            .map(str::to_string)
            .ok_or_else(|| ApiError::validation("The image field is required."))?;

        let bytes = field
            .bytes()
            .await
            .map_err(|e| ApiError::validation(format!("Failed to read upload: {e}")))?;

        let image_path = state
            .image_service()
            .save_upload(blog.id, &file_name, &bytes)
            .await
            .map_err(|e| ApiError::validation(e.to_string()))?;

        let image = state
            .store()
            .add_blog_image(blog.id, &image_path)
            .await
            .map_err(|e| ApiError::internal(format!("Failed to record image: {e}")))?;

        return Ok(Json(ApiResponse::success(
            "Image uploaded successfully!",
            image,
        )));
    }

    Err(ApiError::validation("The image field is required."))
}
