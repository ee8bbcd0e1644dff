//! Blog, tag, comment and image-upload tests, including the comment
//! permission asymmetry and system-wide tag name uniqueness.

use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use http_body_util::BodyExt;
use tower::ServiceExt;

mod common;
use common::{admin_token, create_blog, register_verified, send, spawn_app};

#[tokio::test]
async fn test_blog_creation_requires_admin() {
    let app = spawn_app().await;

    let payload = serde_json::json!({ "title": "Hello", "message": "World" });

    let (status, _) = send(&app, "POST", "/blog", None, Some(payload.clone())).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let member = register_verified(&app, "Jane Doe", "jane@x.com", "Secr3t!1").await;
    let (status, _) = send(&app, "POST", "/blog", Some(&member), Some(payload.clone())).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let token = admin_token(&app).await;
    let (status, body) = send(&app, "POST", "/blog", Some(&token), Some(payload)).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["title"], "Hello");
    // author is taken from the authenticated admin, not the payload
    assert!(body["data"]["author_name"].as_str().is_some_and(|s| !s.is_empty()));
}

#[tokio::test]
async fn test_blog_listing_is_public_and_eager() {
    let app = spawn_app().await;

    let token = admin_token(&app).await;
    let blog_id = create_blog(&app, &token, "First post").await;

    send(
        &app,
        "POST",
        &format!("/blog/{blog_id}/tags"),
        Some(&token),
        Some(serde_json::json!({ "name": "rust" })),
    )
    .await;

    let member = register_verified(&app, "Jane Doe", "jane@x.com", "Secr3t!1").await;
    send(
        &app,
        "POST",
        &format!("/blog/{blog_id}/comments"),
        Some(&member),
        Some(serde_json::json!({ "comment": "Nice one" })),
    )
    .await;

    let (status, body) = send(&app, "GET", "/blogs", None, None).await;
    assert_eq!(status, StatusCode::OK);

    let blogs = body["data"].as_array().unwrap();
    assert_eq!(blogs.len(), 1);
    assert_eq!(blogs[0]["tags"][0]["name"], "rust");
    assert_eq!(blogs[0]["comments"][0]["comment"], "Nice one");
    assert!(blogs[0]["images"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_get_unknown_blog_returns_404() {
    let app = spawn_app().await;

    let (status, _) = send(&app, "GET", "/blog/42", None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_tag_names_unique_across_blogs() {
    let app = spawn_app().await;

    let token = admin_token(&app).await;
    let first = create_blog(&app, &token, "First").await;
    let second = create_blog(&app, &token, "Second").await;

    let (status, _) = send(
        &app,
        "POST",
        &format!("/blog/{first}/tags"),
        Some(&token),
        Some(serde_json::json!({ "name": "rust" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    // same name on a different blog is still rejected
    let (status, body) = send(
        &app,
        "POST",
        &format!("/blog/{second}/tags"),
        Some(&token),
        Some(serde_json::json!({ "name": "rust" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "The name has already been taken.");

    let member = register_verified(&app, "Jane Doe", "jane@x.com", "Secr3t!1").await;
    let (status, _) = send(
        &app,
        "POST",
        &format!("/blog/{first}/tags"),
        Some(&member),
        Some(serde_json::json!({ "name": "other" })),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_tag_update_and_delete() {
    let app = spawn_app().await;

    let token = admin_token(&app).await;
    let blog_id = create_blog(&app, &token, "First").await;

    for name in ["rust", "axum"] {
        send(
            &app,
            "POST",
            &format!("/blog/{blog_id}/tags"),
            Some(&token),
            Some(serde_json::json!({ "name": name })),
        )
        .await;
    }

    let (_, body) = send(&app, "GET", "/tags", None, None).await;
    let tags = body["data"].as_array().unwrap();
    assert_eq!(tags.len(), 2);
    let rust_id = tags
        .iter()
        .find(|t| t["name"] == "rust")
        .and_then(|t| t["id"].as_i64())
        .unwrap();

    // renaming onto another tag's name is rejected, onto its own is fine
    let (status, _) = send(
        &app,
        "PUT",
        &format!("/tag/{rust_id}"),
        None,
        Some(serde_json::json!({ "name": "axum" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = send(
        &app,
        "PUT",
        &format!("/tag/{rust_id}"),
        None,
        Some(serde_json::json!({ "name": "rust" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["name"], "rust");

    let (status, _) = send(&app, "DELETE", &format!("/tag/{rust_id}"), None, None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send(&app, "DELETE", &format!("/tag/{rust_id}"), None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_comment_requires_auth_and_valid_blog() {
    let app = spawn_app().await;

    let token = admin_token(&app).await;
    let blog_id = create_blog(&app, &token, "First").await;

    let payload = serde_json::json!({ "comment": "Hi" });

    let (status, _) = send(
        &app,
        "POST",
        &format!("/blog/{blog_id}/comments"),
        None,
        Some(payload.clone()),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let member = register_verified(&app, "Jane Doe", "jane@x.com", "Secr3t!1").await;

    let (status, _) = send(
        &app,
        "POST",
        "/blog/999/comments",
        Some(&member),
        Some(payload),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(
        &app,
        "POST",
        &format!("/blog/{blog_id}/comments"),
        Some(&member),
        Some(serde_json::json!({ "comment": "   " })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_comment_update_is_author_only() {
    let app = spawn_app().await;

    let token = admin_token(&app).await;
    let blog_id = create_blog(&app, &token, "First").await;

    let author = register_verified(&app, "Jane Doe", "jane@x.com", "Secr3t!1").await;
    let (_, body) = send(
        &app,
        "POST",
        &format!("/blog/{blog_id}/comments"),
        Some(&author),
        Some(serde_json::json!({ "comment": "original" })),
    )
    .await;
    let comment_id = body["data"]["id"].as_i64().unwrap();

    // even an admin cannot edit someone else's comment
    let (status, _) = send(
        &app,
        "PUT",
        &format!("/comment/{comment_id}"),
        Some(&token),
        Some(serde_json::json!({ "comment": "hijacked" })),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = send(
        &app,
        "PUT",
        &format!("/comment/{comment_id}"),
        Some(&author),
        Some(serde_json::json!({ "comment": "edited" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["comment"], "edited");
}

#[tokio::test]
async fn test_comment_delete_allows_author_or_admin() {
    let app = spawn_app().await;

    let token = admin_token(&app).await;
    let blog_id = create_blog(&app, &token, "First").await;

    let author = register_verified(&app, "Jane Doe", "jane@x.com", "Secr3t!1").await;
    let other = register_verified(&app, "John Roe", "john@x.com", "Secr3t!1").await;

    let mut ids = Vec::new();
    for text in ["one", "two"] {
        let (_, body) = send(
            &app,
            "POST",
            &format!("/blog/{blog_id}/comments"),
            Some(&author),
            Some(serde_json::json!({ "comment": text })),
        )
        .await;
        ids.push(body["data"]["id"].as_i64().unwrap());
    }

    let (status, _) = send(&app, "DELETE", &format!("/comment/{}", ids[0]), Some(&other), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = send(&app, "DELETE", &format!("/comment/{}", ids[0]), Some(&author), None).await;
    assert_eq!(status, StatusCode::OK);

    // admin may delete what they cannot edit
    let (status, _) = send(&app, "DELETE", &format!("/comment/{}", ids[1]), Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send(&app, "DELETE", &format!("/comment/{}", ids[1]), Some(&token), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

const BOUNDARY: &str = "XBOUNDARY";

fn multipart_body(file_name: &str, bytes: &[u8]) -> Vec<u8> {
    let mut body = Vec::new();
    body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
    body.extend_from_slice(
        format!("Content-Disposition: form-data; name=\"image\"; filename=\"{file_name}\"\r\n")
            .as_bytes(),
    );
    body.extend_from_slice(b"Content-Type: application/octet-stream\r\n\r\n");
    body.extend_from_slice(bytes);
    body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());
    body
}

async fn upload(
    app: &axum::Router,
    token: &str,
    blog_id: i64,
    file_name: &str,
    bytes: &[u8],
) -> (StatusCode, serde_json::Value) {
    let request = Request::builder()
        .method("POST")
        .uri(format!("/blog/{blog_id}/images"))
        .header("Authorization", format!("Bearer {token}"))
        .header(
            "Content-Type",
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(multipart_body(file_name, bytes)))
        .unwrap();

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json = serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null);

    (status, json)
}

#[tokio::test]
async fn test_image_upload() {
    let app = spawn_app().await;

    let token = admin_token(&app).await;
    let blog_id = create_blog(&app, &token, "First").await;

    let (status, body) = upload(&app, &token, blog_id, "photo.png", b"\x89PNG fake").await;
    assert_eq!(status, StatusCode::OK, "upload failed: {body}");
    let path = body["data"]["image_path"].as_str().unwrap();
    assert!(path.ends_with(".png"), "unexpected path: {path}");

    let (_, body) = send(&app, "GET", &format!("/blog/{blog_id}"), None, None).await;
    assert_eq!(body["data"]["images"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_image_upload_rejects_bad_extension_and_unknown_blog() {
    let app = spawn_app().await;

    let token = admin_token(&app).await;
    let blog_id = create_blog(&app, &token, "First").await;

    let (status, body) = upload(&app, &token, blog_id, "notes.txt", b"plain text").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["message"].as_str().unwrap().contains("png, jpg, jpeg or gif"));

    let (status, _) = upload(&app, &token, 999, "photo.png", b"\x89PNG fake").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
