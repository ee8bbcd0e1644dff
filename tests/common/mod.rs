#![allow(dead_code)]

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
};
use http_body_util::BodyExt;
use tower::ServiceExt;

use inkdrop::config::Config;

/// Seeded admin credentials (must match the seed migration)
pub const ADMIN_EMAIL: &str = inkdrop::db::migrator::DEFAULT_ADMIN_EMAIL;
pub const ADMIN_PASSWORD: &str = inkdrop::db::migrator::DEFAULT_ADMIN_PASSWORD;

pub async fn spawn_app() -> Router {
    let mut config = Config::default();
    config.general.database_path = "sqlite::memory:".to_string();
    // a single pooled connection keeps the in-memory db alive and shared
    config.general.max_db_connections = 1;
    config.general.min_db_connections = 1;
    config.general.images_path = std::env::temp_dir()
        .join(format!("inkdrop-test-{}", uuid::Uuid::new_v4()))
        .display()
        .to_string();

    let state = inkdrop::api::create_app_state_from_config(config)
        .await
        .expect("Failed to create app state");
    inkdrop::api::router(state)
}

/// Fire one request and return the status plus parsed JSON body.
pub async fn send(
    app: &Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<serde_json::Value>,
) -> (StatusCode, serde_json::Value) {
    let mut builder = Request::builder().method(method).uri(uri);

    if let Some(token) = token {
        builder = builder.header("Authorization", format!("Bearer {token}"));
    }

    let request = if let Some(body) = body {
        builder
            .header("Content-Type", "application/json")
            .body(Body::from(serde_json::to_string(&body).unwrap()))
            .unwrap()
    } else {
        builder.body(Body::empty()).unwrap()
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();

    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json = if bytes.is_empty() {
        serde_json::Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null)
    };

    (status, json)
}

/// Register a user and return the response body (data carries the OTP).
pub async fn register(
    app: &Router,
    full_name: &str,
    email: &str,
    password: &str,
) -> serde_json::Value {
    let (status, body) = send(
        app,
        "POST",
        "/register",
        None,
        Some(serde_json::json!({
            "full_name": full_name,
            "email": email,
            "password": password,
            "password_confirmation": password,
        })),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED, "register failed: {body}");
    body
}

/// Login and return the issued bearer token.
pub async fn login(app: &Router, email: &str, password: &str) -> String {
    let (status, body) = send(
        app,
        "POST",
        "/login",
        None,
        Some(serde_json::json!({ "email": email, "password": password })),
    )
    .await;

    assert_eq!(status, StatusCode::OK, "login failed: {body}");
    body["data"]["token"].as_str().unwrap().to_string()
}

/// Register, verify via the returned OTP, and login. Returns the token.
pub async fn register_verified(
    app: &Router,
    full_name: &str,
    email: &str,
    password: &str,
) -> String {
    let body = register(app, full_name, email, password).await;
    let otp = body["data"]["otp"].as_str().unwrap().to_string();

    let (status, _) = send(app, "GET", &format!("/verify-email?otp={otp}"), None, None).await;
    assert_eq!(status, StatusCode::OK);

    login(app, email, password).await
}

/// Login with the seeded admin account.
pub async fn admin_token(app: &Router) -> String {
    login(app, ADMIN_EMAIL, ADMIN_PASSWORD).await
}

/// Create a blog as admin and return its id.
pub async fn create_blog(app: &Router, admin_token: &str, title: &str) -> i64 {
    let (status, body) = send(
        app,
        "POST",
        "/blog",
        Some(admin_token),
        Some(serde_json::json!({ "title": title, "message": "Some body text" })),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED, "blog create failed: {body}");
    body["data"]["id"].as_i64().unwrap()
}
