//! Admin user-management tests: role gating, self-protection, and the
//! session cascade on user deletion.

use axum::http::StatusCode;

mod common;
use common::{admin_token, register_verified, send, spawn_app};

#[tokio::test]
async fn test_seeded_admin_can_login() {
    let app = spawn_app().await;

    let token = admin_token(&app).await;

    let (status, body) = send(&app, "GET", "/profile", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["is_admin"], true);
    assert_eq!(body["data"]["email"], common::ADMIN_EMAIL);
}

#[tokio::test]
async fn test_admin_routes_reject_members_and_anonymous() {
    let app = spawn_app().await;

    let member = register_verified(&app, "Jane Doe", "jane@x.com", "Secr3t!1").await;

    let (status, _) = send(&app, "GET", "/allusers", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = send(&app, "GET", "/allusers", Some(&member), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = send(&app, "GET", "/user/1", Some(&member), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = send(&app, "PATCH", "/user/1/suspend", Some(&member), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = send(&app, "DELETE", "/user/1", Some(&member), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_list_users_excludes_admins() {
    let app = spawn_app().await;

    register_verified(&app, "Jane Doe", "jane@x.com", "Secr3t!1").await;
    register_verified(&app, "John Roe", "john@x.com", "Secr3t!1").await;

    let token = admin_token(&app).await;
    let (status, body) = send(&app, "GET", "/allusers", Some(&token), None).await;

    assert_eq!(status, StatusCode::OK);
    let users = body["data"].as_array().unwrap();
    assert_eq!(users.len(), 2);
    assert!(users.iter().all(|u| u["is_admin"] == false));
}

#[tokio::test]
async fn test_get_user_by_id() {
    let app = spawn_app().await;

    let body = common::register(&app, "Jane Doe", "jane@x.com", "Secr3t!1").await;
    let user_id = body["data"]["id"].as_i64().unwrap();

    let token = admin_token(&app).await;

    let (status, body) = send(&app, "GET", &format!("/user/{user_id}"), Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["email"], "jane@x.com");

    let (status, _) = send(&app, "GET", "/user/9999", Some(&token), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_admin_cannot_act_on_own_account() {
    let app = spawn_app().await;

    let token = admin_token(&app).await;

    let (_, body) = send(&app, "GET", "/profile", Some(&token), None).await;
    let admin_id = body["data"]["id"].as_i64().unwrap();

    let (status, body) = send(
        &app,
        "PATCH",
        &format!("/user/{admin_id}/suspend"),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert!(body["message"].as_str().unwrap().contains("own account"));

    let (status, _) = send(&app, "DELETE", &format!("/user/{admin_id}"), Some(&token), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_suspend_blocks_future_logins() {
    let app = spawn_app().await;

    let body = common::register(&app, "Jane Doe", "jane@x.com", "Secr3t!1").await;
    let user_id = body["data"]["id"].as_i64().unwrap();
    let otp = body["data"]["otp"].as_str().unwrap().to_string();
    send(&app, "GET", &format!("/verify-email?otp={otp}"), None, None).await;

    let token = admin_token(&app).await;
    let (status, body) = send(
        &app,
        "PATCH",
        &format!("/user/{user_id}/suspend"),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["is_suspended"], true);

    let (status, body) = send(
        &app,
        "POST",
        "/login",
        None,
        Some(serde_json::json!({ "email": "jane@x.com", "password": "Secr3t!1" })),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert!(body["message"].as_str().unwrap().contains("suspended"));
}

#[tokio::test]
async fn test_delete_user_cascades_sessions() {
    let app = spawn_app().await;

    let member = register_verified(&app, "Jane Doe", "jane@x.com", "Secr3t!1").await;

    let (_, body) = send(&app, "GET", "/profile", Some(&member), None).await;
    let user_id = body["data"]["id"].as_i64().unwrap();

    let token = admin_token(&app).await;
    let (status, _) = send(&app, "DELETE", &format!("/user/{user_id}"), Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);

    // the record and the member's session are both gone
    let (status, _) = send(&app, "GET", &format!("/user/{user_id}"), Some(&token), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(&app, "GET", "/profile", Some(&member), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}
