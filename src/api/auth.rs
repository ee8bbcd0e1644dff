use axum::{
    Json,
    extract::{Query, State},
    http::StatusCode,
};
use serde::Deserialize;
use std::sync::Arc;

use super::{ApiError, ApiResponse, AppState, AuthUserDto, UserDto};
use crate::auth::Actor;
use crate::services::{AccountError, RegisterInput};

// ============================================================================
// Request Types
// ============================================================================

#[derive(Deserialize)]
pub struct RegisterRequest {
    pub full_name: String,
    pub email: String,
    pub password: String,
    pub password_confirmation: String,
}

#[derive(Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Deserialize)]
pub struct VerifyEmailQuery {
    #[serde(default)]
    pub otp: String,
}

#[derive(Deserialize)]
pub struct ForgotPasswordRequest {
    pub email: String,
}

#[derive(Deserialize)]
pub struct ResetPasswordRequest {
    pub token: String,
    pub password: String,
    pub password_confirmation: String,
}

/// Status-code mapping for workflow failures. This is the only place
/// account error kinds become HTTP concerns.
impl From<AccountError> for ApiError {
    fn from(err: AccountError) -> Self {
        match err {
            AccountError::Validation(msg) => ApiError::ValidationError(msg),
            AccountError::InvalidCredentials => ApiError::Unauthorized(err.to_string()),
            AccountError::EmailNotVerified | AccountError::Suspended => {
                ApiError::Forbidden(err.to_string())
            }
            AccountError::InvalidOtp | AccountError::UserNotFound => {
                ApiError::NotFound(err.to_string())
            }
            // A stale reset token is a bad request, not a missing resource
            AccountError::InvalidToken => ApiError::ValidationError(err.to_string()),
            AccountError::Database(msg) => ApiError::DatabaseError(msg),
            AccountError::Internal(msg) => ApiError::InternalError(msg),
        }
    }
}

// ============================================================================
// Handlers
// ============================================================================

/// POST /register
/// Create an unverified account and dispatch verification mail
pub async fn register(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<ApiResponse<UserDto>>), ApiError> {
    let user = state
        .account_service()
        .register(RegisterInput {
            full_name: payload.full_name,
            email: payload.email,
            password: payload.password,
            password_confirmation: payload.password_confirmation,
        })
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(
            "User has been registered successfully, Please check your inbox to verify your email!",
            user.into(),
        )),
    ))
}

/// POST /login
/// Authenticate and issue a bearer token
pub async fn login(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<ApiResponse<AuthUserDto>>, ApiError> {
    let (user, session) = state
        .account_service()
        .login(&payload.email, &payload.password)
        .await?;

    Ok(Json(ApiResponse::success(
        "You are logged in successfully!",
        AuthUserDto::new(user, session),
    )))
}

/// GET /verify-email?otp=...
/// Consume a verification OTP
pub async fn verify_email(
    State(state): State<Arc<AppState>>,
    Query(query): Query<VerifyEmailQuery>,
) -> Result<Json<ApiResponse<UserDto>>, ApiError> {
    let user = state.account_service().verify_email(&query.otp).await?;

    Ok(Json(ApiResponse::success(
        "Email verified successfully!",
        user.into(),
    )))
}

/// POST /forgot-password
/// Generate a reset token for the given email
pub async fn forgot_password(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<ForgotPasswordRequest>,
) -> Result<Json<ApiResponse<crate::entities::password_reset_tokens::Model>>, ApiError> {
    let record = state
        .account_service()
        .request_password_reset(&payload.email)
        .await?;

    Ok(Json(ApiResponse::success(
        "Password reset link sent",
        record,
    )))
}

/// POST /reset-password
/// Consume a reset token and set the new password
pub async fn reset_password(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<ResetPasswordRequest>,
) -> Result<Json<ApiResponse<UserDto>>, ApiError> {
    let user = state
        .account_service()
        .reset_password(
            &payload.token,
            &payload.password,
            &payload.password_confirmation,
        )
        .await?;

    Ok(Json(ApiResponse::success(
        "Password has been reset",
        user.into(),
    )))
}

/// GET /profile
/// Fetch the authenticated user's own record
pub async fn profile(
    State(state): State<Arc<AppState>>,
    actor: Actor,
) -> Result<Json<ApiResponse<UserDto>>, ApiError> {
    let user = state
        .store()
        .get_user_by_id(actor.user_id)
        .await
        .map_err(|e| ApiError::internal(format!("Failed to fetch user: {e}")))?
        .ok_or_else(|| ApiError::Unauthorized("Invalid token".to_string()))?;

    Ok(Json(ApiResponse::success(
        "User profile fetched successfully!",
        user.into(),
    )))
}

/// GET /logout
/// Revoke exactly the session token used for this request
pub async fn logout(
    State(state): State<Arc<AppState>>,
    actor: Actor,
) -> Result<Json<ApiResponse<()>>, ApiError> {
    state
        .store()
        .revoke_session(actor.token_id)
        .await
        .map_err(|e| ApiError::internal(format!("Failed to revoke session: {e}")))?;

    Ok(Json(ApiResponse::message("User logged out successfully!")))
}
