//! Typed authenticated principal and capability checks.
//!
//! A request's bearer token is resolved exactly once, at the extractor
//! boundary, into an [`Actor`]. Handlers receive the actor explicitly and
//! evaluate capability predicates before any privileged mutation.

use std::sync::Arc;

use axum::{extract::FromRequestParts, http::HeaderMap, http::request::Parts};

use crate::api::{ApiError, AppState};
use crate::entities::{comments, users};

/// Fixed role set. There is no per-resource ACL; admins hold every
/// capability a member holds plus user management and content authoring.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Member,
    Admin,
}

impl Role {
    #[must_use]
    pub const fn from_is_admin(is_admin: bool) -> Self {
        if is_admin { Self::Admin } else { Self::Member }
    }
}

/// The authenticated principal for one request.
#[derive(Debug, Clone)]
pub struct Actor {
    pub user_id: i32,
    pub full_name: String,
    pub email: String,
    pub role: Role,
    /// Row id of the session token that authenticated this request.
    /// Logout revokes exactly this token.
    pub token_id: i32,
}

impl Actor {
    #[must_use]
    pub fn from_session(user: &users::Model, token_id: i32) -> Self {
        Self {
            user_id: user.id,
            full_name: user.full_name.clone(),
            email: user.email.clone(),
            role: Role::from_is_admin(user.is_admin),
            token_id,
        }
    }

    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    pub fn require_admin(&self) -> Result<(), ApiError> {
        if self.is_admin() {
            Ok(())
        } else {
            Err(ApiError::forbidden("Unauthorized access"))
        }
    }

    /// Blocks acting on one's own account (self-suspend, self-delete).
    pub fn require_not_self(&self, target_id: i32, action: &str) -> Result<(), ApiError> {
        if self.user_id == target_id {
            Err(ApiError::forbidden(format!(
                "You cannot {action} your own account"
            )))
        } else {
            Ok(())
        }
    }

    /// Comment edits are owner-only. Admins do NOT get an override here;
    /// the asymmetry with delete is deliberate.
    #[must_use]
    pub fn can_edit_comment(&self, comment: &comments::Model) -> bool {
        comment.user_id == self.user_id
    }

    /// Comment deletion is owner-or-admin.
    #[must_use]
    pub fn can_delete_comment(&self, comment: &comments::Model) -> bool {
        comment.user_id == self.user_id || self.is_admin()
    }
}

/// Extract the bearer token from the `Authorization` header.
#[must_use]
pub fn bearer_token(headers: &HeaderMap) -> Option<String> {
    let auth_header = headers.get("Authorization")?;
    let auth_str = auth_header.to_str().ok()?;
    let token = auth_str.strip_prefix("Bearer ")?;

    Some(token.trim().to_string())
}

impl FromRequestParts<Arc<AppState>> for Actor {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(&parts.headers)
            .ok_or_else(|| ApiError::Unauthorized("Missing bearer token".to_string()))?;

        let session = state
            .store()
            .resolve_session(&token)
            .await
            .map_err(|e| ApiError::internal(format!("Session lookup failed: {e}")))?;

        let Some((session, user)) = session else {
            return Err(ApiError::Unauthorized("Invalid token".to_string()));
        };

        Ok(Self::from_session(&user, session.id))
    }
}
