//! Account lifecycle workflow: registration, email verification, login,
//! password reset.
//!
//! Every operation returns a typed [`AccountError`] kind; the API layer
//! alone decides status codes. Notification dispatch failures are logged
//! and never fail the operation that triggered them.

use std::sync::Arc;

use thiserror::Error;
use tokio::task;

use crate::config::SecurityConfig;
use crate::db::repositories::user::{generate_code, hash_password};
use crate::db::{NewUser, Store};
use crate::entities::{password_reset_tokens, session_tokens, users};
use crate::services::mailer::Mailer;

#[derive(Debug, Error)]
pub enum AccountError {
    #[error("{0}")]
    Validation(String),

    #[error("Unable to login due to invalid credentials.")]
    InvalidCredentials,

    #[error("Your email is not verified. A verification email has been sent to your email address.")]
    EmailNotVerified,

    #[error("Your account has been suspended.")]
    Suspended,

    #[error("Invalid OTP.")]
    InvalidOtp,

    #[error("Invalid token.")]
    InvalidToken,

    #[error("User not found.")]
    UserNotFound,

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<anyhow::Error> for AccountError {
    fn from(err: anyhow::Error) -> Self {
        Self::Database(err.to_string())
    }
}

pub struct RegisterInput {
    pub full_name: String,
    pub email: String,
    pub password: String,
    pub password_confirmation: String,
}

pub struct AccountService {
    store: Store,
    mailer: Arc<dyn Mailer>,
    security: SecurityConfig,
}

impl AccountService {
    #[must_use]
    pub fn new(store: Store, mailer: Arc<dyn Mailer>, security: SecurityConfig) -> Self {
        Self {
            store,
            mailer,
            security,
        }
    }

    /// Create an unverified account with a fresh OTP and dispatch the
    /// welcome and verification notifications.
    pub async fn register(&self, input: RegisterInput) -> Result<users::Model, AccountError> {
        validate_full_name(&input.full_name)?;
        validate_email(&input.email)?;
        validate_password(&input.password, &input.password_confirmation)?;

        if self
            .store
            .get_user_by_email(&input.email)
            .await?
            .is_some()
        {
            return Err(AccountError::Validation(
                "Email is already taken. Please try with other email address".to_string(),
            ));
        }

        let password = input.password.clone();
        let security = self.security.clone();
        let password_hash = task::spawn_blocking(move || hash_password(&password, Some(&security)))
            .await
            .map_err(|e| AccountError::Internal(format!("Password hashing task panicked: {e}")))?
            .map_err(|e| AccountError::Internal(e.to_string()))?;

        let user = self
            .store
            .create_user(NewUser {
                full_name: input.full_name,
                email: input.email,
                password_hash,
                otp: generate_code(self.security.otp_length),
            })
            .await?;

        // The account exists regardless of notification outcome
        if let Err(e) = self.mailer.send_welcome(&user).await {
            tracing::warn!("Failed to send welcome notification: {e}");
        }
        if let Err(e) = self.mailer.send_verification(&user).await {
            tracing::warn!("Failed to send verification notification: {e}");
        }

        Ok(user)
    }

    /// Consume an OTP: mark the owning account verified and clear the
    /// code. A cleared or unknown code no longer matches anything.
    pub async fn verify_email(&self, otp: &str) -> Result<users::Model, AccountError> {
        if otp.is_empty() {
            return Err(AccountError::Validation("OTP is required.".to_string()));
        }

        let user = self
            .store
            .get_user_by_otp(otp)
            .await?
            .ok_or(AccountError::InvalidOtp)?;

        let user = self.store.mark_user_verified(user).await?;

        Ok(user)
    }

    /// Authenticate and issue a fresh session token.
    ///
    /// Unverified accounts never receive a token; the verification
    /// notification is re-sent instead so a legitimate user can
    /// re-trigger it. Suspended accounts are rejected outright.
    pub async fn login(
        &self,
        email: &str,
        password: &str,
    ) -> Result<(users::Model, session_tokens::Model), AccountError> {
        let user = self
            .store
            .get_user_by_email(email)
            .await?
            .ok_or(AccountError::InvalidCredentials)?;

        if !self.store.verify_password(&user, password).await? {
            return Err(AccountError::InvalidCredentials);
        }

        if !user.is_verified {
            if let Err(e) = self.mailer.send_verification(&user).await {
                tracing::warn!("Failed to re-send verification notification: {e}");
            }
            return Err(AccountError::EmailNotVerified);
        }

        if user.is_suspended {
            return Err(AccountError::Suspended);
        }

        let user = if user.is_active {
            user
        } else {
            self.store.mark_user_active(user).await?
        };

        let session = self.store.issue_session(user.id).await?;

        Ok((user, session))
    }

    /// Generate a reset token for the account owning `email`, replacing
    /// any earlier token, and dispatch the reset notification.
    pub async fn request_password_reset(
        &self,
        email: &str,
    ) -> Result<password_reset_tokens::Model, AccountError> {
        validate_email(email)?;

        let user = self
            .store
            .get_user_by_email(email)
            .await?
            .ok_or(AccountError::UserNotFound)?;

        let token = generate_code(self.security.reset_token_length);
        let record = self.store.upsert_reset_token(&user.email, &token).await?;

        if let Err(e) = self.mailer.send_password_reset(&user, &token).await {
            tracing::warn!("Failed to send password reset notification: {e}");
        }

        Ok(record)
    }

    /// Consume a reset token and set the new password. Single use: the
    /// record is deleted once the password is written.
    pub async fn reset_password(
        &self,
        token: &str,
        password: &str,
        password_confirmation: &str,
    ) -> Result<users::Model, AccountError> {
        if token.is_empty() {
            return Err(AccountError::Validation("Token is required.".to_string()));
        }
        validate_password(password, password_confirmation)?;

        let record = self
            .store
            .get_reset_token(token)
            .await?
            .ok_or(AccountError::InvalidToken)?;

        let user = self
            .store
            .get_user_by_email(&record.email)
            .await?
            .ok_or(AccountError::UserNotFound)?;

        let user = self
            .store
            .update_user_password(user, password, &self.security)
            .await?;

        self.store.delete_reset_token(&record.email).await?;

        Ok(user)
    }
}

fn validate_full_name(full_name: &str) -> Result<(), AccountError> {
    if full_name.trim().is_empty() {
        return Err(AccountError::Validation(
            "Please enter your name".to_string(),
        ));
    }
    if full_name.chars().count() < 5 {
        return Err(AccountError::Validation(
            "Name must be atleast 5 chars long".to_string(),
        ));
    }
    if full_name.chars().count() > 150 {
        return Err(AccountError::Validation(
            "Name must not be more than 150 chars".to_string(),
        ));
    }
    Ok(())
}

fn validate_email(email: &str) -> Result<(), AccountError> {
    if email.is_empty() {
        return Err(AccountError::Validation(
            "Please enter your email address".to_string(),
        ));
    }

    let valid = match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && domain.contains('.')
                && !domain.starts_with('.')
                && !domain.ends_with('.')
                && !email.chars().any(char::is_whitespace)
        }
        None => false,
    };

    if valid {
        Ok(())
    } else {
        Err(AccountError::Validation(
            "Email must be a valid email address".to_string(),
        ))
    }
}

/// Password policy: 5-25 chars, mixed case, at least one digit and one
/// symbol, confirmation must match.
fn validate_password(password: &str, confirmation: &str) -> Result<(), AccountError> {
    if password.is_empty() {
        return Err(AccountError::Validation(
            "Please enter your password".to_string(),
        ));
    }
    if password.chars().count() < 5 {
        return Err(AccountError::Validation(
            "Password must be atleast 5 chars long".to_string(),
        ));
    }
    if password.chars().count() > 25 {
        return Err(AccountError::Validation(
            "Password must not be more than 25 chars".to_string(),
        ));
    }
    if !password.chars().any(|c| c.is_ascii_lowercase())
        || !password.chars().any(|c| c.is_ascii_uppercase())
    {
        return Err(AccountError::Validation(
            "Password must contain both uppercase and lowercase letters".to_string(),
        ));
    }
    if !password.chars().any(|c| c.is_ascii_digit()) {
        return Err(AccountError::Validation(
            "Password must contain at least one digit".to_string(),
        ));
    }
    if password.chars().all(char::is_alphanumeric) {
        return Err(AccountError::Validation(
            "Password must contain at least one symbol".to_string(),
        ));
    }
    if password != confirmation {
        return Err(AccountError::Validation(
            "Password does not match".to_string(),
        ));
    }
    Ok(())
}
