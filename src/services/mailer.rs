//! Notification dispatch seam.
//!
//! There is no real delivery transport here; the trait keeps the account
//! workflow testable and lets a deployment plug in an actual mail sender.
//! The default implementation writes the notification to the log.

use anyhow::Result;
use async_trait::async_trait;

use crate::config::NotificationConfig;
use crate::entities::users;

#[async_trait]
pub trait Mailer: Send + Sync {
    /// Greets a freshly registered account.
    async fn send_welcome(&self, user: &users::Model) -> Result<()>;

    /// Carries the verification OTP. Re-sent on login attempts by
    /// unverified accounts.
    async fn send_verification(&self, user: &users::Model) -> Result<()>;

    /// Carries a password reset token.
    async fn send_password_reset(&self, user: &users::Model, token: &str) -> Result<()>;
}

pub struct LogMailer {
    config: NotificationConfig,
}

impl LogMailer {
    #[must_use]
    pub const fn new(config: NotificationConfig) -> Self {
        Self { config }
    }
}

#[async_trait]
impl Mailer for LogMailer {
    async fn send_welcome(&self, user: &users::Model) -> Result<()> {
        tracing::info!(
            from = %self.config.from_address,
            to = %user.email,
            "Welcome notification for {}",
            user.full_name
        );
        Ok(())
    }

    async fn send_verification(&self, user: &users::Model) -> Result<()> {
        let otp = user.otp.as_deref().unwrap_or_default();
        tracing::info!(
            from = %self.config.from_address,
            to = %user.email,
            "Verification notification: {}/verify-email?otp={}",
            self.config.public_base_url,
            otp
        );
        Ok(())
    }

    async fn send_password_reset(&self, user: &users::Model, token: &str) -> Result<()> {
        tracing::info!(
            from = %self.config.from_address,
            to = %user.email,
            "Password reset notification: {}/reset-password?token={}",
            self.config.public_base_url,
            token
        );
        Ok(())
    }
}
