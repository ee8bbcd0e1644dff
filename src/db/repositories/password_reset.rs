use anyhow::{Context, Result};
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set};

use crate::entities::password_reset_tokens;

pub struct PasswordResetRepository {
    conn: DatabaseConnection,
}

impl PasswordResetRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    /// Store a reset token for an email, replacing any earlier one.
    /// At most one live token exists per email.
    pub async fn upsert(&self, email: &str, token: &str) -> Result<password_reset_tokens::Model> {
        let now = chrono::Utc::now().to_rfc3339();

        let existing = password_reset_tokens::Entity::find_by_id(email)
            .one(&self.conn)
            .await
            .context("Failed to query reset token by email")?;

        let record = if let Some(existing) = existing {
            let mut active: password_reset_tokens::ActiveModel = existing.into();
            active.token = Set(token.to_string());
            active.updated_at = Set(now);
            active.update(&self.conn).await?
        } else {
            let active = password_reset_tokens::ActiveModel {
                email: Set(email.to_string()),
                token: Set(token.to_string()),
                created_at: Set(now.clone()),
                updated_at: Set(now),
            };
            active.insert(&self.conn).await?
        };

        Ok(record)
    }

    pub async fn get_by_token(&self, token: &str) -> Result<Option<password_reset_tokens::Model>> {
        let record = password_reset_tokens::Entity::find()
            .filter(password_reset_tokens::Column::Token.eq(token))
            .one(&self.conn)
            .await
            .context("Failed to query reset token")?;

        Ok(record)
    }

    /// Consume a token. Reset tokens are single use.
    pub async fn delete(&self, email: &str) -> Result<bool> {
        let result = password_reset_tokens::Entity::delete_by_id(email)
            .exec(&self.conn)
            .await
            .context("Failed to delete reset token")?;

        Ok(result.rows_affected > 0)
    }
}
