use anyhow::{Context, Result};
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set};

use crate::entities::{session_tokens, users};

pub struct TokenRepository {
    conn: DatabaseConnection,
}

impl TokenRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    /// Issue a fresh session token for a user. Existing tokens for the
    /// same user stay valid; concurrent sessions are allowed.
    pub async fn issue(&self, user_id: i32) -> Result<session_tokens::Model> {
        let now = chrono::Utc::now().to_rfc3339();

        let active = session_tokens::ActiveModel {
            token: Set(generate_session_token()),
            user_id: Set(user_id),
            created_at: Set(now),
            ..Default::default()
        };

        let token = active
            .insert(&self.conn)
            .await
            .context("Failed to insert session token")?;

        Ok(token)
    }

    /// Resolve a bearer token to its row and owning user.
    pub async fn resolve(
        &self,
        token: &str,
    ) -> Result<Option<(session_tokens::Model, users::Model)>> {
        let found = session_tokens::Entity::find()
            .filter(session_tokens::Column::Token.eq(token))
            .find_also_related(users::Entity)
            .one(&self.conn)
            .await
            .context("Failed to resolve session token")?;

        Ok(found.and_then(|(session, user)| user.map(|u| (session, u))))
    }

    /// Revoke a single token by its row id. Only the session that made
    /// the request is destroyed at logout.
    pub async fn revoke(&self, token_id: i32) -> Result<bool> {
        let result = session_tokens::Entity::delete_by_id(token_id)
            .exec(&self.conn)
            .await
            .context("Failed to revoke session token")?;

        Ok(result.rows_affected > 0)
    }
}

/// Generate a random session token (64 character hex string)
#[must_use]
pub fn generate_session_token() -> String {
    use rand::Rng;

    let mut rng = rand::rng();
    let bytes: [u8; 32] = rng.random();

    bytes.iter().fold(String::with_capacity(64), |mut acc, b| {
        use std::fmt::Write;
        let _ = write!(acc, "{b:02x}");
        acc
    })
}
