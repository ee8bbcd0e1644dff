use anyhow::{Context, Result};
use argon2::{
    Algorithm, Argon2, Params, Version,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set};
use tokio::task;

use crate::config::SecurityConfig;
use crate::entities::users;

pub struct UserRepository {
    conn: DatabaseConnection,
}

/// Fields required to persist a new account.
pub struct NewUser {
    pub full_name: String,
    pub email: String,
    pub password_hash: String,
    pub otp: String,
}

impl UserRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    /// Insert a new user. New accounts start unverified, inactive,
    /// not suspended and without the admin role.
    pub async fn create(&self, new_user: NewUser) -> Result<users::Model> {
        let now = chrono::Utc::now().to_rfc3339();

        let active = users::ActiveModel {
            full_name: Set(new_user.full_name),
            email: Set(new_user.email),
            password_hash: Set(new_user.password_hash),
            otp: Set(Some(new_user.otp)),
            is_verified: Set(false),
            is_active: Set(false),
            is_suspended: Set(false),
            is_admin: Set(false),
            created_at: Set(now.clone()),
            updated_at: Set(now),
            ..Default::default()
        };

        let user = active
            .insert(&self.conn)
            .await
            .context("Failed to insert user")?;

        Ok(user)
    }

    pub async fn get_by_email(&self, email: &str) -> Result<Option<users::Model>> {
        let user = users::Entity::find()
            .filter(users::Column::Email.eq(email))
            .one(&self.conn)
            .await
            .context("Failed to query user by email")?;

        Ok(user)
    }

    pub async fn get_by_id(&self, id: i32) -> Result<Option<users::Model>> {
        let user = users::Entity::find_by_id(id)
            .one(&self.conn)
            .await
            .context("Failed to query user by ID")?;

        Ok(user)
    }

    /// Global OTP lookup: the code is unique to the account that owns it.
    pub async fn get_by_otp(&self, otp: &str) -> Result<Option<users::Model>> {
        let user = users::Entity::find()
            .filter(users::Column::Otp.eq(otp))
            .one(&self.conn)
            .await
            .context("Failed to query user by OTP")?;

        Ok(user)
    }

    pub async fn list_non_admin(&self) -> Result<Vec<users::Model>> {
        let users = users::Entity::find()
            .filter(users::Column::IsAdmin.eq(false))
            .all(&self.conn)
            .await
            .context("Failed to list non-admin users")?;

        Ok(users)
    }

    /// Verify a password against a stored hash.
    /// Note: This uses `spawn_blocking` because Argon2 verification is
    /// CPU-intensive and would block the async runtime if run directly.
    pub async fn verify_password(&self, user: &users::Model, password: &str) -> Result<bool> {
        let password_hash = user.password_hash.clone();
        let password = password.to_string();

        let is_valid = task::spawn_blocking(move || {
            let parsed_hash = PasswordHash::new(&password_hash)
                .map_err(|e| anyhow::anyhow!("Invalid password hash format: {e}"))?;

            let argon2 = Argon2::default();
            Ok::<bool, anyhow::Error>(
                argon2
                    .verify_password(password.as_bytes(), &parsed_hash)
                    .is_ok(),
            )
        })
        .await
        .context("Password verification task panicked")??;

        Ok(is_valid)
    }

    /// Mark the account verified and clear the consumed OTP.
    pub async fn mark_verified(&self, user: users::Model) -> Result<users::Model> {
        let now = chrono::Utc::now().to_rfc3339();

        let mut active: users::ActiveModel = user.into();
        active.is_verified = Set(true);
        active.otp = Set(None);
        active.updated_at = Set(now);
        let user = active.update(&self.conn).await?;

        Ok(user)
    }

    pub async fn mark_active(&self, user: users::Model) -> Result<users::Model> {
        let now = chrono::Utc::now().to_rfc3339();

        let mut active: users::ActiveModel = user.into();
        active.is_active = Set(true);
        active.updated_at = Set(now);
        let user = active.update(&self.conn).await?;

        Ok(user)
    }

    pub async fn suspend(&self, user: users::Model) -> Result<users::Model> {
        let now = chrono::Utc::now().to_rfc3339();

        let mut active: users::ActiveModel = user.into();
        active.is_suspended = Set(true);
        active.updated_at = Set(now);
        let user = active.update(&self.conn).await?;

        Ok(user)
    }

    /// Delete a user. Session tokens and comments go with it via the
    /// cascading foreign keys.
    pub async fn delete(&self, id: i32) -> Result<bool> {
        let result = users::Entity::delete_by_id(id)
            .exec(&self.conn)
            .await
            .context("Failed to delete user")?;

        Ok(result.rows_affected > 0)
    }

    /// Replace a user's password with a freshly hashed one.
    pub async fn update_password(
        &self,
        user: users::Model,
        new_password: &str,
        config: &SecurityConfig,
    ) -> Result<users::Model> {
        let password = new_password.to_string();
        let config = config.clone();
        let new_hash = task::spawn_blocking(move || hash_password(&password, Some(&config)))
            .await
            .context("Password hashing task panicked")??;

        let now = chrono::Utc::now().to_rfc3339();

        let mut active: users::ActiveModel = user.into();
        active.password_hash = Set(new_hash);
        active.updated_at = Set(now);
        let user = active.update(&self.conn).await?;

        Ok(user)
    }
}

/// Hash a password using Argon2id with optional custom params.
/// If config is None, uses the argon2 crate defaults.
pub fn hash_password(password: &str, config: Option<&SecurityConfig>) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);

    let argon2 = if let Some(cfg) = config {
        let params = Params::new(
            cfg.argon2_memory_cost_kib,
            cfg.argon2_time_cost,
            cfg.argon2_parallelism,
            None, // output length (use default)
        )
        .map_err(|e| anyhow::anyhow!("Invalid Argon2 params: {e}"))?;
        Argon2::new(Algorithm::Argon2id, Version::V0x13, params)
    } else {
        Argon2::default()
    };

    let hash = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| anyhow::anyhow!("Failed to hash password: {e}"))?;

    Ok(hash.to_string())
}

/// Generate a random alphanumeric code of the given length.
/// Used for verification OTPs and password reset tokens.
#[must_use]
pub fn generate_code(length: usize) -> String {
    use rand::Rng;
    use rand::distr::Alphanumeric;

    rand::rng()
        .sample_iter(Alphanumeric)
        .take(length)
        .map(char::from)
        .collect()
}
