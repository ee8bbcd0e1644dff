use anyhow::Result;
use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection, Statement};
use std::path::Path;
use std::time::Duration;
use tracing::info;

use crate::config::SecurityConfig;
use crate::entities::{blog_images, blogs, comments, password_reset_tokens, session_tokens, tags, users};

pub mod migrator;
pub mod repositories;

pub use repositories::blog::BlogGraph;
pub use repositories::user::NewUser;

#[derive(Clone)]
pub struct Store {
    pub conn: DatabaseConnection,
}

impl Store {
    pub async fn new(db_url: &str) -> Result<Self> {
        Self::with_pool_options(db_url, 5, 1).await
    }

    pub async fn with_pool_options(
        db_url: &str,
        max_connections: u32,
        min_connections: u32,
    ) -> Result<Self> {
        use sea_orm_migration::MigratorTrait;

        if !db_url.contains(":memory:") {
            let path_str = db_url.trim_start_matches("sqlite:");
            if let Some(parent) = Path::new(path_str).parent() {
                tokio::fs::create_dir_all(parent).await.ok();
            }
            if !Path::new(path_str).exists() {
                std::fs::File::create(path_str)?;
            }
        }

        let mut opt = ConnectOptions::new(db_url.to_string());
        opt.max_connections(max_connections)
            .min_connections(min_connections)
            .connect_timeout(Duration::from_secs(10))
            .acquire_timeout(Duration::from_secs(10))
            .idle_timeout(Duration::from_secs(300))
            .max_lifetime(Duration::from_secs(600))
            .sqlx_logging(false);

        let conn = Database::connect(opt).await?;

        migrator::Migrator::up(&conn, None).await?;

        info!(
            "Database connected & migrations applied (pool: {}-{})",
            min_connections, max_connections
        );

        Ok(Self { conn })
    }

    pub async fn ping(&self) -> Result<()> {
        let backend = self.conn.get_database_backend();
        self.conn
            .query_one(Statement::from_string(backend, "SELECT 1".to_string()))
            .await?;
        Ok(())
    }

    fn user_repo(&self) -> repositories::user::UserRepository {
        repositories::user::UserRepository::new(self.conn.clone())
    }

    fn token_repo(&self) -> repositories::token::TokenRepository {
        repositories::token::TokenRepository::new(self.conn.clone())
    }

    fn reset_repo(&self) -> repositories::password_reset::PasswordResetRepository {
        repositories::password_reset::PasswordResetRepository::new(self.conn.clone())
    }

    fn blog_repo(&self) -> repositories::blog::BlogRepository {
        repositories::blog::BlogRepository::new(self.conn.clone())
    }

    fn tag_repo(&self) -> repositories::tag::TagRepository {
        repositories::tag::TagRepository::new(self.conn.clone())
    }

    fn comment_repo(&self) -> repositories::comment::CommentRepository {
        repositories::comment::CommentRepository::new(self.conn.clone())
    }

    // ---- users ----

    pub async fn create_user(&self, new_user: NewUser) -> Result<users::Model> {
        self.user_repo().create(new_user).await
    }

    pub async fn get_user_by_email(&self, email: &str) -> Result<Option<users::Model>> {
        self.user_repo().get_by_email(email).await
    }

    pub async fn get_user_by_id(&self, id: i32) -> Result<Option<users::Model>> {
        self.user_repo().get_by_id(id).await
    }

    pub async fn get_user_by_otp(&self, otp: &str) -> Result<Option<users::Model>> {
        self.user_repo().get_by_otp(otp).await
    }

    pub async fn list_non_admin_users(&self) -> Result<Vec<users::Model>> {
        self.user_repo().list_non_admin().await
    }

    pub async fn verify_password(&self, user: &users::Model, password: &str) -> Result<bool> {
        self.user_repo().verify_password(user, password).await
    }

    pub async fn mark_user_verified(&self, user: users::Model) -> Result<users::Model> {
        self.user_repo().mark_verified(user).await
    }

    pub async fn mark_user_active(&self, user: users::Model) -> Result<users::Model> {
        self.user_repo().mark_active(user).await
    }

    pub async fn suspend_user(&self, user: users::Model) -> Result<users::Model> {
        self.user_repo().suspend(user).await
    }

    pub async fn delete_user(&self, id: i32) -> Result<bool> {
        self.user_repo().delete(id).await
    }

    pub async fn update_user_password(
        &self,
        user: users::Model,
        new_password: &str,
        config: &SecurityConfig,
    ) -> Result<users::Model> {
        self.user_repo()
            .update_password(user, new_password, config)
            .await
    }

    // ---- session tokens ----

    pub async fn issue_session(&self, user_id: i32) -> Result<session_tokens::Model> {
        self.token_repo().issue(user_id).await
    }

    pub async fn resolve_session(
        &self,
        token: &str,
    ) -> Result<Option<(session_tokens::Model, users::Model)>> {
        self.token_repo().resolve(token).await
    }

    pub async fn revoke_session(&self, token_id: i32) -> Result<bool> {
        self.token_repo().revoke(token_id).await
    }

    // ---- password reset tokens ----

    pub async fn upsert_reset_token(
        &self,
        email: &str,
        token: &str,
    ) -> Result<password_reset_tokens::Model> {
        self.reset_repo().upsert(email, token).await
    }

    pub async fn get_reset_token(
        &self,
        token: &str,
    ) -> Result<Option<password_reset_tokens::Model>> {
        self.reset_repo().get_by_token(token).await
    }

    pub async fn delete_reset_token(&self, email: &str) -> Result<bool> {
        self.reset_repo().delete(email).await
    }

    // ---- blogs ----

    pub async fn create_blog(
        &self,
        author_name: &str,
        title: &str,
        message: &str,
    ) -> Result<blogs::Model> {
        self.blog_repo().create(author_name, title, message).await
    }

    pub async fn get_blog(&self, id: i32) -> Result<Option<blogs::Model>> {
        self.blog_repo().get(id).await
    }

    pub async fn get_blog_with_related(&self, id: i32) -> Result<Option<BlogGraph>> {
        self.blog_repo().get_with_related(id).await
    }

    pub async fn list_blogs_with_related(&self) -> Result<Vec<BlogGraph>> {
        self.blog_repo().list_with_related().await
    }

    pub async fn add_blog_image(
        &self,
        blog_id: i32,
        image_path: &str,
    ) -> Result<blog_images::Model> {
        self.blog_repo().add_image(blog_id, image_path).await
    }

    // ---- tags ----

    pub async fn create_tag(&self, blog_id: i32, name: &str) -> Result<tags::Model> {
        self.tag_repo().create(blog_id, name).await
    }

    pub async fn get_tag(&self, id: i32) -> Result<Option<tags::Model>> {
        self.tag_repo().get(id).await
    }

    pub async fn get_tag_by_name(&self, name: &str) -> Result<Option<tags::Model>> {
        self.tag_repo().get_by_name(name).await
    }

    pub async fn list_tags(&self) -> Result<Vec<tags::Model>> {
        self.tag_repo().list().await
    }

    pub async fn rename_tag(&self, tag: tags::Model, name: &str) -> Result<tags::Model> {
        self.tag_repo().rename(tag, name).await
    }

    pub async fn delete_tag(&self, id: i32) -> Result<bool> {
        self.tag_repo().delete(id).await
    }

    // ---- comments ----

    pub async fn create_comment(
        &self,
        blog_id: i32,
        user_id: i32,
        comment: &str,
    ) -> Result<comments::Model> {
        self.comment_repo().create(blog_id, user_id, comment).await
    }

    pub async fn get_comment(&self, id: i32) -> Result<Option<comments::Model>> {
        self.comment_repo().get(id).await
    }

    pub async fn update_comment_text(
        &self,
        comment: comments::Model,
        text: &str,
    ) -> Result<comments::Model> {
        self.comment_repo().update_text(comment, text).await
    }

    pub async fn delete_comment(&self, id: i32) -> Result<bool> {
        self.comment_repo().delete(id).await
    }
}
