use anyhow::{Context, Result};
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, Set};

use crate::entities::comments;

pub struct CommentRepository {
    conn: DatabaseConnection,
}

impl CommentRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    pub async fn create(
        &self,
        blog_id: i32,
        user_id: i32,
        comment: &str,
    ) -> Result<comments::Model> {
        let now = chrono::Utc::now().to_rfc3339();

        let active = comments::ActiveModel {
            blog_id: Set(blog_id),
            user_id: Set(user_id),
            comment: Set(comment.to_string()),
            created_at: Set(now.clone()),
            updated_at: Set(now),
            ..Default::default()
        };

        let comment = active
            .insert(&self.conn)
            .await
            .context("Failed to insert comment")?;

        Ok(comment)
    }

    pub async fn get(&self, id: i32) -> Result<Option<comments::Model>> {
        let comment = comments::Entity::find_by_id(id)
            .one(&self.conn)
            .await
            .context("Failed to query comment by ID")?;

        Ok(comment)
    }

    pub async fn update_text(&self, comment: comments::Model, text: &str) -> Result<comments::Model> {
        let now = chrono::Utc::now().to_rfc3339();

        let mut active: comments::ActiveModel = comment.into();
        active.comment = Set(text.to_string());
        active.updated_at = Set(now);
        let comment = active.update(&self.conn).await?;

        Ok(comment)
    }

    pub async fn delete(&self, id: i32) -> Result<bool> {
        let result = comments::Entity::delete_by_id(id)
            .exec(&self.conn)
            .await
            .context("Failed to delete comment")?;

        Ok(result.rows_affected > 0)
    }
}
