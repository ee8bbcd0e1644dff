use anyhow::{Context, Result};
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set};

use crate::entities::tags;

pub struct TagRepository {
    conn: DatabaseConnection,
}

impl TagRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    pub async fn create(&self, blog_id: i32, name: &str) -> Result<tags::Model> {
        let now = chrono::Utc::now().to_rfc3339();

        let active = tags::ActiveModel {
            blog_id: Set(blog_id),
            name: Set(name.to_string()),
            created_at: Set(now.clone()),
            updated_at: Set(now),
            ..Default::default()
        };

        let tag = active
            .insert(&self.conn)
            .await
            .context("Failed to insert tag")?;

        Ok(tag)
    }

    pub async fn get(&self, id: i32) -> Result<Option<tags::Model>> {
        let tag = tags::Entity::find_by_id(id)
            .one(&self.conn)
            .await
            .context("Failed to query tag by ID")?;

        Ok(tag)
    }

    /// Tag names are unique system-wide, not per blog.
    pub async fn get_by_name(&self, name: &str) -> Result<Option<tags::Model>> {
        let tag = tags::Entity::find()
            .filter(tags::Column::Name.eq(name))
            .one(&self.conn)
            .await
            .context("Failed to query tag by name")?;

        Ok(tag)
    }

    pub async fn list(&self) -> Result<Vec<tags::Model>> {
        let tags = tags::Entity::find()
            .all(&self.conn)
            .await
            .context("Failed to list tags")?;

        Ok(tags)
    }

    pub async fn rename(&self, tag: tags::Model, name: &str) -> Result<tags::Model> {
        let now = chrono::Utc::now().to_rfc3339();

        let mut active: tags::ActiveModel = tag.into();
        active.name = Set(name.to_string());
        active.updated_at = Set(now);
        let tag = active.update(&self.conn).await?;

        Ok(tag)
    }

    pub async fn delete(&self, id: i32) -> Result<bool> {
        let result = tags::Entity::delete_by_id(id)
            .exec(&self.conn)
            .await
            .context("Failed to delete tag")?;

        Ok(result.rows_affected > 0)
    }
}
