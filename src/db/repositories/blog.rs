use anyhow::{Context, Result};
use sea_orm::{
    ActiveModelTrait, DatabaseConnection, EntityTrait, LoaderTrait, QueryOrder, Set,
};

use crate::entities::{blog_images, blogs, comments, tags};

/// A blog with its eagerly loaded children. Listing is read-amplified on
/// purpose; there is no pagination at this scale.
#[derive(Debug)]
pub struct BlogGraph {
    pub blog: blogs::Model,
    pub images: Vec<blog_images::Model>,
    pub tags: Vec<tags::Model>,
    pub comments: Vec<comments::Model>,
}

pub struct BlogRepository {
    conn: DatabaseConnection,
}

impl BlogRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    pub async fn create(
        &self,
        author_name: &str,
        title: &str,
        message: &str,
    ) -> Result<blogs::Model> {
        let now = chrono::Utc::now().to_rfc3339();

        let active = blogs::ActiveModel {
            author_name: Set(author_name.to_string()),
            title: Set(title.to_string()),
            message: Set(message.to_string()),
            created_at: Set(now.clone()),
            updated_at: Set(now),
            ..Default::default()
        };

        let blog = active
            .insert(&self.conn)
            .await
            .context("Failed to insert blog")?;

        Ok(blog)
    }

    pub async fn get(&self, id: i32) -> Result<Option<blogs::Model>> {
        let blog = blogs::Entity::find_by_id(id)
            .one(&self.conn)
            .await
            .context("Failed to query blog by ID")?;

        Ok(blog)
    }

    pub async fn get_with_related(&self, id: i32) -> Result<Option<BlogGraph>> {
        let Some(blog) = self.get(id).await? else {
            return Ok(None);
        };

        let rows = vec![blog];
        let mut images = rows
            .load_many(blog_images::Entity, &self.conn)
            .await
            .context("Failed to load blog images")?;
        let mut tag_rows = rows
            .load_many(tags::Entity, &self.conn)
            .await
            .context("Failed to load blog tags")?;
        let mut comment_rows = rows
            .load_many(comments::Entity, &self.conn)
            .await
            .context("Failed to load blog comments")?;

        let blog = rows.into_iter().next().context("blog row vanished")?;

        Ok(Some(BlogGraph {
            blog,
            images: images.pop().unwrap_or_default(),
            tags: tag_rows.pop().unwrap_or_default(),
            comments: comment_rows.pop().unwrap_or_default(),
        }))
    }

    pub async fn list_with_related(&self) -> Result<Vec<BlogGraph>> {
        let blog_rows = blogs::Entity::find()
            .order_by_asc(blogs::Column::Id)
            .all(&self.conn)
            .await
            .context("Failed to list blogs")?;

        let images = blog_rows
            .load_many(blog_images::Entity, &self.conn)
            .await
            .context("Failed to load blog images")?;
        let tag_rows = blog_rows
            .load_many(tags::Entity, &self.conn)
            .await
            .context("Failed to load blog tags")?;
        let comment_rows = blog_rows
            .load_many(comments::Entity, &self.conn)
            .await
            .context("Failed to load blog comments")?;

        let graphs = blog_rows
            .into_iter()
            .zip(images)
            .zip(tag_rows)
            .zip(comment_rows)
            .map(|(((blog, images), tags), comments)| BlogGraph {
                blog,
                images,
                tags,
                comments,
            })
            .collect();

        Ok(graphs)
    }

    pub async fn add_image(&self, blog_id: i32, image_path: &str) -> Result<blog_images::Model> {
        let now = chrono::Utc::now().to_rfc3339();

        let active = blog_images::ActiveModel {
            blog_id: Set(blog_id),
            image_path: Set(image_path.to_string()),
            created_at: Set(now),
            ..Default::default()
        };

        let image = active
            .insert(&self.conn)
            .await
            .context("Failed to insert blog image")?;

        Ok(image)
    }
}
