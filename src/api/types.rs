use serde::Serialize;

use crate::db::BlogGraph;
use crate::entities::{blog_images, blogs, comments, session_tokens, tags, users};

/// Uniform `{message, data?}` envelope used for every outward response,
/// success and error alike. Errors carry no `data`.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T> ApiResponse<T> {
    pub fn success(message: impl Into<String>, data: T) -> Self {
        Self {
            message: message.into(),
            data: Some(data),
        }
    }
}

impl ApiResponse<()> {
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            data: None,
        }
    }
}

/// Outward user representation. The password hash never leaves the
/// server; the pending OTP rides along until verification consumes it.
#[derive(Debug, Serialize)]
pub struct UserDto {
    pub id: i32,
    pub full_name: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub otp: Option<String>,
    pub is_verified: bool,
    pub is_active: bool,
    pub is_suspended: bool,
    pub is_admin: bool,
    pub created_at: String,
    pub updated_at: String,
}

impl From<users::Model> for UserDto {
    fn from(model: users::Model) -> Self {
        Self {
            id: model.id,
            full_name: model.full_name,
            email: model.email,
            otp: model.otp,
            is_verified: model.is_verified,
            is_active: model.is_active,
            is_suspended: model.is_suspended,
            is_admin: model.is_admin,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

/// Login payload: the user plus a freshly issued bearer token.
#[derive(Debug, Serialize)]
pub struct AuthUserDto {
    pub user: UserDto,
    pub token: String,
}

impl AuthUserDto {
    #[must_use]
    pub fn new(user: users::Model, session: session_tokens::Model) -> Self {
        Self {
            user: user.into(),
            token: session.token,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct BlogDto {
    pub id: i32,
    pub author_name: String,
    pub title: String,
    pub message: String,
    pub created_at: String,
    pub updated_at: String,
    pub images: Vec<blog_images::Model>,
    pub tags: Vec<tags::Model>,
    pub comments: Vec<comments::Model>,
}

impl From<BlogGraph> for BlogDto {
    fn from(graph: BlogGraph) -> Self {
        Self {
            id: graph.blog.id,
            author_name: graph.blog.author_name,
            title: graph.blog.title,
            message: graph.blog.message,
            created_at: graph.blog.created_at,
            updated_at: graph.blog.updated_at,
            images: graph.images,
            tags: graph.tags,
            comments: graph.comments,
        }
    }
}

impl From<blogs::Model> for BlogDto {
    fn from(blog: blogs::Model) -> Self {
        Self {
            id: blog.id,
            author_name: blog.author_name,
            title: blog.title,
            message: blog.message,
            created_at: blog.created_at,
            updated_at: blog.updated_at,
            images: Vec::new(),
            tags: Vec::new(),
            comments: Vec::new(),
        }
    }
}
