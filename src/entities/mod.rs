pub mod prelude;

pub mod blog_images;
pub mod blogs;
pub mod comments;
pub mod password_reset_tokens;
pub mod session_tokens;
pub mod tags;
pub mod users;
