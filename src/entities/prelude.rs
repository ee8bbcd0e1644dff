pub use super::blog_images::Entity as BlogImages;
pub use super::blogs::Entity as Blogs;
pub use super::comments::Entity as Comments;
pub use super::password_reset_tokens::Entity as PasswordResetTokens;
pub use super::session_tokens::Entity as SessionTokens;
pub use super::tags::Entity as Tags;
pub use super::users::Entity as Users;
