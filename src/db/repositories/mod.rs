pub mod blog;
pub mod comment;
pub mod password_reset;
pub mod tag;
pub mod token;
pub mod user;
