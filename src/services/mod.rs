pub mod account;
pub mod image;
pub mod mailer;

pub use account::{AccountError, AccountService, RegisterInput};
pub use image::ImageService;
pub use mailer::{LogMailer, Mailer};
