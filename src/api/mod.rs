use axum::{
    Router,
    http::HeaderValue,
    routing::{delete, get, patch, post, put},
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::config::Config;
use crate::db::Store;
use crate::services::{AccountService, ImageService, LogMailer};

pub mod admin;
pub mod auth;
pub mod blogs;
pub mod comments;
mod error;
pub mod tags;
mod types;
mod validation;

pub use error::ApiError;
pub use types::*;

pub struct AppState {
    pub config: Config,

    store: Store,

    account_service: AccountService,

    image_service: ImageService,
}

impl AppState {
    #[must_use]
    pub const fn store(&self) -> &Store {
        &self.store
    }

    #[must_use]
    pub const fn account_service(&self) -> &AccountService {
        &self.account_service
    }

    #[must_use]
    pub const fn image_service(&self) -> &ImageService {
        &self.image_service
    }
}

pub async fn create_app_state_from_config(config: Config) -> anyhow::Result<Arc<AppState>> {
    let store = Store::with_pool_options(
        &config.general.database_path,
        config.general.max_db_connections,
        config.general.min_db_connections,
    )
    .await?;

    let mailer = Arc::new(LogMailer::new(config.notifications.clone()));

    let account_service =
        AccountService::new(store.clone(), mailer, config.security.clone());
    let image_service = ImageService::new(config.clone());

    Ok(Arc::new(AppState {
        config,
        store,
        account_service,
        image_service,
    }))
}

pub fn router(state: Arc<AppState>) -> Router {
    let images_path = state.config.general.images_path.clone();
    let cors_origins = state.config.server.cors_allowed_origins.clone();

    let api_router = Router::new()
        // account lifecycle
        .route("/register", post(auth::register))
        .route("/login", post(auth::login))
        .route("/verify-email", get(auth::verify_email))
        .route("/forgot-password", post(auth::forgot_password))
        .route("/reset-password", post(auth::reset_password))
        .route("/profile", get(auth::profile))
        .route("/logout", get(auth::logout))
        // admin user management
        .route("/allusers", get(admin::list_users))
        .route("/user/{id}", get(admin::get_user))
        .route("/user/{id}/suspend", patch(admin::suspend_user))
        .route("/user/{id}", delete(admin::delete_user))
        // blogs
        .route("/blogs", get(blogs::list_blogs))
        .route("/blog", post(blogs::create_blog))
        .route("/blog/{id}", get(blogs::get_blog))
        .route("/blog/{id}/images", post(blogs::upload_image))
        // tags
        .route("/blog/{id}/tags", post(tags::create_tag))
        .route("/tags", get(tags::list_tags))
        .route("/tag/{id}", put(tags::update_tag))
        .route("/tag/{id}", delete(tags::delete_tag))
        // comments
        .route("/blog/{id}/comments", post(comments::add_comment))
        .route("/comment/{id}", put(comments::update_comment))
        .route("/comment/{id}", delete(comments::delete_comment))
        .with_state(state);

    let cors_layer = if cors_origins.contains(&"*".to_string()) {
        CorsLayer::new().allow_origin(Any)
    } else {
        let origins: Vec<HeaderValue> =
            cors_origins.iter().filter_map(|s| s.parse().ok()).collect();
        CorsLayer::new().allow_origin(origins)
    };

    Router::new()
        .merge(api_router)
        .nest_service("/images", tower_http::services::ServeDir::new(images_path))
        .layer(cors_layer.allow_methods(Any).allow_headers(Any))
        .layer(TraceLayer::new_for_http())
}
