use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::info;

use crate::config::Config;

/// Raster formats accepted for blog image uploads.
const ALLOWED_EXTENSIONS: [&str; 4] = ["png", "jpg", "jpeg", "gif"];

pub struct ImageService {
    config: Config,
}

impl ImageService {
    #[must_use]
    pub const fn new(config: Config) -> Self {
        Self { config }
    }

    /// Extract and check the extension of an uploaded file name.
    pub fn validate_extension(file_name: &str) -> Result<String> {
        let extension = Path::new(file_name)
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();

        if ALLOWED_EXTENSIONS.contains(&extension.as_str()) {
            Ok(extension)
        } else {
            anyhow::bail!("The image must be a png, jpg, jpeg or gif")
        }
    }

    /// Write uploaded bytes under the images dir and return the stored
    /// relative path.
    pub async fn save_upload(
        &self,
        blog_id: i32,
        file_name: &str,
        bytes: &[u8],
    ) -> Result<String> {
        let extension = Self::validate_extension(file_name)?;

        let filename = format!("{}_{}.{}", blog_id, uuid::Uuid::new_v4(), extension);

        let images_dir = PathBuf::from(&self.config.general.images_path);
        if !images_dir.exists() {
            fs::create_dir_all(&images_dir).await?;
        }

        let file_path = images_dir.join(&filename);

        info!(blog_id, path = %file_path.display(), "Storing uploaded image");

        fs::write(&file_path, bytes)
            .await
            .with_context(|| format!("Failed to write image to {}", file_path.display()))?;

        Ok(filename)
    }
}
