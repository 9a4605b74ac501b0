//! Image file storage.
//!
//! Images are kept in a single flat directory and addressed purely by file name.
//! The name is derived from the product name, so two products with the same
//! slug and extension share a file; the last write wins.

use crate::config::AppConfig;
use crate::core::slug::slugify_or_fallback;
use crate::errors::{Error, Result};
use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};
use tracing::{debug, info, instrument, warn};

/// Path of the product-images directory, relative to both the public directory and the base URL
pub const PRODUCT_IMAGES_PATH: &str = "storage/products";

/// Storage for product images
#[async_trait]
pub trait FileStore: Send + Sync {
    /// Writes `content` as `{slug(base_name)}.{extension}` with the extension
    /// lowercased, and returns that file name.
    /// An existing file with the same name is overwritten.
    async fn save(&self, content: &[u8], base_name: &str, extension: &str) -> Result<String>;

    /// Removes the named file. Succeeds when the file does not exist.
    async fn delete(&self, filename: &str) -> Result<()>;

    /// Public URL for a stored file, or an empty string for `None`.
    fn url_for(&self, filename: Option<&str>) -> String;
}

/// [`FileStore`] backed by a directory on the local filesystem
#[derive(Debug, Clone)]
pub struct LocalFileStore {
    images_dir: PathBuf,
    base_url: String,
}

impl LocalFileStore {
    /// Creates a store writing under `{public_dir}/storage/products` and
    /// producing URLs under `{base_url}/storage/products`.
    #[must_use]
    pub fn new(public_dir: impl AsRef<Path>, base_url: &str) -> Self {
        Self {
            images_dir: public_dir.as_ref().join(PRODUCT_IMAGES_PATH),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    #[must_use]
    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(&config.storage.public_dir, &config.server.base_url())
    }

    /// Directory the images are written to
    #[must_use]
    pub fn images_dir(&self) -> &Path {
        &self.images_dir
    }

    /// Resolves a stored file name to its path, rejecting anything that is
    /// not a single plain path component.
    fn path_for(&self, filename: &str) -> Option<PathBuf> {
        let mut components = Path::new(filename).components();
        match (components.next(), components.next()) {
            (Some(Component::Normal(name)), None) if !filename.contains('\\') => {
                Some(self.images_dir.join(name))
            }
            _ => None,
        }
    }
}

#[async_trait]
impl FileStore for LocalFileStore {
    #[instrument(skip(self, content), fields(size = content.len()))]
    async fn save(&self, content: &[u8], base_name: &str, extension: &str) -> Result<String> {
        let filename = format!(
            "{}.{}",
            slugify_or_fallback(base_name),
            extension.to_ascii_lowercase()
        );
        let path = self.images_dir.join(&filename);

        let write_error = |source| Error::StorageWrite {
            filename: filename.clone(),
            source,
        };
        tokio::fs::create_dir_all(&self.images_dir)
            .await
            .map_err(write_error)?;
        tokio::fs::write(&path, content).await.map_err(write_error)?;

        info!("Stored image '{}'", filename);
        Ok(filename)
    }

    #[instrument(skip(self))]
    async fn delete(&self, filename: &str) -> Result<()> {
        let Some(path) = self.path_for(filename) else {
            warn!("Refusing to delete suspicious image name '{}'", filename);
            return Ok(());
        };

        match tokio::fs::remove_file(&path).await {
            Ok(()) => {
                info!("Deleted image '{}'", filename);
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("Image '{}' already absent", filename);
                Ok(())
            }
            Err(source) => Err(Error::StorageDelete {
                filename: filename.to_string(),
                source,
            }),
        }
    }

    fn url_for(&self, filename: Option<&str>) -> String {
        match filename {
            Some(name) if !name.is_empty() => {
                format!("{}/{}/{}", self.base_url, PRODUCT_IMAGES_PATH, name)
            }
            _ => String::new(),
        }
    }
}
