//! Shared test utilities.
//!
//! This module provides helpers for setting up an in-memory database, a
//! temporary image directory and a wired [`ProductService`].

use crate::{
    core::{LocalFileStore, ProductInput, ProductService, SeaProductRepository},
    errors::Result,
    models::ImageUpload,
};
use sea_orm::DatabaseConnection;
use std::path::Path;
use std::sync::Arc;
use tempfile::TempDir;
use tracing_subscriber::EnvFilter;

/// Base URL used by every test file store
pub const TEST_BASE_URL: &str = "http://localhost:8080";

pub fn init_test_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug")),
        )
        .with_test_writer()
        .try_init();
}

/// Creates an in-memory `SQLite` database with all tables initialized.
pub async fn setup_test_db() -> Result<DatabaseConnection> {
    init_test_tracing();
    let db = sea_orm::Database::connect("sqlite::memory:").await?;
    crate::config::database::create_tables(&db).await?;
    Ok(db)
}

/// A service wired to an in-memory database and a temporary public directory.
/// The directory is removed when this value is dropped.
pub struct TestEnv {
    pub service: ProductService,
    pub db: DatabaseConnection,
    pub files: LocalFileStore,
    pub public_dir: TempDir,
}

impl TestEnv {
    pub fn images_dir(&self) -> &Path {
        self.files.images_dir()
    }

    /// Sorted names of the files currently in the images directory
    pub fn stored_files(&self) -> Vec<String> {
        let Ok(entries) = std::fs::read_dir(self.images_dir()) else {
            return Vec::new();
        };
        let mut names: Vec<String> = entries
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }
}

pub async fn setup_service() -> Result<TestEnv> {
    let db = setup_test_db().await?;
    let public_dir = tempfile::tempdir()?;
    let files = LocalFileStore::new(public_dir.path(), TEST_BASE_URL);
    let service = ProductService::new(
        Arc::new(SeaProductRepository::new(db.clone())),
        Arc::new(files.clone()),
    );
    Ok(TestEnv {
        service,
        db,
        files,
        public_dir,
    })
}

pub fn upload(extension: &str) -> ImageUpload {
    ImageUpload {
        bytes: format!("fake {extension} image").into_bytes(),
        extension: extension.to_string(),
    }
}

pub fn png_upload() -> ImageUpload {
    upload("png")
}

pub fn product_input(name: &str, description: &str, image: Option<ImageUpload>) -> ProductInput {
    ProductInput {
        name: name.to_string(),
        description: description.to_string(),
        image,
    }
}
