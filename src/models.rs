//! Plain data types shared between the repository, the lifecycle manager and the HTTP layer.

use crate::entities::ProductModel;
use chrono::NaiveDateTime;
use serde::Serialize;

/// A product record as stored by the repository
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Product {
    pub id: i64,
    pub name: String,
    pub description: String,
    /// File name in the product-images directory, `None` when there is no image
    pub image_filename: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl From<ProductModel> for Product {
    fn from(model: ProductModel) -> Self {
        Self {
            id: model.id,
            name: model.name,
            description: model.description,
            image_filename: model.image,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

/// Writable fields of a product, used for both insert and update
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductFields {
    pub name: String,
    pub description: String,
    pub image_filename: Option<String>,
}

/// An uploaded image: raw bytes plus the extension taken from the client file name
#[derive(Debug, Clone)]
pub struct ImageUpload {
    pub bytes: Vec<u8>,
    /// Extension without the dot, lowercased
    pub extension: String,
}

impl ImageUpload {
    /// Builds an upload from the bytes and the client-supplied file name.
    /// A file name with no extension yields an empty extension, which validation rejects.
    #[must_use]
    pub fn from_file_name(bytes: Vec<u8>, file_name: &str) -> Self {
        let extension = std::path::Path::new(file_name)
            .extension()
            .and_then(|ext| ext.to_str())
            .unwrap_or_default()
            .to_ascii_lowercase();
        Self { bytes, extension }
    }
}

/// Product as returned to API clients, with the image resolved to a public URL
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProductView {
    pub id: i64,
    pub name: String,
    pub description: String,
    /// Full image URL, or an empty string when the product has no image
    pub image: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}
