//! Product lifecycle management.
//!
//! [`ProductService`] keeps a product record and its image file consistent:
//! an image is always written before any record refers to it, and a replaced
//! or deleted product's old file is removed only once the record no longer
//! points at it. A crash in between can leave an unreferenced file behind but
//! never a record naming a missing file.
//!
//! All operations validate their input before touching storage and return
//! products with the image resolved to a public URL.

use crate::{
    core::{
        file_store::FileStore,
        repository::ProductRepository,
        validation::{ImageRule, validate_product_input},
    },
    errors::{Error, Result},
    models::{ImageUpload, Product, ProductFields, ProductView},
};
use std::sync::Arc;
use tracing::{error, info, instrument};

/// Client-supplied product data for create and update
#[derive(Debug, Clone, Default)]
pub struct ProductInput {
    pub name: String,
    pub description: String,
    pub image: Option<ImageUpload>,
}

/// Orchestrates validation, the repository and the file store for products
#[derive(Clone)]
pub struct ProductService {
    repository: Arc<dyn ProductRepository>,
    files: Arc<dyn FileStore>,
}

impl ProductService {
    #[must_use]
    pub fn new(repository: Arc<dyn ProductRepository>, files: Arc<dyn FileStore>) -> Self {
        Self { repository, files }
    }

    /// Every product, ordered by id.
    ///
    /// # Errors
    /// Returns an error if the repository query fails.
    #[instrument(skip(self))]
    pub async fn list(&self) -> Result<Vec<ProductView>> {
        let products = self.repository.list_all().await?;
        Ok(products.into_iter().map(|p| self.view(p)).collect())
    }

    /// Creates a product together with its image.
    ///
    /// The image is mandatory. It is stored as `{slug(name)}.{extension}`
    /// before the record is inserted.
    ///
    /// # Errors
    /// - `Error::Validation` if a field is blank or the image is missing or of a
    ///   rejected type; nothing is written in that case
    /// - `Error::StorageWrite` if the image cannot be written
    /// - `Error::Database` if the insert fails (the written file is left orphaned)
    #[instrument(skip(self, input), fields(name = %input.name))]
    pub async fn create(&self, input: ProductInput) -> Result<ProductView> {
        validate_product_input(
            &input.name,
            &input.description,
            input.image.as_ref(),
            ImageRule::Required,
        )?;
        let name = input.name.trim().to_string();

        let stored = match &input.image {
            Some(image) => Some(
                self.files
                    .save(&image.bytes, &name, &image.extension)
                    .await?,
            ),
            None => None,
        };

        let product = self
            .repository
            .insert(ProductFields {
                name,
                description: input.description.trim().to_string(),
                image_filename: stored,
            })
            .await?;

        info!("Created product {}", product.id);
        Ok(self.view(product))
    }

    /// Fetches a single product.
    ///
    /// # Errors
    /// Returns `Error::ProductNotFound` if no product has this id.
    #[instrument(skip(self))]
    pub async fn show(&self, id: i64) -> Result<ProductView> {
        let product = self.find_existing(id).await?;
        Ok(self.view(product))
    }

    /// Updates name and description, and replaces the image when one is supplied.
    ///
    /// Without a new image the stored file name is kept as is, even when the
    /// name changes. With one, the new file is written first, the record is
    /// persisted, and then the previous file is deleted unless the new file
    /// overwrote it.
    ///
    /// # Errors
    /// - `Error::Validation` if a field is blank or the image type is rejected
    /// - `Error::ProductNotFound` if no product has this id
    /// - `Error::StorageWrite` / `Error::Database` if writing fails
    #[instrument(skip(self, input), fields(name = %input.name))]
    pub async fn update(&self, id: i64, input: ProductInput) -> Result<ProductView> {
        validate_product_input(
            &input.name,
            &input.description,
            input.image.as_ref(),
            ImageRule::Optional,
        )?;
        let existing = self.find_existing(id).await?;
        let name = input.name.trim().to_string();

        let previous_image = existing.image_filename;
        let image_filename = match &input.image {
            Some(image) => Some(
                self.files
                    .save(&image.bytes, &name, &image.extension)
                    .await?,
            ),
            None => previous_image.clone(),
        };

        let product = self
            .repository
            .update(
                id,
                ProductFields {
                    name,
                    description: input.description.trim().to_string(),
                    image_filename,
                },
            )
            .await?;

        if let Some(old) =
            previous_image.filter(|old| product.image_filename.as_deref() != Some(old.as_str()))
        {
            self.discard_file(&old).await;
        }

        info!("Updated product {}", product.id);
        Ok(self.view(product))
    }

    /// Deletes a product and its image, returning its last known state.
    ///
    /// # Errors
    /// Returns `Error::ProductNotFound` if no product has this id, or
    /// `Error::Database` if the delete fails.
    #[instrument(skip(self))]
    pub async fn destroy(&self, id: i64) -> Result<ProductView> {
        let product = self.find_existing(id).await?;
        self.repository.delete(id).await?;

        if let Some(image) = &product.image_filename {
            self.discard_file(image).await;
        }

        info!("Deleted product {}", id);
        Ok(self.view(product))
    }

    async fn find_existing(&self, id: i64) -> Result<Product> {
        self.repository
            .find(id)
            .await?
            .ok_or(Error::ProductNotFound { id })
    }

    /// Removes a file no record refers to any more. The record change has
    /// already been committed, so a failure here only leaves an orphan.
    async fn discard_file(&self, filename: &str) {
        if let Err(e) = self.files.delete(filename).await {
            error!(error = %e, "Failed to remove unreferenced image '{}'", filename);
        }
    }

    fn view(&self, product: Product) -> ProductView {
        ProductView {
            image: self.files.url_for(product.image_filename.as_deref()),
            id: product.id,
            name: product.name,
            description: product.description,
            created_at: product.created_at,
            updated_at: product.updated_at,
        }
    }
}
