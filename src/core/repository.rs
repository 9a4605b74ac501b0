//! Product persistence.
//!
//! [`ProductRepository`] is the record-store interface the lifecycle manager
//! depends on; [`SeaProductRepository`] implements it over a `SeaORM`
//! connection. Timestamps are maintained here.

use crate::{
    entities::{Product as ProductEntity, product},
    errors::{Error, Result},
    models::{Product, ProductFields},
};
use async_trait::async_trait;
use sea_orm::{QueryOrder, Set, prelude::*};
use tracing::{debug, instrument};

/// Keyed record store over products
#[async_trait]
pub trait ProductRepository: Send + Sync {
    /// Inserts a new product and returns it with its assigned id.
    async fn insert(&self, fields: ProductFields) -> Result<Product>;

    async fn find(&self, id: i64) -> Result<Option<Product>>;

    /// Overwrites the writable fields of an existing product.
    ///
    /// Fails with `Error::ProductNotFound` if there is no such product.
    async fn update(&self, id: i64, fields: ProductFields) -> Result<Product>;

    /// Fails with `Error::ProductNotFound` if there is no such product.
    async fn delete(&self, id: i64) -> Result<()>;

    /// All products ordered by id.
    async fn list_all(&self) -> Result<Vec<Product>>;
}

/// [`ProductRepository`] backed by a `SeaORM` database connection
#[derive(Debug, Clone)]
pub struct SeaProductRepository {
    db: DatabaseConnection,
}

impl SeaProductRepository {
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ProductRepository for SeaProductRepository {
    #[instrument(skip(self, values), fields(name = %values.name))]
    async fn insert(&self, values: ProductFields) -> Result<Product> {
        let now = chrono::Utc::now().naive_utc();

        let product = product::ActiveModel {
            name: Set(values.name),
            description: Set(values.description),
            image: Set(values.image_filename),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };
        let model = product.insert(&self.db).await?;
        debug!("Inserted product {}", model.id);
        Ok(model.into())
    }

    async fn find(&self, id: i64) -> Result<Option<Product>> {
        Ok(ProductEntity::find_by_id(id)
            .one(&self.db)
            .await?
            .map(Into::into))
    }

    #[instrument(skip(self, values))]
    async fn update(&self, id: i64, values: ProductFields) -> Result<Product> {
        let mut product: product::ActiveModel = ProductEntity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(Error::ProductNotFound { id })?
            .into();

        product.name = Set(values.name);
        product.description = Set(values.description);
        product.image = Set(values.image_filename);
        product.updated_at = Set(chrono::Utc::now().naive_utc());

        let model = product.update(&self.db).await?;
        Ok(model.into())
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: i64) -> Result<()> {
        let result = ProductEntity::delete_by_id(id).exec(&self.db).await?;
        if result.rows_affected == 0 {
            return Err(Error::ProductNotFound { id });
        }
        Ok(())
    }

    async fn list_all(&self) -> Result<Vec<Product>> {
        let models = ProductEntity::find()
            .order_by_asc(product::Column::Id)
            .all(&self.db)
            .await?;
        Ok(models.into_iter().map(Into::into).collect())
    }
}
