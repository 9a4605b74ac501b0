//! Core business logic - framework-agnostic product lifecycle, storage and validation.

/// Image file storage
pub mod file_store;
/// Product lifecycle manager
pub mod product;
/// Product record store
pub mod repository;
/// Slug generation for image names
pub mod slug;
/// Input validation rules and field error collection
pub mod validation;

pub use file_store::{FileStore, LocalFileStore};
pub use product::{ProductInput, ProductService};
pub use repository::{ProductRepository, SeaProductRepository};
