use crate::core::validation::ValidationErrors;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    #[error("Validation failed: {0}")]
    Validation(ValidationErrors),

    #[error("Product not found: {id}")]
    ProductNotFound { id: i64 },

    #[error("Failed to write image '{filename}': {source}")]
    StorageWrite {
        filename: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to delete image '{filename}': {source}")]
    StorageDelete {
        filename: String,
        #[source]
        source: std::io::Error,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The request body or path could not be read. `status` is the HTTP
    /// status the rejection calls for (400, 413, 415 and so on).
    #[error("Rejected request ({status}): {message}")]
    InvalidRequest { status: u16, message: String },
}

impl From<ValidationErrors> for Error {
    fn from(value: ValidationErrors) -> Self {
        Self::Validation(value)
    }
}

// Convenience `Result` type
pub type Result<T> = std::result::Result<T, Error>;
