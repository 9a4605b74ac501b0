/// Application settings: server, storage, auth, loaded from config.toml and the environment
pub mod app;

/// Database configuration and connection management
pub mod database;

pub use app::{AppConfig, AuthConfig, DatabaseConfig, ServerConfig, StorageConfig, load_app_config};
