//! Application configuration loading.
//!
//! Settings are read from an optional `config.toml` and then overridden by
//! environment variables (populated from `.env` by `dotenvy` in `main`).
//! The resulting [`AppConfig`] is passed explicitly to the components that
//! need it; nothing reads configuration globally after startup.

use crate::errors::{Error, Result};
use serde::Deserialize;
use std::fmt;
use std::path::{Path, PathBuf};

/// Default location of the optional configuration file
pub const DEFAULT_CONFIG_PATH: &str = "config.toml";

/// Complete application configuration
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// HTTP listener and public URL settings
    pub server: ServerConfig,
    /// Relational store settings
    pub database: DatabaseConfig,
    /// Image storage settings
    pub storage: StorageConfig,
    /// Bearer token settings
    pub auth: AuthConfig,
}

/// HTTP server settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Externally reachable base URL. Derived from host and port when unset.
    pub base_url: Option<String>,
    /// Upper bound on request body size, which caps uploaded images
    pub max_upload_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
            base_url: None,
            max_upload_bytes: 2 * 1024 * 1024,
        }
    }
}

impl ServerConfig {
    /// Address the listener binds to, e.g. `127.0.0.1:8080`.
    #[must_use]
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Public base URL with no trailing slash.
    #[must_use]
    pub fn base_url(&self) -> String {
        self.base_url.as_deref().map_or_else(
            || format!("http://{}:{}", self.host, self.port),
            |url| url.trim_end_matches('/').to_string(),
        )
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    pub url: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: "sqlite://data/products.sqlite?mode=rwc".to_string(),
        }
    }
}

/// Where uploaded images live on disk
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Public root directory; images go under `storage/products` inside it
    pub public_dir: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            public_dir: PathBuf::from("public"),
        }
    }
}

/// Tokens accepted by the static bearer-token verifier
#[derive(Clone, Default, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    pub tokens: Vec<String>,
}

impl fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthConfig")
            .field("tokens", &format_args!("[{} redacted]", self.tokens.len()))
            .finish()
    }
}

impl AppConfig {
    /// Parses configuration from TOML text. Missing sections fall back to defaults.
    ///
    /// # Errors
    /// Returns `Error::Config` if the TOML is invalid.
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        toml::from_str(contents).map_err(|e| Error::Config {
            message: format!("Failed to parse configuration: {e}"),
        })
    }

    /// Loads configuration from a TOML file, or defaults when the file does not exist.
    ///
    /// # Errors
    /// Returns `Error::Config` if the file exists but cannot be read or parsed.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            tracing::debug!("No configuration file at {:?}, using defaults", path);
            return Ok(Self::default());
        }
        let contents = std::fs::read_to_string(path).map_err(|e| Error::Config {
            message: format!("Failed to read config file {path:?}: {e}"),
        })?;
        Self::from_toml_str(&contents)
    }

    /// Applies overrides from a variable lookup, normally `std::env::var`.
    ///
    /// # Errors
    /// Returns `Error::Config` if a numeric variable cannot be parsed.
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(host) = lookup("SERVER_HOST") {
            self.server.host = host;
        }
        if let Some(port) = lookup("SERVER_PORT") {
            self.server.port = port.parse().map_err(|e| Error::Config {
                message: format!("Invalid SERVER_PORT '{port}': {e}"),
            })?;
        }
        if let Some(base_url) = lookup("APP_BASE_URL") {
            self.server.base_url = Some(base_url);
        }
        if let Some(limit) = lookup("MAX_UPLOAD_BYTES") {
            self.server.max_upload_bytes = limit.parse().map_err(|e| Error::Config {
                message: format!("Invalid MAX_UPLOAD_BYTES '{limit}': {e}"),
            })?;
        }
        if let Some(url) = lookup("DATABASE_URL") {
            self.database.url = url;
        }
        if let Some(dir) = lookup("PUBLIC_DIR") {
            self.storage.public_dir = PathBuf::from(dir);
        }
        if let Some(tokens) = lookup("API_TOKENS") {
            self.auth.tokens = tokens
                .split(',')
                .map(str::trim)
                .filter(|t| !t.is_empty())
                .map(ToString::to_string)
                .collect();
        }
        Ok(())
    }
}

/// Loads the application configuration from `config.toml` (if present) and the process environment.
///
/// # Errors
/// Returns `Error::Config` when the file or an environment override is invalid.
pub fn load_app_config() -> Result<AppConfig> {
    let mut config = AppConfig::from_file(DEFAULT_CONFIG_PATH)?;
    config.apply_overrides(|key| std::env::var(key).ok())?;

    if config.auth.tokens.is_empty() {
        tracing::warn!("No API tokens configured; every product request will be rejected");
    }
    tracing::info!(
        bind = %config.server.bind_address(),
        base_url = %config.server.base_url(),
        public_dir = ?config.storage.public_dir,
        "Application configuration loaded"
    );
    Ok(config)
}
