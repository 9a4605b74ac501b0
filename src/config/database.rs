//! Database configuration module.
//!
//! This module handles the `SQLite` connection and table creation using `SeaORM`.
//! Tables are generated from the entity definitions with `Schema::create_table_from_entity`,
//! so the schema always matches the Rust structs without hand-written SQL.

use crate::config::DatabaseConfig;
use crate::entities::Product;
use crate::errors::{Error, Result};
use sea_orm::{ConnectionTrait, Database, DatabaseConnection, Schema};
use std::path::Path;
use tracing::{debug, info, instrument};

/// Establishes a connection to the configured database and makes sure the tables exist.
///
/// For file-backed `SQLite` URLs the parent directory is created first, since `SQLite`
/// will create the file but not the directory holding it.
///
/// # Errors
/// Returns an error if the directory cannot be created, the connection fails,
/// or table creation fails.
#[instrument(skip(config))]
pub async fn create_connection(config: &DatabaseConfig) -> Result<DatabaseConnection> {
    ensure_sqlite_parent_dir(&config.url)?;
    debug!("Connecting to database");
    let db = Database::connect(&config.url).await?;
    create_tables(&db).await?;
    info!("Database connection ready");
    Ok(db)
}

/// Creates all tables from the entity definitions, skipping any that already exist.
///
/// # Errors
/// Returns an error if a `CREATE TABLE` statement fails.
pub async fn create_tables(db: &DatabaseConnection) -> Result<()> {
    let builder = db.get_database_backend();
    let schema = Schema::new(builder);

    let mut product_table = schema.create_table_from_entity(Product);
    product_table.if_not_exists();

    db.execute(builder.build(&product_table)).await?;
    Ok(())
}

fn ensure_sqlite_parent_dir(url: &str) -> Result<()> {
    let Some(rest) = url.strip_prefix("sqlite://") else {
        return Ok(());
    };
    let path = rest.split('?').next().unwrap_or_default();
    if path.is_empty() || path.contains(":memory:") {
        return Ok(());
    }
    if let Some(parent) = Path::new(path).parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| Error::Config {
            message: format!("Failed to create database directory {parent:?}: {e}"),
        })?;
    }
    Ok(())
}
