//! Database module
//!
//! This module provides all persistence functionality including:
//! - SQLite pool and schema for the durable key-value store
//! - Model definitions
//! - Default seed data
//! - Repository layer for collection CRUD

pub mod models;
pub mod repository;
pub mod schema;
pub mod seed;

pub use models::*;
pub use repository::Repository;
pub use schema::{initialize_database, schema_version};

use crate::config;
use crate::error::Result;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};
use sqlx::SqlitePool;
use std::path::Path;
use std::time::Duration;

fn connect_options(db_path: &Path) -> SqliteConnectOptions {
    SqliteConnectOptions::new()
        .filename(db_path)
        .create_if_missing(true)
        .busy_timeout(Duration::from_secs(config::DB_BUSY_TIMEOUT_SECS))
        .journal_mode(SqliteJournalMode::Wal)
        // WAL keeps committed collections durable at NORMAL
        .synchronous(SqliteSynchronous::Normal)
}

/// Open the store database at `db_path`, creating and migrating it as needed.
///
/// The schema is brought up to date over a single connection before the
/// shared pool opens.
pub async fn create_pool(db_path: &Path) -> Result<SqlitePool> {
    tracing::info!("Opening database at {:?}", db_path);

    if let Some(parent) = db_path.parent() {
        tokio::fs::create_dir_all(parent).await?;
    }

    let setup = SqlitePoolOptions::new()
        .max_connections(1)
        .connect_with(connect_options(db_path))
        .await?;
    initialize_database(&setup).await?;
    let version = schema_version(&setup).await?;
    setup.close().await;

    let pool = SqlitePoolOptions::new()
        .max_connections(config::DB_MAX_CONNECTIONS)
        .connect_with(connect_options(db_path))
        .await?;

    tracing::info!(
        "Database ready (schema v{}, up to {} connections)",
        version,
        config::DB_MAX_CONNECTIONS
    );
    Ok(pool)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_create_pool_makes_parent_dirs_and_schema() {
        let temp = TempDir::new().unwrap();
        let db_path = temp.path().join("nested").join("store.db");

        let pool = create_pool(&db_path).await.unwrap();

        assert!(db_path.exists());
        assert_eq!(schema_version(&pool).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_reopen_keeps_rows() {
        let temp = TempDir::new().unwrap();
        let db_path = temp.path().join("store.db");

        let pool = create_pool(&db_path).await.unwrap();
        sqlx::query("INSERT INTO kv_store (key, value, updated_at) VALUES ('k', 'v', 'now')")
            .execute(&pool)
            .await
            .unwrap();
        pool.close().await;

        let reopened = create_pool(&db_path).await.unwrap();
        let value: String = sqlx::query_scalar("SELECT value FROM kv_store WHERE key = 'k'")
            .fetch_one(&reopened)
            .await
            .unwrap();
        assert_eq!(value, "v");
    }
}
