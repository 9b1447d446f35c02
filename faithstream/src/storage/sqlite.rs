//! SQLite-backed key-value store
//!
//! Every key is one row of the `kv_store` table created by the schema
//! migrations in `crate::database::schema`.

use super::KeyValueStore;
use crate::error::Result;
use chrono::Utc;
use sqlx::SqlitePool;

/// Durable store persisting each key as a row
#[derive(Clone)]
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// List stored keys (diagnostics)
    pub async fn keys(&self) -> Result<Vec<String>> {
        let keys = sqlx::query_scalar::<_, String>("SELECT key FROM kv_store ORDER BY key")
            .fetch_all(&self.pool)
            .await?;

        Ok(keys)
    }
}

impl KeyValueStore for SqliteStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        let value: Option<String> = sqlx::query_scalar("SELECT value FROM kv_store WHERE key = ?")
            .bind(key)
            .fetch_optional(&self.pool)
            .await?;

        Ok(value)
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO kv_store (key, value, updated_at) VALUES (?, ?, ?)
            ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at
            "#,
        )
        .bind(key)
        .bind(value)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        tracing::debug!("Stored key: {} ({} bytes)", key, value.len());
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<()> {
        sqlx::query("DELETE FROM kv_store WHERE key = ?")
            .bind(key)
            .execute(&self.pool)
            .await?;

        tracing::debug!("Removed key: {}", key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::initialize_database;
    use sqlx::sqlite::SqlitePoolOptions;

    async fn create_test_store() -> SqliteStore {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .unwrap();

        initialize_database(&pool).await.unwrap();

        SqliteStore::new(pool)
    }

    #[tokio::test]
    async fn test_set_and_get() {
        let store = create_test_store().await;

        store.set("faithstream_media", "[]").await.unwrap();

        let value = store.get("faithstream_media").await.unwrap();
        assert_eq!(value, Some("[]".to_string()));
    }

    #[tokio::test]
    async fn test_overwrite_existing_key() {
        let store = create_test_store().await;

        store.set("theme", "dark").await.unwrap();
        store.set("theme", "light").await.unwrap();

        assert_eq!(store.get("theme").await.unwrap(), Some("light".to_string()));
        assert_eq!(store.keys().await.unwrap(), vec!["theme".to_string()]);
    }

    #[tokio::test]
    async fn test_remove() {
        let store = create_test_store().await;

        store.set("faithstream_user", "{}").await.unwrap();
        store.remove("faithstream_user").await.unwrap();

        assert_eq!(store.get("faithstream_user").await.unwrap(), None);

        // Removing again is fine
        store.remove("faithstream_user").await.unwrap();
    }
}
