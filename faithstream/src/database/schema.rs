//! Database schema and migrations
//!
//! The schema is one key-value table. Migrations are numbered SQL scripts
//! applied in order, each inside its own transaction, and recorded with
//! their name in the `schema_migrations` table.

use crate::error::{AppError, Result};
use sqlx::sqlite::SqlitePool;

/// A numbered SQL script
#[derive(Debug, Clone, Copy)]
struct Migration {
    version: i64,
    name: &'static str,
    sql: &'static str,
}

const MIGRATIONS: &[Migration] = &[Migration {
    version: 1,
    name: "kv_store",
    sql: include_str!("migrations/001_kv_store.sql"),
}];

/// Bring the schema up to the latest migration
pub async fn initialize_database(pool: &SqlitePool) -> Result<()> {
    // WAL lets readers proceed while the collection writer commits
    sqlx::query("PRAGMA journal_mode = WAL").execute(pool).await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS schema_migrations (
            version INTEGER PRIMARY KEY,
            name TEXT NOT NULL,
            applied_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
        )
        "#,
    )
    .execute(pool)
    .await?;

    let current = schema_version(pool).await?;
    let latest = MIGRATIONS.last().map_or(0, |m| m.version);

    if current > latest {
        return Err(AppError::Generic(format!(
            "Database schema version {} is newer than this build supports ({})",
            current, latest
        )));
    }

    let mut applied = 0;
    for migration in MIGRATIONS.iter().filter(|m| m.version > current) {
        apply(pool, migration).await?;
        applied += 1;
    }

    tracing::info!(
        "Database schema at version {} ({} migration(s) applied)",
        latest,
        applied
    );
    Ok(())
}

/// Highest applied migration, 0 for a fresh database
pub async fn schema_version(pool: &SqlitePool) -> Result<i64> {
    let version: i64 =
        sqlx::query_scalar("SELECT COALESCE(MAX(version), 0) FROM schema_migrations")
            .fetch_one(pool)
            .await?;
    Ok(version)
}

async fn apply(pool: &SqlitePool, migration: &Migration) -> Result<()> {
    tracing::info!(
        "Applying migration {} ({})",
        migration.version,
        migration.name
    );

    let mut tx = pool.begin().await?;

    // sqlx runs one statement per query
    for statement in migration.sql.split(';').map(str::trim) {
        if statement.is_empty() || statement.lines().all(|l| l.trim_start().starts_with("--")) {
            continue;
        }
        sqlx::query(statement).execute(&mut *tx).await?;
    }

    sqlx::query("INSERT INTO schema_migrations (version, name) VALUES (?, ?)")
        .bind(migration.version)
        .bind(migration.name)
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;
    Ok(())
}
