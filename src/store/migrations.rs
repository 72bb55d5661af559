//! Schema versioning and migrations for the record database.
//!
//! Manages database schema evolution with forward-only migrations.

use crate::error::{BrewError, Result};
use sqlx::sqlite::SqlitePool;
use tracing::info;

const CURRENT_VERSION: i32 = 2;

/// Runs all pending migrations on the database.
pub async fn run_migrations(pool: &SqlitePool) -> Result<()> {
    ensure_schema_versions_table(pool).await?;

    let current = get_current_version(pool).await?;

    if current > CURRENT_VERSION {
        return Err(BrewError::store(format!(
            "Database schema version ({}) is newer than supported version ({}). \
             Please upgrade taskbrew.",
            current, CURRENT_VERSION
        )));
    }

    if current < CURRENT_VERSION {
        info!(
            "Migrating record database from version {} to {}",
            current, CURRENT_VERSION
        );
        for version in (current + 1)..=CURRENT_VERSION {
            run_migration(pool, version).await?;
            record_version(pool, version).await?;
            info!("Applied migration v{}", version);
        }
    }

    Ok(())
}

async fn ensure_schema_versions_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS schema_versions (
            version INTEGER PRIMARY KEY,
            applied_at TEXT NOT NULL DEFAULT (datetime('now'))
        )
        "#,
    )
    .execute(pool)
    .await
    .map_err(|e| BrewError::store(format!("Failed to create schema_versions table: {e}")))?;

    Ok(())
}

/// Gets the current schema version, 0 for a fresh database.
pub async fn get_current_version(pool: &SqlitePool) -> Result<i32> {
    let row: Option<(Option<i32>,)> = sqlx::query_as("SELECT MAX(version) FROM schema_versions")
        .fetch_optional(pool)
        .await
        .map_err(|e| BrewError::store(format!("Failed to get schema version: {e}")))?;

    Ok(row.and_then(|(v,)| v).unwrap_or(0))
}

async fn record_version(pool: &SqlitePool, version: i32) -> Result<()> {
    sqlx::query("INSERT INTO schema_versions (version) VALUES (?)")
        .bind(version)
        .execute(pool)
        .await
        .map_err(|e| BrewError::store(format!("Failed to record migration: {e}")))?;
    Ok(())
}

async fn run_migration(pool: &SqlitePool, version: i32) -> Result<()> {
    match version {
        1 => migration_v1(pool).await,
        2 => migration_v2(pool).await,
        _ => Err(BrewError::store(format!(
            "Unknown migration version: {version}"
        ))),
    }
}

/// Migration v1: the records table.
async fn migration_v1(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS records (
            id TEXT PRIMARY KEY NOT NULL DEFAULT (lower(hex(randomblob(4)))),
            kind TEXT NOT NULL CHECK (kind IN ('program', 'project', 'task', 'subtask')),
            title TEXT NOT NULL,
            parent_id TEXT,
            attributes TEXT NOT NULL DEFAULT '{}',
            created_at TEXT NOT NULL DEFAULT (datetime('now')),
            updated_at TEXT NOT NULL DEFAULT (datetime('now'))
        )
        "#,
    )
    .execute(pool)
    .await
    .map_err(|e| BrewError::store(format!("Failed to create records table: {e}")))?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_records_kind ON records(kind)")
        .execute(pool)
        .await
        .map_err(|e| BrewError::store(format!("Failed to create kind index: {e}")))?;

    Ok(())
}

/// Migration v2: index for child lookups and cascading deletes.
async fn migration_v2(pool: &SqlitePool) -> Result<()> {
    sqlx::query("CREATE INDEX IF NOT EXISTS idx_records_parent ON records(parent_id)")
        .execute(pool)
        .await
        .map_err(|e| BrewError::store(format!("Failed to create parent index: {e}")))?;

    Ok(())
}
