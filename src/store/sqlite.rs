//! SQLite-backed record store.
//!
//! Every record lives in one `records` table. Fields other than the title and
//! parent are kept as a JSON object in the `attributes` column.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use async_trait::async_trait;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions};
use sqlx::FromRow;
use tracing::{debug, info, warn};

use super::{migrations, ListFilter, NewRecord, Record, RecordPatch, RecordStore, PRIORITY, STATUS};
use crate::commands::schema::EntityKind;
use crate::error::{BrewError, Result};

const MAX_RETRY_ATTEMPTS: u32 = 3;
const RETRY_DELAY_MS: u64 = 100;

/// Raw database row.
#[derive(Debug, Clone, FromRow)]
struct RecordRow {
    id: String,
    kind: String,
    title: String,
    parent_id: Option<String>,
    attributes: String,
    created_at: String,
    updated_at: String,
}

impl RecordRow {
    fn into_record(self) -> Result<Record> {
        let kind = EntityKind::parse(&self.kind).ok_or_else(|| {
            BrewError::store(format!("Record {} has unknown kind '{}'", self.id, self.kind))
        })?;
        let attributes: BTreeMap<String, String> = serde_json::from_str(&self.attributes)
            .map_err(|e| BrewError::store(format!("Record {} has bad attributes: {e}", self.id)))?;

        Ok(Record {
            id: self.id,
            kind,
            title: self.title,
            parent_id: self.parent_id,
            attributes,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

/// Record store on a local SQLite file.
pub struct SqliteStore {
    pool: SqlitePool,
    db_path: Option<PathBuf>,
}

impl SqliteStore {
    /// Opens or creates the database at the specified path.
    ///
    /// A database that cannot be opened is moved aside to `*.db.bak` and a
    /// fresh one is created in its place.
    pub async fn open(path: &Path) -> Result<Self> {
        Self::ensure_parent_dirs(path)?;

        match Self::try_open(path).await {
            Ok(store) => Ok(store),
            Err(e) => {
                warn!("Failed to open record database: {e}. Attempting recovery...");
                Self::attempt_recovery(path).await
            }
        }
    }

    /// Opens a private in-memory database.
    pub async fn in_memory() -> Result<Self> {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .map_err(|e| BrewError::store(format!("Failed to open in-memory database: {e}")))?;
        migrations::run_migrations(&pool).await?;
        Ok(Self {
            pool,
            db_path: None,
        })
    }

    /// Returns the default database path for the current platform.
    ///
    /// - Linux: `~/.local/share/taskbrew/records.db`
    /// - macOS: `~/Library/Application Support/taskbrew/records.db`
    pub fn default_path() -> Result<PathBuf> {
        let data_dir = dirs::data_dir()
            .ok_or_else(|| BrewError::store("Could not determine data directory"))?;
        Ok(data_dir.join("taskbrew").join("records.db"))
    }

    /// Attempts to open the database with retries for lock contention.
    async fn try_open(path: &Path) -> Result<Self> {
        let mut last_error = None;

        for attempt in 0..MAX_RETRY_ATTEMPTS {
            if attempt > 0 {
                tokio::time::sleep(Duration::from_millis(RETRY_DELAY_MS * 2u64.pow(attempt))).await;
            }

            match Self::connect(path).await {
                Ok(pool) => {
                    migrations::run_migrations(&pool).await?;
                    info!("Record database opened at {}", path.display());
                    return Ok(Self {
                        pool,
                        db_path: Some(path.to_path_buf()),
                    });
                }
                Err(e) => {
                    last_error = Some(e);
                }
            }
        }

        Err(last_error.unwrap_or_else(|| BrewError::store("Failed to open database after retries")))
    }

    async fn connect(path: &Path) -> Result<SqlitePool> {
        let conn_str = format!("sqlite:{}?mode=rwc", path.display());
        let options = SqliteConnectOptions::from_str(&conn_str)
            .map_err(|e| BrewError::store(format!("Invalid database path: {e}")))?
            .journal_mode(SqliteJournalMode::Wal)
            .busy_timeout(Duration::from_secs(5))
            .create_if_missing(true);

        SqlitePoolOptions::new()
            .max_connections(1)
            .acquire_timeout(Duration::from_secs(10))
            .connect_with(options)
            .await
            .map_err(|e| BrewError::store(format!("Failed to connect to record database: {e}")))
    }

    fn ensure_parent_dirs(path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                BrewError::store(format!(
                    "Failed to create data directory {}: {e}",
                    parent.display()
                ))
            })?;
        }
        Ok(())
    }

    async fn attempt_recovery(path: &Path) -> Result<Self> {
        let backup_path = path.with_extension("db.bak");

        if path.exists() {
            std::fs::rename(path, &backup_path).map_err(|e| {
                BrewError::store(format!(
                    "Failed to backup corrupted database to {}: {e}",
                    backup_path.display()
                ))
            })?;
            warn!("Backed up corrupted database to {}", backup_path.display());
        }

        Self::try_open(path)
            .await
            .map_err(|e| BrewError::store(format!("Failed to recreate database after backup: {e}")))
    }

    /// Returns the database path, `None` when in memory.
    pub fn path(&self) -> Option<&Path> {
        self.db_path.as_deref()
    }

    pub async fn close(&self) {
        self.pool.close().await;
    }

    fn not_found(kind: EntityKind, id: &str) -> BrewError {
        BrewError::store(format!("{} '{}' not found.", kind.display_name(), id))
    }
}

fn encode_attributes(attributes: &BTreeMap<String, String>) -> Result<String> {
    serde_json::to_string(attributes)
        .map_err(|e| BrewError::store(format!("Failed to encode attributes: {e}")))
}

#[async_trait]
impl RecordStore for SqliteStore {
    async fn create(&self, record: NewRecord) -> Result<String> {
        let attributes = encode_attributes(&record.attributes)?;

        let (id,): (String,) = sqlx::query_as(
            r#"
            INSERT INTO records (kind, title, parent_id, attributes)
            VALUES (?, ?, ?, ?)
            RETURNING id
            "#,
        )
        .bind(record.kind.as_str())
        .bind(&record.title)
        .bind(&record.parent_id)
        .bind(attributes)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| BrewError::store(format!("Failed to create {}: {e}", record.kind)))?;

        debug!("Created {} {}", record.kind, id);
        Ok(id)
    }

    async fn get(&self, kind: EntityKind, id: &str) -> Result<Option<Record>> {
        let row: Option<RecordRow> = sqlx::query_as(
            r#"
            SELECT id, kind, title, parent_id, attributes, created_at, updated_at
            FROM records
            WHERE kind = ? AND id = ?
            "#,
        )
        .bind(kind.as_str())
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| BrewError::store(format!("Failed to get {kind}: {e}")))?;

        row.map(RecordRow::into_record).transpose()
    }

    async fn list(&self, kind: EntityKind, filter: &ListFilter) -> Result<Vec<Record>> {
        let mut conditions = vec!["kind = ?".to_string()];
        let mut bindings: Vec<String> = vec![kind.as_str().to_string()];

        if let Some(ref parent_id) = filter.parent_id {
            conditions.push("parent_id = ?".to_string());
            bindings.push(parent_id.clone());
        }
        if let Some(ref status) = filter.status {
            conditions.push(format!("json_extract(attributes, '$.{STATUS}') = ?"));
            bindings.push(status.clone());
        }
        if let Some(ref priority) = filter.priority {
            conditions.push(format!("json_extract(attributes, '$.{PRIORITY}') = ?"));
            bindings.push(priority.clone());
        }

        let query = format!(
            r#"
            SELECT id, kind, title, parent_id, attributes, created_at, updated_at
            FROM records
            WHERE {}
            ORDER BY created_at, rowid
            {}
            "#,
            conditions.join(" AND "),
            filter
                .limit
                .map(|l| format!("LIMIT {}", l))
                .unwrap_or_default()
        );

        let mut sqlx_query = sqlx::query_as::<_, RecordRow>(&query);
        for binding in &bindings {
            sqlx_query = sqlx_query.bind(binding);
        }

        let rows = sqlx_query
            .fetch_all(&self.pool)
            .await
            .map_err(|e| BrewError::store(format!("Failed to list {}: {e}", kind.plural())))?;

        rows.into_iter().map(RecordRow::into_record).collect()
    }

    async fn update(&self, kind: EntityKind, id: &str, patch: RecordPatch) -> Result<()> {
        let mut record = self
            .get(kind, id)
            .await?
            .ok_or_else(|| Self::not_found(kind, id))?;
        patch.apply(&mut record);
        let attributes = encode_attributes(&record.attributes)?;

        sqlx::query(
            r#"
            UPDATE records
            SET title = ?, parent_id = ?, attributes = ?, updated_at = datetime('now')
            WHERE kind = ? AND id = ?
            "#,
        )
        .bind(&record.title)
        .bind(&record.parent_id)
        .bind(attributes)
        .bind(kind.as_str())
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(|e| BrewError::store(format!("Failed to update {kind}: {e}")))?;

        Ok(())
    }

    async fn delete(&self, kind: EntityKind, id: &str) -> Result<()> {
        let result = sqlx::query(
            r#"
            WITH RECURSIVE doomed(id) AS (
                SELECT id FROM records WHERE kind = ? AND id = ?
                UNION
                SELECT r.id FROM records r JOIN doomed d ON r.parent_id = d.id
            )
            DELETE FROM records WHERE id IN (SELECT id FROM doomed)
            "#,
        )
        .bind(kind.as_str())
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(|e| BrewError::store(format!("Failed to delete {kind}: {e}")))?;

        if result.rows_affected() == 0 {
            return Err(Self::not_found(kind, id));
        }

        debug!("Deleted {} {} ({} rows)", kind, id, result.rows_affected());
        Ok(())
    }
}
