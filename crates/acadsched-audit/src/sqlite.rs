//! SQLite-backed audit storage.
//!
//! Entries live in a single `audit_logs` table. Ids come from SQLite's
//! `AUTOINCREMENT`, which never reuses a value, so the id order is the
//! insertion order.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions, SqliteRow};
use sqlx::Row;
use std::path::Path;
use std::str::FromStr;

use crate::entry::{ActionType, AuditEntry, NewAuditEntry};
use crate::error::AuditError;
use crate::storage::AuditStorage;

const CREATE_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS audit_logs (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    user_email TEXT NOT NULL,
    action_type TEXT NOT NULL,
    entity_type TEXT NOT NULL,
    description TEXT NOT NULL,
    timestamp TEXT NOT NULL
)
"#;

const INSERT_ENTRY: &str = r#"
INSERT INTO audit_logs (user_email, action_type, entity_type, description, timestamp)
VALUES (?, ?, ?, ?, ?)
"#;

const SELECT_ALL: &str = r#"
SELECT id, user_email, action_type, entity_type, description, timestamp
FROM audit_logs
ORDER BY id DESC
"#;

/// Audit storage in a SQLite `audit_logs` table.
#[derive(Debug, Clone)]
pub struct SqliteStorage {
    pool: SqlitePool,
}

impl SqliteStorage {
    /// Connect using a URL such as `sqlite://data/audit.db` or `sqlite::memory:`.
    pub async fn connect(database_url: &str) -> Result<Self, AuditError> {
        let options = SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);
        let pool = pool_options(database_url).connect_with(options).await?;
        Self::with_pool(pool).await
    }

    /// Open (or create) a database file at `path`.
    pub async fn open(path: impl AsRef<Path>) -> Result<Self, AuditError> {
        let options = SqliteConnectOptions::new()
            .filename(path.as_ref())
            .create_if_missing(true);
        let pool = SqlitePoolOptions::new().connect_with(options).await?;
        Self::with_pool(pool).await
    }

    /// Use an existing pool, creating the table if needed.
    pub async fn with_pool(pool: SqlitePool) -> Result<Self, AuditError> {
        sqlx::query(CREATE_TABLE).execute(&pool).await?;
        Ok(Self { pool })
    }
}

/// Whether `database_url` names a private in-memory database.
fn is_in_memory(database_url: &str) -> bool {
    database_url.contains(":memory:") || database_url.contains("mode=memory")
}

/// An in-memory database lives exactly as long as its connection, so such a
/// pool holds one connection that is never reaped or recycled.
fn pool_options(database_url: &str) -> SqlitePoolOptions {
    if is_in_memory(database_url) {
        SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
    } else {
        SqlitePoolOptions::new().max_connections(5)
    }
}

#[async_trait]
impl AuditStorage for SqliteStorage {
    async fn append(&self, entry: NewAuditEntry) -> Result<AuditEntry, AuditError> {
        let result = sqlx::query(INSERT_ENTRY)
            .bind(&entry.user_email)
            .bind(entry.action_type.as_str())
            .bind(&entry.entity_type)
            .bind(&entry.description)
            .bind(entry.timestamp.to_rfc3339())
            .execute(&self.pool)
            .await?;

        Ok(entry.into_entry(result.last_insert_rowid()))
    }

    async fn list_all(&self) -> Result<Vec<AuditEntry>, AuditError> {
        let rows = sqlx::query(SELECT_ALL).fetch_all(&self.pool).await?;

        let mut entries = Vec::with_capacity(rows.len());
        for row in &rows {
            match entry_from_row(row) {
                Ok(entry) => entries.push(entry),
                Err(e) => tracing::warn!(error = %e, "Skipping corrupt audit row"),
            }
        }
        Ok(entries)
    }
}

fn entry_from_row(row: &SqliteRow) -> Result<AuditEntry, AuditError> {
    let id: i64 = row.try_get("id")?;
    let action: String = row.try_get("action_type")?;
    let timestamp: String = row.try_get("timestamp")?;

    let timestamp = DateTime::parse_from_rfc3339(&timestamp)
        .map_err(|e| AuditError::CorruptEntry(format!("entry {}: bad timestamp: {}", id, e)))?
        .with_timezone(&Utc);

    Ok(AuditEntry {
        id,
        entity_type: row.try_get("entity_type")?,
        action_type: action.parse::<ActionType>()?,
        description: row.try_get("description")?,
        user_email: row.try_get("user_email")?,
        timestamp,
    })
}
