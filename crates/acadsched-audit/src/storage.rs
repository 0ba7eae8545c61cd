//! Audit storage backends.
//!
//! Every backend is append-only: [`AuditStorage`] exposes no update or delete.
//! Ids are assigned under the backend's own lock (or by the database), so
//! concurrent appends interleave but each append is atomic.

use acadsched_core::config::audit::{StorageBackend, StorageConfig};
use async_trait::async_trait;
use std::fs::{self, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};

use crate::entry::{AuditEntry, NewAuditEntry};
use crate::error::AuditError;
use crate::sqlite::SqliteStorage;

/// Trait for audit storage backends.
#[async_trait]
pub trait AuditStorage: Send + Sync {
    /// Append an entry, assigning its id.
    async fn append(&self, entry: NewAuditEntry) -> Result<AuditEntry, AuditError>;

    /// All entries, most recent (highest id) first.
    async fn list_all(&self) -> Result<Vec<AuditEntry>, AuditError>;
}

/// Create a storage backend based on configuration.
pub async fn create_storage(config: &StorageConfig) -> Result<Arc<dyn AuditStorage>, AuditError> {
    match config.backend {
        StorageBackend::Memory => Ok(Arc::new(MemoryStorage::new())),
        StorageBackend::File => Ok(Arc::new(FileStorage::open(config.resolved_file_path())?)),
        StorageBackend::Sqlite => {
            let url = config.database_url.as_deref().ok_or_else(|| {
                AuditError::InitializationFailed(
                    "sqlite backend requires a database_url".to_string(),
                )
            })?;
            Ok(Arc::new(SqliteStorage::connect(url).await?))
        }
    }
}

/// Entries plus the next id to hand out, guarded together.
#[derive(Debug)]
struct EntryLog {
    entries: Vec<AuditEntry>,
    next_id: i64,
}

impl EntryLog {
    fn new(mut entries: Vec<AuditEntry>) -> Self {
        entries.sort_by_key(|e| e.id);
        let next_id = entries.last().map(|e| e.id + 1).unwrap_or(1);
        Self { entries, next_id }
    }

    fn newest_first(&self) -> Vec<AuditEntry> {
        self.entries.iter().rev().cloned().collect()
    }
}

/// Process-local storage.
#[derive(Debug)]
pub struct MemoryStorage {
    log: RwLock<EntryLog>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self {
            log: RwLock::new(EntryLog::new(Vec::new())),
        }
    }
}

impl Default for MemoryStorage {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AuditStorage for MemoryStorage {
    async fn append(&self, entry: NewAuditEntry) -> Result<AuditEntry, AuditError> {
        let mut log = self.log.write().map_err(|e| {
            AuditError::StorageError(format!("Failed to acquire write lock: {}", e))
        })?;

        let stored = entry.into_entry(log.next_id);
        log.next_id += 1;
        log.entries.push(stored.clone());
        Ok(stored)
    }

    async fn list_all(&self) -> Result<Vec<AuditEntry>, AuditError> {
        let log = self.log.read().map_err(|e| {
            AuditError::StorageError(format!("Failed to acquire read lock: {}", e))
        })?;
        Ok(log.newest_first())
    }
}

/// JSON Lines file storage (one entry per line).
///
/// Existing entries are loaded on open and the id sequence resumes after the
/// highest stored id. The in-memory copy serves reads. Appends hold an async
/// lock across the file write so line order matches id order; the write
/// itself runs on tokio's blocking pool when a runtime is available.
#[derive(Debug)]
pub struct FileStorage {
    path: PathBuf,
    log: tokio::sync::Mutex<EntryLog>,
}

impl FileStorage {
    /// Open (or create) the log file at `path`.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, AuditError> {
        let path = path.as_ref().to_path_buf();

        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            fs::create_dir_all(parent)?;
        }

        let entries = Self::load_from_file(&path)?;
        tracing::info!(
            path = %path.display(),
            entries = entries.len(),
            "Opened audit log file"
        );

        Ok(Self {
            path,
            log: tokio::sync::Mutex::new(EntryLog::new(entries)),
        })
    }

    fn load_from_file(path: &Path) -> Result<Vec<AuditEntry>, AuditError> {
        if !path.exists() {
            return Ok(Vec::new());
        }

        let reader = BufReader::new(fs::File::open(path)?);
        let mut entries = Vec::new();

        for (line_num, line) in reader.lines().enumerate() {
            let line = line?;
            let line = line.trim();
            if line.is_empty() {
                continue;
            }

            match serde_json::from_str::<AuditEntry>(line) {
                Ok(entry) => entries.push(entry),
                Err(e) => {
                    tracing::warn!(
                        "Skipping malformed audit entry on line {} of {}: {}",
                        line_num + 1,
                        path.display(),
                        e
                    );
                }
            }
        }

        Ok(entries)
    }

    async fn write_line(&self, line: String) -> Result<(), AuditError> {
        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                let path = self.path.clone();
                handle
                    .spawn_blocking(move || append_line(&path, &line))
                    .await
                    .map_err(|e| AuditError::StorageError(format!("Audit write task failed: {}", e)))?
            }
            Err(_) => append_line(&self.path, &line),
        }
    }
}

fn append_line(path: &Path, line: &str) -> Result<(), AuditError> {
    let mut file = OpenOptions::new().create(true).append(true).open(path)?;
    writeln!(file, "{}", line)?;
    Ok(())
}

#[async_trait]
impl AuditStorage for FileStorage {
    async fn append(&self, entry: NewAuditEntry) -> Result<AuditEntry, AuditError> {
        let mut log = self.log.lock().await;

        let stored = entry.into_entry(log.next_id);
        self.write_line(serde_json::to_string(&stored)?).await?;

        // Only consume the id once the line is on disk.
        log.next_id += 1;
        log.entries.push(stored.clone());
        Ok(stored)
    }

    async fn list_all(&self) -> Result<Vec<AuditEntry>, AuditError> {
        Ok(self.log.lock().await.newest_first())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entry::ActionType;
    use chrono::Utc;

    fn new_entry(entity: &str, action: ActionType) -> NewAuditEntry {
        NewAuditEntry {
            entity_type: entity.to_string(),
            action_type: action,
            description: format!("{} {}", action, entity),
            user_email: "System/Admin".to_string(),
            timestamp: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_memory_storage_assigns_ids_and_lists_newest_first() {
        let storage = MemoryStorage::new();

        let first = storage.append(new_entry("FACULTY", ActionType::Create)).await.unwrap();
        let second = storage.append(new_entry("ROOM", ActionType::Delete)).await.unwrap();
        assert_eq!(first.id, 1);
        assert_eq!(second.id, 2);

        let all = storage.list_all().await.unwrap();
        let ids: Vec<i64> = all.iter().map(|e| e.id).collect();
        assert_eq!(ids, vec![2, 1]);
        assert_eq!(all[0].entity_type, "ROOM");
    }

    #[tokio::test]
    async fn test_memory_storage_concurrent_appends() {
        let storage = Arc::new(MemoryStorage::new());

        let mut handles = Vec::new();
        for _ in 0..32 {
            let storage = storage.clone();
            handles.push(tokio::spawn(async move {
                storage.append(new_entry("SECTION", ActionType::Update)).await.unwrap()
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        let all = storage.list_all().await.unwrap();
        let ids: Vec<i64> = all.iter().map(|e| e.id).collect();
        let expected: Vec<i64> = (1..=32).rev().collect();
        assert_eq!(ids, expected);
    }

    #[tokio::test]
    async fn test_file_storage_persists_across_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("audit").join("audit.log");

        {
            let storage = FileStorage::open(&path).unwrap();
            storage.append(new_entry("FACULTY", ActionType::Create)).await.unwrap();
            storage.append(new_entry("LEAVE", ActionType::Update)).await.unwrap();
        }

        let reopened = FileStorage::open(&path).unwrap();
        let all = reopened.list_all().await.unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].entity_type, "LEAVE");

        let third = reopened.append(new_entry("ROOM", ActionType::Delete)).await.unwrap();
        assert_eq!(third.id, 3);
    }

    #[tokio::test]
    async fn test_file_storage_skips_malformed_lines() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("audit.log");

        let storage = FileStorage::open(&path).unwrap();
        storage.append(new_entry("SUBJECT", ActionType::Create)).await.unwrap();
        drop(storage);

        let mut file = OpenOptions::new().append(true).open(&path).unwrap();
        writeln!(file, "{{not json").unwrap();
        writeln!(file).unwrap();
        writeln!(
            file,
            r#"{{"id":9,"entityType":"ROOM","actionType":"READ","description":"x","userEmail":"a","timestamp":"2026-01-01T00:00:00Z"}}"#
        )
        .unwrap();
        drop(file);

        let reopened = FileStorage::open(&path).unwrap();
        let all = reopened.list_all().await.unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].action_type, ActionType::Create);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_file_storage_concurrent_appends_keep_line_order() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("audit.log");
        let storage = Arc::new(FileStorage::open(&path).unwrap());

        let mut handles = Vec::new();
        for _ in 0..16 {
            let storage = storage.clone();
            handles.push(tokio::spawn(async move {
                storage.append(new_entry("ROOM", ActionType::Update)).await.unwrap()
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        let content = fs::read_to_string(&path).unwrap();
        let ids: Vec<i64> = content
            .lines()
            .map(|l| serde_json::from_str::<AuditEntry>(l).unwrap().id)
            .collect();
        assert_eq!(ids, (1..=16).collect::<Vec<i64>>());
        assert_eq!(storage.list_all().await.unwrap().len(), 16);
    }

    #[test]
    fn test_file_storage_without_runtime() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileStorage::open(dir.path().join("audit.log")).unwrap();

        let stored = futures::executor::block_on(storage.append(new_entry("LEAVE", ActionType::Delete)))
            .unwrap();
        assert_eq!(stored.id, 1);

        let all = futures::executor::block_on(storage.list_all()).unwrap();
        assert_eq!(all, vec![stored]);
    }

    #[tokio::test]
    async fn test_create_storage_from_config() {
        let dir = tempfile::tempdir().unwrap();

        let memory = create_storage(&StorageConfig::default()).await.unwrap();
        assert!(memory.list_all().await.unwrap().is_empty());

        let file_config = StorageConfig {
            backend: StorageBackend::File,
            file_path: Some(dir.path().join("audit.log").display().to_string()),
            database_url: None,
        };
        let file = create_storage(&file_config).await.unwrap();
        file.append(new_entry("ROOM", ActionType::Create)).await.unwrap();
        assert_eq!(file.list_all().await.unwrap().len(), 1);

        let sqlite_without_url = StorageConfig {
            backend: StorageBackend::Sqlite,
            file_path: None,
            database_url: None,
        };
        assert!(matches!(
            create_storage(&sqlite_without_url).await,
            Err(AuditError::InitializationFailed(_))
        ));
    }
}
