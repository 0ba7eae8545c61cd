//! Audit recorder.
//!
//! The recorder is the only writer of the audit store. It stamps each entry
//! with its own clock and exposes read access for reporting.

use acadsched_core::AuditConfig;
use chrono::Utc;
use std::sync::Arc;

use crate::entry::{ActionType, AuditEntry, NewAuditEntry};
use crate::error::AuditError;
use crate::interceptor::Monitored;
use crate::storage::{AuditStorage, MemoryStorage, create_storage};

/// Writes and reads the audit trail.
pub struct AuditRecorder {
    storage: Arc<dyn AuditStorage>,
}

impl AuditRecorder {
    /// Create a recorder over a storage backend.
    pub fn new(storage: Arc<dyn AuditStorage>) -> Self {
        Self { storage }
    }

    /// Create a recorder with the backend selected by configuration.
    pub async fn from_config(config: &AuditConfig) -> Result<Self, AuditError> {
        let storage = create_storage(&config.storage).await?;
        tracing::debug!(backend = %config.storage.backend, "Audit recorder initialized");
        Ok(Self::new(storage))
    }

    /// Create a recorder backed by process memory.
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryStorage::new()))
    }

    /// Persist one entry and return it with its assigned id.
    pub async fn record(
        &self,
        entity_type: &str,
        action_type: ActionType,
        description: &str,
        user_email: &str,
    ) -> Result<AuditEntry, AuditError> {
        if entity_type.trim().is_empty() {
            return Err(AuditError::InvalidEntry("entity type is empty".to_string()));
        }
        if user_email.trim().is_empty() {
            return Err(AuditError::InvalidEntry("user is empty".to_string()));
        }

        let entry = NewAuditEntry {
            entity_type: entity_type.to_string(),
            action_type,
            description: description.to_string(),
            user_email: user_email.to_string(),
            timestamp: Utc::now(),
        };

        let stored = self.storage.append(entry).await?;

        tracing::debug!(
            entry_id = stored.id,
            entity_type = %stored.entity_type,
            action_type = %stored.action_type,
            user = %stored.user_email,
            "Audit entry recorded"
        );

        Ok(stored)
    }

    /// All entries, most recent first.
    pub async fn list_all(&self) -> Result<Vec<AuditEntry>, AuditError> {
        self.storage.list_all().await
    }

    /// Entries matching a filter, most recent first.
    pub async fn list(&self, filter: AuditFilter) -> Result<Vec<AuditEntry>, AuditError> {
        let offset = filter.offset.unwrap_or(0);
        let limit = filter.limit.unwrap_or(usize::MAX);

        Ok(self
            .list_all()
            .await?
            .into_iter()
            .filter(|e| filter.matches(e))
            .skip(offset)
            .take(limit)
            .collect())
    }
}

impl Monitored for AuditRecorder {
    fn service_name(&self) -> &str {
        "AuditRecorder"
    }

    fn records_audit(&self) -> bool {
        true
    }
}

/// Filter for listing audit entries.
#[derive(Debug, Clone, Default)]
pub struct AuditFilter {
    /// Filter by entity type (case-insensitive).
    pub entity_type: Option<String>,
    /// Filter by action.
    pub action_type: Option<ActionType>,
    /// Filter by attributed principal.
    pub user_email: Option<String>,
    /// Maximum number of results.
    pub limit: Option<usize>,
    /// Offset for pagination.
    pub offset: Option<usize>,
}

impl AuditFilter {
    /// Whether `entry` passes the non-paging criteria.
    pub fn matches(&self, entry: &AuditEntry) -> bool {
        if let Some(ref entity) = self.entity_type
            && !entry.entity_type.eq_ignore_ascii_case(entity)
        {
            return false;
        }
        if let Some(action) = self.action_type
            && entry.action_type != action
        {
            return false;
        }
        if let Some(ref user) = self.user_email
            && &entry.user_email != user
        {
            return false;
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entry::NewAuditEntry;
    use async_trait::async_trait;

    struct FailingStorage;

    #[async_trait]
    impl AuditStorage for FailingStorage {
        async fn append(&self, _entry: NewAuditEntry) -> Result<AuditEntry, AuditError> {
            Err(AuditError::StorageError("disk full".to_string()))
        }

        async fn list_all(&self) -> Result<Vec<AuditEntry>, AuditError> {
            Ok(vec![])
        }
    }

    #[tokio::test]
    async fn test_record_assigns_id_and_timestamp() {
        let recorder = AuditRecorder::in_memory();
        let before = Utc::now();

        let entry = recorder
            .record("FACULTY", ActionType::Create, "CREATE FACULTY", "System/Admin")
            .await
            .unwrap();

        assert_eq!(entry.id, 1);
        assert!(entry.timestamp >= before);
        assert!(entry.timestamp <= Utc::now());
    }

    #[tokio::test]
    async fn test_read_your_writes() {
        let recorder = AuditRecorder::in_memory();
        let entry = recorder
            .record("ROOM", ActionType::Delete, "DELETE ROOM - Args: 4; ", "ops@uni.edu")
            .await
            .unwrap();

        let all = recorder.list_all().await.unwrap();
        assert_eq!(all, vec![entry]);
    }

    #[tokio::test]
    async fn test_record_rejects_blank_fields() {
        let recorder = AuditRecorder::in_memory();
        assert!(matches!(
            recorder.record("", ActionType::Create, "x", "u").await,
            Err(AuditError::InvalidEntry(_))
        ));
        assert!(matches!(
            recorder.record("ROOM", ActionType::Create, "x", " ").await,
            Err(AuditError::InvalidEntry(_))
        ));
        assert!(recorder.list_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_record_surfaces_storage_failure() {
        let recorder = AuditRecorder::new(Arc::new(FailingStorage));
        let err = recorder
            .record("ROOM", ActionType::Create, "x", "System/Admin")
            .await
            .unwrap_err();
        assert!(err.to_string().contains("disk full"));
    }

    #[tokio::test]
    async fn test_list_with_filter() {
        let recorder = AuditRecorder::in_memory();
        recorder.record("FACULTY", ActionType::Create, "a", "dean@uni.edu").await.unwrap();
        recorder.record("LEAVE", ActionType::Update, "b", "System/Admin").await.unwrap();
        recorder.record("FACULTY", ActionType::Delete, "c", "dean@uni.edu").await.unwrap();
        recorder.record("FACULTY", ActionType::Update, "d", "dean@uni.edu").await.unwrap();

        let faculty = recorder
            .list(AuditFilter {
                entity_type: Some("faculty".to_string()),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(faculty.len(), 3);

        let updates_by_dean = recorder
            .list(AuditFilter {
                action_type: Some(ActionType::Update),
                user_email: Some("dean@uni.edu".to_string()),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(updates_by_dean.len(), 1);
        assert_eq!(updates_by_dean[0].description, "d");

        let page = recorder
            .list(AuditFilter {
                offset: Some(1),
                limit: Some(2),
                ..Default::default()
            })
            .await
            .unwrap();
        let ids: Vec<i64> = page.iter().map(|e| e.id).collect();
        assert_eq!(ids, vec![3, 2]);
    }

    #[test]
    fn test_recorder_identifies_as_audit_component() {
        let recorder = AuditRecorder::in_memory();
        assert!(recorder.records_audit());
    }
}
