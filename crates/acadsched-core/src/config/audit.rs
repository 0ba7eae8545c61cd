//! Audit trail configuration.

use serde::{Deserialize, Serialize};

/// Services observed by the audit interceptor unless configured otherwise.
pub const DEFAULT_MONITORED_SERVICES: [&str; 6] = [
    "FacultyService",
    "SectionService",
    "RoomService",
    "LeaveService",
    "SubjectService",
    "ConstraintService",
];

/// Principal label used when no authenticated caller is available.
pub const DEFAULT_PRINCIPAL: &str = "System/Admin";

/// Principal name the authentication layer reports for unauthenticated callers.
pub const ANONYMOUS_PRINCIPAL: &str = "anonymousUser";

/// Configuration for the audit trail.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditConfig {
    /// Whether mutating service calls are recorded at all.
    #[serde(default = "default_enabled")]
    pub enabled: bool,

    /// How the interceptor hands entries to the recorder.
    #[serde(default)]
    pub dispatch: DispatchMode,

    /// Label attributed to calls without an authenticated principal.
    #[serde(default = "default_principal")]
    pub default_principal: String,

    /// Principal name treated the same as "no principal".
    #[serde(default = "default_anonymous_principal")]
    pub anonymous_principal: String,

    /// Maximum characters kept per argument in the entry description.
    #[serde(default = "default_max_argument_length")]
    pub max_argument_length: usize,

    /// Service names whose calls are observed.
    #[serde(default = "default_monitored_services")]
    pub monitored_services: Vec<String>,

    /// Storage backend for audit entries.
    #[serde(default)]
    pub storage: StorageConfig,
}

/// Dispatch mode for audit writes.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum DispatchMode {
    /// Await the write before the audited call returns to its caller.
    Inline,
    /// Spawn the write onto the runtime; the caller never waits for it.
    #[default]
    Detached,
}

/// Storage backend configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct StorageConfig {
    /// Storage backend type.
    #[serde(default)]
    pub backend: StorageBackend,

    /// File path (for the file backend).
    #[serde(default)]
    pub file_path: Option<String>,

    /// Database URL (for the sqlite backend), e.g. `sqlite://audit.db`.
    #[serde(default)]
    pub database_url: Option<String>,
}

/// Storage backend type.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    /// Process-local memory; lost on exit.
    #[default]
    Memory,
    /// Append-only JSON Lines file.
    File,
    /// `audit_logs` table in a SQLite database.
    Sqlite,
}

impl std::fmt::Display for StorageBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Memory => write!(f, "memory"),
            Self::File => write!(f, "file"),
            Self::Sqlite => write!(f, "sqlite"),
        }
    }
}

impl Default for AuditConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            dispatch: DispatchMode::default(),
            default_principal: default_principal(),
            anonymous_principal: default_anonymous_principal(),
            max_argument_length: default_max_argument_length(),
            monitored_services: default_monitored_services(),
            storage: StorageConfig::default(),
        }
    }
}

impl AuditConfig {
    /// Whether calls from `service` are observed.
    pub fn is_monitored(&self, service: &str) -> bool {
        self.monitored_services.iter().any(|s| s == service)
    }
}

impl StorageConfig {
    /// File path for the file backend, falling back to `audit.log`.
    pub fn resolved_file_path(&self) -> &str {
        self.file_path.as_deref().unwrap_or("audit.log")
    }
}

fn default_enabled() -> bool {
    true
}

fn default_principal() -> String {
    DEFAULT_PRINCIPAL.to_string()
}

fn default_anonymous_principal() -> String {
    ANONYMOUS_PRINCIPAL.to_string()
}

fn default_max_argument_length() -> usize {
    100
}

fn default_monitored_services() -> Vec<String> {
    DEFAULT_MONITORED_SERVICES
        .iter()
        .map(|s| s.to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AuditConfig::default();
        assert!(config.enabled);
        assert_eq!(config.dispatch, DispatchMode::Detached);
        assert_eq!(config.default_principal, "System/Admin");
        assert_eq!(config.max_argument_length, 100);
        assert_eq!(config.monitored_services.len(), 6);
        assert_eq!(config.storage.backend, StorageBackend::Memory);
    }

    #[test]
    fn test_is_monitored() {
        let config = AuditConfig::default();
        assert!(config.is_monitored("LeaveService"));
        assert!(!config.is_monitored("AuditLogService"));
        assert!(!config.is_monitored("leaveservice"));
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let config: AuditConfig = serde_yaml::from_str("dispatch: inline\n").unwrap();
        assert_eq!(config.dispatch, DispatchMode::Inline);
        assert_eq!(config.anonymous_principal, "anonymousUser");
        assert!(config.is_monitored("RoomService"));
    }
}
