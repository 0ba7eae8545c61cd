//! Configuration types for the acadsched backend.
//!
//! Configuration is loaded from a single YAML file (`acadsched.yaml` by
//! default). Every section is optional; missing sections and fields fall back
//! to their defaults.
//!
//! ```yaml
//! project: registrar
//! audit:
//!   dispatch: inline
//!   storage:
//!     backend: file
//!     file_path: data/audit.log
//! observability:
//!   log_level: debug
//! ```

pub mod audit;

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

pub use audit::{AuditConfig, DispatchMode, StorageBackend, StorageConfig};

/// Complete acadsched configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AcadschedConfig {
    /// Project name.
    #[serde(default)]
    pub project: Option<String>,

    /// Audit trail configuration.
    #[serde(default)]
    pub audit: AuditConfig,

    /// Logging configuration.
    #[serde(default)]
    pub observability: ObservabilityConfig,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObservabilityConfig {
    /// Default `tracing` filter directive, overridden by `RUST_LOG`.
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Emit JSON log lines instead of human-readable output.
    #[serde(default)]
    pub json: bool,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            json: false,
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl AcadschedConfig {
    /// Load configuration from a YAML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path.as_ref())?;
        Self::from_yaml(&content)
    }

    /// Parse configuration from YAML content.
    pub fn from_yaml(content: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yaml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Check cross-field constraints that serde defaults cannot express.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let audit = &self.audit;

        if audit.default_principal.trim().is_empty() {
            return Err(ConfigError::Config(
                "audit.default_principal must not be empty".to_string(),
            ));
        }

        if audit.max_argument_length == 0 {
            return Err(ConfigError::Config(
                "audit.max_argument_length must be greater than zero".to_string(),
            ));
        }

        if let Some(blank) = audit.monitored_services.iter().position(|s| s.trim().is_empty()) {
            return Err(ConfigError::Config(format!(
                "audit.monitored_services[{}] is empty",
                blank
            )));
        }

        match audit.storage.backend {
            StorageBackend::Sqlite if audit.storage.database_url.is_none() => {
                Err(ConfigError::Config(
                    "audit.storage.database_url is required for the sqlite backend".to_string(),
                ))
            }
            _ => Ok(()),
        }
    }
}
