//! Error types for the audit crate.

use thiserror::Error;

/// Errors that can occur during audit operations.
#[derive(Debug, Error)]
pub enum AuditError {
    /// Failed to initialize a component from configuration.
    #[error("failed to initialize audit component: {0}")]
    InitializationFailed(String),

    /// An entry was rejected before reaching storage.
    #[error("invalid audit entry: {0}")]
    InvalidEntry(String),

    /// A stored entry could not be decoded.
    #[error("corrupt audit entry: {0}")]
    CorruptEntry(String),

    /// Storage error.
    #[error("storage error: {0}")]
    StorageError(String),

    /// Database error.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Serialization error.
    #[error("serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    /// IO error.
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}
