//! Error types for the domain services.

use thiserror::Error;

/// Errors returned by the monitored services.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// The addressed record does not exist.
    #[error("{entity} not found with id: {id}")]
    NotFound { entity: &'static str, id: String },

    /// The request was rejected before reaching storage.
    #[error("invalid request: {0}")]
    Invalid(String),

    /// The backing store failed.
    #[error("storage error: {0}")]
    Storage(String),
}

impl ServiceError {
    /// Create a not-found error for `entity` with the given id.
    pub fn not_found(entity: &'static str, id: impl ToString) -> Self {
        Self::NotFound {
            entity,
            id: id.to_string(),
        }
    }
}
