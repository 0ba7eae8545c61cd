//! Mapping from service operations to audit actions.
//!
//! Operations are classified by the leading word of their identifier, so
//! `createFaculty`, `create_faculty` and `approveLeave` classify without any
//! per-operation registration. The mapping sits behind [`ActionClassifier`]
//! so it can be replaced by explicit tagging without touching the
//! interceptor.

use crate::entry::ActionType;
use crate::error::AuditError;

/// Operation prefixes that never produce an entry.
pub const READ_PREFIXES: [&str; 3] = ["get", "find", "list"];

/// Prefixes classified as [`ActionType::Create`].
pub const CREATE_PREFIXES: [&str; 3] = ["create", "add", "save"];

/// Prefixes classified as [`ActionType::Update`].
pub const UPDATE_PREFIXES: [&str; 4] = ["update", "edit", "approve", "reject"];

/// Prefixes classified as [`ActionType::Delete`].
pub const DELETE_PREFIXES: [&str; 2] = ["delete", "remove"];

/// Suffix stripped from service names to derive the entity type.
const SERVICE_SUFFIX: &str = "Service";

/// Classifies an operation identifier into an action, or `None` when the
/// operation is not auditable.
pub trait ActionClassifier: Send + Sync {
    fn classify(&self, operation: &str) -> Option<ActionType>;
}

/// Case-sensitive prefix classifier with disjoint prefix sets.
#[derive(Debug, Clone)]
pub struct PrefixClassifier {
    rules: Vec<(ActionType, Vec<String>)>,
}

impl PrefixClassifier {
    /// Build a classifier from custom prefix sets.
    ///
    /// Fails when a prefix of one action is equal to, or a prefix of, a
    /// prefix of another action, since rule order would then decide the
    /// outcome.
    pub fn new(rules: Vec<(ActionType, Vec<String>)>) -> Result<Self, AuditError> {
        for (i, (action, prefixes)) in rules.iter().enumerate() {
            if let Some(empty) = prefixes.iter().find(|p| p.is_empty()) {
                return Err(AuditError::InitializationFailed(format!(
                    "empty prefix '{}' for {}",
                    empty, action
                )));
            }

            for (other_action, other_prefixes) in rules.iter().skip(i + 1) {
                if other_action == action {
                    continue;
                }
                for p in prefixes {
                    if let Some(q) = other_prefixes
                        .iter()
                        .find(|q| q.starts_with(p.as_str()) || p.starts_with(q.as_str()))
                    {
                        return Err(AuditError::InitializationFailed(format!(
                            "prefix '{}' ({}) overlaps '{}' ({})",
                            p, action, q, other_action
                        )));
                    }
                }
            }
        }

        Ok(Self { rules })
    }
}

impl Default for PrefixClassifier {
    fn default() -> Self {
        let owned = |prefixes: &[&str]| prefixes.iter().map(|p| p.to_string()).collect();
        Self {
            rules: vec![
                (ActionType::Create, owned(&CREATE_PREFIXES)),
                (ActionType::Update, owned(&UPDATE_PREFIXES)),
                (ActionType::Delete, owned(&DELETE_PREFIXES)),
            ],
        }
    }
}

impl ActionClassifier for PrefixClassifier {
    fn classify(&self, operation: &str) -> Option<ActionType> {
        self.rules
            .iter()
            .find(|(_, prefixes)| prefixes.iter().any(|p| operation.starts_with(p.as_str())))
            .map(|(action, _)| *action)
    }
}

/// Whether `operation` is a read that must never be audited.
pub fn is_read_operation(operation: &str) -> bool {
    READ_PREFIXES.iter().any(|p| operation.starts_with(p))
}

/// Derive the entity type from a service name: `FacultyService` -> `FACULTY`.
///
/// Names without the `Service` suffix are upper-cased whole.
pub fn entity_type_for(service: &str) -> String {
    service
        .strip_suffix(SERVICE_SUFFIX)
        .filter(|stem| !stem.is_empty())
        .unwrap_or(service)
        .to_uppercase()
}
