//! Audit entry types.
//!
//! An [`AuditEntry`] is an immutable historical fact: one successfully
//! classified mutating call on a monitored service. Storage backends assign
//! the id; the recorder assigns the timestamp.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::AuditError;

/// Kind of mutation recorded by an entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ActionType {
    Create,
    Update,
    Delete,
}

impl ActionType {
    /// Stored token for this action.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Create => "CREATE",
            Self::Update => "UPDATE",
            Self::Delete => "DELETE",
        }
    }
}

impl std::fmt::Display for ActionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ActionType {
    type Err = AuditError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "CREATE" => Ok(Self::Create),
            "UPDATE" => Ok(Self::Update),
            "DELETE" => Ok(Self::Delete),
            other => Err(AuditError::CorruptEntry(format!(
                "unknown action type '{}'",
                other
            ))),
        }
    }
}

/// A stored audit entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditEntry {
    /// Store-assigned, monotonically increasing id.
    pub id: i64,

    /// Uppercase domain concept acted upon (e.g. `FACULTY`).
    pub entity_type: String,

    /// Mutation kind.
    pub action_type: ActionType,

    /// `"<ACTION> <ENTITY> - Args: ..."` summary of the call.
    pub description: String,

    /// Principal the action is attributed to.
    pub user_email: String,

    /// Recorder clock at write time.
    pub timestamp: DateTime<Utc>,
}

impl AuditEntry {
    /// Format the entry as a human-readable log line.
    ///
    /// Format: `#id [timestamp] ACTION ENTITY user=... description`
    pub fn to_log_line(&self) -> String {
        format!(
            "#{} [{}] {} {} user={} {}",
            self.id,
            self.timestamp.format("%Y-%m-%d %H:%M:%S"),
            self.action_type,
            self.entity_type,
            self.user_email,
            self.description.replace('\n', " "),
        )
    }
}

/// An entry that has been stamped by the recorder but not yet stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAuditEntry {
    pub entity_type: String,
    pub action_type: ActionType,
    pub description: String,
    pub user_email: String,
    pub timestamp: DateTime<Utc>,
}

impl NewAuditEntry {
    /// Attach the store-assigned id.
    pub fn into_entry(self, id: i64) -> AuditEntry {
        AuditEntry {
            id,
            entity_type: self.entity_type,
            action_type: self.action_type,
            description: self.description,
            user_email: self.user_email,
            timestamp: self.timestamp,
        }
    }
}
