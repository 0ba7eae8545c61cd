//! Call interceptor.
//!
//! Service decorators hand every successfully completed call to
//! [`CallInterceptor::after_returning`]. The interceptor decides whether the
//! call is auditable and, if so, records one entry. It only ever observes:
//! nothing it does can change the outcome of the call it was handed, and no
//! audit failure propagates back to the caller.

use acadsched_core::{AuditConfig, DispatchMode};
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;

use crate::classifier::{ActionClassifier, PrefixClassifier, entity_type_for, is_read_operation};
use crate::entry::ActionType;
use crate::identity::{IdentityContext, IdentityResolver};
use crate::recorder::AuditRecorder;

/// A component whose calls can be handed to the interceptor.
pub trait Monitored {
    /// Service name used for the monitored-set check and the entity type.
    fn service_name(&self) -> &str;

    /// Whether this component is the audit recorder itself. Calls from such a
    /// component are never audited.
    fn records_audit(&self) -> bool {
        false
    }
}

/// One completed call on a monitored service.
#[derive(Debug, Clone)]
pub struct ServiceCall {
    service: String,
    operation: String,
    arguments: Vec<Value>,
    from_recorder: bool,
}

impl ServiceCall {
    /// Describe a call of `operation` on `source`.
    pub fn new<M: Monitored + ?Sized>(source: &M, operation: impl Into<String>) -> Self {
        Self {
            service: source.service_name().to_string(),
            operation: operation.into(),
            arguments: Vec::new(),
            from_recorder: source.records_audit(),
        }
    }

    /// Append an argument. Values that fail to serialize are kept as `null`.
    pub fn arg<T: Serialize + ?Sized>(mut self, value: &T) -> Self {
        let value = serde_json::to_value(value).unwrap_or_else(|e| {
            tracing::debug!(error = %e, operation = %self.operation, "Unserializable audit argument");
            Value::Null
        });
        self.arguments.push(value);
        self
    }

    pub fn service(&self) -> &str {
        &self.service
    }

    pub fn operation(&self) -> &str {
        &self.operation
    }

    pub fn arguments(&self) -> &[Value] {
        &self.arguments
    }
}

/// An entry the interceptor decided to record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingEntry {
    pub entity_type: String,
    pub action_type: ActionType,
    pub description: String,
    pub user_email: String,
}

/// Observes completed service calls and records auditable ones.
pub struct CallInterceptor {
    recorder: Arc<AuditRecorder>,
    classifier: Arc<dyn ActionClassifier>,
    identity: IdentityResolver,
    config: AuditConfig,
}

impl CallInterceptor {
    /// Create an interceptor writing to `recorder`, configured by `config`.
    pub fn new(recorder: Arc<AuditRecorder>, config: &AuditConfig) -> Self {
        Self {
            recorder,
            classifier: Arc::new(PrefixClassifier::default()),
            identity: IdentityResolver::from_config(config),
            config: config.clone(),
        }
    }

    /// Replace the default prefix classifier.
    pub fn with_classifier(mut self, classifier: Arc<dyn ActionClassifier>) -> Self {
        self.classifier = classifier;
        self
    }

    /// The recorder entries are written to.
    pub fn recorder(&self) -> &Arc<AuditRecorder> {
        &self.recorder
    }

    /// Decide what, if anything, to record for a completed call.
    ///
    /// Identity is only resolved once the call is known to be auditable.
    pub fn evaluate(&self, call: &ServiceCall, identity: &dyn IdentityContext) -> Option<PendingEntry> {
        if is_read_operation(&call.operation) {
            tracing::trace!(service = %call.service, operation = %call.operation, "Read operation not audited");
            return None;
        }

        if call.from_recorder {
            tracing::trace!(operation = %call.operation, "Audit recorder call not audited");
            return None;
        }

        if !self.config.enabled || !self.config.is_monitored(&call.service) {
            tracing::trace!(service = %call.service, "Service not monitored");
            return None;
        }

        let action_type = self.classifier.classify(&call.operation)?;
        let entity_type = entity_type_for(&call.service);
        let description = describe(
            action_type,
            &entity_type,
            &call.arguments,
            self.config.max_argument_length,
        );

        Some(PendingEntry {
            entity_type,
            action_type,
            description,
            user_email: self.identity.resolve(identity),
        })
    }

    /// Record the call if it is auditable. Never fails.
    ///
    /// Detached dispatch needs a tokio runtime; when the caller is driven by
    /// some other executor the write happens inline instead.
    pub async fn after_returning(&self, call: ServiceCall, identity: &dyn IdentityContext) {
        let Some(pending) = self.evaluate(&call, identity) else {
            return;
        };

        match (self.config.dispatch, tokio::runtime::Handle::try_current()) {
            (DispatchMode::Detached, Ok(handle)) => {
                let recorder = self.recorder.clone();
                handle.spawn(async move { write(&recorder, pending).await });
            }
            (DispatchMode::Detached, Err(_)) => {
                tracing::debug!(operation = %call.operation, "No tokio runtime, recording inline");
                write(&self.recorder, pending).await
            }
            (DispatchMode::Inline, _) => write(&self.recorder, pending).await,
        }
    }
}

async fn write(recorder: &AuditRecorder, pending: PendingEntry) {
    let result = recorder
        .record(
            &pending.entity_type,
            pending.action_type,
            &pending.description,
            &pending.user_email,
        )
        .await;

    if let Err(e) = result {
        tracing::error!(
            error = %e,
            entity_type = %pending.entity_type,
            action_type = %pending.action_type,
            user = %pending.user_email,
            "Failed to record audit entry"
        );
    }
}

/// Build `"<ACTION> <ENTITY> - Args: <a>; <b>; "`.
///
/// `null` arguments are skipped; a call without arguments gets no `Args`
/// section at all.
pub fn describe(
    action_type: ActionType,
    entity_type: &str,
    arguments: &[Value],
    max_argument_length: usize,
) -> String {
    let mut description = format!("{} {}", action_type, entity_type);

    if !arguments.is_empty() {
        description.push_str(" - Args: ");
        for text in arguments.iter().filter_map(argument_text) {
            description.push_str(&truncate(&text, max_argument_length));
            description.push_str("; ");
        }
    }

    description
}

fn argument_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

fn truncate(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((cut, _)) => format!("{}...", &text[..cut]),
        None => text.to_string(),
    }
}
