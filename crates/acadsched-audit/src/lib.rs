//! # acadsched-audit
//!
//! Append-only audit trail for the acadsched domain services.
//!
//! This crate provides:
//! - Classification of service operations into `CREATE` / `UPDATE` / `DELETE`
//! - Attribution of each call to a caller principal
//! - An interceptor that observes completed service calls and records them
//! - Append-only storage in memory, JSON Lines files, or SQLite
//!
//! ## Flow
//!
//! A service decorator hands each successful call to the [`CallInterceptor`]:
//!
//! 1. Read operations (`get*`, `find*`, `list*`) are dropped.
//! 2. Calls from the [`AuditRecorder`] itself are dropped.
//! 3. Unmonitored services are dropped.
//! 4. The [`ActionClassifier`] maps the operation to an action, or drops it.
//! 5. The [`IdentityResolver`] attributes the call to a principal.
//! 6. The [`AuditRecorder`] stamps and stores one [`AuditEntry`].
//!
//! Audit failures are logged and never reach the caller.
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use acadsched_audit::{AuditRecorder, CallInterceptor, Monitored, SecurityContext, ServiceCall};
//! use acadsched_core::AuditConfig;
//!
//! struct FacultyDirectory;
//!
//! impl Monitored for FacultyDirectory {
//!     fn service_name(&self) -> &str {
//!         "FacultyService"
//!     }
//! }
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = AuditConfig::default();
//! let recorder = Arc::new(AuditRecorder::from_config(&config).await?);
//! let interceptor = CallInterceptor::new(recorder.clone(), &config);
//!
//! let call = ServiceCall::new(&FacultyDirectory, "createFaculty").arg("Ada Lovelace");
//! interceptor
//!     .after_returning(call, &SecurityContext::authenticated("dean@uni.edu"))
//!     .await;
//!
//! for entry in recorder.list_all().await? {
//!     println!("{}", entry.to_log_line());
//! }
//! # Ok(())
//! # }
//! ```

pub mod classifier;
pub mod entry;
pub mod error;
pub mod identity;
pub mod interceptor;
pub mod recorder;
pub mod sqlite;
pub mod storage;

pub use classifier::{ActionClassifier, PrefixClassifier, entity_type_for, is_read_operation};
pub use entry::{ActionType, AuditEntry, NewAuditEntry};
pub use error::AuditError;
pub use identity::{
    Authentication, IdentityContext, IdentityError, IdentityResolver, SecurityContext,
};
pub use interceptor::{CallInterceptor, Monitored, PendingEntry, ServiceCall, describe};
pub use recorder::{AuditFilter, AuditRecorder};
pub use sqlite::SqliteStorage;
pub use storage::{AuditStorage, FileStorage, MemoryStorage, create_storage};
