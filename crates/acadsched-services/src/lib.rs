//! # acadsched-services
//!
//! The monitored scheduling services: faculty, sections, rooms, leave,
//! subjects and constraints. Each service is a trait with an in-memory
//! implementation; [`Audited`] wraps any of them so that successful mutations
//! land in the audit trail.
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use acadsched_audit::{AuditRecorder, SecurityContext};
//! use acadsched_core::{AuditConfig, Room};
//! use acadsched_services::{RoomService, ServiceRegistry};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = AuditConfig::default();
//! let recorder = Arc::new(AuditRecorder::from_config(&config).await?);
//! let services = ServiceRegistry::with_recorder(recorder, &config);
//!
//! let ctx = SecurityContext::authenticated("ops@uni.edu");
//! services.rooms.save(&ctx, Room::default()).await?;
//! # Ok(())
//! # }
//! ```

pub mod audited;
pub mod constraint;
pub mod error;
pub mod faculty;
pub mod leave;
pub mod registry;
pub mod room;
pub mod section;
pub mod subject;
mod table;

pub use audited::Audited;
pub use constraint::{ConstraintService, InMemoryConstraintService};
pub use error::ServiceError;
pub use faculty::{FacultyService, InMemoryFacultyService};
pub use leave::{InMemoryLeaveService, LeaveService};
pub use registry::ServiceRegistry;
pub use room::{InMemoryRoomService, RoomService};
pub use section::{InMemorySectionService, SectionService};
pub use subject::{InMemorySubjectService, SubjectService};
