//! # acadsched-core
//!
//! Configuration and domain types shared across the acadsched crates.

pub mod config;
pub mod domain;

pub use config::{
    AcadschedConfig, AuditConfig, ConfigError, DispatchMode, ObservabilityConfig, StorageBackend,
    StorageConfig,
};
pub use domain::{
    Constraint, Faculty, LeaveRequest, LeaveStatus, Room, RoomStatus, RoomType, Section,
    SectionStatus, Subject,
};
