//! Wiring of the audited service set.

use std::sync::Arc;

use acadsched_audit::{AuditRecorder, CallInterceptor};
use acadsched_core::AuditConfig;

use crate::audited::Audited;
use crate::constraint::{ConstraintService, InMemoryConstraintService};
use crate::faculty::{FacultyService, InMemoryFacultyService};
use crate::leave::{InMemoryLeaveService, LeaveService};
use crate::room::{InMemoryRoomService, RoomService};
use crate::section::{InMemorySectionService, SectionService};
use crate::subject::{InMemorySubjectService, SubjectService};

/// The six monitored services, each behind an audit decorator.
#[derive(Clone)]
pub struct ServiceRegistry {
    pub faculty: Arc<dyn FacultyService>,
    pub sections: Arc<dyn SectionService>,
    pub rooms: Arc<dyn RoomService>,
    pub leave: Arc<dyn LeaveService>,
    pub subjects: Arc<dyn SubjectService>,
    pub constraints: Arc<dyn ConstraintService>,
    interceptor: Arc<CallInterceptor>,
}

impl ServiceRegistry {
    /// In-memory services sharing one interceptor.
    pub fn in_memory(interceptor: Arc<CallInterceptor>) -> Self {
        Self {
            faculty: Arc::new(Audited::new(InMemoryFacultyService::new(), interceptor.clone())),
            sections: Arc::new(Audited::new(InMemorySectionService::new(), interceptor.clone())),
            rooms: Arc::new(Audited::new(InMemoryRoomService::new(), interceptor.clone())),
            leave: Arc::new(Audited::new(InMemoryLeaveService::new(), interceptor.clone())),
            subjects: Arc::new(Audited::new(InMemorySubjectService::new(), interceptor.clone())),
            constraints: Arc::new(Audited::new(InMemoryConstraintService::new(), interceptor.clone())),
            interceptor,
        }
    }

    /// In-memory services recording through `recorder` per `config`.
    pub fn with_recorder(recorder: Arc<AuditRecorder>, config: &AuditConfig) -> Self {
        Self::in_memory(Arc::new(CallInterceptor::new(recorder, config)))
    }

    /// The recorder behind every service in this registry.
    pub fn recorder(&self) -> &Arc<AuditRecorder> {
        self.interceptor.recorder()
    }
}
