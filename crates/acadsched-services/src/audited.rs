//! Audited service decorators.
//!
//! [`Audited`] wraps any monitored service and implements the same service
//! trait. Every call is forwarded unchanged; once the inner call has returned
//! successfully the call is handed to the [`CallInterceptor`], which decides
//! whether it is recorded. Failed calls are never handed over, and nothing the
//! interceptor does reaches the caller.

use std::sync::Arc;

use acadsched_audit::{CallInterceptor, Monitored, SecurityContext, ServiceCall};
use acadsched_core::{Constraint, Faculty, LeaveRequest, LeaveStatus, Room, Section, Subject};
use async_trait::async_trait;
use uuid::Uuid;

use crate::constraint::ConstraintService;
use crate::error::ServiceError;
use crate::faculty::FacultyService;
use crate::leave::LeaveService;
use crate::room::RoomService;
use crate::section::SectionService;
use crate::subject::SubjectService;

/// A service whose completed calls are reported to a [`CallInterceptor`].
pub struct Audited<S> {
    inner: S,
    interceptor: Arc<CallInterceptor>,
}

impl<S> Audited<S> {
    pub fn new(inner: S, interceptor: Arc<CallInterceptor>) -> Self {
        Self { inner, interceptor }
    }

    async fn observe<T>(
        &self,
        call: ServiceCall,
        ctx: &SecurityContext,
        result: Result<T, ServiceError>,
    ) -> Result<T, ServiceError> {
        if result.is_ok() {
            self.interceptor.after_returning(call, ctx).await;
        }
        result
    }
}

impl<S: Monitored> Audited<S> {
    fn call(&self, operation: &str) -> ServiceCall {
        ServiceCall::new(&self.inner, operation)
    }
}

impl<S: Monitored> Monitored for Audited<S> {
    fn service_name(&self) -> &str {
        self.inner.service_name()
    }

    fn records_audit(&self) -> bool {
        self.inner.records_audit()
    }
}

#[async_trait]
impl<S: FacultyService + Monitored> FacultyService for Audited<S> {
    async fn create_faculty(&self, ctx: &SecurityContext, faculty: Faculty) -> Result<Faculty, ServiceError> {
        let call = self.call("create_faculty").arg(&faculty);
        let result = self.inner.create_faculty(ctx, faculty).await;
        self.observe(call, ctx, result).await
    }

    async fn get_all_faculty(&self, ctx: &SecurityContext) -> Result<Vec<Faculty>, ServiceError> {
        let call = self.call("get_all_faculty");
        let result = self.inner.get_all_faculty(ctx).await;
        self.observe(call, ctx, result).await
    }

    async fn get_faculty_by_id(&self, ctx: &SecurityContext, id: i64) -> Result<Faculty, ServiceError> {
        let call = self.call("get_faculty_by_id").arg(&id);
        let result = self.inner.get_faculty_by_id(ctx, id).await;
        self.observe(call, ctx, result).await
    }

    async fn update_faculty(
        &self,
        ctx: &SecurityContext,
        id: i64,
        details: Faculty,
    ) -> Result<Faculty, ServiceError> {
        let call = self.call("update_faculty").arg(&id).arg(&details);
        let result = self.inner.update_faculty(ctx, id, details).await;
        self.observe(call, ctx, result).await
    }

    async fn delete_faculty(&self, ctx: &SecurityContext, id: i64) -> Result<(), ServiceError> {
        let call = self.call("delete_faculty").arg(&id);
        let result = self.inner.delete_faculty(ctx, id).await;
        self.observe(call, ctx, result).await
    }
}

#[async_trait]
impl<S: SectionService + Monitored> SectionService for Audited<S> {
    async fn get_all_sections(&self, ctx: &SecurityContext) -> Result<Vec<Section>, ServiceError> {
        let call = self.call("get_all_sections");
        let result = self.inner.get_all_sections(ctx).await;
        self.observe(call, ctx, result).await
    }

    async fn get_section_by_id(&self, ctx: &SecurityContext, id: i64) -> Result<Option<Section>, ServiceError> {
        let call = self.call("get_section_by_id").arg(&id);
        let result = self.inner.get_section_by_id(ctx, id).await;
        self.observe(call, ctx, result).await
    }

    async fn create_section(&self, ctx: &SecurityContext, section: Section) -> Result<Section, ServiceError> {
        let call = self.call("create_section").arg(&section);
        let result = self.inner.create_section(ctx, section).await;
        self.observe(call, ctx, result).await
    }

    async fn update_section(
        &self,
        ctx: &SecurityContext,
        id: i64,
        details: Section,
    ) -> Result<Section, ServiceError> {
        let call = self.call("update_section").arg(&id).arg(&details);
        let result = self.inner.update_section(ctx, id, details).await;
        self.observe(call, ctx, result).await
    }

    async fn delete_section(&self, ctx: &SecurityContext, id: i64) -> Result<(), ServiceError> {
        let call = self.call("delete_section").arg(&id);
        let result = self.inner.delete_section(ctx, id).await;
        self.observe(call, ctx, result).await
    }
}

#[async_trait]
impl<S: RoomService + Monitored> RoomService for Audited<S> {
    async fn find_all(&self, ctx: &SecurityContext) -> Result<Vec<Room>, ServiceError> {
        let call = self.call("find_all");
        let result = self.inner.find_all(ctx).await;
        self.observe(call, ctx, result).await
    }

    async fn find_by_id(&self, ctx: &SecurityContext, id: i64) -> Result<Room, ServiceError> {
        let call = self.call("find_by_id").arg(&id);
        let result = self.inner.find_by_id(ctx, id).await;
        self.observe(call, ctx, result).await
    }

    async fn save(&self, ctx: &SecurityContext, room: Room) -> Result<Room, ServiceError> {
        let call = self.call("save").arg(&room);
        let result = self.inner.save(ctx, room).await;
        self.observe(call, ctx, result).await
    }

    async fn delete_by_id(&self, ctx: &SecurityContext, id: i64) -> Result<(), ServiceError> {
        let call = self.call("delete_by_id").arg(&id);
        let result = self.inner.delete_by_id(ctx, id).await;
        self.observe(call, ctx, result).await
    }
}

#[async_trait]
impl<S: LeaveService + Monitored> LeaveService for Audited<S> {
    async fn get_all_requests(&self, ctx: &SecurityContext) -> Result<Vec<LeaveRequest>, ServiceError> {
        let call = self.call("get_all_requests");
        let result = self.inner.get_all_requests(ctx).await;
        self.observe(call, ctx, result).await
    }

    async fn get_requests_by_faculty(
        &self,
        ctx: &SecurityContext,
        faculty_id: i64,
    ) -> Result<Vec<LeaveRequest>, ServiceError> {
        let call = self.call("get_requests_by_faculty").arg(&faculty_id);
        let result = self.inner.get_requests_by_faculty(ctx, faculty_id).await;
        self.observe(call, ctx, result).await
    }

    async fn create_request(
        &self,
        ctx: &SecurityContext,
        request: LeaveRequest,
    ) -> Result<LeaveRequest, ServiceError> {
        let call = self.call("create_request").arg(&request);
        let result = self.inner.create_request(ctx, request).await;
        self.observe(call, ctx, result).await
    }

    async fn update_status(
        &self,
        ctx: &SecurityContext,
        id: i64,
        status: LeaveStatus,
    ) -> Result<LeaveRequest, ServiceError> {
        let call = self.call("update_status").arg(&id).arg(&status);
        let result = self.inner.update_status(ctx, id, status).await;
        self.observe(call, ctx, result).await
    }

    async fn approve_leave(&self, ctx: &SecurityContext, id: i64) -> Result<LeaveRequest, ServiceError> {
        let call = self.call("approve_leave").arg(&id);
        let result = self.inner.approve_leave(ctx, id).await;
        self.observe(call, ctx, result).await
    }

    async fn reject_leave(&self, ctx: &SecurityContext, id: i64) -> Result<LeaveRequest, ServiceError> {
        let call = self.call("reject_leave").arg(&id);
        let result = self.inner.reject_leave(ctx, id).await;
        self.observe(call, ctx, result).await
    }

    async fn delete_request(&self, ctx: &SecurityContext, id: i64) -> Result<(), ServiceError> {
        let call = self.call("delete_request").arg(&id);
        let result = self.inner.delete_request(ctx, id).await;
        self.observe(call, ctx, result).await
    }
}

#[async_trait]
impl<S: SubjectService + Monitored> SubjectService for Audited<S> {
    async fn create_subject(&self, ctx: &SecurityContext, subject: Subject) -> Result<Subject, ServiceError> {
        let call = self.call("create_subject").arg(&subject);
        let result = self.inner.create_subject(ctx, subject).await;
        self.observe(call, ctx, result).await
    }

    async fn get_all_subjects(&self, ctx: &SecurityContext) -> Result<Vec<Subject>, ServiceError> {
        let call = self.call("get_all_subjects");
        let result = self.inner.get_all_subjects(ctx).await;
        self.observe(call, ctx, result).await
    }

    async fn update_subject(
        &self,
        ctx: &SecurityContext,
        id: i64,
        details: Subject,
    ) -> Result<Subject, ServiceError> {
        let call = self.call("update_subject").arg(&id).arg(&details);
        let result = self.inner.update_subject(ctx, id, details).await;
        self.observe(call, ctx, result).await
    }

    async fn delete_subject(&self, ctx: &SecurityContext, id: i64) -> Result<(), ServiceError> {
        let call = self.call("delete_subject").arg(&id);
        let result = self.inner.delete_subject(ctx, id).await;
        self.observe(call, ctx, result).await
    }
}

#[async_trait]
impl<S: ConstraintService + Monitored> ConstraintService for Audited<S> {
    async fn get_all_constraints(&self, ctx: &SecurityContext) -> Result<Vec<Constraint>, ServiceError> {
        let call = self.call("get_all_constraints");
        let result = self.inner.get_all_constraints(ctx).await;
        self.observe(call, ctx, result).await
    }

    async fn create_constraint(
        &self,
        ctx: &SecurityContext,
        constraint: Constraint,
    ) -> Result<Constraint, ServiceError> {
        let call = self.call("create_constraint").arg(&constraint);
        let result = self.inner.create_constraint(ctx, constraint).await;
        self.observe(call, ctx, result).await
    }

    async fn toggle_constraint_status(&self, ctx: &SecurityContext, id: Uuid) -> Result<Constraint, ServiceError> {
        let call = self.call("toggle_constraint_status").arg(&id);
        let result = self.inner.toggle_constraint_status(ctx, id).await;
        self.observe(call, ctx, result).await
    }
}
