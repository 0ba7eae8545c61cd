//! Faculty leave requests.

use acadsched_audit::{Monitored, SecurityContext};
use acadsched_core::{LeaveRequest, LeaveStatus};
use async_trait::async_trait;
use chrono::Local;

use crate::error::ServiceError;
use crate::table::{IdSequence, Table};

/// Manages leave requests and their approval.
#[async_trait]
pub trait LeaveService: Send + Sync {
    async fn get_all_requests(&self, ctx: &SecurityContext) -> Result<Vec<LeaveRequest>, ServiceError>;

    async fn get_requests_by_faculty(
        &self,
        ctx: &SecurityContext,
        faculty_id: i64,
    ) -> Result<Vec<LeaveRequest>, ServiceError>;

    /// File a request. Status defaults to pending and the applied date to
    /// today.
    async fn create_request(
        &self,
        ctx: &SecurityContext,
        request: LeaveRequest,
    ) -> Result<LeaveRequest, ServiceError>;

    async fn update_status(
        &self,
        ctx: &SecurityContext,
        id: i64,
        status: LeaveStatus,
    ) -> Result<LeaveRequest, ServiceError>;

    async fn approve_leave(&self, ctx: &SecurityContext, id: i64) -> Result<LeaveRequest, ServiceError>;

    async fn reject_leave(&self, ctx: &SecurityContext, id: i64) -> Result<LeaveRequest, ServiceError>;

    async fn delete_request(&self, ctx: &SecurityContext, id: i64) -> Result<(), ServiceError>;
}

#[derive(Debug)]
pub struct InMemoryLeaveService {
    rows: Table<i64, LeaveRequest>,
    ids: IdSequence,
}

impl InMemoryLeaveService {
    pub fn new() -> Self {
        Self {
            rows: Table::new(),
            ids: IdSequence::new(),
        }
    }

    fn set_status(&self, id: i64, status: LeaveStatus) -> Result<LeaveRequest, ServiceError> {
        let updated = self
            .rows
            .modify(&id, |request| request.status = Some(status))?
            .ok_or_else(|| ServiceError::not_found("Leave request", id))?;
        tracing::debug!(request_id = id, status = %status, "Leave status changed");
        Ok(updated)
    }
}

impl Default for InMemoryLeaveService {
    fn default() -> Self {
        Self::new()
    }
}

impl Monitored for InMemoryLeaveService {
    fn service_name(&self) -> &str {
        "LeaveService"
    }
}

#[async_trait]
impl LeaveService for InMemoryLeaveService {
    async fn get_all_requests(&self, _ctx: &SecurityContext) -> Result<Vec<LeaveRequest>, ServiceError> {
        self.rows.all()
    }

    async fn get_requests_by_faculty(
        &self,
        _ctx: &SecurityContext,
        faculty_id: i64,
    ) -> Result<Vec<LeaveRequest>, ServiceError> {
        Ok(self
            .rows
            .all()?
            .into_iter()
            .filter(|r| r.faculty_id == faculty_id)
            .collect())
    }

    async fn create_request(
        &self,
        _ctx: &SecurityContext,
        mut request: LeaveRequest,
    ) -> Result<LeaveRequest, ServiceError> {
        if request.end_date < request.start_date {
            return Err(ServiceError::Invalid(format!(
                "leave ends ({}) before it starts ({})",
                request.end_date, request.start_date
            )));
        }

        let id = self.ids.next();
        request.id = Some(id);
        request.status = Some(request.status.unwrap_or(LeaveStatus::Pending));
        request.applied_date = Some(
            request
                .applied_date
                .unwrap_or_else(|| Local::now().date_naive()),
        );
        self.rows.put(id, request)
    }

    async fn update_status(
        &self,
        _ctx: &SecurityContext,
        id: i64,
        status: LeaveStatus,
    ) -> Result<LeaveRequest, ServiceError> {
        self.set_status(id, status)
    }

    async fn approve_leave(&self, _ctx: &SecurityContext, id: i64) -> Result<LeaveRequest, ServiceError> {
        self.set_status(id, LeaveStatus::Approved)
    }

    async fn reject_leave(&self, _ctx: &SecurityContext, id: i64) -> Result<LeaveRequest, ServiceError> {
        self.set_status(id, LeaveStatus::Rejected)
    }

    async fn delete_request(&self, _ctx: &SecurityContext, id: i64) -> Result<(), ServiceError> {
        self.rows.remove(&id)?;
        Ok(())
    }
}
