//! Faculty directory.

use acadsched_audit::{Monitored, SecurityContext};
use acadsched_core::Faculty;
use async_trait::async_trait;

use crate::error::ServiceError;
use crate::table::{IdSequence, Table};

/// Manages faculty members.
#[async_trait]
pub trait FacultyService: Send + Sync {
    async fn create_faculty(&self, ctx: &SecurityContext, faculty: Faculty) -> Result<Faculty, ServiceError>;

    async fn get_all_faculty(&self, ctx: &SecurityContext) -> Result<Vec<Faculty>, ServiceError>;

    async fn get_faculty_by_id(&self, ctx: &SecurityContext, id: i64) -> Result<Faculty, ServiceError>;

    /// Replace every field of the stored record with `details`.
    async fn update_faculty(
        &self,
        ctx: &SecurityContext,
        id: i64,
        details: Faculty,
    ) -> Result<Faculty, ServiceError>;

    async fn delete_faculty(&self, ctx: &SecurityContext, id: i64) -> Result<(), ServiceError>;
}

/// Faculty directory held in process memory.
#[derive(Debug)]
pub struct InMemoryFacultyService {
    rows: Table<i64, Faculty>,
    ids: IdSequence,
}

impl InMemoryFacultyService {
    pub fn new() -> Self {
        Self {
            rows: Table::new(),
            ids: IdSequence::new(),
        }
    }
}

impl Default for InMemoryFacultyService {
    fn default() -> Self {
        Self::new()
    }
}

impl Monitored for InMemoryFacultyService {
    fn service_name(&self) -> &str {
        "FacultyService"
    }
}

#[async_trait]
impl FacultyService for InMemoryFacultyService {
    async fn create_faculty(&self, _ctx: &SecurityContext, mut faculty: Faculty) -> Result<Faculty, ServiceError> {
        let id = self.ids.next();
        faculty.id = Some(id);
        tracing::debug!(faculty_id = id, email = %faculty.email, "Faculty created");
        self.rows.put(id, faculty)
    }

    async fn get_all_faculty(&self, _ctx: &SecurityContext) -> Result<Vec<Faculty>, ServiceError> {
        self.rows.all()
    }

    async fn get_faculty_by_id(&self, _ctx: &SecurityContext, id: i64) -> Result<Faculty, ServiceError> {
        self.rows
            .get(&id)?
            .ok_or_else(|| ServiceError::not_found("Faculty", id))
    }

    async fn update_faculty(
        &self,
        _ctx: &SecurityContext,
        id: i64,
        details: Faculty,
    ) -> Result<Faculty, ServiceError> {
        self.rows
            .modify(&id, |faculty| {
                *faculty = Faculty {
                    id: Some(id),
                    ..details
                };
            })?
            .ok_or_else(|| ServiceError::not_found("Faculty", id))
    }

    async fn delete_faculty(&self, _ctx: &SecurityContext, id: i64) -> Result<(), ServiceError> {
        self.rows
            .remove(&id)?
            .map(|_| ())
            .ok_or_else(|| ServiceError::not_found("Faculty", id))
    }
}
