//! Subject catalogue.

use acadsched_audit::{Monitored, SecurityContext};
use acadsched_core::Subject;
use async_trait::async_trait;

use crate::error::ServiceError;
use crate::table::{IdSequence, Table};

/// Manages subjects.
#[async_trait]
pub trait SubjectService: Send + Sync {
    async fn create_subject(&self, ctx: &SecurityContext, subject: Subject) -> Result<Subject, ServiceError>;

    async fn get_all_subjects(&self, ctx: &SecurityContext) -> Result<Vec<Subject>, ServiceError>;

    /// Overwrite a subject. The eligible-faculty list is only replaced when
    /// `details` carries one.
    async fn update_subject(
        &self,
        ctx: &SecurityContext,
        id: i64,
        details: Subject,
    ) -> Result<Subject, ServiceError>;

    async fn delete_subject(&self, ctx: &SecurityContext, id: i64) -> Result<(), ServiceError>;
}

#[derive(Debug)]
pub struct InMemorySubjectService {
    rows: Table<i64, Subject>,
    ids: IdSequence,
}

impl InMemorySubjectService {
    pub fn new() -> Self {
        Self {
            rows: Table::new(),
            ids: IdSequence::new(),
        }
    }
}

impl Default for InMemorySubjectService {
    fn default() -> Self {
        Self::new()
    }
}

impl Monitored for InMemorySubjectService {
    fn service_name(&self) -> &str {
        "SubjectService"
    }
}

#[async_trait]
impl SubjectService for InMemorySubjectService {
    async fn create_subject(&self, _ctx: &SecurityContext, mut subject: Subject) -> Result<Subject, ServiceError> {
        let id = self.ids.next();
        subject.id = Some(id);
        self.rows.put(id, subject)
    }

    async fn get_all_subjects(&self, _ctx: &SecurityContext) -> Result<Vec<Subject>, ServiceError> {
        self.rows.all()
    }

    async fn update_subject(
        &self,
        _ctx: &SecurityContext,
        id: i64,
        details: Subject,
    ) -> Result<Subject, ServiceError> {
        self.rows
            .modify(&id, |subject| {
                let eligible_faculty = details
                    .eligible_faculty
                    .or_else(|| subject.eligible_faculty.take());
                *subject = Subject {
                    id: Some(id),
                    eligible_faculty,
                    ..details
                };
            })?
            .ok_or_else(|| ServiceError::not_found("Subject", id))
    }

    async fn delete_subject(&self, _ctx: &SecurityContext, id: i64) -> Result<(), ServiceError> {
        self.rows
            .remove(&id)?
            .map(|_| ())
            .ok_or_else(|| ServiceError::not_found("Subject", id))
    }
}
