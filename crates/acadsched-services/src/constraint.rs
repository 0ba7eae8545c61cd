//! Scheduling constraints.

use acadsched_audit::{Monitored, SecurityContext};
use acadsched_core::Constraint;
use async_trait::async_trait;
use uuid::Uuid;

use crate::error::ServiceError;
use crate::table::Table;

/// Manages scheduling constraints.
#[async_trait]
pub trait ConstraintService: Send + Sync {
    async fn get_all_constraints(&self, ctx: &SecurityContext) -> Result<Vec<Constraint>, ServiceError>;

    /// Store a constraint, assigning a fresh id when none is given. An id
    /// that is already taken is rejected.
    async fn create_constraint(
        &self,
        ctx: &SecurityContext,
        constraint: Constraint,
    ) -> Result<Constraint, ServiceError>;

    /// Flip the `active` flag.
    async fn toggle_constraint_status(&self, ctx: &SecurityContext, id: Uuid) -> Result<Constraint, ServiceError>;
}

#[derive(Debug)]
pub struct InMemoryConstraintService {
    rows: Table<Uuid, Constraint>,
}

impl InMemoryConstraintService {
    pub fn new() -> Self {
        Self { rows: Table::new() }
    }
}

impl Default for InMemoryConstraintService {
    fn default() -> Self {
        Self::new()
    }
}

impl Monitored for InMemoryConstraintService {
    fn service_name(&self) -> &str {
        "ConstraintService"
    }
}

#[async_trait]
impl ConstraintService for InMemoryConstraintService {
    async fn get_all_constraints(&self, _ctx: &SecurityContext) -> Result<Vec<Constraint>, ServiceError> {
        self.rows.all()
    }

    async fn create_constraint(
        &self,
        _ctx: &SecurityContext,
        mut constraint: Constraint,
    ) -> Result<Constraint, ServiceError> {
        let id = *constraint.id.get_or_insert_with(Uuid::new_v4);
        self.rows
            .insert_new(id, constraint)?
            .ok_or_else(|| ServiceError::Invalid(format!("constraint {} already exists", id)))
    }

    async fn toggle_constraint_status(&self, _ctx: &SecurityContext, id: Uuid) -> Result<Constraint, ServiceError> {
        self.rows
            .modify(&id, |constraint| constraint.active = !constraint.active)?
            .ok_or_else(|| ServiceError::not_found("Constraint", id))
    }
}
