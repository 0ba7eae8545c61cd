//! Student sections.

use acadsched_audit::{Monitored, SecurityContext};
use acadsched_core::Section;
use async_trait::async_trait;

use crate::error::ServiceError;
use crate::table::{IdSequence, Table};

/// Manages student sections.
#[async_trait]
pub trait SectionService: Send + Sync {
    async fn get_all_sections(&self, ctx: &SecurityContext) -> Result<Vec<Section>, ServiceError>;

    /// Look up a section; a missing id is `Ok(None)`.
    async fn get_section_by_id(&self, ctx: &SecurityContext, id: i64) -> Result<Option<Section>, ServiceError>;

    async fn create_section(&self, ctx: &SecurityContext, section: Section) -> Result<Section, ServiceError>;

    async fn update_section(
        &self,
        ctx: &SecurityContext,
        id: i64,
        details: Section,
    ) -> Result<Section, ServiceError>;

    /// Remove a section. Deleting an unknown id succeeds.
    async fn delete_section(&self, ctx: &SecurityContext, id: i64) -> Result<(), ServiceError>;
}

#[derive(Debug)]
pub struct InMemorySectionService {
    rows: Table<i64, Section>,
    ids: IdSequence,
}

impl InMemorySectionService {
    pub fn new() -> Self {
        Self {
            rows: Table::new(),
            ids: IdSequence::new(),
        }
    }
}

impl Default for InMemorySectionService {
    fn default() -> Self {
        Self::new()
    }
}

impl Monitored for InMemorySectionService {
    fn service_name(&self) -> &str {
        "SectionService"
    }
}

#[async_trait]
impl SectionService for InMemorySectionService {
    async fn get_all_sections(&self, _ctx: &SecurityContext) -> Result<Vec<Section>, ServiceError> {
        self.rows.all()
    }

    async fn get_section_by_id(&self, _ctx: &SecurityContext, id: i64) -> Result<Option<Section>, ServiceError> {
        self.rows.get(&id)
    }

    async fn create_section(&self, _ctx: &SecurityContext, mut section: Section) -> Result<Section, ServiceError> {
        let id = self.ids.next();
        section.id = Some(id);
        self.rows.put(id, section)
    }

    async fn update_section(
        &self,
        _ctx: &SecurityContext,
        id: i64,
        details: Section,
    ) -> Result<Section, ServiceError> {
        self.rows
            .modify(&id, |section| {
                section.name = details.name;
                section.department = details.department;
                section.year = details.year;
                section.capacity = details.capacity;
                section.status = details.status;
                section.mentor_id = details.mentor_id;
            })?
            .ok_or_else(|| ServiceError::not_found("Section", id))
    }

    async fn delete_section(&self, _ctx: &SecurityContext, id: i64) -> Result<(), ServiceError> {
        if self.rows.remove(&id)?.is_none() {
            tracing::debug!(section_id = id, "Delete of unknown section ignored");
        }
        Ok(())
    }
}
