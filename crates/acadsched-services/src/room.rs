//! Room inventory.

use acadsched_audit::{Monitored, SecurityContext};
use acadsched_core::Room;
use async_trait::async_trait;

use crate::error::ServiceError;
use crate::table::{IdSequence, Table};

/// Manages rooms. `save` is an upsert keyed on the room id.
#[async_trait]
pub trait RoomService: Send + Sync {
    async fn find_all(&self, ctx: &SecurityContext) -> Result<Vec<Room>, ServiceError>;

    async fn find_by_id(&self, ctx: &SecurityContext, id: i64) -> Result<Room, ServiceError>;

    /// Insert a new room, or replace the one with the same id.
    async fn save(&self, ctx: &SecurityContext, room: Room) -> Result<Room, ServiceError>;

    async fn delete_by_id(&self, ctx: &SecurityContext, id: i64) -> Result<(), ServiceError>;
}

#[derive(Debug)]
pub struct InMemoryRoomService {
    rows: Table<i64, Room>,
    ids: IdSequence,
}

impl InMemoryRoomService {
    pub fn new() -> Self {
        Self {
            rows: Table::new(),
            ids: IdSequence::new(),
        }
    }
}

impl Default for InMemoryRoomService {
    fn default() -> Self {
        Self::new()
    }
}

impl Monitored for InMemoryRoomService {
    fn service_name(&self) -> &str {
        "RoomService"
    }
}

#[async_trait]
impl RoomService for InMemoryRoomService {
    async fn find_all(&self, _ctx: &SecurityContext) -> Result<Vec<Room>, ServiceError> {
        self.rows.all()
    }

    async fn find_by_id(&self, _ctx: &SecurityContext, id: i64) -> Result<Room, ServiceError> {
        self.rows
            .get(&id)?
            .ok_or_else(|| ServiceError::not_found("Room", id))
    }

    async fn save(&self, _ctx: &SecurityContext, room: Room) -> Result<Room, ServiceError> {
        self.rows.upsert(room.id, || self.ids.next(), |id| Room {
            id: Some(id),
            ..room
        })
    }

    async fn delete_by_id(&self, _ctx: &SecurityContext, id: i64) -> Result<(), ServiceError> {
        self.rows.remove(&id)?;
        Ok(())
    }
}
