//! Room and room type repository interfaces

use async_trait::async_trait;

use super::model::{Room, RoomSpec, RoomType};
use crate::domain::DomainResult;

#[async_trait]
pub trait RoomRepository: Send + Sync {
    async fn find_all(&self) -> DomainResult<Vec<Room>>;

    async fn find_by_id(&self, id: i32) -> DomainResult<Option<Room>>;

    /// Exact, case-sensitive match on the room number
    async fn find_by_number(&self, room_number: &str) -> DomainResult<Option<Room>>;

    /// Rooms flagged available for sale
    async fn find_available_for_sale(&self) -> DomainResult<Vec<Room>>;

    async fn exists_with_type(&self, room_type_id: i32) -> DomainResult<bool>;

    async fn insert(&self, spec: RoomSpec) -> DomainResult<Room>;

    /// `None` when the room does not exist
    async fn update(&self, id: i32, spec: RoomSpec) -> DomainResult<Option<Room>>;

    /// Returns whether a row was removed
    async fn delete(&self, id: i32) -> DomainResult<bool>;
}

#[async_trait]
pub trait RoomTypeRepository: Send + Sync {
    async fn find_all(&self) -> DomainResult<Vec<RoomType>>;

    async fn find_by_id(&self, id: i32) -> DomainResult<Option<RoomType>>;

    async fn insert(&self, name: String, description: String) -> DomainResult<RoomType>;

    /// `None` when the room type does not exist
    async fn update(
        &self,
        id: i32,
        name: String,
        description: String,
    ) -> DomainResult<Option<RoomType>>;

    /// Returns whether a row was removed
    async fn delete(&self, id: i32) -> DomainResult<bool>;
}
