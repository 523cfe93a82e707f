//! Room type reference data

use std::sync::Arc;

use tracing::info;

use crate::domain::{DomainError, DomainResult, RepositoryProvider, RoomType};

/// Categories inserted into an empty database at startup
pub const DEFAULT_ROOM_TYPES: [(&str, &str); 4] = [
    ("Standard", "Standard room with basic amenities"),
    ("Junior Suite", "Upgraded room with extra space"),
    ("Suite", "Suite with a living area"),
    ("Family", "Family room"),
];

pub struct RoomTypeService {
    repos: Arc<dyn RepositoryProvider>,
}

impl RoomTypeService {
    pub fn new(repos: Arc<dyn RepositoryProvider>) -> Self {
        Self { repos }
    }

    pub async fn list_room_types(&self) -> DomainResult<Vec<RoomType>> {
        self.repos.room_types().find_all().await
    }

    pub async fn get_room_type(&self, id: i32) -> DomainResult<Option<RoomType>> {
        self.repos.room_types().find_by_id(id).await
    }

    pub async fn create_room_type(&self, name: &str, description: &str) -> DomainResult<RoomType> {
        let name = validate_name(name)?;
        let room_type = self
            .repos
            .room_types()
            .insert(name, description.to_string())
            .await?;
        info!(room_type_id = room_type.id, name = %room_type.name, "Room type created");
        Ok(room_type)
    }

    pub async fn update_room_type(
        &self,
        id: i32,
        name: &str,
        description: &str,
    ) -> DomainResult<Option<RoomType>> {
        let name = validate_name(name)?;
        self.repos
            .room_types()
            .update(id, name, description.to_string())
            .await
    }

    /// Returns whether the type existed; fails while rooms reference it.
    pub async fn delete_room_type(&self, id: i32) -> DomainResult<bool> {
        if self.repos.room_types().find_by_id(id).await?.is_none() {
            return Ok(false);
        }
        if self.repos.rooms().exists_with_type(id).await? {
            return Err(DomainError::RoomTypeInUse(id));
        }
        self.repos.room_types().delete(id).await
    }

    /// Insert [`DEFAULT_ROOM_TYPES`] when no room type exists yet.
    /// Returns the number of rows inserted.
    pub async fn seed_defaults(&self) -> DomainResult<usize> {
        if !self.repos.room_types().find_all().await?.is_empty() {
            return Ok(0);
        }
        for (name, description) in DEFAULT_ROOM_TYPES {
            self.repos
                .room_types()
                .insert(name.to_string(), description.to_string())
                .await?;
        }
        info!(count = DEFAULT_ROOM_TYPES.len(), "Seeded default room types");
        Ok(DEFAULT_ROOM_TYPES.len())
    }
}

fn validate_name(name: &str) -> DomainResult<String> {
    let name = name.trim();
    if name.is_empty() {
        return Err(DomainError::Validation("Room type name cannot be empty".into()));
    }
    Ok(name.to_string())
}
