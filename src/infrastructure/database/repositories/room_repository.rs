//! SeaORM implementations of RoomRepository and RoomTypeRepository

use async_trait::async_trait;
use chrono::Utc;
use log::debug;
use sea_orm::{
    ActiveModelTrait, ActiveValue::NotSet, ColumnTrait, DatabaseConnection, EntityTrait,
    QueryFilter, QueryOrder, Set, SqlErr,
};

use super::money::{from_cents, to_cents};
use crate::domain::room::{Room, RoomRepository, RoomSpec, RoomType, RoomTypeRepository};
use crate::domain::{DomainError, DomainResult};
use crate::infrastructure::database::entities::{room, room_type};

pub struct SeaOrmRoomRepository {
    db: DatabaseConnection,
}

impl SeaOrmRoomRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

pub struct SeaOrmRoomTypeRepository {
    db: DatabaseConnection,
}

impl SeaOrmRoomTypeRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

// ── Conversion helpers ──────────────────────────────────────────

fn room_to_domain(m: room::Model) -> Room {
    Room {
        id: m.id,
        room_number: m.room_number,
        room_type_id: m.room_type_id,
        price_per_night: from_cents(m.price_per_night_cents),
        capacity: m.capacity,
        description: m.description,
        is_available: m.is_available,
        created_at: m.created_at,
    }
}

fn room_type_to_domain(m: room_type::Model) -> RoomType {
    RoomType {
        id: m.id,
        name: m.name,
        description: m.description,
    }
}

fn apply_spec(active: &mut room::ActiveModel, spec: RoomSpec) -> DomainResult<()> {
    active.price_per_night_cents = Set(to_cents(spec.price_per_night)?);
    active.room_number = Set(spec.room_number);
    active.room_type_id = Set(spec.room_type_id);
    active.capacity = Set(spec.capacity);
    active.description = Set(spec.description);
    active.is_available = Set(spec.is_available);
    Ok(())
}

fn db_err(e: sea_orm::DbErr) -> DomainError {
    DomainError::Storage(format!("Database error: {}", e))
}

/// Unique violations on `room_number` surface as `DuplicateRoomNumber`.
fn write_err(room_number: &str) -> impl FnOnce(sea_orm::DbErr) -> DomainError + '_ {
    move |e| match e.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(_)) => {
            DomainError::DuplicateRoomNumber(room_number.to_string())
        }
        _ => db_err(e),
    }
}

// ── RoomRepository impl ─────────────────────────────────────────

#[async_trait]
impl RoomRepository for SeaOrmRoomRepository {
    async fn find_all(&self) -> DomainResult<Vec<Room>> {
        let models = room::Entity::find()
            .order_by_asc(room::Column::Id)
            .all(&self.db)
            .await
            .map_err(db_err)?;
        Ok(models.into_iter().map(room_to_domain).collect())
    }

    async fn find_by_id(&self, id: i32) -> DomainResult<Option<Room>> {
        let model = room::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_err)?;
        Ok(model.map(room_to_domain))
    }

    async fn find_by_number(&self, room_number: &str) -> DomainResult<Option<Room>> {
        let model = room::Entity::find()
            .filter(room::Column::RoomNumber.eq(room_number))
            .one(&self.db)
            .await
            .map_err(db_err)?;
        Ok(model.map(room_to_domain))
    }

    async fn find_available_for_sale(&self) -> DomainResult<Vec<Room>> {
        let models = room::Entity::find()
            .filter(room::Column::IsAvailable.eq(true))
            .order_by_asc(room::Column::Id)
            .all(&self.db)
            .await
            .map_err(db_err)?;
        Ok(models.into_iter().map(room_to_domain).collect())
    }

    async fn exists_with_type(&self, room_type_id: i32) -> DomainResult<bool> {
        let model = room::Entity::find()
            .filter(room::Column::RoomTypeId.eq(room_type_id))
            .one(&self.db)
            .await
            .map_err(db_err)?;
        Ok(model.is_some())
    }

    async fn insert(&self, spec: RoomSpec) -> DomainResult<Room> {
        debug!("Inserting room: {}", spec.room_number);

        let room_number = spec.room_number.clone();
        let mut model = room::ActiveModel {
            id: NotSet,
            created_at: Set(Utc::now()),
            ..Default::default()
        };
        apply_spec(&mut model, spec)?;
        let model = model
            .insert(&self.db)
            .await
            .map_err(write_err(&room_number))?;
        Ok(room_to_domain(model))
    }

    async fn update(&self, id: i32, spec: RoomSpec) -> DomainResult<Option<Room>> {
        debug!("Updating room: {}", id);

        let existing = room::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_err)?;
        let Some(existing) = existing else {
            return Ok(None);
        };

        let room_number = spec.room_number.clone();
        let mut active: room::ActiveModel = existing.into();
        apply_spec(&mut active, spec)?;
        let model = active
            .update(&self.db)
            .await
            .map_err(write_err(&room_number))?;
        Ok(Some(room_to_domain(model)))
    }

    async fn delete(&self, id: i32) -> DomainResult<bool> {
        debug!("Deleting room: {}", id);

        let result = room::Entity::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(db_err)?;
        Ok(result.rows_affected > 0)
    }
}

// ── RoomTypeRepository impl ─────────────────────────────────────

#[async_trait]
impl RoomTypeRepository for SeaOrmRoomTypeRepository {
    async fn find_all(&self) -> DomainResult<Vec<RoomType>> {
        let models = room_type::Entity::find()
            .order_by_asc(room_type::Column::Id)
            .all(&self.db)
            .await
            .map_err(db_err)?;
        Ok(models.into_iter().map(room_type_to_domain).collect())
    }

    async fn find_by_id(&self, id: i32) -> DomainResult<Option<RoomType>> {
        let model = room_type::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_err)?;
        Ok(model.map(room_type_to_domain))
    }

    async fn insert(&self, name: String, description: String) -> DomainResult<RoomType> {
        debug!("Inserting room type: {}", name);

        let model = room_type::ActiveModel {
            id: NotSet,
            name: Set(name),
            description: Set(description),
        };
        let model = model.insert(&self.db).await.map_err(db_err)?;
        Ok(room_type_to_domain(model))
    }

    async fn update(
        &self,
        id: i32,
        name: String,
        description: String,
    ) -> DomainResult<Option<RoomType>> {
        let existing = room_type::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_err)?;
        let Some(existing) = existing else {
            return Ok(None);
        };

        let mut active: room_type::ActiveModel = existing.into();
        active.name = Set(name);
        active.description = Set(description);
        let model = active.update(&self.db).await.map_err(db_err)?;
        Ok(Some(room_type_to_domain(model)))
    }

    async fn delete(&self, id: i32) -> DomainResult<bool> {
        debug!("Deleting room type: {}", id);

        let result = room_type::Entity::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(db_err)?;
        Ok(result.rows_affected > 0)
    }
}
