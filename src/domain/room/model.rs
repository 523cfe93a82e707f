//! Room and room type domain entities

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use crate::shared::errors::DomainError;

/// Room category (reference data)
#[derive(Debug, Clone, PartialEq)]
pub struct RoomType {
    pub id: i32,
    pub name: String,
    pub description: String,
}

/// Bookable hotel room
#[derive(Debug, Clone, PartialEq)]
pub struct Room {
    pub id: i32,
    /// Unique across all rooms, compared case-sensitively
    pub room_number: String,
    pub room_type_id: i32,
    pub price_per_night: Decimal,
    pub capacity: i32,
    pub description: String,
    /// Cleared by staff to take the room out of sale
    pub is_available: bool,
    pub created_at: DateTime<Utc>,
}

impl Room {
    pub fn fits(&self, number_of_guests: i32) -> bool {
        number_of_guests <= self.capacity
    }
}

/// Highest nightly rate accepted for a room
pub const MAX_PRICE_PER_NIGHT: Decimal = Decimal::from_parts(100_000_000, 0, 0, false, 2);

/// Editable room fields, shared by create and update.
#[derive(Debug, Clone)]
pub struct RoomSpec {
    pub room_number: String,
    pub room_type_id: i32,
    pub price_per_night: Decimal,
    pub capacity: i32,
    pub description: String,
    pub is_available: bool,
}

impl RoomSpec {
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.room_number.trim().is_empty() {
            return Err(DomainError::Validation("Room number cannot be empty".into()));
        }
        if self.price_per_night <= Decimal::ZERO {
            return Err(DomainError::Validation(
                "Price per night must be positive".into(),
            ));
        }
        if self.price_per_night > MAX_PRICE_PER_NIGHT {
            return Err(DomainError::Validation(format!(
                "Price per night cannot exceed {}",
                MAX_PRICE_PER_NIGHT
            )));
        }
        if self.price_per_night.normalize().scale() > 2 {
            return Err(DomainError::Validation(
                "Price per night is limited to whole cents".into(),
            ));
        }
        if self.capacity < 1 {
            return Err(DomainError::Validation(
                "Capacity must be at least 1".into(),
            ));
        }
        Ok(())
    }

    pub fn into_room(self, id: i32, created_at: DateTime<Utc>) -> Room {
        Room {
            id,
            room_number: self.room_number,
            room_type_id: self.room_type_id,
            price_per_night: self.price_per_night,
            capacity: self.capacity,
            description: self.description,
            is_available: self.is_available,
            created_at,
        }
    }
}
