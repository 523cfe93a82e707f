//! Room DTOs

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::domain::{Room, RoomSpec};

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct RoomDto {
    pub id: i32,
    pub room_number: String,
    pub room_type_id: i32,
    /// Decimal string, e.g. `"150.00"`
    pub price_per_night: Decimal,
    pub capacity: i32,
    pub description: String,
    pub is_available: bool,
    pub created_at: DateTime<Utc>,
}

impl From<Room> for RoomDto {
    fn from(r: Room) -> Self {
        Self {
            id: r.id,
            room_number: r.room_number,
            room_type_id: r.room_type_id,
            price_per_night: r.price_per_night,
            capacity: r.capacity,
            description: r.description,
            is_available: r.is_available,
            created_at: r.created_at,
        }
    }
}

/// Create / update room request
///
/// Price and capacity bounds are enforced by the room directory.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct RoomRequest {
    #[validate(length(min = 1, max = 10, message = "room number must be 1-10 characters"))]
    pub room_number: String,
    pub room_type_id: i32,
    pub price_per_night: Decimal,
    pub capacity: i32,
    #[serde(default)]
    #[validate(length(max = 500))]
    pub description: String,
    #[serde(default = "default_available")]
    pub is_available: bool,
}

fn default_available() -> bool {
    true
}

impl From<RoomRequest> for RoomSpec {
    fn from(r: RoomRequest) -> Self {
        Self {
            room_number: r.room_number,
            room_type_id: r.room_type_id,
            price_per_night: r.price_per_night,
            capacity: r.capacity,
            description: r.description,
            is_available: r.is_available,
        }
    }
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct AvailabilityParams {
    /// Arrival date (YYYY-MM-DD)
    pub check_in: NaiveDate,
    /// Departure date (YYYY-MM-DD), exclusive
    pub check_out: NaiveDate,
}
