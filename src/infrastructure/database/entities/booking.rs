//! Booking entity

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "bookings")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub guest_id: i32,
    pub room_id: i32,
    pub check_in: Date,
    /// Exclusive end of the stay
    pub check_out: Date,
    pub number_of_guests: i32,
    pub total_price_cents: i64,

    /// Pending, Confirmed, CheckedIn, CheckedOut, Cancelled
    pub status: String,

    pub booked_at: DateTimeUtc,
    #[sea_orm(nullable)]
    pub special_requests: Option<String>,
    #[sea_orm(nullable)]
    pub checked_in_at: Option<DateTimeUtc>,
    #[sea_orm(nullable)]
    pub checked_out_at: Option<DateTimeUtc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::guest::Entity",
        from = "Column::GuestId",
        to = "super::guest::Column::Id"
    )]
    Guest,
    #[sea_orm(
        belongs_to = "super::room::Entity",
        from = "Column::RoomId",
        to = "super::room::Column::Id"
    )]
    Room,
}

impl Related<super::guest::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Guest.def()
    }
}

impl Related<super::room::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Room.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
