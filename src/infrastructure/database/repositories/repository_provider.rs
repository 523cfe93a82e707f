//! SeaORM implementation of RepositoryProvider

use sea_orm::DatabaseConnection;

use crate::domain::booking::BookingRepository;
use crate::domain::guest::GuestRepository;
use crate::domain::repositories::RepositoryProvider;
use crate::domain::room::{RoomRepository, RoomTypeRepository};
use crate::domain::user::UserRepositoryInterface;

use super::booking_repository::SeaOrmBookingRepository;
use super::guest_repository::SeaOrmGuestRepository;
use super::room_repository::{SeaOrmRoomRepository, SeaOrmRoomTypeRepository};
use super::user_repository::SeaOrmUserRepository;

/// Unified repository provider backed by SeaORM.
///
/// Holds one connection pool and exposes per-aggregate repository accessors.
///
/// ```ignore
/// let repos = SeaOrmRepositoryProvider::new(db.clone());
/// let room = repos.rooms().find_by_number("101").await?;
/// let booked = repos.bookings().find_occupied_room_ids(&period).await?;
/// ```
pub struct SeaOrmRepositoryProvider {
    guests: SeaOrmGuestRepository,
    rooms: SeaOrmRoomRepository,
    room_types: SeaOrmRoomTypeRepository,
    bookings: SeaOrmBookingRepository,
    users: SeaOrmUserRepository,
}

impl SeaOrmRepositoryProvider {
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            guests: SeaOrmGuestRepository::new(db.clone()),
            rooms: SeaOrmRoomRepository::new(db.clone()),
            room_types: SeaOrmRoomTypeRepository::new(db.clone()),
            bookings: SeaOrmBookingRepository::new(db.clone()),
            users: SeaOrmUserRepository::new(db),
        }
    }
}

impl RepositoryProvider for SeaOrmRepositoryProvider {
    fn guests(&self) -> &dyn GuestRepository {
        &self.guests
    }

    fn rooms(&self) -> &dyn RoomRepository {
        &self.rooms
    }

    fn room_types(&self) -> &dyn RoomTypeRepository {
        &self.room_types
    }

    fn bookings(&self) -> &dyn BookingRepository {
        &self.bookings
    }

    fn users(&self) -> &dyn UserRepositoryInterface {
        &self.users
    }
}
