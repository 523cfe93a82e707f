//! Booking repository interface

use async_trait::async_trait;

use super::model::{Booking, NewBooking, StayPeriod};
use crate::domain::DomainResult;

#[async_trait]
pub trait BookingRepository: Send + Sync {
    /// Find booking by ID
    async fn find_by_id(&self, id: i32) -> DomainResult<Option<Booking>>;

    /// Find all bookings (any status)
    async fn find_all(&self) -> DomainResult<Vec<Booking>>;

    /// Find all bookings made for a guest
    async fn find_by_guest(&self, guest_id: i32) -> DomainResult<Vec<Booking>>;

    /// Non-cancelled bookings on `room_id` overlapping `period`,
    /// leaving out `exclude_booking_id` when given.
    async fn find_overlapping(
        &self,
        room_id: i32,
        period: &StayPeriod,
        exclude_booking_id: Option<i32>,
    ) -> DomainResult<Vec<Booking>>;

    /// IDs of every room holding a non-cancelled booking overlapping `period`.
    async fn find_occupied_room_ids(&self, period: &StayPeriod) -> DomainResult<Vec<i32>>;

    /// Whether any booking (any status) references the room.
    async fn exists_for_room(&self, room_id: i32) -> DomainResult<bool>;

    /// Re-check the room for overlaps and insert in one atomic unit.
    ///
    /// Fails with `RoomUnavailable` and persists nothing when a
    /// non-cancelled booking overlaps the new stay.
    async fn insert_if_available(&self, booking: NewBooking) -> DomainResult<Booking>;

    /// Persist status and audit timestamps of an existing booking
    async fn update(&self, booking: Booking) -> DomainResult<Booking>;

    /// Re-check the room, ignoring the booking itself, and persist the
    /// update in one atomic unit. Used when a booking starts holding its
    /// room again.
    ///
    /// Fails with `RoomUnavailable` and changes nothing when another
    /// non-cancelled booking overlaps the stay.
    async fn update_if_available(&self, booking: Booking) -> DomainResult<Booking>;
}
