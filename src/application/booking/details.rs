//! Booking read model for display

use std::collections::HashMap;

use crate::domain::{Booking, DomainResult, RepositoryProvider};

/// A booking joined with the names staff need to read it.
#[derive(Debug, Clone)]
pub struct BookingDetails {
    pub booking: Booking,
    pub guest_name: String,
    pub room_number: String,
    pub room_type_name: String,
    pub nights: i64,
}

/// Resolve guest and room names for `bookings`.
///
/// Deactivated guests are still resolved so historical bookings keep
/// their names.
pub async fn describe_bookings(
    repos: &dyn RepositoryProvider,
    bookings: Vec<Booking>,
) -> DomainResult<Vec<BookingDetails>> {
    let rooms: HashMap<i32, _> = repos
        .rooms()
        .find_all()
        .await?
        .into_iter()
        .map(|room| (room.id, room))
        .collect();
    let room_types: HashMap<i32, String> = repos
        .room_types()
        .find_all()
        .await?
        .into_iter()
        .map(|t| (t.id, t.name))
        .collect();

    let mut guest_names: HashMap<i32, String> = HashMap::new();
    let mut details = Vec::with_capacity(bookings.len());

    for booking in bookings {
        if !guest_names.contains_key(&booking.guest_id) {
            let name = repos
                .guests()
                .find_by_id(booking.guest_id)
                .await?
                .map(|g| g.full_name())
                .unwrap_or_default();
            guest_names.insert(booking.guest_id, name);
        }
        let guest_name = guest_names
            .get(&booking.guest_id)
            .cloned()
            .unwrap_or_default();

        let room = rooms.get(&booking.room_id);
        let room_number = room.map(|r| r.room_number.clone()).unwrap_or_default();
        let room_type_name = room
            .and_then(|r| room_types.get(&r.room_type_id))
            .cloned()
            .unwrap_or_default();

        details.push(BookingDetails {
            nights: booking.nights(),
            booking,
            guest_name,
            room_number,
            room_type_name,
        });
    }

    Ok(details)
}
