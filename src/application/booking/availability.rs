//! Availability checker
//!
//! Decides whether a room is free for a stay. A room is free when no
//! non-cancelled booking on it overlaps the half-open stay.

use std::collections::HashSet;
use std::sync::Arc;

use chrono::NaiveDate;

use crate::domain::{DomainError, DomainResult, RepositoryProvider, Room, StayPeriod};
use crate::shared::SharedClock;

pub struct AvailabilityService {
    repos: Arc<dyn RepositoryProvider>,
    clock: SharedClock,
}

impl AvailabilityService {
    pub fn new(repos: Arc<dyn RepositoryProvider>, clock: SharedClock) -> Self {
        Self { repos, clock }
    }

    /// Whether `room_id` has no live booking overlapping `period`.
    ///
    /// `exclude_booking_id` leaves one booking out of the scan so an
    /// existing booking can be re-validated against its own dates.
    pub async fn is_room_available(
        &self,
        room_id: i32,
        period: &StayPeriod,
        exclude_booking_id: Option<i32>,
    ) -> DomainResult<bool> {
        let clashes = self
            .repos
            .bookings()
            .find_overlapping(room_id, period, exclude_booking_id)
            .await?;
        Ok(clashes.is_empty())
    }

    /// Every room flagged for sale with no live booking in the window.
    pub async fn available_rooms(
        &self,
        check_in: NaiveDate,
        check_out: NaiveDate,
    ) -> DomainResult<Vec<Room>> {
        let period = StayPeriod::new(check_in, check_out)?;
        if period.check_in < self.clock.today() {
            return Err(DomainError::PastCheckIn(period.check_in));
        }

        let occupied: HashSet<i32> = self
            .repos
            .bookings()
            .find_occupied_room_ids(&period)
            .await?
            .into_iter()
            .collect();

        let rooms = self.repos.rooms().find_available_for_sale().await?;
        Ok(rooms
            .into_iter()
            .filter(|room| !occupied.contains(&room.id))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use chrono::Utc;
    use rust_decimal::Decimal;

    use super::*;
    use crate::application::fixtures::{date, hotel, room_spec};
    use crate::domain::{BookingStatus, NewBooking};
    use crate::shared::FixedClock;

    async fn book(repos: &dyn RepositoryProvider, room_id: i32, from: u32, to: u32) -> i32 {
        repos
            .bookings()
            .insert_if_available(NewBooking {
                guest_id: 1,
                room_id,
                period: StayPeriod::new(date(2024, 6, from), date(2024, 6, to)).unwrap(),
                number_of_guests: 1,
                total_price: Decimal::new(100, 0),
                status: BookingStatus::Confirmed,
                booked_at: Utc::now(),
                special_requests: None,
            })
            .await
            .unwrap()
            .id
    }

    fn stay(from: u32, to: u32) -> StayPeriod {
        StayPeriod::new(date(2024, 6, from), date(2024, 6, to)).unwrap()
    }

    #[tokio::test]
    async fn overlap_rule_is_half_open() {
        let repos: Arc<dyn RepositoryProvider> = hotel().await;
        book(repos.as_ref(), 1, 10, 12).await;
        let checker = AvailabilityService::new(repos, Arc::new(FixedClock::on(date(2024, 6, 1))));

        assert!(!checker.is_room_available(1, &stay(11, 13), None).await.unwrap());
        assert!(!checker.is_room_available(1, &stay(9, 11), None).await.unwrap());
        assert!(checker.is_room_available(1, &stay(12, 14), None).await.unwrap());
        assert!(checker.is_room_available(1, &stay(8, 10), None).await.unwrap());
        assert!(checker.is_room_available(2, &stay(10, 12), None).await.unwrap());
    }

    #[tokio::test]
    async fn excluded_booking_does_not_conflict_with_itself() {
        let repos: Arc<dyn RepositoryProvider> = hotel().await;
        let id = book(repos.as_ref(), 1, 10, 12).await;
        let checker = AvailabilityService::new(repos, Arc::new(FixedClock::on(date(2024, 6, 1))));

        assert!(!checker.is_room_available(1, &stay(10, 12), None).await.unwrap());
        assert!(checker
            .is_room_available(1, &stay(10, 13), Some(id))
            .await
            .unwrap());
    }

    #[tokio::test]
    async fn bulk_query_skips_booked_and_withdrawn_rooms() {
        let repos: Arc<dyn RepositoryProvider> = hotel().await;
        book(repos.as_ref(), 1, 10, 12).await;
        let mut withdrawn = room_spec("202", 2, 150, 2);
        withdrawn.is_available = false;
        repos.rooms().insert(withdrawn).await.unwrap();

        let checker = AvailabilityService::new(repos, Arc::new(FixedClock::on(date(2024, 6, 1))));
        let free: Vec<String> = checker
            .available_rooms(date(2024, 6, 11), date(2024, 6, 12))
            .await
            .unwrap()
            .into_iter()
            .map(|r| r.room_number)
            .collect();
        assert_eq!(free, vec!["102", "201"]);

        let later = checker
            .available_rooms(date(2024, 6, 12), date(2024, 6, 13))
            .await
            .unwrap();
        assert_eq!(later.len(), 3);
    }

    #[tokio::test]
    async fn cancelled_bookings_free_the_room() {
        let repos: Arc<dyn RepositoryProvider> = hotel().await;
        let id = book(repos.as_ref(), 1, 10, 12).await;
        let mut booking = repos.bookings().find_by_id(id).await.unwrap().unwrap();
        booking.status = BookingStatus::Cancelled;
        repos.bookings().update(booking).await.unwrap();

        let checker = AvailabilityService::new(repos, Arc::new(FixedClock::on(date(2024, 6, 1))));
        assert!(checker.is_room_available(1, &stay(10, 12), None).await.unwrap());
        assert_eq!(
            checker
                .available_rooms(date(2024, 6, 10), date(2024, 6, 12))
                .await
                .unwrap()
                .len(),
            3
        );
    }

    #[tokio::test]
    async fn bulk_query_validates_dates() {
        let repos: Arc<dyn RepositoryProvider> = hotel().await;
        let checker = AvailabilityService::new(repos, Arc::new(FixedClock::on(date(2024, 6, 10))));

        let err = checker
            .available_rooms(date(2024, 6, 12), date(2024, 6, 12))
            .await
            .unwrap_err();
        assert_eq!(err, DomainError::InvalidDateRange);

        let err = checker
            .available_rooms(date(2024, 6, 9), date(2024, 6, 12))
            .await
            .unwrap_err();
        assert_eq!(err, DomainError::PastCheckIn(date(2024, 6, 9)));
    }
}
