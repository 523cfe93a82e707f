//! Booking lifecycle manager
//!
//! Owns creation, status changes and cancellation of bookings plus the
//! daily arrival/departure reports. Creation and status updates report
//! their outcome as a [`BookingResponse`] instead of an error.

use std::sync::Arc;

use chrono::NaiveDate;
use tracing::{info, warn};

use super::availability::AvailabilityService;
use super::pricing::price_for_period;
use crate::domain::{
    Booking, BookingStatus, DomainError, DomainResult, NewBooking, RepositoryProvider,
    StayPeriod, TransitionPolicy,
};
use crate::shared::SharedClock;

/// Booking request as received from a caller
#[derive(Debug, Clone)]
pub struct CreateBooking {
    pub guest_id: i32,
    pub room_id: i32,
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
    pub number_of_guests: i32,
    pub special_requests: Option<String>,
}

/// Structured outcome of a create or status-update request
#[derive(Debug, Clone)]
pub struct BookingResponse {
    pub success: bool,
    pub message: String,
    pub booking: Option<Booking>,
    pub errors: Vec<String>,
    /// The rejected rule, when `success` is false
    pub error: Option<DomainError>,
}

impl BookingResponse {
    fn accepted(message: impl Into<String>, booking: Booking) -> Self {
        Self {
            success: true,
            message: message.into(),
            booking: Some(booking),
            errors: Vec::new(),
            error: None,
        }
    }

    fn rejected(message: impl Into<String>, error: DomainError) -> Self {
        Self {
            success: false,
            message: message.into(),
            booking: None,
            errors: vec![error.to_string()],
            error: Some(error),
        }
    }

    pub fn error_kind(&self) -> Option<&'static str> {
        self.error.as_ref().map(DomainError::kind)
    }
}

pub struct BookingService {
    repos: Arc<dyn RepositoryProvider>,
    availability: AvailabilityService,
    clock: SharedClock,
    policy: TransitionPolicy,
}

impl BookingService {
    pub fn new(
        repos: Arc<dyn RepositoryProvider>,
        clock: SharedClock,
        policy: TransitionPolicy,
    ) -> Self {
        Self {
            availability: AvailabilityService::new(repos.clone(), clock.clone()),
            repos,
            clock,
            policy,
        }
    }

    pub fn policy(&self) -> TransitionPolicy {
        self.policy
    }

    pub fn availability(&self) -> &AvailabilityService {
        &self.availability
    }

    // ── Lifecycle ───────────────────────────────────────────────

    /// Validate, price and persist a booking in status Confirmed.
    ///
    /// Nothing is persisted unless every rule passes.
    pub async fn create_booking(&self, request: CreateBooking) -> BookingResponse {
        let guest_id = request.guest_id;
        let room_id = request.room_id;

        match self.try_create(request).await {
            Ok(booking) => {
                metrics::counter!("bookings_created_total").increment(1);
                info!(
                    booking_id = booking.id,
                    guest_id,
                    room_id,
                    check_in = %booking.check_in,
                    check_out = %booking.check_out,
                    total_price = %booking.total_price,
                    "Booking created"
                );
                BookingResponse::accepted("Booking created successfully", booking)
            }
            Err(e) => {
                metrics::counter!("bookings_rejected_total", "reason" => e.kind()).increment(1);
                warn!(guest_id, room_id, reason = e.kind(), error = %e, "Booking rejected");
                BookingResponse::rejected("Booking was not created", e)
            }
        }
    }

    async fn try_create(&self, request: CreateBooking) -> DomainResult<Booking> {
        let period = StayPeriod::new(request.check_in, request.check_out)?;
        if period.check_in < self.clock.today() {
            return Err(DomainError::PastCheckIn(period.check_in));
        }

        let guest = self
            .repos
            .guests()
            .find_active_by_id(request.guest_id)
            .await?
            .ok_or(DomainError::GuestNotFound(request.guest_id))?;

        let room = self
            .repos
            .rooms()
            .find_by_id(request.room_id)
            .await?
            .ok_or(DomainError::RoomNotFound(request.room_id))?;

        if !self
            .availability
            .is_room_available(room.id, &period, None)
            .await?
        {
            return Err(DomainError::RoomUnavailable {
                room_id: room.id,
                check_in: period.check_in,
                check_out: period.check_out,
            });
        }

        if request.number_of_guests < 1 {
            return Err(DomainError::Validation(
                "Number of guests must be at least 1".into(),
            ));
        }
        if !room.fits(request.number_of_guests) {
            return Err(DomainError::CapacityExceeded {
                capacity: room.capacity,
                requested: request.number_of_guests,
            });
        }

        let booking = NewBooking {
            guest_id: guest.id,
            room_id: room.id,
            period,
            number_of_guests: request.number_of_guests,
            total_price: price_for_period(room.price_per_night, &period)?,
            status: BookingStatus::Confirmed,
            booked_at: self.clock.now(),
            special_requests: request.special_requests,
        };

        // The repository repeats the overlap check inside its commit unit.
        self.repos.bookings().insert_if_available(booking).await
    }

    /// Set a booking's status, stamping arrival/departure times.
    pub async fn update_booking_status(&self, id: i32, status: BookingStatus) -> BookingResponse {
        match self.try_update_status(id, status).await {
            Ok(booking) => BookingResponse::accepted(
                format!("Booking status changed to: {}", status),
                booking,
            ),
            Err(e) => {
                warn!(booking_id = id, status = %status, error = %e, "Status update rejected");
                BookingResponse::rejected("Booking status was not changed", e)
            }
        }
    }

    async fn try_update_status(&self, id: i32, status: BookingStatus) -> DomainResult<Booking> {
        let mut booking = self
            .repos
            .bookings()
            .find_by_id(id)
            .await?
            .ok_or(DomainError::BookingNotFound(id))?;

        let previous = booking.status;
        self.policy.check(previous, status)?;

        booking.apply_status(status, self.clock.now());
        let booking = if !previous.holds_room() && status.holds_room() {
            self.reclaim_room(booking).await?
        } else {
            self.repos.bookings().update(booking).await?
        };

        metrics::counter!("booking_status_changes_total", "status" => status.as_str())
            .increment(1);
        info!(booking_id = id, from = %previous, to = %status, "Booking status changed");
        Ok(booking)
    }

    /// A cancelled booking that becomes live again must not overlap a
    /// booking made for its room in the meantime.
    async fn reclaim_room(&self, booking: Booking) -> DomainResult<Booking> {
        let period = booking.period();
        if !self
            .availability
            .is_room_available(booking.room_id, &period, Some(booking.id))
            .await?
        {
            return Err(DomainError::RoomUnavailable {
                room_id: booking.room_id,
                check_in: period.check_in,
                check_out: period.check_out,
            });
        }
        // The repository repeats the check inside its commit unit.
        self.repos.bookings().update_if_available(booking).await
    }

    /// Mark a booking Cancelled, keeping the row. `Ok(false)` when absent.
    pub async fn cancel_booking(&self, id: i32) -> DomainResult<bool> {
        let Some(mut booking) = self.repos.bookings().find_by_id(id).await? else {
            return Ok(false);
        };

        let previous = booking.status;
        self.policy.check(previous, BookingStatus::Cancelled)?;

        booking.apply_status(BookingStatus::Cancelled, self.clock.now());
        self.repos.bookings().update(booking).await?;

        metrics::counter!("booking_status_changes_total", "status" => "Cancelled").increment(1);
        info!(booking_id = id, from = %previous, "Booking cancelled");
        Ok(true)
    }

    // ── Queries ─────────────────────────────────────────────────

    pub async fn list_bookings(&self) -> DomainResult<Vec<Booking>> {
        self.repos.bookings().find_all().await
    }

    pub async fn get_booking(&self, id: i32) -> DomainResult<Option<Booking>> {
        self.repos.bookings().find_by_id(id).await
    }

    pub async fn bookings_for_guest(&self, guest_id: i32) -> DomainResult<Vec<Booking>> {
        self.repos.bookings().find_by_guest(guest_id).await
    }

    /// Confirmed bookings arriving today
    pub async fn today_check_ins(&self) -> DomainResult<Vec<Booking>> {
        let today = self.clock.today();
        let bookings = self.repos.bookings().find_all().await?;
        Ok(bookings
            .into_iter()
            .filter(|b| b.check_in == today && b.status == BookingStatus::Confirmed)
            .collect())
    }

    /// Confirmed or checked-in bookings departing today
    pub async fn today_check_outs(&self) -> DomainResult<Vec<Booking>> {
        let today = self.clock.today();
        let bookings = self.repos.bookings().find_all().await?;
        Ok(bookings
            .into_iter()
            .filter(|b| {
                b.check_out == today
                    && matches!(b.status, BookingStatus::Confirmed | BookingStatus::CheckedIn)
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use chrono::Duration;
    use rust_decimal::Decimal;

    use super::*;
    use crate::application::booking::describe_bookings;
    use crate::application::fixtures::{date, hotel, ManualClock};
    use crate::shared::{Clock, FixedClock};

    const ROOM_101: i32 = 1;
    const ROOM_201: i32 = 3;
    const IVAN: i32 = 1;
    const MARIA: i32 = 2;

    async fn service_on(today: NaiveDate, policy: TransitionPolicy) -> BookingService {
        let repos: Arc<dyn RepositoryProvider> = hotel().await;
        BookingService::new(repos, Arc::new(FixedClock::on(today)), policy)
    }

    async fn service() -> BookingService {
        service_on(date(2024, 6, 1), TransitionPolicy::Permissive).await
    }

    fn request(room_id: i32, check_in: NaiveDate, check_out: NaiveDate, guests: i32) -> CreateBooking {
        CreateBooking {
            guest_id: IVAN,
            room_id,
            check_in,
            check_out,
            number_of_guests: guests,
            special_requests: None,
        }
    }

    #[tokio::test]
    async fn shared_boundary_day_is_bookable() {
        let service = service().await;

        let first = service
            .create_booking(request(ROOM_101, date(2024, 6, 10), date(2024, 6, 12), 2))
            .await;
        assert!(first.success, "{:?}", first.errors);

        let clash = service
            .create_booking(request(ROOM_101, date(2024, 6, 11), date(2024, 6, 13), 1))
            .await;
        assert!(!clash.success);
        assert_eq!(clash.error_kind(), Some("RoomUnavailable"));
        assert!(clash.booking.is_none());
        assert_eq!(clash.errors.len(), 1);

        let next = service
            .create_booking(request(ROOM_101, date(2024, 6, 12), date(2024, 6, 14), 2))
            .await;
        assert!(next.success);
        let booking = next.booking.unwrap();
        assert_eq!(booking.total_price, Decimal::new(200, 0));
        assert_eq!(booking.status, BookingStatus::Confirmed);
    }

    #[tokio::test]
    async fn created_booking_carries_request_and_clock() {
        let service = service().await;
        let mut req = request(ROOM_201, date(2024, 6, 5), date(2024, 6, 8), 3);
        req.special_requests = Some("Late arrival".into());

        let booking = service.create_booking(req).await.booking.unwrap();
        assert_eq!(booking.total_price, Decimal::new(450, 0));
        assert_eq!(booking.number_of_guests, 3);
        assert_eq!(booking.special_requests.as_deref(), Some("Late arrival"));
        assert_eq!(booking.booked_at.date_naive(), date(2024, 6, 1));
        assert!(booking.checked_in_at.is_none());
    }

    #[tokio::test]
    async fn over_capacity_creates_nothing() {
        let service = service().await;
        let response = service
            .create_booking(request(ROOM_101, date(2024, 6, 10), date(2024, 6, 12), 3))
            .await;

        assert_eq!(
            response.error,
            Some(DomainError::CapacityExceeded {
                capacity: 2,
                requested: 3
            })
        );
        assert!(service.list_bookings().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn date_rules_are_checked_first() {
        let service = service().await;
        let today = date(2024, 6, 1);

        let same_day = service.create_booking(request(ROOM_101, today, today, 1)).await;
        assert_eq!(same_day.error_kind(), Some("InvalidDateRange"));

        let inverted = service
            .create_booking(request(ROOM_101, date(2024, 6, 5), date(2024, 6, 3), 1))
            .await;
        assert_eq!(inverted.error_kind(), Some("InvalidDateRange"));

        // unknown room is not reached while the dates are wrong
        let yesterday = service
            .create_booking(request(999, date(2024, 5, 31), date(2024, 6, 2), 1))
            .await;
        assert_eq!(yesterday.error_kind(), Some("PastCheckIn"));

        let from_today = service
            .create_booking(request(ROOM_101, today, date(2024, 6, 2), 1))
            .await;
        assert!(from_today.success);
    }

    #[tokio::test]
    async fn unknown_or_inactive_guest_and_unknown_room() {
        let repos: Arc<dyn RepositoryProvider> = hotel().await;
        repos.guests().deactivate(MARIA).await.unwrap();
        let service = BookingService::new(
            repos,
            Arc::new(FixedClock::on(date(2024, 6, 1))),
            TransitionPolicy::Permissive,
        );

        let mut req = request(ROOM_101, date(2024, 6, 10), date(2024, 6, 12), 1);
        req.guest_id = MARIA;
        assert_eq!(
            service.create_booking(req.clone()).await.error,
            Some(DomainError::GuestNotFound(MARIA))
        );

        req.guest_id = 42;
        assert_eq!(
            service.create_booking(req.clone()).await.error_kind(),
            Some("GuestNotFound")
        );

        req.guest_id = IVAN;
        req.room_id = 999;
        assert_eq!(
            service.create_booking(req).await.error,
            Some(DomainError::RoomNotFound(999))
        );
    }

    #[tokio::test]
    async fn availability_is_reported_before_capacity() {
        let service = service().await;
        service
            .create_booking(request(ROOM_101, date(2024, 6, 10), date(2024, 6, 12), 1))
            .await;
        let response = service
            .create_booking(request(ROOM_101, date(2024, 6, 10), date(2024, 6, 12), 5))
            .await;
        assert_eq!(response.error_kind(), Some("RoomUnavailable"));
    }

    #[tokio::test]
    async fn no_two_live_bookings_overlap() {
        let service = service().await;
        for start in 2..20u32 {
            for len in 1..4u32 {
                service
                    .create_booking(request(
                        ROOM_101,
                        date(2024, 6, start),
                        date(2024, 6, start + len),
                        1,
                    ))
                    .await;
            }
        }

        let live: Vec<Booking> = service
            .list_bookings()
            .await
            .unwrap()
            .into_iter()
            .filter(|b| b.status.holds_room())
            .collect();
        assert!(!live.is_empty());
        for (i, a) in live.iter().enumerate() {
            for b in &live[i + 1..] {
                assert!(
                    !(a.check_in < b.check_out && a.check_out > b.check_in),
                    "{:?} overlaps {:?}",
                    a.period(),
                    b.period()
                );
            }
        }
    }

    #[tokio::test]
    async fn check_in_stamp_is_overwritten_on_repeat() {
        let repos: Arc<dyn RepositoryProvider> = hotel().await;
        let clock = ManualClock::on(date(2024, 6, 1));
        let service = BookingService::new(repos, clock.clone(), TransitionPolicy::Permissive);

        let id = service
            .create_booking(request(ROOM_101, date(2024, 6, 1), date(2024, 6, 3), 2))
            .await
            .booking
            .unwrap()
            .id;

        let first = service
            .update_booking_status(id, BookingStatus::CheckedIn)
            .await;
        assert!(first.success);
        assert_eq!(first.message, "Booking status changed to: CheckedIn");
        let first_at = first.booking.unwrap().checked_in_at.unwrap();
        assert_eq!(first_at, clock.now());

        clock.advance(Duration::hours(2));
        let again = service
            .update_booking_status(id, BookingStatus::CheckedIn)
            .await
            .booking
            .unwrap();
        assert_eq!(again.status, BookingStatus::CheckedIn);
        assert_eq!(again.checked_in_at, Some(first_at + Duration::hours(2)));
        assert!(again.checked_out_at.is_none());

        let out = service
            .update_booking_status(id, BookingStatus::CheckedOut)
            .await
            .booking
            .unwrap();
        assert_eq!(out.checked_out_at, Some(clock.now()));
        assert_eq!(out.checked_in_at, again.checked_in_at);
    }

    #[tokio::test]
    async fn status_update_of_missing_booking() {
        let service = service().await;
        let response = service
            .update_booking_status(77, BookingStatus::Confirmed)
            .await;
        assert!(!response.success);
        assert_eq!(response.error, Some(DomainError::BookingNotFound(77)));
    }

    #[tokio::test]
    async fn permissive_policy_reopens_cancelled_booking() {
        let service = service().await;
        let id = service
            .create_booking(request(ROOM_101, date(2024, 6, 10), date(2024, 6, 12), 1))
            .await
            .booking
            .unwrap()
            .id;
        assert!(service.cancel_booking(id).await.unwrap());
        let response = service
            .update_booking_status(id, BookingStatus::Confirmed)
            .await;
        assert!(response.success);
    }

    #[tokio::test]
    async fn reopening_cancelled_booking_respects_newer_booking() {
        let service = service().await;
        let stay = (date(2024, 6, 10), date(2024, 6, 12));
        let first = service
            .create_booking(request(ROOM_101, stay.0, stay.1, 1))
            .await
            .booking
            .unwrap()
            .id;
        assert!(service.cancel_booking(first).await.unwrap());

        let mut req = request(ROOM_101, stay.0, stay.1, 1);
        req.guest_id = MARIA;
        assert!(service.create_booking(req).await.success);

        for status in [
            BookingStatus::Confirmed,
            BookingStatus::CheckedIn,
            BookingStatus::CheckedOut,
            BookingStatus::Pending,
        ] {
            let reopen = service.update_booking_status(first, status).await;
            assert!(!reopen.success, "{} reopened an overlapping stay", status);
            assert_eq!(reopen.error_kind(), Some("RoomUnavailable"));
        }

        let stored = service.get_booking(first).await.unwrap().unwrap();
        assert_eq!(stored.status, BookingStatus::Cancelled);
        let live = service
            .list_bookings()
            .await
            .unwrap()
            .into_iter()
            .filter(|b| b.status.holds_room())
            .count();
        assert_eq!(live, 1);

        // a live booking is not checked against itself
        let checked_in = service
            .update_booking_status(first + 1, BookingStatus::CheckedIn)
            .await;
        assert!(checked_in.success);
    }

    #[tokio::test]
    async fn cancel_then_rebook_same_stay() {
        let service = service().await;
        let stay = (date(2024, 6, 10), date(2024, 6, 12));
        let id = service
            .create_booking(request(ROOM_101, stay.0, stay.1, 2))
            .await
            .booking
            .unwrap()
            .id;

        assert!(service.cancel_booking(id).await.unwrap());
        let cancelled = service.get_booking(id).await.unwrap().unwrap();
        assert_eq!(cancelled.status, BookingStatus::Cancelled);

        let again = service
            .create_booking(request(ROOM_101, stay.0, stay.1, 2))
            .await;
        assert!(again.success);
        assert_eq!(service.list_bookings().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn cancel_missing_booking_reports_false() {
        let service = service().await;
        assert!(!service.cancel_booking(5).await.unwrap());
    }

    #[tokio::test]
    async fn strict_policy_guards_transitions() {
        let service = service_on(date(2024, 6, 1), TransitionPolicy::Strict).await;
        let id = service
            .create_booking(request(ROOM_101, date(2024, 6, 1), date(2024, 6, 3), 1))
            .await
            .booking
            .unwrap()
            .id;

        let same = service
            .update_booking_status(id, BookingStatus::Confirmed)
            .await;
        assert_eq!(same.error_kind(), Some("InvalidStatusTransition"));

        let skip = service
            .update_booking_status(id, BookingStatus::CheckedOut)
            .await;
        assert_eq!(skip.error_kind(), Some("InvalidStatusTransition"));

        assert!(service.update_booking_status(id, BookingStatus::CheckedIn).await.success);
        assert!(service.update_booking_status(id, BookingStatus::CheckedOut).await.success);

        let err = service.cancel_booking(id).await.unwrap_err();
        assert_eq!(
            err,
            DomainError::InvalidStatusTransition {
                from: "CheckedOut".into(),
                to: "Cancelled".into()
            }
        );
        let stored = service.get_booking(id).await.unwrap().unwrap();
        assert_eq!(stored.status, BookingStatus::CheckedOut);
    }

    #[tokio::test]
    async fn strict_policy_keeps_cancelled_closed() {
        let service = service_on(date(2024, 6, 1), TransitionPolicy::Strict).await;
        let id = service
            .create_booking(request(ROOM_101, date(2024, 6, 10), date(2024, 6, 12), 1))
            .await
            .booking
            .unwrap()
            .id;
        assert!(service.cancel_booking(id).await.unwrap());

        let reopen = service
            .update_booking_status(id, BookingStatus::Confirmed)
            .await;
        assert!(!reopen.success);
        assert_eq!(reopen.error_kind(), Some("InvalidStatusTransition"));
        assert!(service.cancel_booking(id).await.is_err());
    }

    #[tokio::test]
    async fn todays_arrivals_and_departures() {
        let repos: Arc<dyn RepositoryProvider> = hotel().await;
        let clock = ManualClock::on(date(2024, 6, 1));
        let service = BookingService::new(repos, clock.clone(), TransitionPolicy::Permissive);

        let arriving = service
            .create_booking(request(ROOM_101, date(2024, 6, 3), date(2024, 6, 5), 1))
            .await
            .booking
            .unwrap();
        let staying = service
            .create_booking(request(2, date(2024, 6, 1), date(2024, 6, 3), 1))
            .await
            .booking
            .unwrap();
        let leaving = service
            .create_booking(request(ROOM_201, date(2024, 6, 2), date(2024, 6, 3), 1))
            .await
            .booking
            .unwrap();
        let cancelled = service
            .create_booking(request(ROOM_201, date(2024, 6, 3), date(2024, 6, 4), 1))
            .await
            .booking
            .unwrap();

        service
            .update_booking_status(staying.id, BookingStatus::CheckedIn)
            .await;
        service.cancel_booking(cancelled.id).await.unwrap();

        clock.advance(Duration::days(2));
        assert_eq!(clock.today(), date(2024, 6, 3));

        let check_ins: Vec<i32> = service
            .today_check_ins()
            .await
            .unwrap()
            .iter()
            .map(|b| b.id)
            .collect();
        assert_eq!(check_ins, vec![arriving.id]);

        let check_outs: Vec<i32> = service
            .today_check_outs()
            .await
            .unwrap()
            .iter()
            .map(|b| b.id)
            .collect();
        assert_eq!(check_outs, vec![staying.id, leaving.id]);

        // checked-out bookings drop off the departure list
        service
            .update_booking_status(leaving.id, BookingStatus::CheckedOut)
            .await;
        assert_eq!(service.today_check_outs().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn bookings_by_guest_and_details() {
        let repos: Arc<dyn RepositoryProvider> = hotel().await;
        let service = BookingService::new(
            repos.clone(),
            Arc::new(FixedClock::on(date(2024, 6, 1))),
            TransitionPolicy::Permissive,
        );

        let mut req = request(ROOM_201, date(2024, 6, 10), date(2024, 6, 13), 2);
        req.guest_id = MARIA;
        service.create_booking(req).await;
        service
            .create_booking(request(ROOM_101, date(2024, 6, 10), date(2024, 6, 11), 1))
            .await;

        let marias = service.bookings_for_guest(MARIA).await.unwrap();
        assert_eq!(marias.len(), 1);

        repos.guests().deactivate(MARIA).await.unwrap();
        let details = describe_bookings(repos.as_ref(), marias).await.unwrap();
        assert_eq!(details[0].guest_name, "Maria Sidorova");
        assert_eq!(details[0].room_number, "201");
        assert_eq!(details[0].room_type_name, "Junior Suite");
        assert_eq!(details[0].nights, 3);
    }
}
