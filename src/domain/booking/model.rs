//! Booking domain entity

use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::shared::errors::DomainError;

/// Booking lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BookingStatus {
    Pending,
    Confirmed,
    CheckedIn,
    CheckedOut,
    Cancelled,
}

impl BookingStatus {
    pub const ALL: [BookingStatus; 5] = [
        Self::Pending,
        Self::Confirmed,
        Self::CheckedIn,
        Self::CheckedOut,
        Self::Cancelled,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::Confirmed => "Confirmed",
            Self::CheckedIn => "CheckedIn",
            Self::CheckedOut => "CheckedOut",
            Self::Cancelled => "Cancelled",
        }
    }

    /// CheckedOut and Cancelled accept no further transitions.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::CheckedOut | Self::Cancelled)
    }

    /// Whether a booking in this status still occupies its room.
    pub fn holds_room(&self) -> bool {
        *self != Self::Cancelled
    }

    /// Fixed transition table used by [`TransitionPolicy::Strict`].
    pub fn can_transition_to(&self, next: BookingStatus) -> bool {
        use BookingStatus::*;
        matches!(
            (self, next),
            (Pending, Confirmed)
                | (Pending, CheckedIn)
                | (Confirmed, CheckedIn)
                | (CheckedIn, CheckedOut)
                | (Pending, Cancelled)
                | (Confirmed, Cancelled)
                | (CheckedIn, Cancelled)
        )
    }
}

impl FromStr for BookingStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| DomainError::Validation(format!("Unknown booking status: {}", s)))
    }
}

impl std::fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// How status updates are checked against the transition table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransitionPolicy {
    /// Any status may be set from any status (staff override).
    #[default]
    Permissive,
    /// Only transitions in [`BookingStatus::can_transition_to`] are accepted.
    Strict,
}

impl TransitionPolicy {
    pub fn check(&self, from: BookingStatus, to: BookingStatus) -> Result<(), DomainError> {
        match self {
            Self::Permissive => Ok(()),
            Self::Strict if from.can_transition_to(to) => Ok(()),
            Self::Strict => Err(DomainError::InvalidStatusTransition {
                from: from.to_string(),
                to: to.to_string(),
            }),
        }
    }
}

/// Half-open stay `[check_in, check_out)` counted in whole nights.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StayPeriod {
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
}

impl StayPeriod {
    /// Fails with `InvalidDateRange` unless `check_in < check_out`.
    pub fn new(check_in: NaiveDate, check_out: NaiveDate) -> Result<Self, DomainError> {
        if check_in >= check_out {
            return Err(DomainError::InvalidDateRange);
        }
        Ok(Self {
            check_in,
            check_out,
        })
    }

    pub fn nights(&self) -> i64 {
        (self.check_out - self.check_in).num_days()
    }

    /// A departure on day N and an arrival on day N do not overlap.
    pub fn overlaps(&self, other: &StayPeriod) -> bool {
        self.check_in < other.check_out && other.check_in < self.check_out
    }
}

/// Room reservation for a guest
#[derive(Debug, Clone, PartialEq)]
pub struct Booking {
    pub id: i32,
    pub guest_id: i32,
    pub room_id: i32,
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
    pub number_of_guests: i32,
    pub total_price: Decimal,
    pub status: BookingStatus,
    pub booked_at: DateTime<Utc>,
    pub special_requests: Option<String>,
    pub checked_in_at: Option<DateTime<Utc>>,
    pub checked_out_at: Option<DateTime<Utc>>,
}

impl Booking {
    pub fn period(&self) -> StayPeriod {
        StayPeriod {
            check_in: self.check_in,
            check_out: self.check_out,
        }
    }

    pub fn nights(&self) -> i64 {
        self.period().nights()
    }

    /// Whether this booking blocks `period` on its room.
    pub fn conflicts_with(&self, period: &StayPeriod) -> bool {
        self.status.holds_room() && self.period().overlaps(period)
    }

    /// Set `status`, stamping actual arrival/departure times.
    pub fn apply_status(&mut self, status: BookingStatus, at: DateTime<Utc>) {
        self.status = status;
        match status {
            BookingStatus::CheckedIn => self.checked_in_at = Some(at),
            BookingStatus::CheckedOut => self.checked_out_at = Some(at),
            _ => {}
        }
    }
}

/// A validated, priced booking that has not been persisted yet.
#[derive(Debug, Clone)]
pub struct NewBooking {
    pub guest_id: i32,
    pub room_id: i32,
    pub period: StayPeriod,
    pub number_of_guests: i32,
    pub total_price: Decimal,
    pub status: BookingStatus,
    pub booked_at: DateTime<Utc>,
    pub special_requests: Option<String>,
}

impl NewBooking {
    pub fn into_booking(self, id: i32) -> Booking {
        Booking {
            id,
            guest_id: self.guest_id,
            room_id: self.room_id,
            check_in: self.period.check_in,
            check_out: self.period.check_out,
            number_of_guests: self.number_of_guests,
            total_price: self.total_price,
            status: self.status,
            booked_at: self.booked_at,
            special_requests: self.special_requests,
            checked_in_at: None,
            checked_out_at: None,
        }
    }
}

// ── Tests ──────────────────────────────────────────────────────
