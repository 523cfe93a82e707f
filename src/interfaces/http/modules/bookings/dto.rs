//! Booking DTOs

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::application::{BookingDetails, BookingResponse, CreateBooking};
use crate::domain::Booking;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct BookingDto {
    pub id: i32,
    pub guest_id: i32,
    pub room_id: i32,
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
    pub number_of_guests: i32,
    /// Decimal string, e.g. `"300.00"`
    pub total_price: Decimal,
    /// Pending, Confirmed, CheckedIn, CheckedOut or Cancelled
    pub status: String,
    pub booked_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub special_requests: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub checked_in_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub checked_out_at: Option<DateTime<Utc>>,
}

impl From<Booking> for BookingDto {
    fn from(b: Booking) -> Self {
        Self {
            id: b.id,
            guest_id: b.guest_id,
            room_id: b.room_id,
            check_in: b.check_in,
            check_out: b.check_out,
            number_of_guests: b.number_of_guests,
            total_price: b.total_price,
            status: b.status.as_str().to_string(),
            booked_at: b.booked_at,
            special_requests: b.special_requests,
            checked_in_at: b.checked_in_at,
            checked_out_at: b.checked_out_at,
        }
    }
}

/// Booking with the names staff read it by
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct BookingDetailsDto {
    #[serde(flatten)]
    pub booking: BookingDto,
    pub guest_name: String,
    pub room_number: String,
    pub room_type_name: String,
    pub nights: i64,
}

impl From<BookingDetails> for BookingDetailsDto {
    fn from(d: BookingDetails) -> Self {
        Self {
            booking: d.booking.into(),
            guest_name: d.guest_name,
            room_number: d.room_number,
            room_type_name: d.room_type_name,
            nights: d.nights,
        }
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateBookingRequest {
    pub guest_id: i32,
    pub room_id: i32,
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
    pub number_of_guests: i32,
    #[validate(length(max = 500))]
    pub special_requests: Option<String>,
}

impl From<CreateBookingRequest> for CreateBooking {
    fn from(r: CreateBookingRequest) -> Self {
        Self {
            guest_id: r.guest_id,
            room_id: r.room_id,
            check_in: r.check_in,
            check_out: r.check_out,
            number_of_guests: r.number_of_guests,
            special_requests: r.special_requests.filter(|s| !s.trim().is_empty()),
        }
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateStatusRequest {
    /// Pending, Confirmed, CheckedIn, CheckedOut or Cancelled
    #[validate(length(min = 1, message = "status is required"))]
    pub status: String,
}

/// Outcome of a create or status-update request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct BookingResponseDto {
    pub success: bool,
    pub message: String,
    pub booking: Option<BookingDto>,
    pub errors: Vec<String>,
    /// Machine-readable rule that rejected the request
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_kind: Option<String>,
}

impl From<BookingResponse> for BookingResponseDto {
    fn from(r: BookingResponse) -> Self {
        Self {
            error_kind: r.error_kind().map(str::to_string),
            success: r.success,
            message: r.message,
            booking: r.booking.map(BookingDto::from),
            errors: r.errors,
        }
    }
}
