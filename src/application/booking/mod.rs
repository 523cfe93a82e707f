//! Booking lifecycle, availability and pricing

mod availability;
mod details;
mod pricing;
mod service;

pub use availability::AvailabilityService;
pub use details::{describe_bookings, BookingDetails};
pub use pricing::{calculate_total_price, price_for_period};
pub use service::{BookingResponse, BookingService, CreateBooking};
