//! Booking aggregate
//!
//! Contains the Booking entity, the stay period value type, the status
//! machine and the repository interface.

pub mod model;
pub mod repository;

pub use model::{Booking, BookingStatus, NewBooking, StayPeriod, TransitionPolicy};
pub use repository::BookingRepository;
