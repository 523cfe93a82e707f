//! Application layer: use cases over the domain repositories

pub mod booking;
pub mod directory;
pub mod identity;

#[cfg(test)]
pub(crate) mod fixtures;

// Re-export key types for convenience
pub use booking::{
    calculate_total_price, describe_bookings, AvailabilityService, BookingDetails,
    BookingResponse, BookingService, CreateBooking,
};
pub use directory::{GuestService, RoomService, RoomTypeService};
pub use identity::{AuthResult, UserService};
