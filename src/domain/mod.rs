pub mod booking;
pub mod guest;
pub mod repositories;
pub mod room;
pub mod user;

// Re-export commonly used types
pub use booking::{Booking, BookingStatus, NewBooking, StayPeriod, TransitionPolicy};
pub use guest::{Guest, GuestProfile};
pub use repositories::{DomainResult, RepositoryProvider};
pub use room::{Room, RoomSpec, RoomType};
pub use user::{CreateUserDto, User, UserRole, UserRepositoryInterface};

pub use crate::shared::errors::DomainError;
