//! Database entities module

pub mod booking;
pub mod guest;
pub mod room;
pub mod room_type;
pub mod user;

pub use booking::Entity as Booking;
pub use guest::Entity as Guest;
pub use room::Entity as Room;
pub use room_type::Entity as RoomType;
pub use user::Entity as User;
