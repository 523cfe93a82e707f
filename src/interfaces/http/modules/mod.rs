pub mod auth;
pub mod bookings;
pub mod guests;
pub mod health;
pub mod metrics;
pub mod request_id;
pub mod room_types;
pub mod rooms;
pub mod users;
