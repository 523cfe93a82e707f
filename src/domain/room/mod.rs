//! Room aggregate
//!
//! Rooms, their categories, and the repository interfaces.

pub mod model;
pub mod repository;

pub use model::{Room, RoomSpec, RoomType, MAX_PRICE_PER_NIGHT};
pub use repository::{RoomRepository, RoomTypeRepository};
