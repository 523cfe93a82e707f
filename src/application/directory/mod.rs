//! Directory services: guests, rooms and room types

mod guest;
mod room;
mod room_type;

pub use guest::{GuestService, MIN_SEARCH_TERM_LEN};
pub use room::RoomService;
pub use room_type::{RoomTypeService, DEFAULT_ROOM_TYPES};
