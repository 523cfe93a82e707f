//! Storage implementations outside the database

mod memory;

pub use memory::{
    InMemoryBookingRepository, InMemoryGuestRepository, InMemoryRepositoryProvider,
    InMemoryRoomRepository, InMemoryRoomTypeRepository, InMemoryUserRepository,
};
