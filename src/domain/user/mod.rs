//! User aggregate
//!
//! Staff accounts that call the booking API.

pub mod model;
pub mod repository;

mod dto_create;

pub use model::{User, UserRole};

pub use dto_create::CreateUserDto;

pub use repository::UserRepositoryInterface;
