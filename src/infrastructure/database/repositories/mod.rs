//! Database repository implementations
//!
//! Per-aggregate SeaORM repositories + unified RepositoryProvider.

pub mod booking_repository;
pub mod guest_repository;
mod money;
pub mod repository_provider;
pub mod room_repository;
pub mod user_repository;

pub use repository_provider::SeaOrmRepositoryProvider;

#[cfg(test)]
mod tests;
