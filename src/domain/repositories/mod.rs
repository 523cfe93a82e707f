//! Repository traits for the domain layer
//!
//! Contains:
//! - `RepositoryProvider`: unified access to all per-aggregate repositories
//! - `DomainResult`: standard result type for domain operations

use super::booking::BookingRepository;
use super::guest::GuestRepository;
use super::room::{RoomRepository, RoomTypeRepository};
use super::user::UserRepositoryInterface;
use crate::shared::errors::DomainError;

/// Result type for domain operations
pub type DomainResult<T> = Result<T, DomainError>;

// ── RepositoryProvider ──────────────────────────────────────────

/// Provides access to all domain repositories.
///
/// Consumers request only the repository they need:
///
/// ```ignore
/// async fn handle(repos: &dyn RepositoryProvider) {
///     let room = repos.rooms().find_by_id(101).await?;
///     let clashes = repos.bookings().find_overlapping(101, &period, None).await?;
/// }
/// ```
pub trait RepositoryProvider: Send + Sync {
    fn guests(&self) -> &dyn GuestRepository;
    fn rooms(&self) -> &dyn RoomRepository;
    fn room_types(&self) -> &dyn RoomTypeRepository;
    fn bookings(&self) -> &dyn BookingRepository;
    fn users(&self) -> &dyn UserRepositoryInterface;
}
