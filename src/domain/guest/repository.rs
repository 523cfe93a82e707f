//! Guest repository interface

use async_trait::async_trait;

use super::model::{Guest, GuestProfile};
use crate::domain::DomainResult;

#[async_trait]
pub trait GuestRepository: Send + Sync {
    /// All active guests
    async fn find_active(&self) -> DomainResult<Vec<Guest>>;

    /// Active guest by ID; inactive guests are reported as absent
    async fn find_active_by_id(&self, id: i32) -> DomainResult<Option<Guest>>;

    /// Guest by ID regardless of the active flag (booking history)
    async fn find_by_id(&self, id: i32) -> DomainResult<Option<Guest>>;

    async fn insert(&self, profile: GuestProfile) -> DomainResult<Guest>;

    /// Overwrite an active guest's profile; `None` when absent or inactive
    async fn update(&self, id: i32, profile: GuestProfile) -> DomainResult<Option<Guest>>;

    /// Clear the active flag; `None` when the guest does not exist
    async fn deactivate(&self, id: i32) -> DomainResult<Option<Guest>>;

    /// Active guests matching `term` (see [`Guest::matches`])
    async fn search(&self, term: &str) -> DomainResult<Vec<Guest>>;
}
