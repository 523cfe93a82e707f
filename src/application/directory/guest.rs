//! Guest directory

use std::sync::Arc;

use tracing::info;

use crate::domain::{DomainError, DomainResult, Guest, GuestProfile, RepositoryProvider};

/// Shortest accepted guest search term, in characters
pub const MIN_SEARCH_TERM_LEN: usize = 2;

pub struct GuestService {
    repos: Arc<dyn RepositoryProvider>,
}

impl GuestService {
    pub fn new(repos: Arc<dyn RepositoryProvider>) -> Self {
        Self { repos }
    }

    pub async fn list_guests(&self) -> DomainResult<Vec<Guest>> {
        self.repos.guests().find_active().await
    }

    /// Active guest by ID
    pub async fn get_guest(&self, id: i32) -> DomainResult<Option<Guest>> {
        self.repos.guests().find_active_by_id(id).await
    }

    pub async fn create_guest(&self, profile: GuestProfile) -> DomainResult<Guest> {
        let guest = self.repos.guests().insert(profile).await?;
        info!(guest_id = guest.id, "Guest created");
        Ok(guest)
    }

    pub async fn update_guest(&self, id: i32, profile: GuestProfile) -> DomainResult<Option<Guest>> {
        self.repos.guests().update(id, profile).await
    }

    /// Soft delete. Returns whether the guest existed.
    pub async fn delete_guest(&self, id: i32) -> DomainResult<bool> {
        let removed = self.repos.guests().deactivate(id).await?.is_some();
        if removed {
            info!(guest_id = id, "Guest deactivated");
        }
        Ok(removed)
    }

    pub async fn search_guests(&self, term: &str) -> DomainResult<Vec<Guest>> {
        if term.trim().is_empty() || term.chars().count() < MIN_SEARCH_TERM_LEN {
            return Err(DomainError::InvalidSearchTerm(term.to_string()));
        }
        self.repos.guests().search(term).await
    }
}
