//! Room directory

use std::sync::Arc;

use tracing::info;

use crate::domain::{DomainError, DomainResult, RepositoryProvider, Room, RoomSpec};

pub struct RoomService {
    repos: Arc<dyn RepositoryProvider>,
}

impl RoomService {
    pub fn new(repos: Arc<dyn RepositoryProvider>) -> Self {
        Self { repos }
    }

    pub async fn list_rooms(&self) -> DomainResult<Vec<Room>> {
        self.repos.rooms().find_all().await
    }

    pub async fn get_room(&self, id: i32) -> DomainResult<Option<Room>> {
        self.repos.rooms().find_by_id(id).await
    }

    pub async fn room_number_exists(&self, room_number: &str) -> DomainResult<bool> {
        Ok(self.repos.rooms().find_by_number(room_number).await?.is_some())
    }

    pub async fn create_room(&self, spec: RoomSpec) -> DomainResult<Room> {
        self.check_spec(&spec, None).await?;
        let room = self.repos.rooms().insert(spec).await?;
        info!(room_id = room.id, room_number = %room.room_number, "Room created");
        Ok(room)
    }

    /// `None` when the room does not exist
    pub async fn update_room(&self, id: i32, spec: RoomSpec) -> DomainResult<Option<Room>> {
        if self.repos.rooms().find_by_id(id).await?.is_none() {
            return Ok(None);
        }
        self.check_spec(&spec, Some(id)).await?;
        self.repos.rooms().update(id, spec).await
    }

    /// Returns whether the room existed; fails while bookings reference it.
    pub async fn delete_room(&self, id: i32) -> DomainResult<bool> {
        if self.repos.rooms().find_by_id(id).await?.is_none() {
            return Ok(false);
        }
        if self.repos.bookings().exists_for_room(id).await? {
            return Err(DomainError::RoomInUse(id));
        }
        let removed = self.repos.rooms().delete(id).await?;
        if removed {
            info!(room_id = id, "Room deleted");
        }
        Ok(removed)
    }

    async fn check_spec(&self, spec: &RoomSpec, room_id: Option<i32>) -> DomainResult<()> {
        spec.validate()?;

        if self
            .repos
            .room_types()
            .find_by_id(spec.room_type_id)
            .await?
            .is_none()
        {
            return Err(DomainError::RoomTypeNotFound(spec.room_type_id));
        }

        if let Some(existing) = self.repos.rooms().find_by_number(&spec.room_number).await? {
            if Some(existing.id) != room_id {
                return Err(DomainError::DuplicateRoomNumber(spec.room_number.clone()));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use chrono::Utc;
    use rust_decimal::Decimal;

    use super::*;
    use crate::application::fixtures::{date, hotel, room_spec};
    use crate::domain::{BookingStatus, NewBooking, StayPeriod};

    #[tokio::test]
    async fn duplicate_number_is_rejected_on_create() {
        let service = RoomService::new(hotel().await);
        assert!(service.room_number_exists("101").await.unwrap());
        assert!(!service.room_number_exists("999").await.unwrap());

        let err = service
            .create_room(room_spec("101", 1, 120, 2))
            .await
            .unwrap_err();
        assert_eq!(err, DomainError::DuplicateRoomNumber("101".into()));

        let created = service.create_room(room_spec("103", 1, 120, 2)).await.unwrap();
        assert_eq!(created.room_number, "103");
    }

    #[tokio::test]
    async fn room_number_match_is_case_sensitive() {
        let service = RoomService::new(hotel().await);
        service.create_room(room_spec("P1", 1, 90, 1)).await.unwrap();
        assert!(service.create_room(room_spec("p1", 1, 90, 1)).await.is_ok());
    }

    #[tokio::test]
    async fn invalid_specs_are_rejected() {
        let service = RoomService::new(hotel().await);

        assert!(matches!(
            service.create_room(room_spec("500", 1, 0, 2)).await,
            Err(DomainError::Validation(_))
        ));
        assert!(matches!(
            service.create_room(room_spec("501", 1, 100, 0)).await,
            Err(DomainError::Validation(_))
        ));
        assert_eq!(
            service.create_room(room_spec("502", 9, 100, 2)).await.unwrap_err(),
            DomainError::RoomTypeNotFound(9)
        );
    }

    #[tokio::test]
    async fn update_may_keep_its_own_number() {
        let service = RoomService::new(hotel().await);
        let updated = service
            .update_room(1, room_spec("101", 1, 110, 2))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.price_per_night, Decimal::new(110, 0));

        assert_eq!(
            service
                .update_room(1, room_spec("102", 1, 110, 2))
                .await
                .unwrap_err(),
            DomainError::DuplicateRoomNumber("102".into())
        );
        assert!(service
            .update_room(404, room_spec("404", 1, 110, 2))
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn booked_room_cannot_be_deleted() {
        let repos: Arc<dyn RepositoryProvider> = hotel().await;
        repos
            .bookings()
            .insert_if_available(NewBooking {
                guest_id: 1,
                room_id: 1,
                period: StayPeriod::new(date(2024, 6, 10), date(2024, 6, 12)).unwrap(),
                number_of_guests: 1,
                total_price: Decimal::new(200, 0),
                status: BookingStatus::Cancelled,
                booked_at: Utc::now(),
                special_requests: None,
            })
            .await
            .unwrap();

        let service = RoomService::new(repos);
        assert_eq!(service.delete_room(1).await.unwrap_err(), DomainError::RoomInUse(1));
        assert!(service.delete_room(2).await.unwrap());
        assert!(!service.delete_room(2).await.unwrap());
        assert_eq!(service.list_rooms().await.unwrap().len(), 2);
    }
}
