//! In-memory repositories for development and testing

use std::sync::atomic::{AtomicI32, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;
use dashmap::DashMap;

use crate::domain::booking::BookingRepository;
use crate::domain::guest::GuestRepository;
use crate::domain::room::{RoomRepository, RoomTypeRepository};
use crate::domain::user::UserRepositoryInterface;
use crate::domain::{
    Booking, CreateUserDto, DomainError, DomainResult, Guest, GuestProfile, NewBooking,
    RepositoryProvider, Room, RoomSpec, RoomType, StayPeriod, User, UserRole,
};

fn sorted_by_id<T: Clone>(map: &DashMap<i32, T>) -> Vec<T> {
    let mut rows: Vec<(i32, T)> = map.iter().map(|e| (*e.key(), e.value().clone())).collect();
    rows.sort_by_key(|(id, _)| *id);
    rows.into_iter().map(|(_, row)| row).collect()
}

// ── Guests ──────────────────────────────────────────────────────

#[derive(Default)]
pub struct InMemoryGuestRepository {
    guests: DashMap<i32, Guest>,
    counter: AtomicI32,
}

#[async_trait]
impl GuestRepository for InMemoryGuestRepository {
    async fn find_active(&self) -> DomainResult<Vec<Guest>> {
        Ok(sorted_by_id(&self.guests)
            .into_iter()
            .filter(|g| g.is_active)
            .collect())
    }

    async fn find_active_by_id(&self, id: i32) -> DomainResult<Option<Guest>> {
        Ok(self
            .guests
            .get(&id)
            .filter(|g| g.is_active)
            .map(|g| g.clone()))
    }

    async fn find_by_id(&self, id: i32) -> DomainResult<Option<Guest>> {
        Ok(self.guests.get(&id).map(|g| g.clone()))
    }

    async fn insert(&self, profile: GuestProfile) -> DomainResult<Guest> {
        let id = self.counter.fetch_add(1, Ordering::SeqCst) + 1;
        let guest = profile.into_guest(id, Utc::now());
        self.guests.insert(id, guest.clone());
        Ok(guest)
    }

    async fn update(&self, id: i32, profile: GuestProfile) -> DomainResult<Option<Guest>> {
        let Some(mut entry) = self.guests.get_mut(&id) else {
            return Ok(None);
        };
        if !entry.is_active {
            return Ok(None);
        }
        let updated = profile.into_guest(id, entry.created_at);
        *entry = updated.clone();
        Ok(Some(updated))
    }

    async fn deactivate(&self, id: i32) -> DomainResult<Option<Guest>> {
        Ok(self.guests.get_mut(&id).map(|mut g| {
            g.is_active = false;
            g.clone()
        }))
    }

    async fn search(&self, term: &str) -> DomainResult<Vec<Guest>> {
        Ok(sorted_by_id(&self.guests)
            .into_iter()
            .filter(|g| g.is_active && g.matches(term))
            .collect())
    }
}

// ── Rooms ───────────────────────────────────────────────────────

#[derive(Default)]
pub struct InMemoryRoomRepository {
    rooms: DashMap<i32, Room>,
    counter: AtomicI32,
}

#[async_trait]
impl RoomRepository for InMemoryRoomRepository {
    async fn find_all(&self) -> DomainResult<Vec<Room>> {
        Ok(sorted_by_id(&self.rooms))
    }

    async fn find_by_id(&self, id: i32) -> DomainResult<Option<Room>> {
        Ok(self.rooms.get(&id).map(|r| r.clone()))
    }

    async fn find_by_number(&self, room_number: &str) -> DomainResult<Option<Room>> {
        Ok(self
            .rooms
            .iter()
            .find(|r| r.room_number == room_number)
            .map(|r| r.clone()))
    }

    async fn find_available_for_sale(&self) -> DomainResult<Vec<Room>> {
        Ok(sorted_by_id(&self.rooms)
            .into_iter()
            .filter(|r| r.is_available)
            .collect())
    }

    async fn exists_with_type(&self, room_type_id: i32) -> DomainResult<bool> {
        Ok(self.rooms.iter().any(|r| r.room_type_id == room_type_id))
    }

    async fn insert(&self, spec: RoomSpec) -> DomainResult<Room> {
        if self.rooms.iter().any(|r| r.room_number == spec.room_number) {
            return Err(DomainError::DuplicateRoomNumber(spec.room_number));
        }
        let id = self.counter.fetch_add(1, Ordering::SeqCst) + 1;
        let room = spec.into_room(id, Utc::now());
        self.rooms.insert(id, room.clone());
        Ok(room)
    }

    async fn update(&self, id: i32, spec: RoomSpec) -> DomainResult<Option<Room>> {
        let Some(mut entry) = self.rooms.get_mut(&id) else {
            return Ok(None);
        };
        let updated = spec.into_room(id, entry.created_at);
        *entry = updated.clone();
        Ok(Some(updated))
    }

    async fn delete(&self, id: i32) -> DomainResult<bool> {
        Ok(self.rooms.remove(&id).is_some())
    }
}

#[derive(Default)]
pub struct InMemoryRoomTypeRepository {
    room_types: DashMap<i32, RoomType>,
    counter: AtomicI32,
}

#[async_trait]
impl RoomTypeRepository for InMemoryRoomTypeRepository {
    async fn find_all(&self) -> DomainResult<Vec<RoomType>> {
        Ok(sorted_by_id(&self.room_types))
    }

    async fn find_by_id(&self, id: i32) -> DomainResult<Option<RoomType>> {
        Ok(self.room_types.get(&id).map(|t| t.clone()))
    }

    async fn insert(&self, name: String, description: String) -> DomainResult<RoomType> {
        let id = self.counter.fetch_add(1, Ordering::SeqCst) + 1;
        let room_type = RoomType {
            id,
            name,
            description,
        };
        self.room_types.insert(id, room_type.clone());
        Ok(room_type)
    }

    async fn update(
        &self,
        id: i32,
        name: String,
        description: String,
    ) -> DomainResult<Option<RoomType>> {
        Ok(self.room_types.get_mut(&id).map(|mut t| {
            t.name = name;
            t.description = description;
            t.clone()
        }))
    }

    async fn delete(&self, id: i32) -> DomainResult<bool> {
        Ok(self.room_types.remove(&id).is_some())
    }
}

// ── Bookings ────────────────────────────────────────────────────

#[derive(Default)]
pub struct InMemoryBookingRepository {
    bookings: DashMap<i32, Booking>,
    counter: AtomicI32,
    /// Serialises overlap check + insert
    commit_lock: Mutex<()>,
}

impl InMemoryBookingRepository {
    fn overlapping(
        &self,
        room_id: i32,
        period: &StayPeriod,
        exclude_booking_id: Option<i32>,
    ) -> Vec<Booking> {
        sorted_by_id(&self.bookings)
            .into_iter()
            .filter(|b| {
                b.room_id == room_id
                    && Some(b.id) != exclude_booking_id
                    && b.conflicts_with(period)
            })
            .collect()
    }
}

#[async_trait]
impl BookingRepository for InMemoryBookingRepository {
    async fn find_by_id(&self, id: i32) -> DomainResult<Option<Booking>> {
        Ok(self.bookings.get(&id).map(|b| b.clone()))
    }

    async fn find_all(&self) -> DomainResult<Vec<Booking>> {
        Ok(sorted_by_id(&self.bookings))
    }

    async fn find_by_guest(&self, guest_id: i32) -> DomainResult<Vec<Booking>> {
        Ok(sorted_by_id(&self.bookings)
            .into_iter()
            .filter(|b| b.guest_id == guest_id)
            .collect())
    }

    async fn find_overlapping(
        &self,
        room_id: i32,
        period: &StayPeriod,
        exclude_booking_id: Option<i32>,
    ) -> DomainResult<Vec<Booking>> {
        Ok(self.overlapping(room_id, period, exclude_booking_id))
    }

    async fn find_occupied_room_ids(&self, period: &StayPeriod) -> DomainResult<Vec<i32>> {
        let mut ids: Vec<i32> = self
            .bookings
            .iter()
            .filter(|b| b.conflicts_with(period))
            .map(|b| b.room_id)
            .collect();
        ids.sort_unstable();
        ids.dedup();
        Ok(ids)
    }

    async fn exists_for_room(&self, room_id: i32) -> DomainResult<bool> {
        Ok(self.bookings.iter().any(|b| b.room_id == room_id))
    }

    async fn insert_if_available(&self, booking: NewBooking) -> DomainResult<Booking> {
        let _guard = self
            .commit_lock
            .lock()
            .map_err(|_| DomainError::Storage("Booking commit lock poisoned".into()))?;

        if !self.overlapping(booking.room_id, &booking.period, None).is_empty() {
            return Err(DomainError::RoomUnavailable {
                room_id: booking.room_id,
                check_in: booking.period.check_in,
                check_out: booking.period.check_out,
            });
        }

        let id = self.counter.fetch_add(1, Ordering::SeqCst) + 1;
        let booking = booking.into_booking(id);
        self.bookings.insert(id, booking.clone());
        Ok(booking)
    }

    async fn update(&self, booking: Booking) -> DomainResult<Booking> {
        let Some(mut entry) = self.bookings.get_mut(&booking.id) else {
            return Err(DomainError::BookingNotFound(booking.id));
        };
        *entry = booking.clone();
        Ok(booking)
    }

    async fn update_if_available(&self, booking: Booking) -> DomainResult<Booking> {
        let _guard = self
            .commit_lock
            .lock()
            .map_err(|_| DomainError::Storage("Booking commit lock poisoned".into()))?;

        let period = booking.period();
        if !self
            .overlapping(booking.room_id, &period, Some(booking.id))
            .is_empty()
        {
            return Err(DomainError::RoomUnavailable {
                room_id: booking.room_id,
                check_in: period.check_in,
                check_out: period.check_out,
            });
        }

        let Some(mut entry) = self.bookings.get_mut(&booking.id) else {
            return Err(DomainError::BookingNotFound(booking.id));
        };
        *entry = booking.clone();
        Ok(booking)
    }
}

// ── Users ───────────────────────────────────────────────────────

#[derive(Default)]
pub struct InMemoryUserRepository {
    users: DashMap<String, User>,
}

#[async_trait]
impl UserRepositoryInterface for InMemoryUserRepository {
    async fn create_user(&self, dto: CreateUserDto) -> DomainResult<User> {
        let now = Utc::now();
        let user = User {
            id: uuid::Uuid::new_v4().to_string(),
            username: dto.username,
            email: dto.email,
            password_hash: dto.password_hash,
            role: dto.role,
            is_active: true,
            created_at: now,
            updated_at: now,
            last_login_at: None,
        };
        self.users.insert(user.id.clone(), user.clone());
        Ok(user)
    }

    async fn count_users(&self) -> DomainResult<u64> {
        Ok(self.users.len() as u64)
    }

    async fn get_user_by_username(&self, username: &str) -> DomainResult<Option<User>> {
        Ok(self
            .users
            .iter()
            .find(|u| u.username == username)
            .map(|u| u.clone()))
    }

    async fn get_user_by_email(&self, email: &str) -> DomainResult<Option<User>> {
        Ok(self
            .users
            .iter()
            .find(|u| u.email == email)
            .map(|u| u.clone()))
    }

    async fn get_user_by_id(&self, id: &str) -> DomainResult<Option<User>> {
        Ok(self.users.get(id).map(|u| u.clone()))
    }

    async fn list_users(&self) -> DomainResult<Vec<User>> {
        let mut users: Vec<User> = self
            .users
            .iter()
            .filter(|u| u.is_active)
            .map(|u| u.clone())
            .collect();
        users.sort_by(|a, b| a.username.cmp(&b.username));
        Ok(users)
    }

    async fn record_login(&self, id: &str) -> DomainResult<()> {
        if let Some(mut user) = self.users.get_mut(id) {
            user.last_login_at = Some(Utc::now());
        }
        Ok(())
    }

    async fn update_user_password(&self, id: &str, new_password_hash: &str) -> DomainResult<()> {
        let mut user = self.users.get_mut(id).ok_or_else(|| user_not_found(id))?;
        user.password_hash = new_password_hash.to_string();
        user.updated_at = Utc::now();
        Ok(())
    }

    async fn update_user_role(&self, id: &str, role: UserRole) -> DomainResult<User> {
        let mut user = self.users.get_mut(id).ok_or_else(|| user_not_found(id))?;
        user.role = role;
        user.updated_at = Utc::now();
        Ok(user.clone())
    }

    async fn delete_user(&self, id: &str) -> DomainResult<()> {
        self.users
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| user_not_found(id))
    }
}

fn user_not_found(id: &str) -> DomainError {
    DomainError::NotFound {
        entity: "User",
        field: "id",
        value: id.to_string(),
    }
}

// ── Provider ────────────────────────────────────────────────────

/// All repositories backed by process memory
#[derive(Default)]
pub struct InMemoryRepositoryProvider {
    guests: InMemoryGuestRepository,
    rooms: InMemoryRoomRepository,
    room_types: InMemoryRoomTypeRepository,
    bookings: InMemoryBookingRepository,
    users: InMemoryUserRepository,
}

impl InMemoryRepositoryProvider {
    pub fn new() -> Self {
        Self::default()
    }
}

impl RepositoryProvider for InMemoryRepositoryProvider {
    fn guests(&self) -> &dyn GuestRepository {
        &self.guests
    }

    fn rooms(&self) -> &dyn RoomRepository {
        &self.rooms
    }

    fn room_types(&self) -> &dyn RoomTypeRepository {
        &self.room_types
    }

    fn bookings(&self) -> &dyn BookingRepository {
        &self.bookings
    }

    fn users(&self) -> &dyn UserRepositoryInterface {
        &self.users
    }
}
