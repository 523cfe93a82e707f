//! SeaORM implementation of BookingRepository
//!
//! Creation runs the overlap query and the insert in one database
//! transaction. A process-wide commit lock serialises those transactions,
//! since SQLite's deferred transactions would otherwise let two writers
//! both read "free" before either inserts.

use std::sync::Arc;

use async_trait::async_trait;
use log::debug;
use sea_orm::{
    ActiveModelTrait, ActiveValue::NotSet, ColumnTrait, ConnectionTrait, DatabaseConnection,
    EntityTrait, QueryFilter, QueryOrder, QuerySelect, Select, Set, TransactionTrait,
};
use tokio::sync::Mutex;

use super::money::{from_cents, to_cents};
use crate::domain::booking::{Booking, BookingRepository, BookingStatus, NewBooking, StayPeriod};
use crate::domain::{DomainError, DomainResult};
use crate::infrastructure::database::entities::booking;

pub struct SeaOrmBookingRepository {
    db: DatabaseConnection,
    commit_lock: Arc<Mutex<()>>,
}

impl SeaOrmBookingRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self::with_commit_lock(db, Arc::new(Mutex::new(())))
    }

    /// Share one commit lock between repositories on the same database.
    pub fn with_commit_lock(db: DatabaseConnection, commit_lock: Arc<Mutex<()>>) -> Self {
        Self { db, commit_lock }
    }

    async fn find_overlapping_on<C: ConnectionTrait>(
        conn: &C,
        room_id: i32,
        period: &StayPeriod,
        exclude_booking_id: Option<i32>,
    ) -> DomainResult<Vec<booking::Model>> {
        let mut query = live_overlapping(period).filter(booking::Column::RoomId.eq(room_id));
        if let Some(id) = exclude_booking_id {
            query = query.filter(booking::Column::Id.ne(id));
        }
        query
            .order_by_asc(booking::Column::CheckIn)
            .all(conn)
            .await
            .map_err(db_err)
    }

    async fn update_on<C: ConnectionTrait>(conn: &C, b: Booking) -> DomainResult<Booking> {
        debug!("Updating booking: {} -> {}", b.id, b.status);

        let existing = booking::Entity::find_by_id(b.id)
            .one(conn)
            .await
            .map_err(db_err)?;
        let Some(existing) = existing else {
            return Err(DomainError::BookingNotFound(b.id));
        };

        let mut active: booking::ActiveModel = existing.into();
        active.status = Set(b.status.as_str().to_string());
        active.checked_in_at = Set(b.checked_in_at);
        active.checked_out_at = Set(b.checked_out_at);
        active.special_requests = Set(b.special_requests);
        let model = active.update(conn).await.map_err(db_err)?;
        model_to_domain(model)
    }
}

// ── Conversion helpers ──────────────────────────────────────────

/// Non-cancelled bookings with `check_in < period.check_out AND check_out > period.check_in`
fn live_overlapping(period: &StayPeriod) -> Select<booking::Entity> {
    booking::Entity::find()
        .filter(booking::Column::Status.ne(BookingStatus::Cancelled.as_str()))
        .filter(booking::Column::CheckIn.lt(period.check_out))
        .filter(booking::Column::CheckOut.gt(period.check_in))
}

fn model_to_domain(m: booking::Model) -> DomainResult<Booking> {
    let status: BookingStatus = m.status.parse().map_err(|_| {
        DomainError::Storage(format!("Booking {} has unknown status '{}'", m.id, m.status))
    })?;

    Ok(Booking {
        id: m.id,
        guest_id: m.guest_id,
        room_id: m.room_id,
        check_in: m.check_in,
        check_out: m.check_out,
        number_of_guests: m.number_of_guests,
        total_price: from_cents(m.total_price_cents),
        status,
        booked_at: m.booked_at,
        special_requests: m.special_requests,
        checked_in_at: m.checked_in_at,
        checked_out_at: m.checked_out_at,
    })
}

fn models_to_domain(models: Vec<booking::Model>) -> DomainResult<Vec<Booking>> {
    models.into_iter().map(model_to_domain).collect()
}

fn db_err(e: sea_orm::DbErr) -> DomainError {
    DomainError::Storage(format!("Database error: {}", e))
}

// ── BookingRepository impl ──────────────────────────────────────

#[async_trait]
impl BookingRepository for SeaOrmBookingRepository {
    async fn find_by_id(&self, id: i32) -> DomainResult<Option<Booking>> {
        let model = booking::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_err)?;
        model.map(model_to_domain).transpose()
    }

    async fn find_all(&self) -> DomainResult<Vec<Booking>> {
        let models = booking::Entity::find()
            .order_by_asc(booking::Column::Id)
            .all(&self.db)
            .await
            .map_err(db_err)?;
        models_to_domain(models)
    }

    async fn find_by_guest(&self, guest_id: i32) -> DomainResult<Vec<Booking>> {
        let models = booking::Entity::find()
            .filter(booking::Column::GuestId.eq(guest_id))
            .order_by_asc(booking::Column::Id)
            .all(&self.db)
            .await
            .map_err(db_err)?;
        models_to_domain(models)
    }

    async fn find_overlapping(
        &self,
        room_id: i32,
        period: &StayPeriod,
        exclude_booking_id: Option<i32>,
    ) -> DomainResult<Vec<Booking>> {
        let models =
            Self::find_overlapping_on(&self.db, room_id, period, exclude_booking_id).await?;
        models_to_domain(models)
    }

    async fn find_occupied_room_ids(&self, period: &StayPeriod) -> DomainResult<Vec<i32>> {
        live_overlapping(period)
            .select_only()
            .column(booking::Column::RoomId)
            .distinct()
            .order_by_asc(booking::Column::RoomId)
            .into_tuple::<i32>()
            .all(&self.db)
            .await
            .map_err(db_err)
    }

    async fn exists_for_room(&self, room_id: i32) -> DomainResult<bool> {
        let model = booking::Entity::find()
            .filter(booking::Column::RoomId.eq(room_id))
            .one(&self.db)
            .await
            .map_err(db_err)?;
        Ok(model.is_some())
    }

    async fn insert_if_available(&self, new: NewBooking) -> DomainResult<Booking> {
        let _commit = self.commit_lock.lock().await;
        let txn = self.db.begin().await.map_err(db_err)?;

        let clashes = Self::find_overlapping_on(&txn, new.room_id, &new.period, None).await?;
        if !clashes.is_empty() {
            txn.rollback().await.map_err(db_err)?;
            return Err(DomainError::RoomUnavailable {
                room_id: new.room_id,
                check_in: new.period.check_in,
                check_out: new.period.check_out,
            });
        }

        debug!(
            "Inserting booking: room {} {}..{}",
            new.room_id, new.period.check_in, new.period.check_out
        );

        let model = booking::ActiveModel {
            id: NotSet,
            guest_id: Set(new.guest_id),
            room_id: Set(new.room_id),
            check_in: Set(new.period.check_in),
            check_out: Set(new.period.check_out),
            number_of_guests: Set(new.number_of_guests),
            total_price_cents: Set(to_cents(new.total_price)?),
            status: Set(new.status.as_str().to_string()),
            booked_at: Set(new.booked_at),
            special_requests: Set(new.special_requests),
            checked_in_at: Set(None),
            checked_out_at: Set(None),
        };
        let model = model.insert(&txn).await.map_err(db_err)?;
        txn.commit().await.map_err(db_err)?;

        model_to_domain(model)
    }

    async fn update(&self, b: Booking) -> DomainResult<Booking> {
        Self::update_on(&self.db, b).await
    }

    async fn update_if_available(&self, b: Booking) -> DomainResult<Booking> {
        let _commit = self.commit_lock.lock().await;
        let txn = self.db.begin().await.map_err(db_err)?;

        let period = b.period();
        let clashes = Self::find_overlapping_on(&txn, b.room_id, &period, Some(b.id)).await?;
        if !clashes.is_empty() {
            txn.rollback().await.map_err(db_err)?;
            return Err(DomainError::RoomUnavailable {
                room_id: b.room_id,
                check_in: period.check_in,
                check_out: period.check_out,
            });
        }

        let updated = Self::update_on(&txn, b).await?;
        txn.commit().await.map_err(db_err)?;
        Ok(updated)
    }
}
