//! Repository tests against an in-memory SQLite database

use std::str::FromStr;
use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use sea_orm::DatabaseConnection;
use sea_orm_migration::MigratorTrait;

use super::SeaOrmRepositoryProvider;
use crate::application::{BookingService, CreateBooking};
use crate::domain::{
    BookingStatus, DomainError, GuestProfile, NewBooking, RepositoryProvider, RoomSpec,
    StayPeriod, TransitionPolicy, UserRole,
};
use crate::infrastructure::database::migrator::Migrator;
use crate::infrastructure::database::{init_database, DatabaseConfig};
use crate::shared::FixedClock;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

async fn migrated_db() -> DatabaseConnection {
    let db = init_database(&DatabaseConfig::in_memory()).await.unwrap();
    Migrator::up(&db, None).await.unwrap();
    db
}

fn profile(first: &str, last: &str) -> GuestProfile {
    GuestProfile {
        first_name: first.into(),
        last_name: last.into(),
        email: format!("{}.{}@mail.com", first.to_lowercase(), last.to_lowercase()),
        phone: "+7-123-456-7890".into(),
        passport_number: "1234567890".into(),
        date_of_birth: date(1985, 5, 15),
        address: "Moscow".into(),
    }
}

fn spec(number: &str, room_type_id: i32, price: &str, capacity: i32) -> RoomSpec {
    RoomSpec {
        room_number: number.into(),
        room_type_id,
        price_per_night: Decimal::from_str(price).unwrap(),
        capacity,
        description: String::new(),
        is_available: true,
    }
}

fn new_booking(guest_id: i32, room_id: i32, from: u32, to: u32) -> NewBooking {
    NewBooking {
        guest_id,
        room_id,
        period: StayPeriod::new(date(2024, 6, from), date(2024, 6, to)).unwrap(),
        number_of_guests: 1,
        total_price: Decimal::new(200, 0),
        status: BookingStatus::Confirmed,
        booked_at: Utc::now(),
        special_requests: None,
    }
}

/// One room type, room "101" ($100, cap 2) and guest Ivan.
async fn seeded() -> Arc<SeaOrmRepositoryProvider> {
    let repos = Arc::new(SeaOrmRepositoryProvider::new(migrated_db().await));
    let standard = repos
        .room_types()
        .insert("Standard".into(), "Standard room".into())
        .await
        .unwrap();
    repos
        .rooms()
        .insert(spec("101", standard.id, "100.00", 2))
        .await
        .unwrap();
    repos.guests().insert(profile("Ivan", "Petrov")).await.unwrap();
    repos
}

#[tokio::test]
async fn room_price_round_trips_through_cents() {
    let repos = seeded().await;
    let room = repos
        .rooms()
        .insert(spec("202", 1, "149.99", 2))
        .await
        .unwrap();
    let stored = repos.rooms().find_by_id(room.id).await.unwrap().unwrap();
    assert_eq!(stored.price_per_night, Decimal::from_str("149.99").unwrap());
    assert_eq!(
        repos.rooms().find_by_number("202").await.unwrap().map(|r| r.id),
        Some(room.id)
    );
}

#[tokio::test]
async fn duplicate_room_number_maps_to_domain_error() {
    let repos = seeded().await;
    let err = repos
        .rooms()
        .insert(spec("101", 1, "90", 1))
        .await
        .unwrap_err();
    assert_eq!(err, DomainError::DuplicateRoomNumber("101".into()));
}

#[tokio::test]
async fn overlap_query_ignores_cancelled_and_boundary() {
    let repos = seeded().await;
    let bookings = repos.bookings();
    let first = bookings
        .insert_if_available(new_booking(1, 1, 10, 12))
        .await
        .unwrap();

    let clash = bookings
        .insert_if_available(new_booking(1, 1, 11, 13))
        .await
        .unwrap_err();
    assert_eq!(clash.kind(), "RoomUnavailable");

    let next = bookings
        .insert_if_available(new_booking(1, 1, 12, 14))
        .await
        .unwrap();
    assert_eq!(next.total_price, Decimal::new(200, 0));

    let period = StayPeriod::new(date(2024, 6, 11), date(2024, 6, 13)).unwrap();
    let found = bookings.find_overlapping(1, &period, None).await.unwrap();
    assert_eq!(found.len(), 2);
    let found = bookings
        .find_overlapping(1, &period, Some(first.id))
        .await
        .unwrap();
    assert_eq!(found.len(), 1);

    let mut cancelled = first.clone();
    cancelled.status = BookingStatus::Cancelled;
    bookings.update(cancelled).await.unwrap();

    let early = StayPeriod::new(date(2024, 6, 10), date(2024, 6, 12)).unwrap();
    assert!(bookings.find_occupied_room_ids(&early).await.unwrap().is_empty());
    assert_eq!(bookings.find_occupied_room_ids(&period).await.unwrap(), vec![1]);
    assert_eq!(bookings.find_all().await.unwrap().len(), 2);
}

#[tokio::test]
async fn status_and_stamps_are_persisted() {
    let repos = seeded().await;
    let mut booking = repos
        .bookings()
        .insert_if_available(new_booking(1, 1, 10, 12))
        .await
        .unwrap();
    let at = Utc::now();
    booking.apply_status(BookingStatus::CheckedIn, at);
    repos.bookings().update(booking.clone()).await.unwrap();

    let stored = repos.bookings().find_by_id(booking.id).await.unwrap().unwrap();
    assert_eq!(stored.status, BookingStatus::CheckedIn);
    assert_eq!(
        stored.checked_in_at.map(|t| t.timestamp()),
        Some(at.timestamp())
    );
    assert!(stored.checked_out_at.is_none());

    let missing = new_booking(1, 1, 1, 2).into_booking(404);
    assert_eq!(
        repos.bookings().update(missing).await.unwrap_err(),
        DomainError::BookingNotFound(404)
    );
}

#[tokio::test]
async fn reactivation_rechecks_overlap_atomically() {
    let repos = seeded().await;
    let bookings = repos.bookings();
    let mut first = bookings
        .insert_if_available(new_booking(1, 1, 10, 12))
        .await
        .unwrap();
    first.status = BookingStatus::Cancelled;
    let first = bookings.update(first).await.unwrap();
    let second = bookings
        .insert_if_available(new_booking(1, 1, 11, 13))
        .await
        .unwrap();

    let mut reopened = first.clone();
    reopened.status = BookingStatus::Confirmed;
    let err = bookings.update_if_available(reopened).await.unwrap_err();
    assert_eq!(err.kind(), "RoomUnavailable");
    let stored = bookings.find_by_id(first.id).await.unwrap().unwrap();
    assert_eq!(stored.status, BookingStatus::Cancelled);

    // the live booking does not clash with its own stay
    let mut checked_in = second.clone();
    checked_in.apply_status(BookingStatus::CheckedIn, Utc::now());
    let checked_in = bookings.update_if_available(checked_in).await.unwrap();
    assert_eq!(checked_in.status, BookingStatus::CheckedIn);
}

#[tokio::test]
async fn referenced_rows_cannot_be_deleted() {
    let repos = seeded().await;
    repos
        .bookings()
        .insert_if_available(new_booking(1, 1, 10, 12))
        .await
        .unwrap();

    assert!(repos.bookings().exists_for_room(1).await.unwrap());
    assert!(matches!(
        repos.rooms().delete(1).await,
        Err(DomainError::Storage(_))
    ));
    assert!(repos.rooms().exists_with_type(1).await.unwrap());
    assert!(matches!(
        repos.room_types().delete(1).await,
        Err(DomainError::Storage(_))
    ));
}

#[tokio::test]
async fn guest_soft_delete_and_case_insensitive_search() {
    let repos = seeded().await;
    let maria = repos
        .guests()
        .insert(profile("Maria", "Sidorova"))
        .await
        .unwrap();

    assert_eq!(repos.guests().search("Iv").await.unwrap().len(), 1);
    assert_eq!(repos.guests().search("iv").await.unwrap().len(), 1);
    assert_eq!(repos.guests().search("MARIA").await.unwrap().len(), 1);
    // LIKE wildcards are matched literally
    assert!(repos.guests().search("I%").await.unwrap().is_empty());

    repos.guests().deactivate(maria.id).await.unwrap();
    assert!(repos.guests().find_active_by_id(maria.id).await.unwrap().is_none());
    assert_eq!(
        repos.guests().find_by_id(maria.id).await.unwrap().unwrap().full_name(),
        "Maria Sidorova"
    );
    assert!(repos.guests().search("Maria").await.unwrap().is_empty());
    assert!(repos
        .guests()
        .update(maria.id, profile("Maria", "Ivanova"))
        .await
        .unwrap()
        .is_none());
}

#[tokio::test]
async fn users_are_stored_with_role() {
    let repos = seeded().await;
    assert_eq!(repos.users().count_users().await.unwrap(), 0);

    let user = repos
        .users()
        .create_user(crate::domain::CreateUserDto {
            username: "manager".into(),
            email: "manager@hotel.com".into(),
            role: UserRole::Manager,
            password_hash: "hash".into(),
        })
        .await
        .unwrap();
    repos.users().record_login(&user.id).await.unwrap();

    let stored = repos
        .users()
        .get_user_by_email("manager@hotel.com")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.role, UserRole::Manager);
    assert!(stored.last_login_at.is_some());
    assert_eq!(repos.users().count_users().await.unwrap(), 1);

    let dup = repos
        .users()
        .create_user(crate::domain::CreateUserDto {
            username: "manager".into(),
            email: "other@hotel.com".into(),
            role: UserRole::Receptionist,
            password_hash: "hash".into(),
        })
        .await
        .unwrap_err();
    assert_eq!(dup.kind(), "Conflict");
}

#[tokio::test]
async fn user_admin_operations() {
    let repos = seeded().await;
    let users = repos.users();
    for (name, role) in [("zed", UserRole::Receptionist), ("amy", UserRole::Manager)] {
        users
            .create_user(crate::domain::CreateUserDto {
                username: name.into(),
                email: format!("{}@hotel.com", name),
                role,
                password_hash: "hash".into(),
            })
            .await
            .unwrap();
    }

    let listed: Vec<String> = users
        .list_users()
        .await
        .unwrap()
        .into_iter()
        .map(|u| u.username)
        .collect();
    assert_eq!(listed, vec!["amy", "zed"]);

    let zed = users.get_user_by_username("zed").await.unwrap().unwrap();
    users.update_user_password(&zed.id, "new-hash").await.unwrap();
    let retyped = users.update_user_role(&zed.id, UserRole::Admin).await.unwrap();
    assert_eq!(retyped.role, UserRole::Admin);
    assert_eq!(retyped.password_hash, "new-hash");

    users.delete_user(&zed.id).await.unwrap();
    assert!(users.get_user_by_id(&zed.id).await.unwrap().is_none());
    assert!(users.delete_user(&zed.id).await.unwrap_err().is_not_found());
    assert!(users
        .update_user_password(&zed.id, "x")
        .await
        .unwrap_err()
        .is_not_found());
    assert_eq!(users.count_users().await.unwrap(), 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_creations_commit_once() {
    let repos = seeded().await;
    let service = Arc::new(BookingService::new(
        repos.clone(),
        Arc::new(FixedClock::on(date(2024, 6, 1))),
        TransitionPolicy::Permissive,
    ));

    let mut handles = Vec::new();
    for _ in 0..8 {
        let service = service.clone();
        handles.push(tokio::spawn(async move {
            service
                .create_booking(CreateBooking {
                    guest_id: 1,
                    room_id: 1,
                    check_in: date(2024, 6, 10),
                    check_out: date(2024, 6, 14),
                    number_of_guests: 2,
                    special_requests: None,
                })
                .await
        }));
    }

    let mut accepted = 0;
    for handle in handles {
        let response = handle.await.unwrap();
        if response.success {
            accepted += 1;
        } else {
            assert_eq!(response.error_kind(), Some("RoomUnavailable"));
        }
    }
    assert_eq!(accepted, 1);

    let stored = repos.bookings().find_all().await.unwrap();
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].total_price, Decimal::new(400, 0));
}
