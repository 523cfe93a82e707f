//! Shared test data: the sample hotel

use std::sync::{Arc, Mutex};

use chrono::{DateTime, Duration, NaiveDate, Utc};
use rust_decimal::Decimal;

use crate::domain::{GuestProfile, RepositoryProvider, RoomSpec};
use crate::infrastructure::storage::InMemoryRepositoryProvider;
use crate::shared::Clock;

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// Clock that tests can move forward.
pub struct ManualClock {
    now: Mutex<DateTime<Utc>>,
}

impl ManualClock {
    pub fn on(day: NaiveDate) -> Arc<Self> {
        Arc::new(Self {
            now: Mutex::new(day.and_hms_opt(9, 0, 0).unwrap().and_utc()),
        })
    }

    pub fn advance(&self, by: Duration) {
        *self.now.lock().unwrap() += by;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock().unwrap()
    }

    fn today(&self) -> NaiveDate {
        self.now().date_naive()
    }
}

pub fn ivan() -> GuestProfile {
    GuestProfile {
        first_name: "Ivan".into(),
        last_name: "Petrov".into(),
        email: "ivan.petrov@mail.com".into(),
        phone: "+7-123-456-7890".into(),
        passport_number: "1234567890".into(),
        date_of_birth: date(1985, 5, 15),
        address: "Moscow, Lenina 1".into(),
    }
}

pub fn maria() -> GuestProfile {
    GuestProfile {
        first_name: "Maria".into(),
        last_name: "Sidorova".into(),
        email: "maria.sidorova@mail.com".into(),
        phone: "+7-987-654-3210".into(),
        passport_number: "0987654321".into(),
        date_of_birth: date(1990, 8, 20),
        address: "Saint Petersburg, Nevsky 10".into(),
    }
}

pub fn room_spec(number: &str, room_type_id: i32, price: i64, capacity: i32) -> RoomSpec {
    RoomSpec {
        room_number: number.into(),
        room_type_id,
        price_per_night: Decimal::new(price, 0),
        capacity,
        description: format!("Room {}", number),
        is_available: true,
    }
}

/// Room types 1-2, rooms 101 (id 1, $100, cap 2), 102 (id 2, $100,
/// cap 2), 201 (id 3, $150, cap 3); guests Ivan (id 1) and Maria (id 2).
pub async fn hotel() -> Arc<InMemoryRepositoryProvider> {
    let repos = Arc::new(InMemoryRepositoryProvider::new());

    let standard = repos
        .room_types()
        .insert("Standard".into(), "Standard room".into())
        .await
        .unwrap();
    let junior = repos
        .room_types()
        .insert("Junior Suite".into(), "Upgraded room".into())
        .await
        .unwrap();

    for spec in [
        room_spec("101", standard.id, 100, 2),
        room_spec("102", standard.id, 100, 2),
        room_spec("201", junior.id, 150, 3),
    ] {
        repos.rooms().insert(spec).await.unwrap();
    }

    repos.guests().insert(ivan()).await.unwrap();
    repos.guests().insert(maria()).await.unwrap();

    repos
}
