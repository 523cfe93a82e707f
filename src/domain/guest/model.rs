//! Guest domain entity

use chrono::{DateTime, NaiveDate, Utc};

/// Hotel guest. Deleting a guest only clears `is_active`.
#[derive(Debug, Clone, PartialEq)]
pub struct Guest {
    pub id: i32,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub passport_number: String,
    pub date_of_birth: NaiveDate,
    pub address: String,
    pub created_at: DateTime<Utc>,
    pub is_active: bool,
}

impl Guest {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    /// Case-insensitive substring match over the searchable contact fields.
    pub fn matches(&self, term: &str) -> bool {
        let term = term.to_lowercase();
        [
            &self.first_name,
            &self.last_name,
            &self.email,
            &self.phone,
            &self.passport_number,
        ]
        .iter()
        .any(|field| field.to_lowercase().contains(&term))
    }
}

/// Editable guest fields, shared by create and update.
#[derive(Debug, Clone)]
pub struct GuestProfile {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub passport_number: String,
    pub date_of_birth: NaiveDate,
    pub address: String,
}

impl GuestProfile {
    pub fn into_guest(self, id: i32, created_at: DateTime<Utc>) -> Guest {
        Guest {
            id,
            first_name: self.first_name,
            last_name: self.last_name,
            email: self.email,
            phone: self.phone,
            passport_number: self.passport_number,
            date_of_birth: self.date_of_birth,
            address: self.address,
            created_at,
            is_active: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ivan() -> Guest {
        GuestProfile {
            first_name: "Ivan".into(),
            last_name: "Petrov".into(),
            email: "ivan.petrov@mail.com".into(),
            phone: "+7-123-456-7890".into(),
            passport_number: "675869878".into(),
            date_of_birth: NaiveDate::from_ymd_opt(1985, 5, 15).unwrap(),
            address: "Moscow".into(),
        }
        .into_guest(1, Utc::now())
    }

    #[test]
    fn new_guest_is_active() {
        let guest = ivan();
        assert!(guest.is_active);
        assert_eq!(guest.full_name(), "Ivan Petrov");
    }

    #[test]
    fn matches_any_contact_field() {
        let guest = ivan();
        assert!(guest.matches("Iv"));
        assert!(guest.matches("Petr"));
        assert!(guest.matches("@mail"));
        assert!(guest.matches("456"));
        assert!(guest.matches("6758"));
        assert!(!guest.matches("Moscow"));
        assert!(!guest.matches("ivan p"));
    }

    #[test]
    fn match_ignores_case() {
        let mut guest = ivan();
        assert!(guest.matches("iv"));
        assert!(guest.matches("PETROV"));

        guest.last_name = "Иванов".into();
        assert!(guest.matches("иван"));
        assert!(guest.matches("ИВАНОВ"));
    }
}
