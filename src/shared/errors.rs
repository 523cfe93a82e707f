use chrono::NaiveDate;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum DomainError {
    #[error("Check-out date must be later than check-in date")]
    InvalidDateRange,

    #[error("Check-in date {0} is in the past")]
    PastCheckIn(NaiveDate),

    #[error("Guest {0} not found")]
    GuestNotFound(i32),

    #[error("Room {0} not found")]
    RoomNotFound(i32),

    #[error("Room {room_id} is already booked between {check_in} and {check_out}")]
    RoomUnavailable {
        room_id: i32,
        check_in: NaiveDate,
        check_out: NaiveDate,
    },

    #[error("Room holds at most {capacity} guests, {requested} requested")]
    CapacityExceeded { capacity: i32, requested: i32 },

    #[error("Booking {0} not found")]
    BookingNotFound(i32),

    #[error("Search term must contain at least 2 characters")]
    InvalidSearchTerm(String),

    #[error("Room number {0} already exists")]
    DuplicateRoomNumber(String),

    #[error("Cannot change booking status from {from} to {to}")]
    InvalidStatusTransition { from: String, to: String },

    #[error("Room type {0} not found")]
    RoomTypeNotFound(i32),

    #[error("Room type {0} is still assigned to rooms")]
    RoomTypeInUse(i32),

    #[error("Room {0} is referenced by bookings")]
    RoomInUse(i32),

    #[error("Not found: {entity} with {field}={value}")]
    NotFound {
        entity: &'static str,
        field: &'static str,
        value: String,
    },

    #[error("Validation: {0}")]
    Validation(String),

    #[error("Already exists: {0}")]
    Conflict(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Storage error: {0}")]
    Storage(String),
}

impl DomainError {
    /// Stable machine-readable name of the error kind.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::InvalidDateRange => "InvalidDateRange",
            Self::PastCheckIn(_) => "PastCheckIn",
            Self::GuestNotFound(_) => "GuestNotFound",
            Self::RoomNotFound(_) => "RoomNotFound",
            Self::RoomUnavailable { .. } => "RoomUnavailable",
            Self::CapacityExceeded { .. } => "CapacityExceeded",
            Self::BookingNotFound(_) => "BookingNotFound",
            Self::InvalidSearchTerm(_) => "InvalidSearchTerm",
            Self::DuplicateRoomNumber(_) => "DuplicateRoomNumber",
            Self::InvalidStatusTransition { .. } => "InvalidStatusTransition",
            Self::RoomTypeNotFound(_) => "RoomTypeNotFound",
            Self::RoomTypeInUse(_) => "RoomTypeInUse",
            Self::RoomInUse(_) => "RoomInUse",
            Self::NotFound { .. } => "NotFound",
            Self::Validation(_) => "Validation",
            Self::Conflict(_) => "Conflict",
            Self::Unauthorized(_) => "Unauthorized",
            Self::Storage(_) => "Storage",
        }
    }

    /// Whether the caller asked for something that does not exist.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::GuestNotFound(_)
                | Self::RoomNotFound(_)
                | Self::BookingNotFound(_)
                | Self::RoomTypeNotFound(_)
                | Self::NotFound { .. }
        )
    }
}

impl From<sea_orm::DbErr> for DomainError {
    fn from(e: sea_orm::DbErr) -> Self {
        DomainError::Storage(e.to_string())
    }
}

#[derive(Debug, Error)]
pub enum InfraError {
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    #[error("Crypto error: {0}")]
    Crypto(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error(transparent)]
    Infra(#[from] InfraError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_names_match_taxonomy() {
        let date = NaiveDate::from_ymd_opt(2024, 6, 10).unwrap();
        assert_eq!(DomainError::InvalidDateRange.kind(), "InvalidDateRange");
        assert_eq!(DomainError::PastCheckIn(date).kind(), "PastCheckIn");
        assert_eq!(
            DomainError::RoomUnavailable {
                room_id: 1,
                check_in: date,
                check_out: date,
            }
            .kind(),
            "RoomUnavailable"
        );
        assert_eq!(
            DomainError::InvalidSearchTerm("a".into()).kind(),
            "InvalidSearchTerm"
        );
    }

    #[test]
    fn not_found_kinds_are_flagged() {
        assert!(DomainError::BookingNotFound(7).is_not_found());
        assert!(DomainError::GuestNotFound(7).is_not_found());
        assert!(!DomainError::InvalidSearchTerm("x".into()).is_not_found());
        assert!(!DomainError::InvalidDateRange.is_not_found());
    }

    #[test]
    fn db_errors_become_storage_errors() {
        let err: DomainError = sea_orm::DbErr::Custom("boom".into()).into();
        assert_eq!(err.kind(), "Storage");
        assert!(err.to_string().contains("boom"));
    }
}
