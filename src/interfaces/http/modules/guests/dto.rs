//! Guest DTOs

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::domain::{Guest, GuestProfile};

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct GuestDto {
    pub id: i32,
    pub first_name: String,
    pub last_name: String,
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub passport_number: String,
    pub date_of_birth: NaiveDate,
    pub address: String,
    pub created_at: DateTime<Utc>,
    pub is_active: bool,
}

impl From<Guest> for GuestDto {
    fn from(g: Guest) -> Self {
        Self {
            full_name: g.full_name(),
            id: g.id,
            first_name: g.first_name,
            last_name: g.last_name,
            email: g.email,
            phone: g.phone,
            passport_number: g.passport_number,
            date_of_birth: g.date_of_birth,
            address: g.address,
            created_at: g.created_at,
            is_active: g.is_active,
        }
    }
}

/// Create / update guest request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct GuestRequest {
    #[validate(length(min = 1, max = 50, message = "first name is required"))]
    pub first_name: String,
    #[validate(length(min = 1, max = 50, message = "last name is required"))]
    pub last_name: String,
    #[validate(email(message = "invalid email format"))]
    pub email: String,
    #[validate(length(min = 1, max = 20, message = "phone is required"))]
    pub phone: String,
    #[validate(length(min = 1, max = 20, message = "passport number is required"))]
    pub passport_number: String,
    pub date_of_birth: NaiveDate,
    #[serde(default)]
    #[validate(length(max = 200))]
    pub address: String,
}

impl From<GuestRequest> for GuestProfile {
    fn from(r: GuestRequest) -> Self {
        Self {
            first_name: r.first_name.trim().to_string(),
            last_name: r.last_name.trim().to_string(),
            email: r.email,
            phone: r.phone,
            passport_number: r.passport_number,
            date_of_birth: r.date_of_birth,
            address: r.address,
        }
    }
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct GuestSearchParams {
    /// At least two characters, matched ignoring case
    #[serde(default)]
    pub term: String,
}
