use std::str::FromStr;

use chrono::{DateTime, Utc};

use crate::shared::errors::DomainError;

/// Staff role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UserRole {
    Admin,
    Manager,
    #[default]
    Receptionist,
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Manager => "manager",
            Self::Receptionist => "receptionist",
        }
    }
}

impl FromStr for UserRole {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "admin" => Ok(Self::Admin),
            "manager" => Ok(Self::Manager),
            "receptionist" => Ok(Self::Receptionist),
            other => Err(DomainError::Validation(format!("Unknown role: {}", other))),
        }
    }
}

/// User model
#[derive(Clone, Debug)]
pub struct User {
    pub id: String,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub role: UserRole,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub last_login_at: Option<DateTime<Utc>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_round_trips_through_str() {
        for role in [UserRole::Admin, UserRole::Manager, UserRole::Receptionist] {
            assert_eq!(role.as_str().parse::<UserRole>(), Ok(role));
        }
        assert_eq!("Manager".parse::<UserRole>(), Ok(UserRole::Manager));
        assert!("viewer".parse::<UserRole>().is_err());
    }
}
