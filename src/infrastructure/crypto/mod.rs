//! JWT issuance and bcrypt password hashing

pub mod jwt;
pub mod password;
