//! Identity module: staff accounts and authentication
//!
//! Contains the `UserService` which handles login, registration and the
//! default administrator account.

pub mod service;

pub use service::{AuthResult, UserService};
