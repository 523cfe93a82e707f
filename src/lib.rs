//! # Hotel Booking Service
//!
//! Reservations, room availability and the guest directory for a single
//! hotel, served as a JSON REST API.
//!
//! ## Architecture
//!
//! The project follows Clean Architecture principles:
//!
//! - **domain**: Core business entities, status rules and repository traits
//! - **application**: Booking lifecycle, availability search and directory services
//! - **infrastructure**: SeaORM storage, in-memory storage, JWT and password hashing
//! - **interfaces**: REST API with Swagger documentation
//! - **shared**: Errors, clock and shutdown coordination
//! - **server**: Process lifecycle wiring everything together

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod interfaces;
pub mod server;
pub mod shared;

pub use config::{default_config_path, AppConfig};

// Re-export storage backends for easy access
pub use infrastructure::{
    init_database, DatabaseConfig, InMemoryRepositoryProvider, SeaOrmRepositoryProvider,
};

// Re-export API router
pub use interfaces::http::{create_api_router, ApiContext};
