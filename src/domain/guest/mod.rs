//! Guest aggregate

pub mod model;
pub mod repository;

pub use model::{Guest, GuestProfile};
pub use repository::GuestRepository;
