//! HTTP REST API
//!
//! - `common`: response envelope, error mapping, validated JSON extractor
//! - `middleware`: bearer JWT authentication and role gates
//! - `modules`: handlers and DTOs per resource, request-id and metrics middleware
//! - `router`: route table with Swagger documentation

pub mod common;
pub mod middleware;
pub mod modules;
pub mod router;


pub use router::{create_api_router, ApiContext, ApiDoc};
