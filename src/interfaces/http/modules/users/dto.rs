//! User administration DTOs

use serde::Deserialize;
use utoipa::ToSchema;
use validator::Validate;

/// Replacement role set. Accounts carry a single role, so exactly one is
/// accepted.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateRolesRequest {
    /// admin, manager or receptionist
    #[validate(length(min = 1, max = 1, message = "exactly one role is required"))]
    pub roles: Vec<String>,
}
