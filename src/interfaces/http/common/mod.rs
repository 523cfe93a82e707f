//! Shared HTTP building blocks: response envelope, error mapping, extractors

pub mod validated_json;

use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::DomainError;

pub use validated_json::ValidatedJson;

/// Standard API response envelope
///
/// Success: `{"success": true, "data": {...}}`,
/// failure: `{"success": false, "data": null, "error": "..."}`.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
        }
    }
}

/// Error half of every handler result
pub type ApiError = (StatusCode, Json<ApiResponse<()>>);

/// HTTP status for a domain error kind.
pub fn status_for(error: &DomainError) -> StatusCode {
    match error {
        e if e.is_not_found() => StatusCode::NOT_FOUND,
        DomainError::InvalidDateRange
        | DomainError::PastCheckIn(_)
        | DomainError::CapacityExceeded { .. }
        | DomainError::InvalidSearchTerm(_)
        | DomainError::Validation(_) => StatusCode::BAD_REQUEST,
        DomainError::RoomUnavailable { .. }
        | DomainError::DuplicateRoomNumber(_)
        | DomainError::InvalidStatusTransition { .. }
        | DomainError::RoomTypeInUse(_)
        | DomainError::RoomInUse(_)
        | DomainError::Conflict(_) => StatusCode::CONFLICT,
        DomainError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl From<DomainError> for ApiResponse<()> {
    fn from(error: DomainError) -> Self {
        ApiResponse::error(error.to_string())
    }
}

pub fn domain_error(error: DomainError) -> ApiError {
    if matches!(error, DomainError::Storage(_)) {
        tracing::error!(error = %error, "Storage failure while handling request");
    }
    (status_for(&error), Json(error.into()))
}

pub fn not_found(message: impl Into<String>) -> ApiError {
    (StatusCode::NOT_FOUND, Json(ApiResponse::error(message)))
}
