//! Guest API handlers

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};

use super::dto::{GuestDto, GuestRequest, GuestSearchParams};
use crate::application::GuestService;
use crate::interfaces::http::common::{domain_error, not_found, ApiError, ApiResponse, ValidatedJson};
use crate::interfaces::http::middleware::{AuthenticatedUser, MANAGEMENT};

#[derive(Clone)]
pub struct GuestHandlerState {
    pub guest_service: Arc<GuestService>,
}

fn guest_not_found(id: i32) -> ApiError {
    not_found(format!("Guest {} not found", id))
}

#[utoipa::path(
    get,
    path = "/api/v1/guests",
    tag = "Guests",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Active guests", body = ApiResponse<Vec<GuestDto>>)
    )
)]
pub async fn list_guests(
    State(state): State<GuestHandlerState>,
) -> Result<Json<ApiResponse<Vec<GuestDto>>>, ApiError> {
    let guests = state.guest_service.list_guests().await.map_err(domain_error)?;
    Ok(Json(ApiResponse::success(
        guests.into_iter().map(GuestDto::from).collect(),
    )))
}

#[utoipa::path(
    get,
    path = "/api/v1/guests/search",
    tag = "Guests",
    security(("bearer_auth" = [])),
    params(GuestSearchParams),
    responses(
        (status = 200, description = "Matching active guests", body = ApiResponse<Vec<GuestDto>>),
        (status = 400, description = "Search term shorter than two characters")
    )
)]
pub async fn search_guests(
    State(state): State<GuestHandlerState>,
    Query(params): Query<GuestSearchParams>,
) -> Result<Json<ApiResponse<Vec<GuestDto>>>, ApiError> {
    let guests = state
        .guest_service
        .search_guests(&params.term)
        .await
        .map_err(domain_error)?;
    Ok(Json(ApiResponse::success(
        guests.into_iter().map(GuestDto::from).collect(),
    )))
}

#[utoipa::path(
    get,
    path = "/api/v1/guests/{id}",
    tag = "Guests",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Guest ID")),
    responses(
        (status = 200, description = "Guest details", body = ApiResponse<GuestDto>),
        (status = 404, description = "Not found or deactivated")
    )
)]
pub async fn get_guest(
    State(state): State<GuestHandlerState>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<GuestDto>>, ApiError> {
    match state.guest_service.get_guest(id).await {
        Ok(Some(guest)) => Ok(Json(ApiResponse::success(guest.into()))),
        Ok(None) => Err(guest_not_found(id)),
        Err(e) => Err(domain_error(e)),
    }
}

#[utoipa::path(
    post,
    path = "/api/v1/guests",
    tag = "Guests",
    security(("bearer_auth" = [])),
    request_body = GuestRequest,
    responses(
        (status = 201, description = "Guest registered", body = ApiResponse<GuestDto>),
        (status = 422, description = "Validation error")
    )
)]
pub async fn create_guest(
    State(state): State<GuestHandlerState>,
    ValidatedJson(request): ValidatedJson<GuestRequest>,
) -> Result<(StatusCode, Json<ApiResponse<GuestDto>>), ApiError> {
    let guest = state
        .guest_service
        .create_guest(request.into())
        .await
        .map_err(domain_error)?;
    tracing::info!(guest_id = guest.id, "Guest registered");
    Ok((StatusCode::CREATED, Json(ApiResponse::success(guest.into()))))
}

#[utoipa::path(
    put,
    path = "/api/v1/guests/{id}",
    tag = "Guests",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Guest ID")),
    request_body = GuestRequest,
    responses(
        (status = 200, description = "Guest updated", body = ApiResponse<GuestDto>),
        (status = 404, description = "Not found or deactivated")
    )
)]
pub async fn update_guest(
    State(state): State<GuestHandlerState>,
    Path(id): Path<i32>,
    ValidatedJson(request): ValidatedJson<GuestRequest>,
) -> Result<Json<ApiResponse<GuestDto>>, ApiError> {
    match state.guest_service.update_guest(id, request.into()).await {
        Ok(Some(guest)) => Ok(Json(ApiResponse::success(guest.into()))),
        Ok(None) => Err(guest_not_found(id)),
        Err(e) => Err(domain_error(e)),
    }
}

#[utoipa::path(
    delete,
    path = "/api/v1/guests/{id}",
    tag = "Guests",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Guest ID")),
    responses(
        (status = 204, description = "Guest deactivated"),
        (status = 403, description = "Requires admin or manager"),
        (status = 404, description = "Not found")
    )
)]
pub async fn delete_guest(
    State(state): State<GuestHandlerState>,
    Extension(caller): Extension<AuthenticatedUser>,
    Path(id): Path<i32>,
) -> Result<StatusCode, ApiError> {
    caller.require_any(MANAGEMENT)?;
    match state.guest_service.delete_guest(id).await {
        Ok(true) => {
            tracing::info!(guest_id = id, by = %caller.username, "Guest deactivated");
            Ok(StatusCode::NO_CONTENT)
        }
        Ok(false) => Err(guest_not_found(id)),
        Err(e) => Err(domain_error(e)),
    }
}
