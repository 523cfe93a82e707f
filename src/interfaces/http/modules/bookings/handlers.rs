//! Booking API handlers
//!
//! Creation and status changes answer with a [`BookingResponseDto`]
//! whether or not the request was accepted; the HTTP status reflects
//! the outcome.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};

use super::dto::{
    BookingDetailsDto, BookingResponseDto, CreateBookingRequest, UpdateStatusRequest,
};
use crate::application::{describe_bookings, BookingService};
use crate::domain::{Booking, BookingStatus, DomainError, RepositoryProvider};
use crate::interfaces::http::common::{
    domain_error, not_found, status_for, ApiError, ApiResponse, ValidatedJson,
};
use crate::interfaces::http::middleware::AuthenticatedUser;

#[derive(Clone)]
pub struct BookingHandlerState {
    pub booking_service: Arc<BookingService>,
    pub repos: Arc<dyn RepositoryProvider>,
}

type DetailsList = Json<ApiResponse<Vec<BookingDetailsDto>>>;

async fn details_list(
    state: &BookingHandlerState,
    bookings: Vec<Booking>,
) -> Result<DetailsList, ApiError> {
    let details = describe_bookings(state.repos.as_ref(), bookings)
        .await
        .map_err(domain_error)?;
    Ok(Json(ApiResponse::success(
        details.into_iter().map(BookingDetailsDto::from).collect(),
    )))
}

#[utoipa::path(
    get,
    path = "/api/v1/bookings",
    tag = "Bookings",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "All bookings", body = ApiResponse<Vec<BookingDetailsDto>>)
    )
)]
pub async fn list_bookings(State(state): State<BookingHandlerState>) -> Result<DetailsList, ApiError> {
    let bookings = state
        .booking_service
        .list_bookings()
        .await
        .map_err(domain_error)?;
    details_list(&state, bookings).await
}

#[utoipa::path(
    get,
    path = "/api/v1/bookings/{id}",
    tag = "Bookings",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Booking ID")),
    responses(
        (status = 200, description = "Booking details", body = ApiResponse<BookingDetailsDto>),
        (status = 404, description = "Not found")
    )
)]
pub async fn get_booking(
    State(state): State<BookingHandlerState>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<BookingDetailsDto>>, ApiError> {
    let booking = state
        .booking_service
        .get_booking(id)
        .await
        .map_err(domain_error)?
        .ok_or_else(|| not_found(format!("Booking {} not found", id)))?;

    let details = describe_bookings(state.repos.as_ref(), vec![booking])
        .await
        .map_err(domain_error)?
        .pop()
        .ok_or_else(|| not_found(format!("Booking {} not found", id)))?;
    Ok(Json(ApiResponse::success(details.into())))
}

#[utoipa::path(
    get,
    path = "/api/v1/bookings/guest/{guest_id}",
    tag = "Bookings",
    security(("bearer_auth" = [])),
    params(("guest_id" = i32, Path, description = "Guest ID")),
    responses(
        (status = 200, description = "Bookings of one guest", body = ApiResponse<Vec<BookingDetailsDto>>)
    )
)]
pub async fn bookings_for_guest(
    State(state): State<BookingHandlerState>,
    Path(guest_id): Path<i32>,
) -> Result<DetailsList, ApiError> {
    let bookings = state
        .booking_service
        .bookings_for_guest(guest_id)
        .await
        .map_err(domain_error)?;
    details_list(&state, bookings).await
}

#[utoipa::path(
    get,
    path = "/api/v1/bookings/today/checkins",
    tag = "Bookings",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Confirmed arrivals for today", body = ApiResponse<Vec<BookingDetailsDto>>)
    )
)]
pub async fn today_check_ins(State(state): State<BookingHandlerState>) -> Result<DetailsList, ApiError> {
    let bookings = state
        .booking_service
        .today_check_ins()
        .await
        .map_err(domain_error)?;
    details_list(&state, bookings).await
}

#[utoipa::path(
    get,
    path = "/api/v1/bookings/today/checkouts",
    tag = "Bookings",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Departures due today", body = ApiResponse<Vec<BookingDetailsDto>>)
    )
)]
pub async fn today_check_outs(State(state): State<BookingHandlerState>) -> Result<DetailsList, ApiError> {
    let bookings = state
        .booking_service
        .today_check_outs()
        .await
        .map_err(domain_error)?;
    details_list(&state, bookings).await
}

#[utoipa::path(
    post,
    path = "/api/v1/bookings",
    tag = "Bookings",
    security(("bearer_auth" = [])),
    request_body = CreateBookingRequest,
    responses(
        (status = 201, description = "Booking confirmed", body = BookingResponseDto),
        (status = 400, description = "Booking rejected; `errors` says why", body = BookingResponseDto),
        (status = 500, description = "Storage failure", body = BookingResponseDto)
    )
)]
pub async fn create_booking(
    State(state): State<BookingHandlerState>,
    Extension(caller): Extension<AuthenticatedUser>,
    ValidatedJson(request): ValidatedJson<CreateBookingRequest>,
) -> (StatusCode, Json<BookingResponseDto>) {
    tracing::debug!(
        by = %caller.username,
        guest_id = request.guest_id,
        room_id = request.room_id,
        "Booking requested"
    );
    let response = state.booking_service.create_booking(request.into()).await;
    let status = match &response.error {
        None => StatusCode::CREATED,
        // Rule violations are the caller's fault; storage failures are ours.
        Some(error @ DomainError::Storage(_)) => status_for(error),
        Some(_) => StatusCode::BAD_REQUEST,
    };
    (status, Json(response.into()))
}

#[utoipa::path(
    put,
    path = "/api/v1/bookings/{id}/status",
    tag = "Bookings",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Booking ID")),
    request_body = UpdateStatusRequest,
    responses(
        (status = 200, description = "Status changed", body = BookingResponseDto),
        (status = 400, description = "Unknown status name"),
        (status = 404, description = "Booking not found", body = BookingResponseDto),
        (status = 409, description = "Transition not allowed", body = BookingResponseDto)
    )
)]
pub async fn update_booking_status(
    State(state): State<BookingHandlerState>,
    Extension(caller): Extension<AuthenticatedUser>,
    Path(id): Path<i32>,
    ValidatedJson(request): ValidatedJson<UpdateStatusRequest>,
) -> Result<(StatusCode, Json<BookingResponseDto>), ApiError> {
    let status: BookingStatus = request.status.parse().map_err(domain_error)?;
    tracing::debug!(booking_id = id, by = %caller.username, %status, "Status change requested");

    let response = state.booking_service.update_booking_status(id, status).await;
    let code = match &response.error {
        None => StatusCode::OK,
        Some(error) => status_for(error),
    };
    Ok((code, Json(response.into())))
}

#[utoipa::path(
    delete,
    path = "/api/v1/bookings/{id}",
    tag = "Bookings",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Booking ID")),
    responses(
        (status = 204, description = "Booking cancelled"),
        (status = 404, description = "Not found"),
        (status = 409, description = "Booking can no longer be cancelled")
    )
)]
pub async fn cancel_booking(
    State(state): State<BookingHandlerState>,
    Extension(caller): Extension<AuthenticatedUser>,
    Path(id): Path<i32>,
) -> Result<StatusCode, ApiError> {
    match state.booking_service.cancel_booking(id).await {
        Ok(true) => {
            tracing::debug!(booking_id = id, by = %caller.username, "Cancellation accepted");
            Ok(StatusCode::NO_CONTENT)
        }
        Ok(false) => Err(not_found(format!("Booking {} not found", id))),
        Err(e) => Err(domain_error(e)),
    }
}
