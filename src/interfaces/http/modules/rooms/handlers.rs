//! Room API handlers

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};

use super::dto::{AvailabilityParams, RoomDto, RoomRequest};
use crate::application::{AvailabilityService, RoomService};
use crate::domain::Room;
use crate::interfaces::http::common::{domain_error, not_found, ApiError, ApiResponse, ValidatedJson};
use crate::interfaces::http::middleware::{AuthenticatedUser, ADMIN_ONLY, MANAGEMENT};

#[derive(Clone)]
pub struct RoomHandlerState {
    pub room_service: Arc<RoomService>,
    pub availability: Arc<AvailabilityService>,
}

fn room_not_found(id: i32) -> ApiError {
    not_found(format!("Room {} not found", id))
}

fn room_list(rooms: Vec<Room>) -> Json<ApiResponse<Vec<RoomDto>>> {
    Json(ApiResponse::success(rooms.into_iter().map(RoomDto::from).collect()))
}

#[utoipa::path(
    get,
    path = "/api/v1/rooms",
    tag = "Rooms",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "All rooms", body = ApiResponse<Vec<RoomDto>>)
    )
)]
pub async fn list_rooms(
    State(state): State<RoomHandlerState>,
) -> Result<Json<ApiResponse<Vec<RoomDto>>>, ApiError> {
    let rooms = state.room_service.list_rooms().await.map_err(domain_error)?;
    Ok(room_list(rooms))
}

#[utoipa::path(
    get,
    path = "/api/v1/rooms/available",
    tag = "Rooms",
    security(("bearer_auth" = [])),
    params(AvailabilityParams),
    responses(
        (status = 200, description = "Rooms on sale and free for the whole stay", body = ApiResponse<Vec<RoomDto>>),
        (status = 400, description = "Empty, inverted or past date range")
    )
)]
pub async fn available_rooms(
    State(state): State<RoomHandlerState>,
    Query(params): Query<AvailabilityParams>,
) -> Result<Json<ApiResponse<Vec<RoomDto>>>, ApiError> {
    let rooms = state
        .availability
        .available_rooms(params.check_in, params.check_out)
        .await
        .map_err(domain_error)?;
    Ok(room_list(rooms))
}

#[utoipa::path(
    get,
    path = "/api/v1/rooms/{id}",
    tag = "Rooms",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Room ID")),
    responses(
        (status = 200, description = "Room details", body = ApiResponse<RoomDto>),
        (status = 404, description = "Not found")
    )
)]
pub async fn get_room(
    State(state): State<RoomHandlerState>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<RoomDto>>, ApiError> {
    match state.room_service.get_room(id).await {
        Ok(Some(room)) => Ok(Json(ApiResponse::success(room.into()))),
        Ok(None) => Err(room_not_found(id)),
        Err(e) => Err(domain_error(e)),
    }
}

#[utoipa::path(
    post,
    path = "/api/v1/rooms",
    tag = "Rooms",
    security(("bearer_auth" = [])),
    request_body = RoomRequest,
    responses(
        (status = 201, description = "Room created", body = ApiResponse<RoomDto>),
        (status = 400, description = "Non-positive price or capacity"),
        (status = 404, description = "Unknown room type"),
        (status = 409, description = "Room number already exists")
    )
)]
pub async fn create_room(
    State(state): State<RoomHandlerState>,
    Extension(caller): Extension<AuthenticatedUser>,
    ValidatedJson(request): ValidatedJson<RoomRequest>,
) -> Result<(StatusCode, Json<ApiResponse<RoomDto>>), ApiError> {
    caller.require_any(MANAGEMENT)?;
    let room = state
        .room_service
        .create_room(request.into())
        .await
        .map_err(domain_error)?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(room.into()))))
}

#[utoipa::path(
    put,
    path = "/api/v1/rooms/{id}",
    tag = "Rooms",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Room ID")),
    request_body = RoomRequest,
    responses(
        (status = 200, description = "Room updated", body = ApiResponse<RoomDto>),
        (status = 404, description = "Room or room type not found"),
        (status = 409, description = "Room number already exists")
    )
)]
pub async fn update_room(
    State(state): State<RoomHandlerState>,
    Extension(caller): Extension<AuthenticatedUser>,
    Path(id): Path<i32>,
    ValidatedJson(request): ValidatedJson<RoomRequest>,
) -> Result<Json<ApiResponse<RoomDto>>, ApiError> {
    caller.require_any(MANAGEMENT)?;
    match state.room_service.update_room(id, request.into()).await {
        Ok(Some(room)) => Ok(Json(ApiResponse::success(room.into()))),
        Ok(None) => Err(room_not_found(id)),
        Err(e) => Err(domain_error(e)),
    }
}

#[utoipa::path(
    delete,
    path = "/api/v1/rooms/{id}",
    tag = "Rooms",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Room ID")),
    responses(
        (status = 204, description = "Room deleted"),
        (status = 404, description = "Not found"),
        (status = 409, description = "Bookings still reference the room")
    )
)]
pub async fn delete_room(
    State(state): State<RoomHandlerState>,
    Extension(caller): Extension<AuthenticatedUser>,
    Path(id): Path<i32>,
) -> Result<StatusCode, ApiError> {
    caller.require_any(ADMIN_ONLY)?;
    match state.room_service.delete_room(id).await {
        Ok(true) => Ok(StatusCode::NO_CONTENT),
        Ok(false) => Err(room_not_found(id)),
        Err(e) => Err(domain_error(e)),
    }
}
