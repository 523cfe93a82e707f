//! Room type API handlers
//!
//! Reads are public; writes need a management role, deletes an admin.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};

use super::dto::{RoomTypeDto, RoomTypeRequest};
use crate::application::RoomTypeService;
use crate::interfaces::http::common::{domain_error, not_found, ApiError, ApiResponse, ValidatedJson};
use crate::interfaces::http::middleware::{AuthenticatedUser, ADMIN_ONLY, MANAGEMENT};

#[derive(Clone)]
pub struct RoomTypeHandlerState {
    pub room_type_service: Arc<RoomTypeService>,
}

fn room_type_not_found(id: i32) -> ApiError {
    not_found(format!("Room type {} not found", id))
}

#[utoipa::path(
    get,
    path = "/api/v1/room-types",
    tag = "Room Types",
    responses(
        (status = 200, description = "All room types", body = ApiResponse<Vec<RoomTypeDto>>)
    )
)]
pub async fn list_room_types(
    State(state): State<RoomTypeHandlerState>,
) -> Result<Json<ApiResponse<Vec<RoomTypeDto>>>, ApiError> {
    let types = state
        .room_type_service
        .list_room_types()
        .await
        .map_err(domain_error)?;
    Ok(Json(ApiResponse::success(
        types.into_iter().map(RoomTypeDto::from).collect(),
    )))
}

#[utoipa::path(
    get,
    path = "/api/v1/room-types/{id}",
    tag = "Room Types",
    params(("id" = i32, Path, description = "Room type ID")),
    responses(
        (status = 200, description = "Room type", body = ApiResponse<RoomTypeDto>),
        (status = 404, description = "Not found")
    )
)]
pub async fn get_room_type(
    State(state): State<RoomTypeHandlerState>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<RoomTypeDto>>, ApiError> {
    match state.room_type_service.get_room_type(id).await {
        Ok(Some(room_type)) => Ok(Json(ApiResponse::success(room_type.into()))),
        Ok(None) => Err(room_type_not_found(id)),
        Err(e) => Err(domain_error(e)),
    }
}

#[utoipa::path(
    post,
    path = "/api/v1/room-types",
    tag = "Room Types",
    security(("bearer_auth" = [])),
    request_body = RoomTypeRequest,
    responses(
        (status = 201, description = "Room type created", body = ApiResponse<RoomTypeDto>),
        (status = 403, description = "Requires admin or manager")
    )
)]
pub async fn create_room_type(
    State(state): State<RoomTypeHandlerState>,
    Extension(caller): Extension<AuthenticatedUser>,
    ValidatedJson(request): ValidatedJson<RoomTypeRequest>,
) -> Result<(StatusCode, Json<ApiResponse<RoomTypeDto>>), ApiError> {
    caller.require_any(MANAGEMENT)?;
    let room_type = state
        .room_type_service
        .create_room_type(&request.name, &request.description)
        .await
        .map_err(domain_error)?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(room_type.into()))))
}

#[utoipa::path(
    put,
    path = "/api/v1/room-types/{id}",
    tag = "Room Types",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Room type ID")),
    request_body = RoomTypeRequest,
    responses(
        (status = 200, description = "Room type updated", body = ApiResponse<RoomTypeDto>),
        (status = 404, description = "Not found")
    )
)]
pub async fn update_room_type(
    State(state): State<RoomTypeHandlerState>,
    Extension(caller): Extension<AuthenticatedUser>,
    Path(id): Path<i32>,
    ValidatedJson(request): ValidatedJson<RoomTypeRequest>,
) -> Result<Json<ApiResponse<RoomTypeDto>>, ApiError> {
    caller.require_any(MANAGEMENT)?;
    match state
        .room_type_service
        .update_room_type(id, &request.name, &request.description)
        .await
    {
        Ok(Some(room_type)) => Ok(Json(ApiResponse::success(room_type.into()))),
        Ok(None) => Err(room_type_not_found(id)),
        Err(e) => Err(domain_error(e)),
    }
}

#[utoipa::path(
    delete,
    path = "/api/v1/room-types/{id}",
    tag = "Room Types",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Room type ID")),
    responses(
        (status = 204, description = "Room type deleted"),
        (status = 404, description = "Not found"),
        (status = 409, description = "Rooms still use this type")
    )
)]
pub async fn delete_room_type(
    State(state): State<RoomTypeHandlerState>,
    Extension(caller): Extension<AuthenticatedUser>,
    Path(id): Path<i32>,
) -> Result<StatusCode, ApiError> {
    caller.require_any(ADMIN_ONLY)?;
    match state.room_type_service.delete_room_type(id).await {
        Ok(true) => Ok(StatusCode::NO_CONTENT),
        Ok(false) => Err(room_type_not_found(id)),
        Err(e) => Err(domain_error(e)),
    }
}
