//! User administration handlers
//!
//! Reads are open to management; destructive changes need an admin.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Extension, Json,
};

use super::dto::UpdateRolesRequest;
use crate::application::UserService;
use crate::domain::{DomainError, UserRole};
use crate::interfaces::http::common::{domain_error, not_found, ApiError, ApiResponse, ValidatedJson};
use crate::interfaces::http::middleware::{AuthenticatedUser, ADMIN_ONLY, MANAGEMENT};
use crate::interfaces::http::modules::auth::UserInfo;

#[derive(Clone)]
pub struct UserHandlerState {
    pub user_service: Arc<UserService>,
}

fn user_not_found(id: &str) -> ApiError {
    not_found(format!("User '{}' not found", id))
}

#[utoipa::path(
    get,
    path = "/api/v1/users",
    tag = "Users",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Active staff accounts", body = ApiResponse<Vec<UserInfo>>),
        (status = 403, description = "Requires admin or manager")
    )
)]
pub async fn list_users(
    State(state): State<UserHandlerState>,
    Extension(caller): Extension<AuthenticatedUser>,
) -> Result<Json<ApiResponse<Vec<UserInfo>>>, ApiError> {
    caller.require_any(MANAGEMENT)?;
    let users = state.user_service.list_users().await.map_err(domain_error)?;
    Ok(Json(ApiResponse::success(
        users.into_iter().map(UserInfo::from).collect(),
    )))
}

#[utoipa::path(
    get,
    path = "/api/v1/users/{id}",
    tag = "Users",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "User ID")),
    responses(
        (status = 200, description = "User details", body = ApiResponse<UserInfo>),
        (status = 403, description = "Requires admin or manager"),
        (status = 404, description = "Not found or inactive")
    )
)]
pub async fn get_user(
    State(state): State<UserHandlerState>,
    Extension(caller): Extension<AuthenticatedUser>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<UserInfo>>, ApiError> {
    caller.require_any(MANAGEMENT)?;
    match state.user_service.get_active_user(&id).await {
        Ok(Some(user)) => Ok(Json(ApiResponse::success(user.into()))),
        Ok(None) => Err(user_not_found(&id)),
        Err(e) => Err(domain_error(e)),
    }
}

#[utoipa::path(
    delete,
    path = "/api/v1/users/{id}",
    tag = "Users",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "User ID")),
    responses(
        (status = 200, description = "User deleted", body = ApiResponse<String>),
        (status = 403, description = "Requires admin"),
        (status = 404, description = "Not found")
    )
)]
pub async fn delete_user(
    State(state): State<UserHandlerState>,
    Extension(caller): Extension<AuthenticatedUser>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<String>>, ApiError> {
    caller.require_any(ADMIN_ONLY)?;
    match state.user_service.delete_user(&id).await {
        Ok(()) => {
            tracing::info!(user_id = %id, by = %caller.username, "User deleted");
            Ok(Json(ApiResponse::success("User deleted".to_string())))
        }
        Err(e) if e.is_not_found() => Err(user_not_found(&id)),
        Err(e) => Err(domain_error(e)),
    }
}

#[utoipa::path(
    put,
    path = "/api/v1/users/{id}/roles",
    tag = "Users",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "User ID")),
    request_body = UpdateRolesRequest,
    responses(
        (status = 200, description = "Role replaced", body = ApiResponse<UserInfo>),
        (status = 400, description = "Unknown role"),
        (status = 403, description = "Requires admin"),
        (status = 404, description = "Not found or inactive"),
        (status = 422, description = "Not exactly one role")
    )
)]
pub async fn update_user_roles(
    State(state): State<UserHandlerState>,
    Extension(caller): Extension<AuthenticatedUser>,
    Path(id): Path<String>,
    ValidatedJson(request): ValidatedJson<UpdateRolesRequest>,
) -> Result<Json<ApiResponse<UserInfo>>, ApiError> {
    caller.require_any(ADMIN_ONLY)?;
    let role = request
        .roles
        .first()
        .ok_or_else(|| domain_error(DomainError::Validation("A role is required".into())))?
        .parse::<UserRole>()
        .map_err(domain_error)?;

    match state.user_service.set_role(&id, role).await {
        Ok(user) => Ok(Json(ApiResponse::success(user.into()))),
        Err(e) if e.is_not_found() => Err(user_not_found(&id)),
        Err(e) => Err(domain_error(e)),
    }
}
