//! Authentication API handlers
//!
//! Thin wrappers over [`UserService`].

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, Extension, Json};

use super::dto::{ChangePasswordRequest, LoginRequest, LoginResponse, RegisterRequest, UserInfo};
use crate::application::UserService;
use crate::domain::UserRole;
use crate::interfaces::http::common::{domain_error, not_found, ApiError, ApiResponse, ValidatedJson};
use crate::interfaces::http::middleware::{AuthError, AuthenticatedUser, MANAGEMENT};

#[derive(Clone)]
pub struct AuthHandlerState {
    pub user_service: Arc<UserService>,
}

#[utoipa::path(
    post,
    path = "/api/v1/auth/login",
    tag = "Authentication",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Successful login", body = ApiResponse<LoginResponse>),
        (status = 401, description = "Invalid credentials")
    )
)]
pub async fn login(
    State(state): State<AuthHandlerState>,
    ValidatedJson(request): ValidatedJson<LoginRequest>,
) -> Result<Json<ApiResponse<LoginResponse>>, ApiError> {
    let result = state
        .user_service
        .login(&request.username, &request.password)
        .await
        .map_err(domain_error)?;
    Ok(Json(ApiResponse::success(result.into())))
}

#[utoipa::path(
    post,
    path = "/api/v1/auth/register",
    tag = "Authentication",
    security(("bearer_auth" = [])),
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Staff account created", body = ApiResponse<UserInfo>),
        (status = 403, description = "Caller may not create this account"),
        (status = 409, description = "Username or email already exists"),
        (status = 422, description = "Validation error")
    )
)]
pub async fn register(
    State(state): State<AuthHandlerState>,
    Extension(caller): Extension<AuthenticatedUser>,
    ValidatedJson(request): ValidatedJson<RegisterRequest>,
) -> Result<(StatusCode, Json<ApiResponse<UserInfo>>), ApiError> {
    caller.require_any(MANAGEMENT)?;

    let role = match request.role.as_deref() {
        Some(role) => role.parse::<UserRole>().map_err(domain_error)?,
        None => UserRole::default(),
    };
    // Managers hire staff; only an admin creates another admin.
    if role == UserRole::Admin && !caller.is_admin() {
        return Err(AuthError::InsufficientPermissions.into());
    }

    let user = state
        .user_service
        .register(&request.username, &request.email, &request.password, role)
        .await
        .map_err(domain_error)?;

    Ok((StatusCode::CREATED, Json(ApiResponse::success(user.into()))))
}

#[utoipa::path(
    get,
    path = "/api/v1/auth/me",
    tag = "Authentication",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Current user info", body = ApiResponse<UserInfo>),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn get_current_user(
    State(state): State<AuthHandlerState>,
    Extension(caller): Extension<AuthenticatedUser>,
) -> Result<Json<ApiResponse<UserInfo>>, ApiError> {
    match state.user_service.get_user_by_id(&caller.user_id).await {
        Ok(Some(user)) => Ok(Json(ApiResponse::success(user.into()))),
        Ok(None) => Err(not_found("User not found")),
        Err(e) => Err(domain_error(e)),
    }
}

#[utoipa::path(
    post,
    path = "/api/v1/auth/change-password",
    tag = "Authentication",
    security(("bearer_auth" = [])),
    request_body = ChangePasswordRequest,
    responses(
        (status = 200, description = "Password changed", body = ApiResponse<String>),
        (status = 400, description = "Wrong current password or confirmation mismatch"),
        (status = 404, description = "Account no longer exists"),
        (status = 422, description = "Validation error")
    )
)]
pub async fn change_password(
    State(state): State<AuthHandlerState>,
    Extension(caller): Extension<AuthenticatedUser>,
    ValidatedJson(request): ValidatedJson<ChangePasswordRequest>,
) -> Result<Json<ApiResponse<String>>, ApiError> {
    state
        .user_service
        .change_password(
            &caller.user_id,
            &request.current_password,
            &request.new_password,
            &request.confirm_new_password,
        )
        .await
        .map_err(domain_error)?;
    Ok(Json(ApiResponse::success("Password changed".to_string())))
}
