//! Authentication middleware for Axum

use axum::{
    body::Body,
    extract::State,
    http::{header, Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use jsonwebtoken::errors::ErrorKind;

use crate::domain::UserRole;
use crate::infrastructure::crypto::jwt::{verify_token, JwtConfig, TokenClaims};
use crate::interfaces::http::common::{ApiError, ApiResponse};

/// Authentication error types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthError {
    MissingToken,
    InvalidToken,
    ExpiredToken,
    InsufficientPermissions,
}

impl AuthError {
    fn status_and_message(self) -> (StatusCode, &'static str) {
        match self {
            Self::MissingToken => (StatusCode::UNAUTHORIZED, "Missing authentication token"),
            Self::InvalidToken => (StatusCode::UNAUTHORIZED, "Invalid authentication token"),
            Self::ExpiredToken => (StatusCode::UNAUTHORIZED, "Token has expired"),
            Self::InsufficientPermissions => (StatusCode::FORBIDDEN, "Insufficient permissions"),
        }
    }
}

impl From<AuthError> for ApiError {
    fn from(error: AuthError) -> Self {
        let (status, message) = error.status_and_message();
        (status, Json(ApiResponse::error(message)))
    }
}

/// State needed to verify bearer tokens
#[derive(Clone)]
pub struct AuthState {
    pub jwt_config: JwtConfig,
}

/// Staff member behind the current request
#[derive(Clone, Debug)]
pub struct AuthenticatedUser {
    pub user_id: String,
    pub username: String,
    pub role: UserRole,
}

impl AuthenticatedUser {
    fn from_claims(claims: TokenClaims) -> Result<Self, AuthError> {
        let role = claims.user_role().ok_or(AuthError::InvalidToken)?;
        Ok(Self {
            user_id: claims.sub,
            username: claims.username,
            role,
        })
    }

    pub fn is_admin(&self) -> bool {
        self.role == UserRole::Admin
    }

    /// Fails with 403 unless the caller holds one of `roles`.
    pub fn require_any(&self, roles: &[UserRole]) -> Result<(), ApiError> {
        if roles.contains(&self.role) {
            Ok(())
        } else {
            tracing::warn!(
                username = %self.username,
                role = self.role.as_str(),
                "Request rejected: insufficient role"
            );
            Err(AuthError::InsufficientPermissions.into())
        }
    }
}

/// Roles allowed to manage the room inventory and staff accounts
pub const MANAGEMENT: &[UserRole] = &[UserRole::Admin, UserRole::Manager];

/// Administrator only
pub const ADMIN_ONLY: &[UserRole] = &[UserRole::Admin];

fn extract_token(auth_header: &str) -> Option<&str> {
    auth_header
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

fn authenticate(auth_header: Option<&str>, config: &JwtConfig) -> Result<AuthenticatedUser, AuthError> {
    let auth_header = auth_header.ok_or(AuthError::MissingToken)?;
    let token = extract_token(auth_header).ok_or(AuthError::InvalidToken)?;
    let claims = verify_token(token, config).map_err(|e| match e.kind() {
        ErrorKind::ExpiredSignature => AuthError::ExpiredToken,
        _ => AuthError::InvalidToken,
    })?;
    AuthenticatedUser::from_claims(claims)
}

/// Bearer JWT authentication middleware
///
/// On success the [`AuthenticatedUser`] is stored in request extensions.
pub async fn auth_middleware(
    State(auth_state): State<AuthState>,
    mut request: Request<Body>,
    next: Next,
) -> Response {
    let auth_header = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok());

    match authenticate(auth_header, &auth_state.jwt_config) {
        Ok(user) => {
            request.extensions_mut().insert(user);
            next.run(request).await
        }
        Err(error) => {
            tracing::debug!(?error, "Authentication failed");
            ApiError::from(error).into_response()
        }
    }
}
