//! API Router with Swagger UI

use std::sync::Arc;
use std::time::Instant;

use axum::{
    extract::FromRef,
    middleware,
    routing::{get, post, put},
    Router,
};
use bcrypt::DEFAULT_COST;
use metrics_exporter_prometheus::PrometheusHandle;
use sea_orm::DatabaseConnection;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};
use utoipa_swagger_ui::SwaggerUi;

use crate::application::{
    AvailabilityService, BookingService, GuestService, RoomService, RoomTypeService, UserService,
};
use crate::domain::{RepositoryProvider, TransitionPolicy};
use crate::infrastructure::crypto::jwt::JwtConfig;
use crate::interfaces::http::common::ApiResponse;
use crate::interfaces::http::middleware::{auth_middleware, AuthState};
use crate::shared::{SharedClock, SystemClock};

use super::modules::{
    auth, bookings, guests, health, metrics as metrics_module, request_id, room_types, rooms,
    users,
};

/// Everything the HTTP layer is built from
#[derive(Clone)]
pub struct ApiContext {
    pub repos: Arc<dyn RepositoryProvider>,
    pub clock: SharedClock,
    pub transition_policy: TransitionPolicy,
    pub jwt_config: JwtConfig,
    pub password_hash_cost: u32,
    /// Pinged by `/health`; absent for in-memory repositories
    pub db: Option<DatabaseConnection>,
    /// Serves `/metrics` when a recorder is installed
    pub prometheus: Option<PrometheusHandle>,
}

impl ApiContext {
    pub fn new(repos: Arc<dyn RepositoryProvider>, jwt_config: JwtConfig) -> Self {
        Self {
            repos,
            clock: Arc::new(SystemClock),
            transition_policy: TransitionPolicy::default(),
            jwt_config,
            password_hash_cost: DEFAULT_COST,
            db: None,
            prometheus: None,
        }
    }
}

/// Services shared by all API routes. Each handler module extracts its
/// own slice through `FromRef`.
#[derive(Clone)]
pub struct ApiState {
    pub repos: Arc<dyn RepositoryProvider>,
    pub bookings: Arc<BookingService>,
    pub availability: Arc<AvailabilityService>,
    pub guests: Arc<GuestService>,
    pub rooms: Arc<RoomService>,
    pub room_types: Arc<RoomTypeService>,
    pub users: Arc<UserService>,
    pub auth: AuthState,
}

impl ApiState {
    fn from_context(ctx: &ApiContext) -> Self {
        let repos = Arc::clone(&ctx.repos);
        Self {
            bookings: Arc::new(BookingService::new(
                Arc::clone(&repos),
                Arc::clone(&ctx.clock),
                ctx.transition_policy,
            )),
            availability: Arc::new(AvailabilityService::new(
                Arc::clone(&repos),
                Arc::clone(&ctx.clock),
            )),
            guests: Arc::new(GuestService::new(Arc::clone(&repos))),
            rooms: Arc::new(RoomService::new(Arc::clone(&repos))),
            room_types: Arc::new(RoomTypeService::new(Arc::clone(&repos))),
            users: Arc::new(
                UserService::new(Arc::clone(&repos), ctx.jwt_config.clone())
                    .with_hash_cost(ctx.password_hash_cost),
            ),
            auth: AuthState {
                jwt_config: ctx.jwt_config.clone(),
            },
            repos,
        }
    }
}

impl FromRef<ApiState> for AuthState {
    fn from_ref(s: &ApiState) -> Self {
        s.auth.clone()
    }
}

impl FromRef<ApiState> for auth::AuthHandlerState {
    fn from_ref(s: &ApiState) -> Self {
        auth::AuthHandlerState {
            user_service: Arc::clone(&s.users),
        }
    }
}

impl FromRef<ApiState> for users::UserHandlerState {
    fn from_ref(s: &ApiState) -> Self {
        users::UserHandlerState {
            user_service: Arc::clone(&s.users),
        }
    }
}

impl FromRef<ApiState> for guests::GuestHandlerState {
    fn from_ref(s: &ApiState) -> Self {
        guests::GuestHandlerState {
            guest_service: Arc::clone(&s.guests),
        }
    }
}

impl FromRef<ApiState> for room_types::RoomTypeHandlerState {
    fn from_ref(s: &ApiState) -> Self {
        room_types::RoomTypeHandlerState {
            room_type_service: Arc::clone(&s.room_types),
        }
    }
}

impl FromRef<ApiState> for rooms::RoomHandlerState {
    fn from_ref(s: &ApiState) -> Self {
        rooms::RoomHandlerState {
            room_service: Arc::clone(&s.rooms),
            availability: Arc::clone(&s.availability),
        }
    }
}

impl FromRef<ApiState> for bookings::BookingHandlerState {
    fn from_ref(s: &ApiState) -> Self {
        bookings::BookingHandlerState {
            booking_service: Arc::clone(&s.bookings),
            repos: Arc::clone(&s.repos),
        }
    }
}

/// Security scheme modifier for OpenAPI
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .description(Some("JWT issued by /api/v1/auth/login"))
                        .build(),
                ),
            );
        }
    }
}

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    paths(
        health::health_check,
        auth::login,
        auth::register,
        auth::get_current_user,
        auth::change_password,
        users::list_users,
        users::get_user,
        users::delete_user,
        users::update_user_roles,
        guests::list_guests,
        guests::search_guests,
        guests::get_guest,
        guests::create_guest,
        guests::update_guest,
        guests::delete_guest,
        room_types::list_room_types,
        room_types::get_room_type,
        room_types::create_room_type,
        room_types::update_room_type,
        room_types::delete_room_type,
        rooms::list_rooms,
        rooms::available_rooms,
        rooms::get_room,
        rooms::create_room,
        rooms::update_room,
        rooms::delete_room,
        bookings::list_bookings,
        bookings::get_booking,
        bookings::bookings_for_guest,
        bookings::today_check_ins,
        bookings::today_check_outs,
        bookings::create_booking,
        bookings::update_booking_status,
        bookings::cancel_booking,
    ),
    components(
        schemas(
            ApiResponse<String>,
            health::HealthResponse,
            health::ComponentHealth,
            auth::LoginRequest,
            auth::LoginResponse,
            auth::RegisterRequest,
            auth::UserInfo,
            auth::ChangePasswordRequest,
            users::UpdateRolesRequest,
            guests::GuestDto,
            guests::GuestRequest,
            room_types::RoomTypeDto,
            room_types::RoomTypeRequest,
            rooms::RoomDto,
            rooms::RoomRequest,
            bookings::BookingDto,
            bookings::BookingDetailsDto,
            bookings::CreateBookingRequest,
            bookings::UpdateStatusRequest,
            bookings::BookingResponseDto,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Liveness and database reachability"),
        (name = "Authentication", description = "Staff login (JWT), registration, profile and password change"),
        (name = "Users", description = "Staff account administration"),
        (name = "Guests", description = "Guest directory with soft delete and search"),
        (name = "Room Types", description = "Room categories (reference data)"),
        (name = "Rooms", description = "Room inventory and availability search"),
        (name = "Bookings", description = "Booking lifecycle and daily arrival/departure reports"),
    ),
    info(
        title = "Hotel Booking API",
        version = "1.0.0",
        description = "Reservations, room availability and guest directory for a single hotel",
        license(name = "MIT")
    )
)]
pub struct ApiDoc;

/// Create the API router with all routes
pub fn create_api_router(ctx: ApiContext) -> Router {
    let state = ApiState::from_context(&ctx);
    let require_auth = middleware::from_fn_with_state(state.auth.clone(), auth_middleware);

    let auth_public = Router::new().route("/auth/login", post(auth::login));
    let auth_protected = Router::new()
        .route("/auth/register", post(auth::register))
        .route("/auth/me", get(auth::get_current_user))
        .route("/auth/change-password", post(auth::change_password))
        .route_layer(require_auth.clone());

    let user_routes = Router::new()
        .route("/users", get(users::list_users))
        .route("/users/{id}", get(users::get_user).delete(users::delete_user))
        .route("/users/{id}/roles", put(users::update_user_roles))
        .route_layer(require_auth.clone());

    let guest_routes = Router::new()
        .route("/guests", get(guests::list_guests).post(guests::create_guest))
        .route("/guests/search", get(guests::search_guests))
        .route(
            "/guests/{id}",
            get(guests::get_guest)
                .put(guests::update_guest)
                .delete(guests::delete_guest),
        )
        .route_layer(require_auth.clone());

    // Room types are readable without a token.
    let room_type_reads = Router::new()
        .route("/room-types", get(room_types::list_room_types))
        .route("/room-types/{id}", get(room_types::get_room_type));
    let room_type_writes = Router::new()
        .route("/room-types", post(room_types::create_room_type))
        .route(
            "/room-types/{id}",
            put(room_types::update_room_type).delete(room_types::delete_room_type),
        )
        .route_layer(require_auth.clone());

    let room_routes = Router::new()
        .route("/rooms", get(rooms::list_rooms).post(rooms::create_room))
        .route("/rooms/available", get(rooms::available_rooms))
        .route(
            "/rooms/{id}",
            get(rooms::get_room)
                .put(rooms::update_room)
                .delete(rooms::delete_room),
        )
        .route_layer(require_auth.clone());

    let booking_routes = Router::new()
        .route(
            "/bookings",
            get(bookings::list_bookings).post(bookings::create_booking),
        )
        .route("/bookings/today/checkins", get(bookings::today_check_ins))
        .route("/bookings/today/checkouts", get(bookings::today_check_outs))
        .route("/bookings/guest/{guest_id}", get(bookings::bookings_for_guest))
        .route(
            "/bookings/{id}",
            get(bookings::get_booking).delete(bookings::cancel_booking),
        )
        .route("/bookings/{id}/status", put(bookings::update_booking_status))
        .route_layer(require_auth);

    let api = Router::new()
        .merge(auth_public)
        .merge(auth_protected)
        .merge(user_routes)
        .merge(guest_routes)
        .merge(room_type_reads)
        .merge(room_type_writes)
        .merge(room_routes)
        .merge(booking_routes)
        .with_state(state);

    let health_state = health::HealthState {
        db: ctx.db.clone(),
        started_at: Arc::new(Instant::now()),
    };

    let mut router = Router::new()
        .merge(SwaggerUi::new("/docs").url("/api-doc/openapi.json", ApiDoc::openapi()))
        .route(
            "/health",
            get(health::health_check).with_state(health_state),
        )
        .nest("/api/v1", api);

    if let Some(handle) = ctx.prometheus {
        router = router.route(
            "/metrics",
            get(metrics_module::prometheus_metrics)
                .with_state(metrics_module::MetricsState { handle }),
        );
    }

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    router
        .route_layer(middleware::from_fn(metrics_module::http_metrics_middleware))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(request_id::request_id_middleware))
}
