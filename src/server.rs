//! Reusable hotel booking server runtime.
//!
//! [`ServerHandle`] owns the full lifecycle: database init, migrations,
//! default admin, reference data, REST API, metrics and graceful shutdown.

use std::sync::{Arc, OnceLock};

use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use sea_orm::DatabaseConnection;
use sea_orm_migration::MigratorTrait;
use tracing::{error, info, warn};

use crate::application::{RoomTypeService, UserService};
use crate::config::AppConfig;
use crate::domain::RepositoryProvider;
use crate::infrastructure::database::migrator::Migrator;
use crate::infrastructure::{init_database, SeaOrmRepositoryProvider};
use crate::interfaces::http::{create_api_router, ApiContext};
use crate::shared::shutdown::{ShutdownCoordinator, ShutdownSignal};
use crate::shared::{AppError, InfraError, SystemClock};

// ── Options ────────────────────────────────────────────────────────

pub struct ServerOptions {
    pub config: AppConfig,
    /// Run database migrations on startup (default: true).
    pub auto_migrate: bool,
    /// Create the configured admin account if no user exists (default: true).
    pub create_default_admin: bool,
}

impl Default for ServerOptions {
    fn default() -> Self {
        Self {
            config: AppConfig::default(),
            auto_migrate: true,
            create_default_admin: true,
        }
    }
}

// ── ServerHandle ───────────────────────────────────────────────────

/// Handle to a running booking service.
///
/// ```rust,no_run
/// use hotel_booking::server::{ServerHandle, ServerOptions};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let handle = ServerHandle::start(ServerOptions::default()).await?;
///     handle.install_signal_handler();
///     handle.shutdown_signal().wait().await;
///     handle.wait().await;
///     Ok(())
/// }
/// ```
pub struct ServerHandle {
    pub repos: Arc<dyn RepositoryProvider>,
    pub config: AppConfig,
    /// Port actually bound; differs from the config when it asked for 0
    pub api_port: u16,

    db: DatabaseConnection,
    shutdown: ShutdownCoordinator,
    api_task: tokio::task::JoinHandle<()>,
}

/// The global recorder can only be installed once per process, so a
/// restarted server reuses the first handle.
fn prometheus_handle() -> Option<PrometheusHandle> {
    static HANDLE: OnceLock<Option<PrometheusHandle>> = OnceLock::new();
    HANDLE
        .get_or_init(|| match PrometheusBuilder::new().install_recorder() {
            Ok(handle) => {
                info!("Prometheus metrics recorder installed");
                Some(handle)
            }
            Err(e) => {
                warn!(error = %e, "Metrics recorder unavailable, /metrics disabled");
                None
            }
        })
        .clone()
}

impl ServerHandle {
    /// Start the service:
    /// 1. install the Prometheus recorder
    /// 2. connect to the database and run migrations
    /// 3. create the default admin and seed room types (if enabled)
    /// 4. serve the REST API with Swagger UI
    pub async fn start(opts: ServerOptions) -> Result<Self, AppError> {
        let app_cfg = opts.config;
        info!("Starting hotel booking service...");

        let prometheus = prometheus_handle();

        // ── Database ───────────────────────────────────────────
        let db = init_database(&app_cfg.database_config())
            .await
            .map_err(InfraError::from)?;

        if opts.auto_migrate {
            info!("Running database migrations...");
            Migrator::up(&db, None).await.map_err(InfraError::from)?;
            info!("Migrations completed");
        }

        let repos: Arc<dyn RepositoryProvider> =
            Arc::new(SeaOrmRepositoryProvider::new(db.clone()));
        let jwt_config = app_cfg.jwt_config();
        info!(
            expiration_hours = jwt_config.expiration_hours,
            "JWT configured"
        );

        if opts.create_default_admin {
            let admin = &app_cfg.admin;
            let created = UserService::new(Arc::clone(&repos), jwt_config.clone())
                .ensure_default_admin(&admin.username, &admin.email, &admin.password)
                .await?;
            if created {
                info!(username = %admin.username, "Default admin created");
                warn!("Change the default admin password immediately");
            }
        }

        if app_cfg.booking.seed_reference_data {
            RoomTypeService::new(Arc::clone(&repos))
                .seed_defaults()
                .await?;
        }

        // ── REST API server ────────────────────────────────────
        let mut ctx = ApiContext::new(Arc::clone(&repos), jwt_config);
        ctx.clock = Arc::new(SystemClock);
        ctx.transition_policy = app_cfg.booking.transition_policy;
        ctx.db = Some(db.clone());
        ctx.prometheus = prometheus;
        info!(policy = ?ctx.transition_policy, "Booking status transition policy");
        let api_router = create_api_router(ctx);

        let listener = tokio::net::TcpListener::bind(app_cfg.api_address())
            .await
            .map_err(InfraError::from)?;
        let local_addr = listener.local_addr().map_err(InfraError::from)?;
        info!("REST API server listening on http://{}", local_addr);
        info!("Swagger UI available at http://{}/docs/", local_addr);

        let shutdown = ShutdownCoordinator::new(app_cfg.server.shutdown_timeout);
        let api_shutdown = shutdown.signal();
        let api_server = axum::serve(listener, api_router).with_graceful_shutdown(async move {
            api_shutdown.wait().await;
            info!("REST API server received shutdown signal");
        });

        let api_task = tokio::spawn(async move {
            if let Err(e) = api_server.await {
                error!("REST API server error: {}", e);
            }
        });

        Ok(Self {
            repos,
            config: app_cfg,
            api_port: local_addr.port(),
            db,
            shutdown,
            api_task,
        })
    }

    pub fn shutdown_signal(&self) -> ShutdownSignal {
        self.shutdown.signal()
    }

    /// Trigger shutdown on SIGTERM / SIGINT.
    pub fn install_signal_handler(&self) {
        self.shutdown.start_signal_listener();
    }

    pub fn trigger_shutdown(&self) {
        self.shutdown.signal().trigger();
    }

    pub fn is_running(&self) -> bool {
        !self.api_task.is_finished()
    }

    /// Wait, within the configured grace period, for the API server to
    /// drain after shutdown was triggered, then close the database.
    pub async fn wait(self) {
        let Self {
            db,
            shutdown,
            api_task,
            ..
        } = self;

        info!("Waiting for in-flight requests...");
        let drained = shutdown
            .run_cleanup(async {
                if let Err(e) = api_task.await {
                    error!("REST API server task panicked: {}", e);
                }
            })
            .await;
        if !drained {
            warn!("Closing database with requests still in flight");
        }

        match db.close().await {
            Ok(()) => info!("Database connection closed"),
            Err(e) => warn!("Error closing database connection: {}", e),
        }
        info!("Hotel booking service stopped");
    }

    /// Trigger shutdown and wait for completion.
    pub async fn shutdown(self) {
        info!("Shutting down hotel booking service...");
        self.trigger_shutdown();
        self.wait().await;
    }
}

/// Initialize tracing from the logging section.
///
/// Call once at process startup, before [`ServerHandle::start`].
/// `RUST_LOG` takes precedence over `logging.level`.
pub fn init_tracing(config: &AppConfig) {
    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::util::SubscriberInitExt;

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.logging.level));

    let registry = tracing_subscriber::registry().with(env_filter);
    let result = if config.logging.format.eq_ignore_ascii_case("json") {
        registry
            .with(tracing_subscriber::fmt::layer().json())
            .try_init()
    } else {
        registry.with(tracing_subscriber::fmt::layer()).try_init()
    };
    if let Err(e) = result {
        eprintln!("Tracing already initialized: {}", e);
    }
}

#[cfg(test)]
mod tests {
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpStream;

    use super::*;

    fn test_config() -> AppConfig {
        let mut config = AppConfig::default();
        config.server.api_host = "127.0.0.1".into();
        config.server.api_port = 0;
        config.server.shutdown_timeout = 5;
        config.database.url = "sqlite::memory:".into();
        config.database.max_connections = 1;
        config
    }

    async fn get(port: u16, path: &str) -> String {
        let mut stream = TcpStream::connect(("127.0.0.1", port)).await.unwrap();
        let request = format!(
            "GET {} HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n\r\n",
            path
        );
        stream.write_all(request.as_bytes()).await.unwrap();
        let mut response = String::new();
        stream.read_to_string(&mut response).await.unwrap();
        response
    }

    #[tokio::test]
    async fn start_bootstraps_database_and_serves_api() {
        let handle = ServerHandle::start(ServerOptions {
            config: test_config(),
            ..ServerOptions::default()
        })
        .await
        .unwrap();

        assert_eq!(handle.repos.users().count_users().await.unwrap(), 1);
        let types = handle.repos.room_types().find_all().await.unwrap();
        let names: Vec<&str> = types.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["Standard", "Junior Suite", "Suite", "Family"]);

        let health = get(handle.api_port, "/health").await;
        assert!(health.starts_with("HTTP/1.1 200"));
        assert!(health.contains("\"database\":{\"status\":\"ok\""));

        let room_types = get(handle.api_port, "/api/v1/room-types").await;
        assert!(room_types.contains("Junior Suite"));

        assert!(handle.is_running());
        handle.shutdown().await;
    }

    #[tokio::test]
    async fn bootstrap_steps_can_be_skipped() {
        let mut config = test_config();
        config.booking.seed_reference_data = false;
        let handle = ServerHandle::start(ServerOptions {
            config,
            auto_migrate: true,
            create_default_admin: false,
        })
        .await
        .unwrap();

        assert_eq!(handle.repos.users().count_users().await.unwrap(), 0);
        assert!(handle.repos.room_types().find_all().await.unwrap().is_empty());
        handle.shutdown().await;
    }
}
