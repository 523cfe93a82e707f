//! Hotel booking service CLI server
//!
//! Headless REST API suitable for deployment as a systemd service,
//! Docker container, or standalone process.
//!
//! ```sh
//! # Run with default config (~/.config/hotel-booking/config.toml)
//! hotel-booking
//!
//! # Custom config path and port
//! hotel-booking --config /etc/hotel-booking/config.toml --api-port 8080
//!
//! # Validate config without starting
//! hotel-booking --check
//! ```

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing::{error, info};

use hotel_booking::config::{AppConfig, CONFIG_ENV_VAR};
use hotel_booking::domain::TransitionPolicy;
use hotel_booking::server::{init_tracing, ServerHandle, ServerOptions};

/// Hotel booking and availability service.
#[derive(Parser, Debug)]
#[command(
    name = "hotel-booking",
    version,
    about = "Hotel reservations, room availability and guest directory",
    long_about = "REST API server for hotel staff: bookings, room inventory, \
                  availability search and the guest directory.\n\n\
                  Default config: ~/.config/hotel-booking/config.toml"
)]
struct Cli {
    /// Path to the configuration file (TOML).
    #[arg(short, long, env = CONFIG_ENV_VAR)]
    config: Option<PathBuf>,

    /// Override the REST API listen port.
    #[arg(long)]
    api_port: Option<u16>,

    /// Override the database URL.
    #[arg(long)]
    database_url: Option<String>,

    /// Override the log level (trace, debug, info, warn, error).
    #[arg(short, long)]
    log_level: Option<String>,

    /// Only accept booking status changes listed in the transition table.
    #[arg(long)]
    strict_transitions: bool,

    /// Validate the configuration file and exit without starting the server.
    #[arg(long)]
    check: bool,

    /// Skip database migrations on startup.
    #[arg(long)]
    no_migrate: bool,

    /// Skip creating the default admin user.
    #[arg(long)]
    no_admin: bool,
}

impl Cli {
    fn apply_overrides(&self, config: &mut AppConfig) {
        if let Some(port) = self.api_port {
            config.server.api_port = port;
        }
        if let Some(ref url) = self.database_url {
            config.database.url = url.clone();
        }
        if let Some(ref level) = self.log_level {
            config.logging.level = level.clone();
        }
        if self.strict_transitions {
            config.booking.transition_policy = TransitionPolicy::Strict;
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // ── Load configuration ─────────────────────────────────────
    let config_path = cli
        .config
        .clone()
        .unwrap_or_else(hotel_booking::default_config_path);

    let (mut config, load_error) = match AppConfig::load(&config_path) {
        Ok(cfg) => (cfg, None),
        Err(e) => (AppConfig::default(), Some(e)),
    };
    cli.apply_overrides(&mut config);

    // Overrides first so --log-level reaches the subscriber
    init_tracing(&config);

    if let Some(e) = load_error {
        error!("Failed to load config from {}: {}", config_path.display(), e);
        if cli.check {
            return ExitCode::FAILURE;
        }
        error!("Using default configuration.");
    } else {
        info!("Configuration loaded from {}", config_path.display());
    }

    // ── Config validation mode ─────────────────────────────────
    if cli.check {
        if let Err(e) = config.validate() {
            error!("{}", e);
            return ExitCode::FAILURE;
        }
        println!("Configuration is valid");
        println!("   Config file : {}", config_path.display());
        println!("   API address : {}", config.api_address());
        println!("   Database    : {}", config.database.url);
        println!("   Log level   : {}", config.logging.level);
        println!("   Transitions : {:?}", config.booking.transition_policy);
        return ExitCode::SUCCESS;
    }

    // ── Start server ───────────────────────────────────────────
    let handle = match ServerHandle::start(ServerOptions {
        config,
        auto_migrate: !cli.no_migrate,
        create_default_admin: !cli.no_admin,
    })
    .await
    {
        Ok(handle) => handle,
        Err(e) => {
            error!("Failed to start: {}", e);
            return ExitCode::FAILURE;
        }
    };

    handle.install_signal_handler();
    info!("Press Ctrl+C to shutdown gracefully.");

    handle.shutdown_signal().wait().await;
    handle.wait().await;

    ExitCode::SUCCESS
}
