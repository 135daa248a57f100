//! minibank API Server
//!
//! # Usage
//!
//! ```bash
//! # Start against a local database
//! JWT_SECRET=... DATABASE_URL=postgres://... minibank-server
//!
//! # Start with custom config
//! minibank-server --config /path/to/config.toml
//!
//! # Start with environment overrides
//! MINIBANK__SERVER__PORT=8080 minibank-server
//! ```

mod config;

use std::net::SocketAddr;
use std::sync::Arc;

use clap::Parser;
use tokio::signal;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use minibank_api::{create_router, AppState};
use minibank_auth::AuthService;
use minibank_db::{AccountStore, Database};

use crate::config::ServerConfig;

/// Secrets shorter than this are accepted with a warning
const RECOMMENDED_SECRET_LEN: usize = 32;

const DEV_JWT_SECRET: &str = "minibank-development-secret-do-not-deploy";

// =============================================================================
// CLI Arguments
// =============================================================================

/// minibank API Server
#[derive(Parser, Debug)]
#[command(name = "minibank-server")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to configuration file (TOML, JSON, or YAML)
    #[arg(short, long, env = "MINIBANK_CONFIG")]
    config: Option<String>,

    /// Host to bind to
    #[arg(long, env = "MINIBANK_HOST")]
    host: Option<String>,

    /// Port to listen on
    #[arg(short, long, env = "MINIBANK_PORT")]
    port: Option<u16>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "MINIBANK_LOG_LEVEL")]
    log_level: Option<String>,

    /// Log format (json, pretty)
    #[arg(long, env = "MINIBANK_LOG_FORMAT")]
    log_format: Option<String>,

    /// PostgreSQL connection URL
    #[arg(long, env = "DATABASE_URL")]
    database_url: Option<String>,

    /// Token signing secret
    #[arg(long, env = "JWT_SECRET", hide_env_values = true)]
    jwt_secret: Option<String>,

    /// Enable development mode (built-in signing secret)
    #[arg(long, env = "MINIBANK_DEV_MODE")]
    dev_mode: bool,
}

impl Args {
    /// Apply CLI overrides on top of the loaded configuration
    fn apply(self, config: &mut ServerConfig) {
        if let Some(host) = self.host {
            config.server.host = host;
        }
        if let Some(port) = self.port {
            config.server.port = port;
        }
        if let Some(db_url) = self.database_url {
            config.database.postgres_url = db_url;
        }
        if let Some(jwt_secret) = self.jwt_secret {
            config.auth.jwt.secret = jwt_secret;
        }
        if let Some(level) = self.log_level {
            config.logging.level = level;
        }
        if let Some(format) = self.log_format {
            config.logging.format = format;
        }
    }
}

// =============================================================================
// Main Entry Point
// =============================================================================

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let dev_mode = args.dev_mode;

    let mut server_config = if dev_mode {
        let mut config = ServerConfig::development();
        let loaded = ServerConfig::load(args.config.as_deref())?;
        config.database = loaded.database;
        config.auth = loaded.auth;
        config
    } else {
        ServerConfig::load(args.config.as_deref())?
    };
    args.apply(&mut server_config);

    init_logging(&server_config.logging);

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        dev_mode,
        "Starting minibank server"
    );

    validate_config(&mut server_config, dev_mode)?;

    let db = init_database(&server_config).await?;
    let store: Arc<dyn AccountStore> = Arc::new(db.account_repo());

    let auth = Arc::new(AuthService::new(server_config.auth.clone())?);
    tracing::info!(
        algorithm = ?auth.jwt.algorithm(),
        token_lifetime = ?server_config.auth.jwt.token_lifetime,
        "Authentication service initialized"
    );

    let state = Arc::new(AppState::new(store, auth));
    let app = create_router(state, server_config.api.clone());

    if server_config.metrics.enabled {
        start_metrics_exporter(&server_config.metrics)?;
    }

    let addr = server_config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;

    tracing::info!(%addr, "Server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server shutdown complete");

    Ok(())
}

// =============================================================================
// Initialization Functions
// =============================================================================

/// Initialize tracing/logging; `RUST_LOG` wins over the configured level
fn init_logging(config: &config::LoggingConfig) {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level));

    let subscriber = tracing_subscriber::registry().with(env_filter);

    match config.format.as_str() {
        "json" => {
            subscriber
                .with(fmt::layer().json().with_target(true))
                .init();
        }
        _ => {
            subscriber
                .with(fmt::layer().pretty().with_target(true))
                .init();
        }
    }
}

/// Refuse to start without a signing secret outside development mode
fn validate_config(config: &mut ServerConfig, dev_mode: bool) -> anyhow::Result<()> {
    if config.auth.jwt.secret.is_empty() {
        if !dev_mode {
            anyhow::bail!("JWT secret is not set. Set the JWT_SECRET environment variable.");
        }
        tracing::warn!("No JWT secret configured, using the development secret");
        config.auth.jwt.secret = DEV_JWT_SECRET.to_string();
    }

    if config.auth.jwt.secret.len() < RECOMMENDED_SECRET_LEN {
        tracing::warn!(
            length = config.auth.jwt.secret.len(),
            recommended = RECOMMENDED_SECRET_LEN,
            "JWT secret is shorter than recommended"
        );
    }

    if config.api.request_timeout_secs == 0 {
        anyhow::bail!("api.request_timeout_secs must be greater than zero");
    }

    Ok(())
}

/// Connect, migrate and probe the database
async fn init_database(config: &ServerConfig) -> anyhow::Result<Database> {
    let db = Database::connect(&config.database).await?;

    if config.server.run_migrations {
        db.migrate().await?;
    }

    let health = db.health_check().await;
    if !health.healthy {
        anyhow::bail!("Database health check failed");
    }

    tracing::info!(postgres = health.postgres, "Database health check passed");

    Ok(db)
}

/// Start the Prometheus exporter on its own port
fn start_metrics_exporter(config: &config::MetricsConfig) -> anyhow::Result<()> {
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));

    metrics_exporter_prometheus::PrometheusBuilder::new()
        .with_http_listener(addr)
        .install()?;

    tracing::info!(port = config.port, "Metrics exporter started");

    Ok(())
}

// =============================================================================
// Graceful Shutdown
// =============================================================================

/// Wait for shutdown signal (Ctrl+C or SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, initiating graceful shutdown...");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, initiating graceful shutdown...");
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
