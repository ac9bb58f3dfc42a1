//! Catalog daemon - HTTP API plus background reconciliation
//!
//! This binary wires the whole service together:
//! - Loads and validates the YAML configuration
//! - Opens the SQLite pool and builds the repositories
//! - Selects the external provider from configuration
//! - Spawns the interval scheduler for the reconciliation job
//! - Serves the axum API
//! - Shuts everything down gracefully on SIGTERM/SIGINT
//!
//! The scheduler and the `POST /sync/trigger` endpoint share one
//! orchestrator, so the at-most-one-run invariant holds across both.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use catalog_api::auth::TokenKeys;
use catalog_api::state::{AppState, PageLimits};
use catalog_core::config::Config;
use catalog_core::ports::repositories::IRunRepository;
use catalog_provider::provider_from_config;
use catalog_store::{
    DatabasePool, SqliteProductRepository, SqliteRunRepository, SqliteUserRepository,
};
use catalog_sync::{Reconciler, StatusBoard, SyncOrchestrator, SyncScheduler};

/// Catalog service daemon
#[derive(Debug, Parser)]
#[command(name = "catalogd", version, about)]
struct Args {
    /// Path to the configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,
}

/// Waits for SIGTERM or SIGINT and triggers the cancellation token
async fn shutdown_signal(token: CancellationToken) {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received SIGINT (Ctrl+C)");
        }
        _ = terminate => {
            info!("Received SIGTERM");
        }
    }

    token.cancel();
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Load configuration before tracing so the configured level applies
    let config_path = args.config.unwrap_or_else(Config::default_path);
    let config = Config::load_or_default(&config_path);

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.logging.level.clone()));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(true)
        .init();

    info!(config_path = %config_path.display(), "Catalog daemon starting (catalogd)");

    let validation_errors = config.validate();
    if !validation_errors.is_empty() {
        for err in &validation_errors {
            error!(field = %err.field, message = %err.message, "Invalid configuration");
        }
        anyhow::bail!("configuration invalid ({} errors)", validation_errors.len());
    }

    // Storage
    let pool = DatabasePool::new(&config.database.path)
        .await
        .context("Failed to open database")?;
    let users = Arc::new(SqliteUserRepository::new(pool.pool().clone()));
    let products = Arc::new(SqliteProductRepository::new(pool.pool().clone()));
    let runs = Arc::new(SqliteRunRepository::new(pool.pool().clone()));

    // Provider adapter, selected by configuration
    let provider = provider_from_config(&config.provider).context("Failed to build provider")?;
    info!(provider = provider.name(), "Provider configured");

    // Reconciliation stack; the board is seeded with the stored last run so
    // the status endpoint is meaningful right after a restart
    let last_run = runs
        .load_last()
        .await
        .context("Failed to load last run report")?;
    let board = Arc::new(StatusBoard::with_last_completed(last_run));
    let reconciler = Arc::new(Reconciler::new(products.clone()));
    let orchestrator = Arc::new(SyncOrchestrator::new(
        provider,
        reconciler,
        runs,
        board.clone(),
        Duration::from_secs(config.sync.page_timeout_secs),
    ));

    // Graceful shutdown plumbing
    let shutdown_token = CancellationToken::new();
    let signal_token = shutdown_token.clone();
    tokio::spawn(async move {
        shutdown_signal(signal_token).await;
    });

    // Background scheduler
    let scheduler = SyncScheduler::new(
        orchestrator.clone(),
        Duration::from_secs(config.sync.interval_secs),
    );
    let scheduler_token = shutdown_token.clone();
    let scheduler_handle = tokio::spawn(async move {
        scheduler.run(scheduler_token).await;
    });

    // HTTP API
    let state = AppState {
        users,
        products,
        keys: Arc::new(TokenKeys::new(
            &config.auth.secret,
            config.auth.token_ttl_minutes,
        )),
        orchestrator,
        board,
        pages: PageLimits {
            default_size: config.server.default_page_size,
            max_size: config.server.max_page_size,
        },
    };
    let app = catalog_api::router(state);

    let listener = tokio::net::TcpListener::bind(&config.server.bind)
        .await
        .with_context(|| format!("Failed to bind {}", config.server.bind))?;
    info!(addr = %config.server.bind, "API server listening");

    let serve_token = shutdown_token.clone();
    axum::serve(listener, app)
        .with_graceful_shutdown(async move { serve_token.cancelled().await })
        .await
        .context("API server error")?;

    // The serve future only resolves after shutdown; reap the scheduler too
    shutdown_token.cancel();
    if let Err(e) = scheduler_handle.await {
        error!(error = %e, "Scheduler task panicked");
    }

    info!("Catalog daemon shut down gracefully");
    Ok(())
}
