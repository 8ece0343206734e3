// Copyright (c) 2026 Kudi Labs. MIT License.
// See LICENSE for details.

//! # Kudi Ledger Server
//!
//! Entry point for the `kudi-server` binary. Parses CLI arguments,
//! initializes logging and metrics, opens the ledger database, and serves
//! the HTTP API plus the Prometheus metrics endpoint.
//!
//! The binary supports three subcommands:
//!
//! - `run`     — start the ledger server
//! - `init`    — initialize the data directory and ledger database
//! - `version` — print build version information

mod api;
mod cli;
mod logging;
mod metrics;

use anyhow::{Context, Result};
use clap::Parser;
use std::sync::Arc;
use tokio::signal;

use kudi_ledger::config::DB_FILENAME;
use kudi_ledger::{LedgerDb, LedgerEngine};

use cli::{Commands, KudiServerCli};
use logging::LogFormat;
use metrics::ServerMetrics;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = KudiServerCli::parse();

    match cli.command {
        Commands::Run(args) => run_server(args).await,
        Commands::Init(args) => init_server(args).await,
        Commands::Version => {
            print_version();
            Ok(())
        }
    }
}

/// Starts the full ledger server: API and metrics endpoints.
async fn run_server(args: cli::RunArgs) -> Result<()> {
    logging::init_logging(
        "kudi_server=info,kudi_ledger=info,tower_http=debug",
        LogFormat::from_str_lossy(&args.log_format),
    );

    tracing::info!(
        rpc_port = args.rpc_port,
        metrics_port = args.metrics_port,
        data_dir = %args.data_dir.display(),
        "starting kudi-server"
    );

    // --- Persistent storage ---
    std::fs::create_dir_all(&args.data_dir).with_context(|| {
        format!("failed to create data directory: {}", args.data_dir.display())
    })?;
    let db_path = args.data_dir.join(DB_FILENAME);
    let db = LedgerDb::open(&db_path)
        .await
        .with_context(|| format!("failed to open ledger database at {}", db_path.display()))?;
    tracing::info!(path = %db_path.display(), "ledger database opened");

    // --- Engine & metrics ---
    let engine = LedgerEngine::new(db);
    let server_metrics = Arc::new(ServerMetrics::new());

    // --- Application state ---
    let app_state = api::AppState {
        version: env!("CARGO_PKG_VERSION").to_string(),
        engine,
        metrics: Arc::clone(&server_metrics),
    };

    // --- API server ---
    let api_router = api::create_router(app_state);
    let api_addr = format!("0.0.0.0:{}", args.rpc_port);
    let api_listener = tokio::net::TcpListener::bind(&api_addr)
        .await
        .with_context(|| format!("failed to bind API listener on {}", api_addr))?;
    tracing::info!("API server listening on {}", api_addr);

    // --- Metrics server ---
    let metrics_router = axum::Router::new()
        .route("/metrics", axum::routing::get(metrics::metrics_handler))
        .with_state(Arc::clone(&server_metrics));
    let metrics_addr = format!("0.0.0.0:{}", args.metrics_port);
    let metrics_listener = tokio::net::TcpListener::bind(&metrics_addr)
        .await
        .with_context(|| format!("failed to bind metrics listener on {}", metrics_addr))?;
    tracing::info!("Metrics server listening on {}", metrics_addr);

    // --- Serve ---
    tokio::select! {
        res = axum::serve(api_listener, api_router) => {
            if let Err(e) = res {
                tracing::error!("API server error: {}", e);
            }
        }
        res = axum::serve(metrics_listener, metrics_router) => {
            if let Err(e) = res {
                tracing::error!("Metrics server error: {}", e);
            }
        }
        _ = shutdown_signal() => {
            tracing::info!("shutdown signal received, draining connections");
        }
    }

    tracing::info!("kudi-server stopped");
    Ok(())
}

/// Initializes the data directory and creates the ledger database schema.
async fn init_server(args: cli::InitArgs) -> Result<()> {
    logging::init_logging("kudi_server=info", LogFormat::Pretty);

    let data_dir = &args.data_dir;
    tracing::info!(data_dir = %data_dir.display(), "initializing data directory");

    std::fs::create_dir_all(data_dir)
        .with_context(|| format!("failed to create data directory: {}", data_dir.display()))?;

    // Opening the store creates the file and the full schema.
    let db_path = data_dir.join(DB_FILENAME);
    let db = LedgerDb::open(&db_path)
        .await
        .with_context(|| format!("failed to create ledger database at {}", db_path.display()))?;
    let users = db.user_count().await?;

    println!("Ledger initialized successfully.");
    println!("  Data directory : {}", data_dir.display());
    println!("  Database       : {}", db_path.display());
    println!("  Users          : {}", users);

    Ok(())
}

/// Prints version information to stdout.
fn print_version() {
    println!("kudi-server {}", env!("CARGO_PKG_VERSION"));
    println!("rustc       {}", rustc_version());
}

/// Returns the Rust compiler version used to build this binary.
fn rustc_version() -> &'static str {
    option_env!("RUSTC_VERSION").unwrap_or("unknown")
}

/// Waits for SIGINT (Ctrl+C) or SIGTERM, whichever comes first.
///
/// On non-Unix platforms, only Ctrl+C is supported.
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {}
        _ = terminate => {}
    }
}
