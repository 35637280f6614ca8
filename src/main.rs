//! biotwin - Bioreactor Digital-Twin Simulation & Control Server
//!
//! Replays historical bioreactor telemetry for the dashboard, one tick per
//! poll, with anomaly detection, predictive temperature projection, and a
//! closed-loop impeller controller.
//!
//! # Usage
//!
//! ```bash
//! # Run with the synthetic dataset
//! cargo run --release
//!
//! # Replay a recorded batch export
//! cargo run --release -- --csv data/bioreactor-yields.csv
//! ```
//!
//! # Environment Variables
//!
//! - `BIOTWIN_CONFIG`: Path to a process_config.toml
//! - `BIOTWIN_SERVER_ADDR`: HTTP bind address (default: 0.0.0.0:8000)
//! - `BIOTWIN_CORS_ORIGINS`: Comma-separated allowed origins for development
//! - `RUST_LOG`: Logging level (default: info)

use anyhow::{Context, Result};
use clap::Parser;
use tokio_util::sync::CancellationToken;
use tracing::info;

use biotwin::api::{create_app, DashboardState};
use biotwin::config::{self, defaults, ProcessConfig};
use biotwin::dataset::Dataset;
use biotwin::engine::{EngineParams, SimulationEngine};

// ============================================================================
// CLI Arguments
// ============================================================================

#[derive(Parser, Debug)]
#[command(name = "biotwin")]
#[command(about = "Bioreactor digital-twin simulation and control server")]
#[command(version)]
struct CliArgs {
    /// Path to a CSV file with historical process rows
    /// (Temperature,Impeller_Speed,pH,Dissolved_Oxygen,Yield)
    #[arg(long)]
    csv: Option<String>,

    /// Synthetic dataset size when no CSV is given
    #[arg(long, default_value_t = defaults::SYNTHETIC_ROWS)]
    rows: usize,

    /// Override the server address (default: "0.0.0.0:8000")
    #[arg(short, long)]
    addr: Option<String>,
}

/// Bind address precedence: CLI flag > env var > TOML config.
fn resolve_addr(cli: Option<String>) -> String {
    cli.or_else(|| std::env::var("BIOTWIN_SERVER_ADDR").ok())
        .unwrap_or_else(|| config::get().server.addr.clone())
}

// ============================================================================
// Main Entry Point
// ============================================================================

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let args = CliArgs::parse();

    config::init(ProcessConfig::load());
    let server_addr = resolve_addr(args.addr);

    info!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    info!("  biotwin - Bioreactor Digital-Twin & Control");
    info!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    info!("");

    // An empty dataset is fatal: the replay cursor cannot be defined.
    let dataset = Dataset::load_or_synthetic(args.csv.as_deref(), args.rows)
        .context("Failed to load historical dataset")?;
    info!(
        rows = dataset.len(),
        "✓ Historical dataset ready ({} rows per batch)",
        dataset.len()
    );

    let engine = SimulationEngine::new(dataset, EngineParams::from_config(config::get()));
    let state = DashboardState::new(engine);
    let app = create_app(state);

    let listener = tokio::net::TcpListener::bind(&server_addr)
        .await
        .with_context(|| format!("Failed to bind to {server_addr}"))?;
    info!("✓ HTTP server listening on {}", server_addr);
    info!("");
    info!("🎯 Dashboard API available at: http://{}/api/v1/process-data", server_addr);
    info!("");

    // Graceful shutdown via Ctrl+C
    let cancel_token = CancellationToken::new();
    let shutdown_token = cancel_token.clone();
    tokio::spawn(async move {
        tokio::signal::ctrl_c().await.ok();
        info!("🛑 Received Ctrl+C, initiating shutdown...");
        shutdown_token.cancel();
    });

    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            cancel_token.cancelled().await;
        })
        .await
        .context("HTTP server error")?;

    info!("");
    info!("✓ biotwin shutdown complete");
    Ok(())
}
