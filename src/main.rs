//! Sleep Analyzer API Server
//!
//! Run with: cargo run --bin sleep-analyzer
//!
//! # Configuration
//!
//! Read from `--config <PATH>` or the default locations (see
//! [`Config::load_default`]), then overridden by environment variables:
//! - `SLEEP_ANALYZER_HOST`: Host to bind to (default: 0.0.0.0)
//! - `SLEEP_ANALYZER_PORT`: Port to listen on (default: 8090)
//! - `SLEEP_ANALYZER_PROCESSING_DELAY_MS`: Simulated processing delay (default: 1500)
//! - `SLEEP_ANALYZER_BACKEND`: `mock` or `remote` (default: mock)
//! - `SLEEP_ANALYZER_SERVICE_URL`: Analysis service URL for the remote backend
//! - `SLEEP_ANALYZER_CHART_SEED`: Fixed heart-rate jitter seed
//! - `RUST_LOG`: Log filter (default: sleep_analyzer=info,tower_http=debug)

use clap::Parser;
use std::path::PathBuf;

use sleep_analyzer::analysis::build_analyzer;
use sleep_analyzer::api::{serve, ApiConfig, AppState};
use sleep_analyzer::charts::ChartSynthesizer;
use sleep_analyzer::config::Config;
use sleep_analyzer::logging::init_logging;

#[derive(Parser)]
#[command(name = "sleep-analyzer")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "EEG sleep and depression risk analysis server")]
struct Args {
    /// Config file (default: search the standard locations)
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => Config::load_with_env(path)?,
        None => Config::load_default(),
    };

    init_logging(&config.logging);

    tracing::info!("Starting Sleep Analyzer API server v{}", env!("CARGO_PKG_VERSION"));

    let analyzer = build_analyzer(&config.analysis)?;
    tracing::info!(
        analyzer = analyzer.name(),
        processing_delay_ms = config.analysis.processing_delay_ms,
        "Analyzer ready"
    );

    let charts = ChartSynthesizer::with_seed(config.charts.seed);
    if let Some(seed) = charts.seed() {
        tracing::info!(seed, "Heart-rate jitter seeded");
    }

    let api_config = ApiConfig::from(&config);
    let state = AppState::new(analyzer, charts, api_config.clone());

    tracing::info!("Starting server on {}", api_config.addr());
    serve(state, &api_config).await?;

    tracing::info!("Sleep Analyzer API server stopped");
    Ok(())
}
