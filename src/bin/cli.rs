//! Sleep Analyzer CLI
//!
//! Command-line interface for offline use:
//! - Analyze a recording and print the results and charts
//! - Write the text report for a recording
//! - Check a running API server
//! - Print a default config file

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use sleep_analyzer::analysis::{build_analyzer, AnalysisResult};
use sleep_analyzer::api::dto::{HeartRateResponse, HypnogramResponse};
use sleep_analyzer::charts::{ChartSynthesizer, HEART_RATE_AXIS, HYPNOGRAM_AXIS};
use sleep_analyzer::config::{generate_default_config, Config, LoggingConfig};
use sleep_analyzer::logging::init_logging;
use sleep_analyzer::presenter::ResultsView;
use sleep_analyzer::report::{render_report, report_filename};
use sleep_analyzer::session::Session;

#[derive(Parser)]
#[command(name = "sleep-analyzer-cli")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Sleep and depression risk analysis from overnight EEG recordings")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Config file (default: search the standard locations)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Log progress to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Analyze a recording and print the results
    Analyze {
        /// Recording (.edf or .npy)
        file: PathBuf,
        /// Subject identifier
        #[arg(short, long)]
        subject: String,
        /// Also write the text report here
        #[arg(short, long)]
        report: Option<PathBuf>,
        /// Fixed heart-rate jitter seed
        #[arg(long)]
        seed: Option<u64>,
        /// Skip the simulated processing delay
        #[arg(long)]
        no_delay: bool,
        /// Output format (table, json)
        #[arg(short, long, default_value = "table")]
        format: String,
    },

    /// Write the text report for a recording
    Report {
        /// Recording (.edf or .npy)
        file: PathBuf,
        /// Subject identifier
        #[arg(short, long)]
        subject: String,
        /// Output file (default: sleep-analysis-<subject>.txt)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Show the status of a running API server
    Status {
        /// API server URL
        #[arg(long, default_value = "http://localhost:8090")]
        api_url: String,
    },

    /// Generate default config file
    Config {
        /// Output path (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => Config::load_with_env(path)?,
        None => Config::load_default(),
    };

    if cli.verbose {
        init_logging(&LoggingConfig {
            level: "debug".to_string(),
            ..config.logging.clone()
        });
    }

    match cli.command {
        Commands::Analyze {
            file,
            subject,
            report,
            seed,
            no_delay,
            format,
        } => {
            let delay = if no_delay {
                Duration::ZERO
            } else {
                Duration::from_millis(config.analysis.processing_delay_ms)
            };
            let result = run_analysis(&config, &file, &subject, delay).await?;

            let charts = ChartSynthesizer::with_seed(seed.or(config.charts.seed));
            let view = ResultsView::new(result.clone());
            let heart_rate = HeartRateResponse {
                baseline: result.average_heart_rate,
                axis: HEART_RATE_AXIS,
                points: charts.heart_rate(result.average_heart_rate),
            };
            let hypnogram = HypnogramResponse::new(charts.hypnogram(), HYPNOGRAM_AXIS);

            match format.as_str() {
                "json" => {
                    let out = serde_json::json!({
                        "results": view,
                        "heart_rate": heart_rate,
                        "hypnogram": hypnogram,
                    });
                    println!("{}", serde_json::to_string_pretty(&out)?);
                }
                _ => print_results(&view, &heart_rate, &hypnogram),
            }

            if let Some(path) = report {
                write_report(&result, &path)?;
                eprintln!("Report written to {}", path.display());
            }
        }

        Commands::Report {
            file,
            subject,
            output,
        } => {
            let result = run_analysis(&config, &file, &subject, Duration::ZERO).await?;
            let path = output.unwrap_or_else(|| PathBuf::from(report_filename(&result.subject_id)));
            write_report(&result, &path)?;
            println!("Report written to {}", path.display());
        }

        Commands::Status { api_url } => {
            let response = reqwest::Client::new()
                .get(format!("{}/health", api_url.trim_end_matches('/')))
                .send()
                .await;

            match response {
                Ok(resp) if resp.status().is_success() => {
                    let health: serde_json::Value = resp.json().await?;

                    println!("Sleep Analyzer v{}", env!("CARGO_PKG_VERSION"));
                    println!();
                    println!("API Status: {}", health["status"].as_str().unwrap_or("unknown"));
                    println!("Analyzer:   {}", health["analyzer"].as_str().unwrap_or("unknown"));
                    if let Some(uptime) = health["uptime_seconds"].as_u64() {
                        println!("Uptime:     {}", format_duration(uptime));
                    }
                }
                Ok(resp) => bail!("API returned error: {}", resp.status()),
                Err(e) => {
                    eprintln!("Make sure the API server is running:");
                    eprintln!("  cargo run --bin sleep-analyzer");
                    return Err(e).with_context(|| format!("Cannot connect to API at {}", api_url));
                }
            }
        }

        Commands::Config { output } => {
            let content = generate_default_config();
            match output {
                Some(path) => {
                    std::fs::write(&path, content)
                        .with_context(|| format!("Failed to write {}", path.display()))?;
                    println!("Config written to {}", path.display());
                }
                None => print!("{}", content),
            }
        }
    }

    Ok(())
}

/// Intake, then analysis, through the same session the server uses
async fn run_analysis(
    config: &Config,
    file: &Path,
    subject: &str,
    delay: Duration,
) -> anyhow::Result<AnalysisResult> {
    let name = file
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let bytes = std::fs::read(file).with_context(|| format!("Failed to read {}", file.display()))?;

    let analyzer = build_analyzer(&config.analysis)?;
    let session = Session::new(Arc::clone(&analyzer), delay);

    session.select_file(&name, bytes)?;
    session.set_subject_id(subject);

    if !delay.is_zero() {
        eprintln!("Processing...");
    }
    Ok(session.submit().await?)
}

fn write_report(result: &AnalysisResult, path: &Path) -> anyhow::Result<()> {
    std::fs::write(path, render_report(result))
        .with_context(|| format!("Failed to write report to {}", path.display()))
}

fn print_results(view: &ResultsView, heart_rate: &HeartRateResponse, hypnogram: &HypnogramResponse) {
    println!("Subject: {}", view.result.subject_id);
    println!();
    println!(
        "Depression Probability: {}  [{}]",
        view.depression_percent, view.risk.label
    );
    println!();

    for card in &view.cards {
        println!("{:<20} {}", card.label, card.value);
    }

    println!();
    println!("Heart Rate Trend");
    println!("{}", "-".repeat(40));
    let span = HEART_RATE_AXIS.max - HEART_RATE_AXIS.min;
    for point in &heart_rate.points {
        let filled = ((HEART_RATE_AXIS.clamp(point.rate as f64) - HEART_RATE_AXIS.min) / span * 20.0)
            .round() as usize;
        println!("{:<6} {:>3} bpm  {}", point.time, point.rate, "#".repeat(filled));
    }

    println!();
    println!("Sleep Stages");
    println!("{}", "-".repeat(40));
    for point in &hypnogram.points {
        println!(
            "{:<6} {:<5} {}",
            point.time,
            point.label,
            "#".repeat(point.stage as usize + 1)
        );
    }
}

fn format_duration(seconds: u64) -> String {
    let days = seconds / 86400;
    let hours = (seconds % 86400) / 3600;
    let mins = (seconds % 3600) / 60;

    if days > 0 {
        format!("{}d {}h {}m", days, hours, mins)
    } else if hours > 0 {
        format!("{}h {}m", hours, mins)
    } else {
        format!("{}m", mins)
    }
}
