//! # Sleep Analyzer
//!
//! Sleep and depression risk analysis from overnight EEG recordings. A user
//! uploads a recording (`.edf` or `.npy`), enters a subject ID and gets back
//! a depression probability with a risk tier, four sleep metrics, a
//! heart-rate trend, a hypnogram and a downloadable text report.
//!
//! ## Modules
//!
//! - [`intake`]: File extension and subject ID validation, upload form state
//! - [`analysis`]: The [`Analyzer`] seam with mock and remote implementations
//! - [`session`]: Upload-analyze-present flow and its processing guard
//! - [`presenter`]: Risk tier and metric cards for a result
//! - [`charts`]: Heart-rate and hypnogram series
//! - [`report`]: Plain-text report export
//! - [`api`]: REST API server with Axum
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use sleep_analyzer::analysis::MockAnalyzer;
//! use sleep_analyzer::presenter::ResultsView;
//! use sleep_analyzer::session::Session;
//! use std::sync::Arc;
//! use std::time::Duration;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let session = Session::new(Arc::new(MockAnalyzer::new()), Duration::ZERO);
//!
//!     session.select_file("night1.edf", std::fs::read("night1.edf")?)?;
//!     session.set_subject_id("001");
//!     let result = session.submit().await?;
//!
//!     let view = ResultsView::new(result);
//!     println!("{} ({})", view.depression_percent, view.risk.label);
//!
//!     Ok(())
//! }
//! ```

pub mod analysis;
pub mod api;
pub mod charts;
pub mod config;
pub mod intake;
pub mod logging;
pub mod presenter;
pub mod report;
pub mod session;

// Re-export top-level types for convenience
pub use analysis::{
    build_analyzer, AnalysisError, AnalysisOutcome, AnalysisResult, Analyzer, MockAnalyzer,
    RemoteAnalyzer, RemoteAnalyzerConfig,
};

pub use intake::{FileFormat, IntakeError, UploadForm, UploadedFile};

pub use session::{CompletedAnalysis, Session, SessionError, SessionSnapshot, View};

pub use presenter::{MetricCard, ResultsView, RiskBadge, RiskTier};

pub use charts::{ChartAxis, ChartSynthesizer, HeartRateSample, HypnogramSample, SleepStage};

pub use report::{render_report, report_filename};

pub use api::{build_router, serve, ApiConfig, ApiError, AppState};

pub use config::{AnalysisBackend, AnalysisConfig, Config, ConfigError, LoggingConfig};
