//! Application State
//!
//! Shared state accessible by all API handlers.
//! Wrapped in Arc for thread-safe sharing across async tasks.

use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::analysis::Analyzer;
use crate::charts::ChartSynthesizer;
use crate::config::Config;
use crate::session::Session;

/// Shared application state for all handlers
#[derive(Clone)]
pub struct AppState {
    /// The single upload-analyze-present session
    pub session: Arc<Session>,
    /// Chart series source
    pub charts: ChartSynthesizer,
    /// API configuration
    pub config: Arc<ApiConfig>,
    /// Server start time for uptime tracking
    pub start_time: Instant,
}

impl AppState {
    pub fn new(analyzer: Arc<dyn Analyzer>, charts: ChartSynthesizer, config: ApiConfig) -> Self {
        let session = Session::new(analyzer, Duration::from_millis(config.processing_delay_ms));
        Self {
            session: Arc::new(session),
            charts,
            config: Arc::new(config),
            start_time: Instant::now(),
        }
    }

    /// Get server uptime in seconds
    pub fn uptime_seconds(&self) -> u64 {
        self.start_time.elapsed().as_secs()
    }
}

/// API server configuration
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Host to bind to
    pub host: String,
    /// Port to listen on
    pub port: u16,
    /// Maximum upload size in bytes
    pub max_body_size: usize,
    /// Origins allowed by CORS; empty means permissive
    pub cors_origins: Vec<String>,
    /// Simulated processing delay before analysis
    pub processing_delay_ms: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8090,
            max_body_size: 512 * 1024 * 1024,
            cors_origins: Vec::new(),
            processing_delay_ms: 1500,
        }
    }
}

impl ApiConfig {
    /// Get the socket address string
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl From<&Config> for ApiConfig {
    fn from(config: &Config) -> Self {
        Self {
            host: config.server.host.clone(),
            port: config.server.port,
            max_body_size: config.server.max_upload_bytes,
            cors_origins: config.server.cors_origins.clone(),
            processing_delay_ms: config.analysis.processing_delay_ms,
        }
    }
}
