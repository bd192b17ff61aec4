//! Configuration System
//!
//! Handles loading configuration from files and environment variables.
//! Supports TOML config files and environment variable overrides.

use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub analysis: AnalysisConfig,

    #[serde(default)]
    pub charts: ChartsConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// HTTP server configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_cors_origins")]
    pub cors_origins: Vec<String>,

    #[serde(default = "default_max_upload_bytes")]
    pub max_upload_bytes: usize,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8090
}

fn default_cors_origins() -> Vec<String> {
    vec![
        "http://localhost:8091".to_string(),
        "http://127.0.0.1:8091".to_string(),
    ]
}

fn default_max_upload_bytes() -> usize {
    512 * 1024 * 1024 // overnight PSG recordings run to hundreds of MB
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cors_origins: default_cors_origins(),
            max_upload_bytes: default_max_upload_bytes(),
        }
    }
}

/// Which analyzer answers submissions
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnalysisBackend {
    /// Fixed demonstration result
    #[default]
    Mock,
    /// External analysis service over HTTP
    Remote,
}

impl std::str::FromStr for AnalysisBackend {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "mock" => Ok(AnalysisBackend::Mock),
            "remote" => Ok(AnalysisBackend::Remote),
            other => Err(ConfigError::Invalid(format!("unknown analysis backend: {}", other))),
        }
    }
}

/// Analysis pipeline configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AnalysisConfig {
    #[serde(default)]
    pub backend: AnalysisBackend,

    /// Simulated processing delay before the analyzer is called
    #[serde(default = "default_processing_delay")]
    pub processing_delay_ms: u64,

    #[serde(default = "default_service_url")]
    pub service_url: String,

    #[serde(default = "default_request_timeout")]
    pub request_timeout_ms: u64,
}

fn default_processing_delay() -> u64 {
    1500
}

fn default_service_url() -> String {
    "http://localhost:9000".to_string()
}

fn default_request_timeout() -> u64 {
    30_000
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            backend: AnalysisBackend::default(),
            processing_delay_ms: default_processing_delay(),
            service_url: default_service_url(),
            request_timeout_ms: default_request_timeout(),
        }
    }
}

/// Chart synthesis configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ChartsConfig {
    /// Fixed seed for heart-rate jitter; unset means a fresh draw per render
    #[serde(default)]
    pub seed: Option<u64>,
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl Config {
    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        let config: Config = toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        Ok(config)
    }

    /// Load configuration from environment variables only
    pub fn from_env() -> Self {
        let mut config = Config::default();
        config.apply_env_overrides();
        config
    }

    /// Load configuration with environment variable overrides
    pub fn load_with_env(path: &Path) -> Result<Self, ConfigError> {
        let mut config = Self::load(path)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Load from default locations or environment
    pub fn load_default() -> Self {
        let config_paths = [
            dirs::config_dir().map(|p| p.join("sleep-analyzer").join("config.toml")),
            Some(PathBuf::from("/etc/sleep-analyzer/config.toml")),
            Some(PathBuf::from("./config.toml")),
        ];

        for path_opt in config_paths.iter().flatten() {
            if path_opt.exists() {
                match Self::load_with_env(path_opt) {
                    Ok(config) => {
                        tracing::info!("Loaded config from {:?}", path_opt);
                        return config;
                    }
                    Err(e) => {
                        tracing::warn!("Failed to load config from {:?}: {}", path_opt, e);
                    }
                }
            }
        }

        tracing::info!("Using default config with environment overrides");
        Self::from_env()
    }

    /// Apply environment variable overrides to an existing config
    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    /// Apply overrides from any key lookup; unparsable values are ignored
    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        // Server overrides
        if let Some(host) = lookup("SLEEP_ANALYZER_HOST") {
            self.server.host = host;
        }
        if let Some(port) = lookup("SLEEP_ANALYZER_PORT").and_then(|p| p.parse().ok()) {
            self.server.port = port;
        }

        // Analysis overrides
        if let Some(delay) = lookup("SLEEP_ANALYZER_PROCESSING_DELAY_MS").and_then(|d| d.parse().ok()) {
            self.analysis.processing_delay_ms = delay;
        }
        if let Some(backend) = lookup("SLEEP_ANALYZER_BACKEND") {
            match backend.parse() {
                Ok(b) => self.analysis.backend = b,
                Err(e) => tracing::warn!("Ignoring SLEEP_ANALYZER_BACKEND: {}", e),
            }
        }
        if let Some(url) = lookup("SLEEP_ANALYZER_SERVICE_URL") {
            self.analysis.service_url = url;
        }

        // Chart overrides
        if let Some(seed) = lookup("SLEEP_ANALYZER_CHART_SEED").and_then(|s| s.parse().ok()) {
            self.charts.seed = Some(seed);
        }

        // Logging overrides
        if let Some(level) = lookup("SLEEP_ANALYZER_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Some(format) = lookup("SLEEP_ANALYZER_LOG_FORMAT") {
            self.logging.format = format;
        }
    }

    /// Socket address string for the HTTP server
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path:?}: {error}")]
    Io { path: PathBuf, error: String },

    #[error("Failed to parse config file {path:?}: {error}")]
    Parse { path: PathBuf, error: String },

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Generate a default config file content
pub fn generate_default_config() -> String {
    r#"# Sleep Analyzer Configuration
#
# Environment variables override these settings:
# - SLEEP_ANALYZER_HOST
# - SLEEP_ANALYZER_PORT
# - SLEEP_ANALYZER_PROCESSING_DELAY_MS
# - SLEEP_ANALYZER_BACKEND
# - SLEEP_ANALYZER_SERVICE_URL
# - SLEEP_ANALYZER_CHART_SEED
# - SLEEP_ANALYZER_LOG_LEVEL
# - SLEEP_ANALYZER_LOG_FORMAT

[server]
# API server host
host = "0.0.0.0"

# API server port
port = 8090

# Allowed CORS origins (the dashboard)
cors_origins = ["http://localhost:8091", "http://127.0.0.1:8091"]

# Largest accepted recording upload (bytes)
max_upload_bytes = 536870912

[analysis]
# Analyzer: "mock" (fixed demonstration result) or "remote" (analysis service)
backend = "mock"

# Simulated processing delay before analysis (ms)
processing_delay_ms = 1500

# Analysis service base URL (backend = "remote")
service_url = "http://localhost:9000"

# Analysis service request timeout (ms)
request_timeout_ms = 30000

[charts]
# Fixed seed for heart-rate jitter (omit for a fresh draw per render)
# seed = 42

[logging]
# Log level: trace, debug, info, warn, error
level = "info"

# Log format: pretty (for development) or json (for production)
format = "pretty"
"#
    .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.server.port, 8090);
        assert_eq!(config.analysis.processing_delay_ms, 1500);
        assert_eq!(config.analysis.backend, AnalysisBackend::Mock);
        assert_eq!(config.charts.seed, None);
        assert_eq!(config.logging.format, "pretty");
    }

    #[test]
    fn test_generated_config_parses() {
        let config: Config = toml::from_str(&generate_default_config()).unwrap();
        assert_eq!(config.server.port, 8090);
        assert_eq!(config.server.max_upload_bytes, 512 * 1024 * 1024);
        assert_eq!(config.analysis.processing_delay_ms, 1500);
        assert_eq!(config.analysis.backend, AnalysisBackend::Mock);
    }

    #[test]
    fn test_load_partial_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "[analysis]\nbackend = \"remote\"\nprocessing_delay_ms = 0\n\n[charts]\nseed = 7"
        )
        .unwrap();

        let config = Config::load(file.path()).unwrap();
        assert_eq!(config.analysis.backend, AnalysisBackend::Remote);
        assert_eq!(config.analysis.processing_delay_ms, 0);
        assert_eq!(config.charts.seed, Some(7));
        assert_eq!(config.server.host, "0.0.0.0");
    }

    #[test]
    fn test_load_errors() {
        let missing = Config::load(Path::new("/nonexistent/sleep-analyzer.toml"));
        assert!(matches!(missing, Err(ConfigError::Io { .. })));

        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[server]\nport = \"not a number\"").unwrap();
        assert!(matches!(Config::load(file.path()), Err(ConfigError::Parse { .. })));
    }

    #[test]
    fn test_overrides() {
        let vars: HashMap<&str, &str> = [
            ("SLEEP_ANALYZER_PORT", "9999"),
            ("SLEEP_ANALYZER_PROCESSING_DELAY_MS", "250"),
            ("SLEEP_ANALYZER_BACKEND", "Remote"),
            ("SLEEP_ANALYZER_CHART_SEED", "not-a-seed"),
            ("SLEEP_ANALYZER_LOG_FORMAT", "json"),
        ]
        .into_iter()
        .collect();

        let mut config = Config::default();
        config.apply_overrides(|key| vars.get(key).map(|v| v.to_string()));

        assert_eq!(config.server.port, 9999);
        assert_eq!(config.analysis.processing_delay_ms, 250);
        assert_eq!(config.analysis.backend, AnalysisBackend::Remote);
        assert_eq!(config.charts.seed, None);
        assert_eq!(config.logging.format, "json");
        assert_eq!(config.server_addr(), "0.0.0.0:9999");
    }

    #[test]
    fn test_backend_from_str() {
        assert_eq!("mock".parse::<AnalysisBackend>().unwrap(), AnalysisBackend::Mock);
        assert!("tensorflow".parse::<AnalysisBackend>().is_err());
    }
}
