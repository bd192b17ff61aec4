//! Analysis error types
//!
//! Failures an analyzer can report back to the session. Every variant is
//! recoverable: the upload form is kept and the user may submit again.

use thiserror::Error;

/// Errors that can occur while analysing a recording
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AnalysisError {
    /// The recording could not be read (truncated, corrupt, empty)
    #[error("Unreadable file: {0}")]
    UnreadableFile(String),

    /// The recording is not in a format the analysis service understands
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    /// The scoring model or the service hosting it cannot be reached
    #[error("Analysis model unavailable: {0}")]
    ModelUnavailable(String),
}

impl AnalysisError {
    /// Stable machine-readable code, shared by the API and the CLI
    pub fn code(&self) -> &'static str {
        match self {
            AnalysisError::UnreadableFile(_) => "UNREADABLE_FILE",
            AnalysisError::UnsupportedFormat(_) => "UNSUPPORTED_FORMAT",
            AnalysisError::ModelUnavailable(_) => "MODEL_UNAVAILABLE",
        }
    }
}

/// Result type for analyzer operations
pub type AnalysisOutcome<T> = Result<T, AnalysisError>;
