//! Analysis
//!
//! The seam between intake and presentation. An [`Analyzer`] turns an
//! accepted recording and a subject ID into an [`AnalysisResult`]:
//!
//! - [`MockAnalyzer`]: fixed demonstration record, file contents ignored
//! - [`RemoteAnalyzer`]: delegates to an external analysis service over HTTP

mod error;
mod mock;
mod remote;
mod types;

pub use error::{AnalysisError, AnalysisOutcome};
pub use mock::{
    MockAnalyzer, MOCK_AVERAGE_HEART_RATE, MOCK_AWAKENINGS, MOCK_DEPRESSION_PROBABILITY,
    MOCK_REM_SLEEP_DURATION, MOCK_TOTAL_SLEEP_TIME,
};
pub use remote::{RemoteAnalyzer, RemoteAnalyzerConfig};
pub use types::AnalysisResult;

use async_trait::async_trait;
use std::sync::Arc;

use crate::config::{AnalysisBackend, AnalysisConfig};
use crate::intake::UploadedFile;

/// A capability that scores one recording for one subject
#[async_trait]
pub trait Analyzer: Send + Sync {
    /// Short name used in logs and health output
    fn name(&self) -> &str;

    /// Analyse `file` for `subject_id`
    async fn analyze(&self, file: &UploadedFile, subject_id: &str) -> AnalysisOutcome<AnalysisResult>;
}

/// Build the analyzer selected in configuration
pub fn build_analyzer(config: &AnalysisConfig) -> AnalysisOutcome<Arc<dyn Analyzer>> {
    match config.backend {
        AnalysisBackend::Mock => Ok(Arc::new(MockAnalyzer::new())),
        AnalysisBackend::Remote => {
            let remote = RemoteAnalyzer::new(RemoteAnalyzerConfig {
                base_url: config.service_url.clone(),
                request_timeout_ms: config.request_timeout_ms,
            })?;
            Ok(Arc::new(remote))
        }
    }
}
