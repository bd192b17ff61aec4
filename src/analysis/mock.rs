//! Mock analyzer
//!
//! Stand-in for the analysis service: the recording is ignored and the same
//! record is returned for every subject.

use async_trait::async_trait;

use super::{AnalysisOutcome, AnalysisResult, Analyzer};
use crate::intake::UploadedFile;

pub const MOCK_DEPRESSION_PROBABILITY: f64 = 0.82;
pub const MOCK_TOTAL_SLEEP_TIME: f64 = 6.5;
pub const MOCK_REM_SLEEP_DURATION: f64 = 1.2;
pub const MOCK_AWAKENINGS: u32 = 4;
pub const MOCK_AVERAGE_HEART_RATE: f64 = 72.0;

/// Analyzer returning a fixed demonstration record
#[derive(Debug, Clone, Copy, Default)]
pub struct MockAnalyzer;

impl MockAnalyzer {
    pub fn new() -> Self {
        Self
    }

    /// The record returned for `subject_id`
    pub fn fixed_result(subject_id: &str) -> AnalysisResult {
        AnalysisResult {
            subject_id: subject_id.to_string(),
            depression_probability: MOCK_DEPRESSION_PROBABILITY,
            total_sleep_time: MOCK_TOTAL_SLEEP_TIME,
            rem_sleep_duration: MOCK_REM_SLEEP_DURATION,
            awakenings: MOCK_AWAKENINGS,
            average_heart_rate: MOCK_AVERAGE_HEART_RATE,
        }
    }
}

#[async_trait]
impl Analyzer for MockAnalyzer {
    fn name(&self) -> &str {
        "mock"
    }

    async fn analyze(&self, file: &UploadedFile, subject_id: &str) -> AnalysisOutcome<AnalysisResult> {
        tracing::debug!(
            filename = %file.name(),
            size_bytes = file.size_bytes(),
            subject_id = %subject_id,
            "Mock analysis (file contents ignored)"
        );
        Ok(Self::fixed_result(subject_id))
    }
}
