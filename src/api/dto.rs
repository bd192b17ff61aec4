//! Data Transfer Objects
//!
//! Request and response types for the API endpoints.
//! These types are serialized/deserialized to/from JSON.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::charts::{ChartAxis, HeartRateSample, HypnogramSample, SleepStage};
use crate::intake::{FileFormat, UploadedFile};
use crate::presenter::ResultsView;
use crate::session::{CompletedAnalysis, SessionSnapshot};

// ============================================
// INTAKE DTOs
// ============================================

/// Accepted upload
#[derive(Debug, Serialize, Deserialize)]
pub struct UploadResponse {
    pub filename: String,
    pub format: FileFormat,
    pub size_bytes: usize,
    /// Toast text for the UI
    pub message: String,
}

impl From<&UploadedFile> for UploadResponse {
    fn from(file: &UploadedFile) -> Self {
        Self {
            filename: file.name().to_string(),
            format: file.format(),
            size_bytes: file.size_bytes(),
            message: "File uploaded successfully".to_string(),
        }
    }
}

/// Submission request
#[derive(Debug, Deserialize)]
pub struct AnalyzeRequest {
    /// Subject ID as typed; missing is treated as empty
    #[serde(default)]
    pub subject_id: String,
}

// ============================================
// SESSION DTOs
// ============================================

/// Summary of the accepted file
#[derive(Debug, Serialize, Deserialize)]
pub struct FileSummary {
    pub filename: String,
    pub format: FileFormat,
    pub size_bytes: usize,
}

/// Results view plus completion time
#[derive(Debug, Serialize)]
pub struct ResultsResponse {
    #[serde(flatten)]
    pub view: ResultsView,
    pub completed_at: DateTime<Utc>,
}

impl From<CompletedAnalysis> for ResultsResponse {
    fn from(completed: CompletedAnalysis) -> Self {
        Self {
            view: ResultsView::new(completed.result),
            completed_at: completed.completed_at,
        }
    }
}

/// Session snapshot
#[derive(Debug, Serialize)]
pub struct SessionResponse {
    /// "upload" or "results"
    pub view: String,
    pub analyzer: String,
    pub file: Option<FileSummary>,
    pub subject_id: String,
    pub is_loading: bool,
    pub results: Option<ResultsResponse>,
}

impl From<SessionSnapshot> for SessionResponse {
    fn from(snapshot: SessionSnapshot) -> Self {
        Self {
            view: snapshot.view.as_str().to_string(),
            analyzer: snapshot.analyzer,
            file: snapshot.file.map(|f| FileSummary {
                filename: f.name().to_string(),
                format: f.format(),
                size_bytes: f.size_bytes(),
            }),
            subject_id: snapshot.subject_id,
            is_loading: snapshot.is_loading,
            results: snapshot.completed.map(ResultsResponse::from),
        }
    }
}

// ============================================
// CHART DTOs
// ============================================

/// Heart-rate chart query parameters
#[derive(Debug, Default, Deserialize)]
pub struct HeartRateParams {
    /// Explicit baseline in bpm; defaults to the current result's average
    #[serde(default)]
    pub baseline: Option<f64>,
}

/// Heart-rate chart
#[derive(Debug, Serialize)]
pub struct HeartRateResponse {
    pub baseline: f64,
    pub axis: ChartAxis,
    pub points: Vec<HeartRateSample>,
}

/// One hypnogram epoch
#[derive(Debug, Serialize)]
pub struct HypnogramPoint {
    pub time: &'static str,
    /// Stage ordinal on the Y axis
    pub stage: u8,
    pub label: &'static str,
    pub code: &'static str,
}

impl From<HypnogramSample> for HypnogramPoint {
    fn from(sample: HypnogramSample) -> Self {
        Self {
            time: sample.time,
            stage: sample.stage.ordinal(),
            label: sample.stage.label(),
            code: sample.stage.annotation_code(),
        }
    }
}

/// Hypnogram chart
#[derive(Debug, Serialize)]
pub struct HypnogramResponse {
    pub axis: ChartAxis,
    /// Y tick labels, indexed by stage ordinal
    pub stage_labels: Vec<&'static str>,
    pub points: Vec<HypnogramPoint>,
}

impl HypnogramResponse {
    pub fn new(samples: Vec<HypnogramSample>, axis: ChartAxis) -> Self {
        Self {
            axis,
            stage_labels: SleepStage::ALL.iter().map(|s| s.label()).collect(),
            points: samples.into_iter().map(HypnogramPoint::from).collect(),
        }
    }
}

// ============================================
// HEALTH DTOs
// ============================================

/// Full health status response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Overall status: healthy
    pub status: String,
    /// Analyzer serving submissions
    pub analyzer: String,
    /// Server uptime in seconds
    pub uptime_seconds: u64,
    /// Application version
    pub version: String,
}
