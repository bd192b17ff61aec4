//! Remote analysis service client
//!
//! Sends the raw recording to an external analysis service and maps its
//! answer onto [`AnalysisResult`] / [`AnalysisError`].
//!
//! Wire contract:
//! `POST {base_url}/analyze?subject_id=..&filename=..` with the file bytes as
//! `application/octet-stream`; a success response carries an
//! `AnalysisResult` JSON body.

use async_trait::async_trait;
use reqwest::{header, Client, StatusCode};
use std::time::Duration;

use super::{AnalysisError, AnalysisOutcome, AnalysisResult, Analyzer};
use crate::intake::UploadedFile;

/// Configuration for the remote analyzer
#[derive(Debug, Clone)]
pub struct RemoteAnalyzerConfig {
    /// Base URL of the analysis service (e.g., "http://localhost:9000")
    pub base_url: String,
    /// Request timeout in milliseconds
    pub request_timeout_ms: u64,
}

impl Default for RemoteAnalyzerConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:9000".to_string(),
            request_timeout_ms: 30_000,
        }
    }
}

/// HTTP client for the analysis service
pub struct RemoteAnalyzer {
    client: Client,
    config: RemoteAnalyzerConfig,
}

impl RemoteAnalyzer {
    pub fn new(config: RemoteAnalyzerConfig) -> AnalysisOutcome<Self> {
        let client = Client::builder()
            .timeout(Duration::from_millis(config.request_timeout_ms))
            .build()
            .map_err(|e| AnalysisError::ModelUnavailable(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { client, config })
    }

    fn analyze_url(&self) -> String {
        format!("{}/analyze", self.config.base_url.trim_end_matches('/'))
    }
}

#[async_trait]
impl Analyzer for RemoteAnalyzer {
    fn name(&self) -> &str {
        "remote"
    }

    async fn analyze(&self, file: &UploadedFile, subject_id: &str) -> AnalysisOutcome<AnalysisResult> {
        let url = self.analyze_url();

        tracing::debug!(
            url = %url,
            filename = %file.name(),
            size_bytes = file.size_bytes(),
            "Sending recording to analysis service"
        );

        let response = self
            .client
            .post(&url)
            .query(&[("subject_id", subject_id), ("filename", file.name())])
            .header(header::CONTENT_TYPE, "application/octet-stream")
            .body(file.bytes().to_vec())
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    AnalysisError::ModelUnavailable("analysis service timed out".to_string())
                } else if e.is_connect() {
                    AnalysisError::ModelUnavailable(format!("cannot reach analysis service at {}", url))
                } else {
                    AnalysisError::ModelUnavailable(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(error_for_status(status, &body));
        }

        let mut result: AnalysisResult = response.json().await.map_err(|e| {
            AnalysisError::ModelUnavailable(format!("invalid response from analysis service: {}", e))
        })?;

        // The service may echo an empty ID; the one typed at intake wins then.
        if result.subject_id.is_empty() {
            result.subject_id = subject_id.to_string();
        }

        Ok(result)
    }
}

/// Map a non-success service status onto the analysis error taxonomy
fn error_for_status(status: StatusCode, body: &str) -> AnalysisError {
    let detail = if body.trim().is_empty() {
        status.to_string()
    } else {
        body.trim().to_string()
    };

    match status {
        StatusCode::UNSUPPORTED_MEDIA_TYPE => AnalysisError::UnsupportedFormat(detail),
        StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY => {
            AnalysisError::UnreadableFile(detail)
        }
        _ => AnalysisError::ModelUnavailable(detail),
    }
}
