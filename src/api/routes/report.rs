//! Report Routes
//!
//! - GET /api/v1/report - Download the text report of the current result

use axum::{
    extract::State,
    http::header,
    response::{IntoResponse, Response},
};
use std::sync::Arc;

use crate::api::error::{ApiError, ApiResult};
use crate::api::state::AppState;
use crate::report::{content_disposition, render_report};

/// GET /api/v1/report
///
/// Returns the report as a `text/plain` attachment named
/// `sleep-analysis-<subject_id>.txt`.
pub async fn download_report(State(state): State<Arc<AppState>>) -> ApiResult<Response> {
    let completed = state
        .session
        .completed()
        .ok_or_else(|| ApiError::NotFound("No analysis results to report".to_string()))?;

    let body = render_report(&completed.result);

    tracing::info!(
        subject_id = %completed.result.subject_id,
        bytes = body.len(),
        "Report downloaded"
    );

    Ok((
        [
            (header::CONTENT_TYPE, "text/plain; charset=utf-8".to_string()),
            (
                header::CONTENT_DISPOSITION,
                content_disposition(&completed.result.subject_id),
            ),
        ],
        body,
    )
        .into_response())
}
