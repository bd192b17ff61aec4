//! Upload Routes
//!
//! Endpoints for filling in and submitting the upload form.
//!
//! - POST /api/v1/upload - Offer a recording (multipart, field `file`)
//! - POST /api/v1/analyze - Submit with a subject ID

use axum::{
    extract::{Multipart, State},
    Json,
};
use std::sync::Arc;

use crate::api::dto::{AnalyzeRequest, ResultsResponse, UploadResponse};
use crate::api::error::{ApiError, ApiResult};
use crate::api::state::AppState;

/// POST /api/v1/upload
///
/// Accepts a `.edf` or `.npy` recording. Any other extension is rejected and
/// the previously accepted file, if any, stays in place.
pub async fn upload_file(
    State(state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> ApiResult<Json<UploadResponse>> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::Validation(format!("Invalid multipart body: {}", e)))?
    {
        if field.name() != Some("file") {
            continue;
        }

        let filename = field.file_name().unwrap_or_default().to_string();
        let bytes = field
            .bytes()
            .await
            .map_err(|e| ApiError::Validation(format!("Failed to read upload: {}", e)))?;

        let accepted = state.session.select_file(&filename, bytes.to_vec())?;
        return Ok(Json(UploadResponse::from(&accepted)));
    }

    Err(ApiError::Validation("Missing 'file' field".to_string()))
}

/// POST /api/v1/analyze
///
/// Runs the submission guard, waits out the processing delay and returns the
/// results view.
pub async fn analyze(
    State(state): State<Arc<AppState>>,
    Json(req): Json<AnalyzeRequest>,
) -> ApiResult<Json<ResultsResponse>> {
    let completed = state.session.submit_with(&req.subject_id).await?;
    Ok(Json(ResultsResponse::from(completed)))
}

