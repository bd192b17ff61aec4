//! Session Routes
//!
//! - GET /api/v1/session - Current session snapshot
//! - DELETE /api/v1/session - Start a new analysis
//! - GET /api/v1/results - Current results view

use axum::{extract::State, http::StatusCode, Json};
use std::sync::Arc;

use crate::api::dto::{ResultsResponse, SessionResponse};
use crate::api::error::{ApiError, ApiResult};
use crate::api::state::AppState;

/// GET /api/v1/session
pub async fn get_session(State(state): State<Arc<AppState>>) -> Json<SessionResponse> {
    Json(SessionResponse::from(state.session.snapshot()))
}

/// DELETE /api/v1/session
///
/// Clears the form and the result; the next view is the empty upload form.
pub async fn reset_session(State(state): State<Arc<AppState>>) -> StatusCode {
    state.session.new_analysis();
    StatusCode::NO_CONTENT
}

/// GET /api/v1/results
pub async fn get_results(State(state): State<Arc<AppState>>) -> ApiResult<Json<ResultsResponse>> {
    state
        .session
        .completed()
        .map(|completed| Json(ResultsResponse::from(completed)))
        .ok_or_else(|| ApiError::NotFound("No analysis results yet".to_string()))
}
