//! Chart Routes
//!
//! - GET /api/v1/charts/heart-rate - Heart-rate trend (`?baseline=<bpm>`)
//! - GET /api/v1/charts/hypnogram - Reference hypnogram

use axum::extract::{Query, State};
use axum::Json;
use std::sync::Arc;

use crate::api::dto::{HeartRateParams, HeartRateResponse, HypnogramResponse};
use crate::api::error::{ApiError, ApiResult};
use crate::api::state::AppState;
use crate::charts::{HEART_RATE_AXIS, HYPNOGRAM_AXIS};

/// GET /api/v1/charts/heart-rate
///
/// Baseline is the explicit `baseline` parameter, else the current result's
/// average heart rate.
pub async fn heart_rate(
    State(state): State<Arc<AppState>>,
    Query(params): Query<HeartRateParams>,
) -> ApiResult<Json<HeartRateResponse>> {
    let baseline = match params.baseline {
        Some(b) if b.is_finite() => b,
        Some(_) => return Err(ApiError::Validation("baseline must be a finite number".to_string())),
        None => state
            .session
            .completed()
            .map(|c| c.result.average_heart_rate)
            .ok_or_else(|| {
                ApiError::NotFound("No analysis result; pass ?baseline=<bpm>".to_string())
            })?,
    };

    Ok(Json(HeartRateResponse {
        baseline,
        axis: HEART_RATE_AXIS,
        points: state.charts.heart_rate(baseline),
    }))
}

/// GET /api/v1/charts/hypnogram
pub async fn hypnogram(State(state): State<Arc<AppState>>) -> Json<HypnogramResponse> {
    Json(HypnogramResponse::new(state.charts.hypnogram(), HYPNOGRAM_AXIS))
}
