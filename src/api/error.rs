//! API Error Types
//!
//! Defines error types for the API layer and implements conversion
//! to HTTP responses with appropriate status codes.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use crate::analysis::AnalysisError;
use crate::intake::IntakeError;
use crate::session::SessionError;

/// API error types
#[derive(Error, Debug)]
pub enum ApiError {
    /// Upload form validation failed
    #[error("{0}")]
    Intake(#[from] IntakeError),

    /// Analyzer rejected the recording or could not run
    #[error("{0}")]
    Analysis(#[from] AnalysisError),

    /// A submission is already being processed
    #[error("An analysis is already in progress")]
    AnalysisInProgress,

    /// The session was reset while the submission was processing
    #[error("The session was reset before the analysis finished")]
    AnalysisCancelled,

    /// Malformed request
    #[error("Validation error: {0}")]
    Validation(String),

    /// Resource not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Internal server error
    #[error("Internal error: {0}")]
    Internal(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<SessionError> for ApiError {
    fn from(err: SessionError) -> Self {
        match err {
            SessionError::Intake(e) => ApiError::Intake(e),
            SessionError::Analysis(e) => ApiError::Analysis(e),
            SessionError::AnalysisInProgress => ApiError::AnalysisInProgress,
            SessionError::AnalysisCancelled => ApiError::AnalysisCancelled,
        }
    }
}

impl ApiError {
    pub fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            ApiError::Intake(e) => (StatusCode::BAD_REQUEST, e.code()),
            ApiError::Analysis(e) => {
                let status = match e {
                    AnalysisError::UnreadableFile(_) => StatusCode::UNPROCESSABLE_ENTITY,
                    AnalysisError::UnsupportedFormat(_) => StatusCode::UNSUPPORTED_MEDIA_TYPE,
                    AnalysisError::ModelUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
                };
                (status, e.code())
            }
            ApiError::AnalysisInProgress => (StatusCode::CONFLICT, "ANALYSIS_IN_PROGRESS"),
            ApiError::AnalysisCancelled => (StatusCode::CONFLICT, "ANALYSIS_CANCELLED"),
            ApiError::Validation(_) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR"),
            ApiError::NotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            ApiError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
            ApiError::Io(_) => (StatusCode::INTERNAL_SERVER_ERROR, "IO_ERROR"),
        }
    }
}

/// Error response body
#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: ErrorBody,
    pub request_id: String,
}

/// Error details
#[derive(Serialize)]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();

        let request_id = uuid::Uuid::new_v4().to_string();

        // User mistakes are routine; only server-side failures are errors
        if status.is_server_error() {
            tracing::error!(
                request_id = %request_id,
                error_code = %code,
                error_message = %self,
                "API error occurred"
            );
        } else {
            tracing::warn!(
                request_id = %request_id,
                error_code = %code,
                error_message = %self,
                "Request rejected"
            );
        }

        let body = ErrorResponse {
            error: ErrorBody {
                code: code.to_string(),
                message: self.to_string(),
            },
            request_id,
        };

        (status, Json(body)).into_response()
    }
}

/// Result type for API operations
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        let cases = [
            (
                ApiError::Intake(IntakeError::MissingFile),
                StatusCode::BAD_REQUEST,
                "MISSING_FILE",
            ),
            (
                ApiError::Analysis(AnalysisError::UnreadableFile("bad header".into())),
                StatusCode::UNPROCESSABLE_ENTITY,
                "UNREADABLE_FILE",
            ),
            (
                ApiError::Analysis(AnalysisError::UnsupportedFormat("EDF+D".into())),
                StatusCode::UNSUPPORTED_MEDIA_TYPE,
                "UNSUPPORTED_FORMAT",
            ),
            (
                ApiError::Analysis(AnalysisError::ModelUnavailable("down".into())),
                StatusCode::SERVICE_UNAVAILABLE,
                "MODEL_UNAVAILABLE",
            ),
            (
                ApiError::from(SessionError::AnalysisInProgress),
                StatusCode::CONFLICT,
                "ANALYSIS_IN_PROGRESS",
            ),
            (
                ApiError::from(SessionError::AnalysisCancelled),
                StatusCode::CONFLICT,
                "ANALYSIS_CANCELLED",
            ),
        ];

        for (err, status, code) in cases {
            assert_eq!(err.status_and_code(), (status, code), "{err}");
        }
    }

    #[test]
    fn test_intake_message_passes_through() {
        let err = ApiError::from(SessionError::Intake(IntakeError::MissingSubjectId));
        assert_eq!(err.to_string(), "Please enter a subject ID");
    }
}
