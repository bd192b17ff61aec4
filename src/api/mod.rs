//! Sleep Analyzer REST API
//!
//! HTTP API layer over the analysis session, built with Axum.
//!
//! # Endpoints
//!
//! ## Intake
//! - `POST /api/v1/upload` - Offer a recording (multipart field `file`)
//! - `POST /api/v1/analyze` - Submit with `{"subject_id": ".."}`
//!
//! ## Session
//! - `GET /api/v1/session` - Session snapshot
//! - `DELETE /api/v1/session` - Start a new analysis
//! - `GET /api/v1/results` - Current results view
//! - `GET /api/v1/report` - Download the text report
//!
//! ## Charts
//! - `GET /api/v1/charts/heart-rate` - Heart-rate trend
//! - `GET /api/v1/charts/hypnogram` - Reference hypnogram
//!
//! ## Health
//! - `GET /health/live` - Liveness probe
//! - `GET /health/ready` - Readiness probe
//! - `GET /health` - Full health status
//!
//! # Example
//!
//! ```rust,ignore
//! use sleep_analyzer::analysis::MockAnalyzer;
//! use sleep_analyzer::api::{serve, ApiConfig, AppState};
//! use sleep_analyzer::charts::ChartSynthesizer;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ApiConfig::default();
//!     let state = AppState::new(Arc::new(MockAnalyzer::new()), ChartSynthesizer::new(), config.clone());
//!     serve(state, &config).await?;
//!     Ok(())
//! }
//! ```

pub mod dto;
pub mod error;
pub mod routes;
pub mod state;

pub use error::{ApiError, ApiResult};
pub use state::{ApiConfig, AppState};

use axum::{
    extract::DefaultBodyLimit,
    http::HeaderValue,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

/// Build the API router with all routes and middleware
pub fn build_router(state: AppState) -> Router {
    let cors = cors_layer(&state.config.cors_origins);
    let max_body_size = state.config.max_body_size;

    let api_routes = Router::new()
        // Intake routes
        .route("/upload", post(routes::upload::upload_file))
        .route("/analyze", post(routes::upload::analyze))
        // Session routes
        .route(
            "/session",
            get(routes::session::get_session).delete(routes::session::reset_session),
        )
        .route("/results", get(routes::session::get_results))
        .route("/report", get(routes::report::download_report))
        // Chart routes
        .route("/charts/heart-rate", get(routes::charts::heart_rate))
        .route("/charts/hypnogram", get(routes::charts::hypnogram))
        // Recordings are large
        .layer(DefaultBodyLimit::max(max_body_size));

    let health_routes = Router::new()
        .route("/live", get(routes::health::liveness))
        .route("/ready", get(routes::health::readiness))
        .route("/", get(routes::health::full_health));

    // Create shared state
    let shared_state = Arc::new(state);

    Router::new()
        .nest("/api/v1", api_routes)
        .nest("/health", health_routes)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(shared_state)
}

/// CORS for the dashboard origins; permissive when none are configured
fn cors_layer(origins: &[String]) -> CorsLayer {
    if origins.is_empty() {
        return CorsLayer::permissive();
    }

    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(allowed)
        .allow_methods(Any)
        .allow_headers(Any)
        .expose_headers([axum::http::header::CONTENT_DISPOSITION])
}

/// Start the API server
pub async fn serve(state: AppState, config: &ApiConfig) -> Result<(), ApiError> {
    let router = build_router(state);

    let addr = config.addr();
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("Sleep Analyzer API listening on {}", addr);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| ApiError::Internal(format!("Server error: {}", e)))?;

    tracing::info!("Sleep Analyzer API shut down gracefully");
    Ok(())
}

/// Wait for shutdown signal
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install signal handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received, starting graceful shutdown");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::MockAnalyzer;
    use crate::charts::ChartSynthesizer;
    use axum::{
        body::Body,
        http::{header, Request, StatusCode},
        response::Response,
    };
    use serde_json::Value;
    use tower::util::ServiceExt;

    const BOUNDARY: &str = "sleep-analyzer-test-boundary";

    fn create_test_app() -> Router {
        create_test_app_with_delay(0)
    }

    fn create_test_app_with_delay(processing_delay_ms: u64) -> Router {
        let config = ApiConfig {
            processing_delay_ms,
            ..Default::default()
        };
        let state = AppState::new(
            Arc::new(MockAnalyzer::new()),
            ChartSynthesizer::seeded(42),
            config,
        );
        build_router(state)
    }

    fn upload_request(filename: &str, contents: &[u8]) -> Request<Body> {
        let mut body = Vec::new();
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"{filename}\"\r\nContent-Type: application/octet-stream\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(contents);
        body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());

        Request::builder()
            .method("POST")
            .uri("/api/v1/upload")
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(body))
            .unwrap()
    }

    fn analyze_request(subject_id: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/api/v1/analyze")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(
                serde_json::json!({ "subject_id": subject_id }).to_string(),
            ))
            .unwrap()
    }

    fn get_request(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    async fn json_body(response: Response) -> Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    async fn text_body(response: Response) -> String {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn test_health_live() {
        let app = create_test_app();
        let response = app.oneshot(get_request("/health/live")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_health_ready() {
        let app = create_test_app();
        let response = app.oneshot(get_request("/health/ready")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_health_full() {
        let app = create_test_app();
        let response = app.oneshot(get_request("/health")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = json_body(response).await;
        assert_eq!(body["status"], "healthy");
        assert_eq!(body["analyzer"], "mock");
    }

    #[tokio::test]
    async fn test_upload_accepts_edf() {
        let app = create_test_app();
        let response = app
            .oneshot(upload_request("night1.EDF", b"recording"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = json_body(response).await;
        assert_eq!(body["filename"], "night1.EDF");
        assert_eq!(body["format"], "edf");
        assert_eq!(body["size_bytes"], 9);
        assert_eq!(body["message"], "File uploaded successfully");
    }

    #[tokio::test]
    async fn test_upload_rejects_csv_and_keeps_previous() {
        let app = create_test_app();

        let response = app
            .clone()
            .oneshot(upload_request("night1.edf", b"abc"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let response = app
            .clone()
            .oneshot(upload_request("night1.csv", b"a,b,c"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = json_body(response).await;
        assert_eq!(body["error"]["code"], "INVALID_FILE_EXTENSION");

        let session = json_body(app.oneshot(get_request("/api/v1/session")).await.unwrap()).await;
        assert_eq!(session["file"]["filename"], "night1.edf");
        assert_eq!(session["view"], "upload");
    }

    #[tokio::test]
    async fn test_analyze_without_file() {
        let app = create_test_app();
        let response = app.oneshot(analyze_request("001")).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = json_body(response).await;
        assert_eq!(body["error"]["code"], "MISSING_FILE");
        assert_eq!(body["error"]["message"], "Please upload an EEG data file");
    }

    #[tokio::test]
    async fn test_analyze_without_subject() {
        let app = create_test_app();
        app.clone()
            .oneshot(upload_request("sample.npy", b"\x93NUMPY"))
            .await
            .unwrap();

        let response = app.clone().oneshot(analyze_request("   ")).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = json_body(response).await;
        assert_eq!(body["error"]["code"], "MISSING_SUBJECT_ID");

        let response = app.oneshot(get_request("/api/v1/results")).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_report_before_analysis() {
        let app = create_test_app();
        let response = app.oneshot(get_request("/api/v1/report")).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_heart_rate_with_explicit_baseline() {
        let app = create_test_app();
        let response = app
            .oneshot(get_request("/api/v1/charts/heart-rate?baseline=60"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = json_body(response).await;
        assert_eq!(body["axis"]["min"], 50.0);
        assert_eq!(body["axis"]["max"], 90.0);
        let points = body["points"].as_array().unwrap();
        assert_eq!(points.len(), 9);
        for point in points {
            let rate = point["rate"].as_i64().unwrap();
            assert!((rate - 60).abs() <= 13);
        }
    }

    #[tokio::test]
    async fn test_heart_rate_needs_result_or_baseline() {
        let app = create_test_app();
        let response = app.oneshot(get_request("/api/v1/charts/heart-rate")).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_hypnogram() {
        let app = create_test_app();
        let response = app.oneshot(get_request("/api/v1/charts/hypnogram")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = json_body(response).await;
        let points = body["points"].as_array().unwrap();
        assert_eq!(points.len(), 17);
        assert_eq!(points[0]["time"], "22:00");
        assert_eq!(points[0]["label"], "Wake");
        assert_eq!(points[6]["stage"], 4);
        assert_eq!(points[6]["code"], "R");
        assert_eq!(body["stage_labels"][4], "REM");
    }

    #[tokio::test]
    async fn test_full_session_flow() {
        let app = create_test_app();

        // Upload
        let response = app
            .clone()
            .oneshot(upload_request("sample.edf", b"recording"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        // Analyze
        let response = app.clone().oneshot(analyze_request("001")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let results = json_body(response).await;
        assert_eq!(results["result"]["subject_id"], "001");
        assert_eq!(results["depression_percent"], "82%");
        assert_eq!(results["risk"]["label"], "High Risk");
        assert_eq!(results["cards"][0]["value"], "6.5 hrs");
        assert_eq!(results["cards"][3]["value"], "72 bpm");

        // Session shows results
        let session = json_body(app.clone().oneshot(get_request("/api/v1/session")).await.unwrap()).await;
        assert_eq!(session["view"], "results");
        assert_eq!(session["is_loading"], false);

        // Report
        let response = app.clone().oneshot(get_request("/api/v1/report")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[header::CONTENT_DISPOSITION],
            "attachment; filename=\"sleep-analysis-001.txt\""
        );
        let report = text_body(response).await;
        assert!(report.contains("Subject ID: 001"));
        assert!(report.contains("82%"));
        assert!(report.contains("72 bpm"));

        // Charts follow the result, identically under a fixed seed
        let first = json_body(app.clone().oneshot(get_request("/api/v1/charts/heart-rate")).await.unwrap()).await;
        let second = json_body(app.clone().oneshot(get_request("/api/v1/charts/heart-rate")).await.unwrap()).await;
        assert_eq!(first["baseline"], 72.0);
        assert_eq!(first["points"], second["points"]);

        // New analysis
        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .method("DELETE")
                    .uri("/api/v1/session")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NO_CONTENT);

        let session = json_body(app.clone().oneshot(get_request("/api/v1/session")).await.unwrap()).await;
        assert_eq!(session["view"], "upload");
        assert_eq!(session["subject_id"], "");
        assert!(session["file"].is_null());
        assert!(session["results"].is_null());

        let response = app.oneshot(get_request("/api/v1/results")).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_reset_during_analyze_conflicts() {
        let app = create_test_app_with_delay(200);
        app.clone()
            .oneshot(upload_request("sample.edf", b"recording"))
            .await
            .unwrap();

        let pending = tokio::spawn(app.clone().oneshot(analyze_request("001")));
        tokio::time::sleep(std::time::Duration::from_millis(50)).await;

        // A second submission is refused while the first is processing
        let response = app.clone().oneshot(analyze_request("002")).await.unwrap();
        assert_eq!(response.status(), StatusCode::CONFLICT);
        assert_eq!(json_body(response).await["error"]["code"], "ANALYSIS_IN_PROGRESS");

        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .method("DELETE")
                    .uri("/api/v1/session")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NO_CONTENT);

        let response = pending.await.unwrap().unwrap();
        assert_eq!(response.status(), StatusCode::CONFLICT);
        assert_eq!(json_body(response).await["error"]["code"], "ANALYSIS_CANCELLED");

        let session = json_body(app.oneshot(get_request("/api/v1/session")).await.unwrap()).await;
        assert_eq!(session["view"], "upload");
        assert_eq!(session["subject_id"], "");
    }
}
