//! HTTP API Client
//!
//! Functions for communicating with the Sleep Analyzer REST API.

use gloo_net::http::{Request, Response};

/// Default API base URL
pub const DEFAULT_API_BASE: &str = "http://localhost:8090/api/v1";

/// Extensions the server accepts, without the dot
pub const ACCEPTED_EXTENSIONS: [&str; 2] = ["edf", "npy"];

/// Get the API base URL from local storage or use default
pub fn get_api_base() -> String {
    let url = web_sys::window()
        .and_then(|window| window.local_storage().ok().flatten())
        .and_then(|storage| storage.get_item("sleep_analyzer_api_url").ok().flatten())
        .unwrap_or_else(|| DEFAULT_API_BASE.to_string());
    // Normalize: remove trailing slash
    url.trim_end_matches('/').to_string()
}

/// Same check the server runs, so obviously wrong files never leave the browser
pub fn has_accepted_extension(filename: &str) -> bool {
    filename
        .rsplit_once('.')
        .map(|(_, ext)| ACCEPTED_EXTENSIONS.iter().any(|a| a.eq_ignore_ascii_case(ext)))
        .unwrap_or(false)
}

/// Attachment filename from a `Content-Disposition` header value
pub fn attachment_filename(header: &str) -> Option<String> {
    let (_, rest) = header.split_once("filename=")?;
    let name = rest.split(';').next()?.trim().trim_matches('"');
    if name.is_empty() {
        None
    } else {
        Some(name.to_string())
    }
}

// ============ Response Types ============

#[derive(Debug, Clone, PartialEq, serde::Deserialize)]
pub struct UploadResponse {
    pub filename: String,
    pub format: String,
    pub size_bytes: u64,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, serde::Deserialize)]
pub struct AnalysisResult {
    pub subject_id: String,
    pub depression_probability: f64,
    pub total_sleep_time: f64,
    pub rem_sleep_duration: f64,
    pub awakenings: u32,
    pub average_heart_rate: f64,
}

#[derive(Debug, Clone, PartialEq, serde::Deserialize)]
pub struct RiskBadge {
    pub tier: String,
    pub label: String,
    pub variant: String,
}

#[derive(Debug, Clone, PartialEq, serde::Deserialize)]
pub struct MetricCard {
    pub label: String,
    pub value: String,
    pub icon: String,
}

/// Results view as served by `/analyze` and `/results`
#[derive(Debug, Clone, PartialEq, serde::Deserialize)]
pub struct Results {
    pub result: AnalysisResult,
    pub depression_percent: String,
    pub risk: RiskBadge,
    pub cards: Vec<MetricCard>,
}

#[derive(Debug, Clone, Copy, PartialEq, serde::Deserialize)]
pub struct ChartAxis {
    pub min: f64,
    pub max: f64,
}

#[derive(Debug, Clone, PartialEq, serde::Deserialize)]
pub struct HeartRatePoint {
    pub time: String,
    pub rate: i32,
}

#[derive(Debug, Clone, PartialEq, serde::Deserialize)]
pub struct HeartRateChart {
    pub baseline: f64,
    pub axis: ChartAxis,
    pub points: Vec<HeartRatePoint>,
}

#[derive(Debug, Clone, PartialEq, serde::Deserialize)]
pub struct HypnogramPoint {
    pub time: String,
    pub stage: u8,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, serde::Deserialize)]
pub struct HypnogramChart {
    pub axis: ChartAxis,
    pub stage_labels: Vec<String>,
    pub points: Vec<HypnogramPoint>,
}

/// Downloaded report
#[derive(Debug, Clone)]
pub struct Report {
    pub filename: String,
    pub text: String,
}

#[derive(Debug, serde::Deserialize)]
pub struct ApiError {
    pub error: ApiErrorBody,
}

#[derive(Debug, serde::Deserialize)]
pub struct ApiErrorBody {
    pub code: String,
    pub message: String,
}

// ============ API Functions ============

/// Message of a failed response
async fn error_message(response: Response) -> String {
    let status = response.status();
    match response.json::<ApiError>().await {
        Ok(err) => err.error.message,
        Err(_) => format!("Request failed ({})", status),
    }
}

/// Upload a recording as multipart form data
pub async fn upload_file(file: &web_sys::File) -> Result<UploadResponse, String> {
    let api_base = get_api_base();

    let form = web_sys::FormData::new().map_err(|_| "Cannot build upload form".to_string())?;
    form.append_with_blob_and_filename("file", file, &file.name())
        .map_err(|_| "Cannot attach file".to_string())?;

    let response = Request::post(&format!("{}/upload", api_base))
        .body(form)
        .map_err(|e| format!("Request build error: {}", e))?
        .send()
        .await
        .map_err(|e| format!("Network error: {}", e))?;

    if !response.ok() {
        return Err(error_message(response).await);
    }

    response.json().await
        .map_err(|e| format!("Parse error: {}", e))
}

/// Submit the uploaded recording for analysis
pub async fn analyze(subject_id: &str) -> Result<Results, String> {
    #[derive(serde::Serialize)]
    struct AnalyzeRequest<'a> {
        subject_id: &'a str,
    }

    let api_base = get_api_base();

    let response = Request::post(&format!("{}/analyze", api_base))
        .json(&AnalyzeRequest { subject_id })
        .map_err(|e| format!("Request build error: {}", e))?
        .send()
        .await
        .map_err(|e| format!("Network error: {}", e))?;

    if !response.ok() {
        return Err(error_message(response).await);
    }

    response.json().await
        .map_err(|e| format!("Parse error: {}", e))
}

/// Fetch the heart-rate trend for the current result
pub async fn fetch_heart_rate() -> Result<HeartRateChart, String> {
    let api_base = get_api_base();

    let response = Request::get(&format!("{}/charts/heart-rate", api_base))
        .send()
        .await
        .map_err(|e| format!("Network error: {}", e))?;

    if !response.ok() {
        return Err(error_message(response).await);
    }

    response.json().await
        .map_err(|e| format!("Parse error: {}", e))
}

/// Fetch the hypnogram
pub async fn fetch_hypnogram() -> Result<HypnogramChart, String> {
    let api_base = get_api_base();

    let response = Request::get(&format!("{}/charts/hypnogram", api_base))
        .send()
        .await
        .map_err(|e| format!("Network error: {}", e))?;

    if !response.ok() {
        return Err(error_message(response).await);
    }

    response.json().await
        .map_err(|e| format!("Parse error: {}", e))
}

/// Download the text report of the current result
pub async fn fetch_report(subject_id: &str) -> Result<Report, String> {
    let api_base = get_api_base();

    let response = Request::get(&format!("{}/report", api_base))
        .send()
        .await
        .map_err(|e| format!("Network error: {}", e))?;

    if !response.ok() {
        return Err(error_message(response).await);
    }

    let filename = response
        .headers()
        .get("content-disposition")
        .and_then(|h| attachment_filename(&h))
        .unwrap_or_else(|| format!("sleep-analysis-{}.txt", subject_id));

    let text = response.text().await
        .map_err(|e| format!("Read error: {}", e))?;

    Ok(Report { filename, text })
}

/// Start a new analysis
pub async fn reset_session() -> Result<(), String> {
    let api_base = get_api_base();

    let response = Request::delete(&format!("{}/session", api_base))
        .send()
        .await
        .map_err(|e| format!("Network error: {}", e))?;

    if !response.ok() {
        return Err(error_message(response).await);
    }

    Ok(())
}
