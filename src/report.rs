//! Report Export
//!
//! Plain-text report of one analysis result, saved by the user as
//! `sleep-analysis-<subject_id>.txt`.

use crate::analysis::AnalysisResult;
use crate::presenter::{format_bpm, format_hours, format_percent, RiskTier};

pub const REPORT_TITLE: &str = "Sleep & Mental Health Analysis Report";

/// Render the report text
pub fn render_report(result: &AnalysisResult) -> String {
    let risk = RiskTier::from_probability(result.depression_probability);
    let rule = "=".repeat(REPORT_TITLE.len());

    let lines = [
        REPORT_TITLE.to_string(),
        rule,
        format!("Subject ID: {}", result.subject_id),
        format!(
            "Depression Probability: {} ({})",
            format_percent(result.depression_probability),
            risk.label()
        ),
        format!("Total Sleep Time: {}", format_hours(result.total_sleep_time)),
        format!("REM Sleep Duration: {}", format_hours(result.rem_sleep_duration)),
        format!("Awakenings: {}", result.awakenings),
        format!("Average Heart Rate: {}", format_bpm(result.average_heart_rate)),
    ];

    let mut report = lines.join("\n");
    report.push('\n');
    report
}

/// File name the report is saved under
pub fn report_filename(subject_id: &str) -> String {
    format!("sleep-analysis-{}.txt", subject_id)
}

/// `Content-Disposition` value for downloading the report.
///
/// Characters that cannot appear in a quoted header filename (quotes,
/// backslashes, path separators, control and non-ASCII characters) become `_`.
pub fn content_disposition(subject_id: &str) -> String {
    let safe: String = report_filename(subject_id)
        .chars()
        .map(|c| match c {
            '"' | '\\' | '/' => '_',
            c if c.is_ascii_graphic() || c == ' ' => c,
            _ => '_',
        })
        .collect();
    format!("attachment; filename=\"{}\"", safe)
}
