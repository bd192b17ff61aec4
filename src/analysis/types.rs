//! Analysis domain types

use serde::{Deserialize, Serialize};

/// Outcome of analysing one overnight recording for one subject.
///
/// Values are reported as-is. Plausibility (probability in [0, 1], REM not
/// exceeding total sleep, physiological heart rates) is not checked here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    /// Free-text subject identifier supplied at intake
    pub subject_id: String,
    /// Estimated probability of depression, 0.0 - 1.0
    pub depression_probability: f64,
    /// Total sleep time in hours
    pub total_sleep_time: f64,
    /// Time spent in REM sleep, in hours
    pub rem_sleep_duration: f64,
    /// Number of awakenings during the night
    pub awakenings: u32,
    /// Average heart rate over the night, beats per minute
    pub average_heart_rate: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serializes_snake_case_fields() {
        let result = AnalysisResult {
            subject_id: "S01".to_string(),
            depression_probability: 0.5,
            total_sleep_time: 7.0,
            rem_sleep_duration: 1.5,
            awakenings: 2,
            average_heart_rate: 64.0,
        };

        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["subject_id"], "S01");
        assert_eq!(json["depression_probability"], 0.5);
        assert_eq!(json["awakenings"], 2);

        let back: AnalysisResult = serde_json::from_value(json).unwrap();
        assert_eq!(back, result);
    }
}
