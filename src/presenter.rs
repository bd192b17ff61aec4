//! Results Presenter
//!
//! Turns an [`AnalysisResult`] into what the results view shows: a risk
//! badge derived from the depression probability and one card per metric.

use serde::Serialize;

use crate::analysis::AnalysisResult;

/// Probability at or above which the result is high risk
pub const HIGH_RISK_THRESHOLD: f64 = 0.70;
/// Probability at or above which the result is at least moderate risk
pub const MODERATE_RISK_THRESHOLD: f64 = 0.40;

/// Depression risk tier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskTier {
    High,
    Moderate,
    Low,
}

impl RiskTier {
    /// Tier for a probability; both thresholds are inclusive
    pub fn from_probability(probability: f64) -> Self {
        if probability >= HIGH_RISK_THRESHOLD {
            RiskTier::High
        } else if probability >= MODERATE_RISK_THRESHOLD {
            RiskTier::Moderate
        } else {
            RiskTier::Low
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            RiskTier::High => "High Risk",
            RiskTier::Moderate => "Moderate Risk",
            RiskTier::Low => "Low Risk",
        }
    }

    /// Badge style name understood by the UI
    pub fn variant(&self) -> &'static str {
        match self {
            RiskTier::High => "destructive",
            RiskTier::Moderate => "warning",
            RiskTier::Low => "success",
        }
    }
}

impl std::fmt::Display for RiskTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Risk badge as rendered
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RiskBadge {
    pub tier: RiskTier,
    pub label: &'static str,
    pub variant: &'static str,
}

impl From<RiskTier> for RiskBadge {
    fn from(tier: RiskTier) -> Self {
        Self {
            tier,
            label: tier.label(),
            variant: tier.variant(),
        }
    }
}

/// A single metric card
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricCard {
    pub label: &'static str,
    pub value: String,
    /// Icon hint for the UI
    pub icon: &'static str,
}

/// Whole-number percentage, e.g. `82%`. Halves round up (`12.5` → `13%`).
pub fn format_percent(probability: f64) -> String {
    format!("{:.0}%", (probability * 100.0).round())
}

/// Hours as entered, e.g. `6.5 hrs`
pub fn format_hours(hours: f64) -> String {
    format!("{} hrs", hours)
}

/// Beats per minute, e.g. `72 bpm`
pub fn format_bpm(rate: f64) -> String {
    format!("{} bpm", rate)
}

/// The four sleep metric cards, in display order
pub fn metric_cards(result: &AnalysisResult) -> Vec<MetricCard> {
    vec![
        MetricCard {
            label: "Total Sleep Time",
            value: format_hours(result.total_sleep_time),
            icon: "moon",
        },
        MetricCard {
            label: "REM Sleep Duration",
            value: format_hours(result.rem_sleep_duration),
            icon: "activity",
        },
        MetricCard {
            label: "Awakenings",
            value: result.awakenings.to_string(),
            icon: "alert",
        },
        MetricCard {
            label: "Average Heart Rate",
            value: format_bpm(result.average_heart_rate),
            icon: "heart",
        },
    ]
}

/// Everything the results view needs apart from the charts
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResultsView {
    pub result: AnalysisResult,
    pub depression_percent: String,
    pub risk: RiskBadge,
    pub cards: Vec<MetricCard>,
}

impl ResultsView {
    pub fn new(result: AnalysisResult) -> Self {
        let risk = RiskTier::from_probability(result.depression_probability).into();
        Self {
            depression_percent: format_percent(result.depression_probability),
            cards: metric_cards(&result),
            risk,
            result,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::MockAnalyzer;

    #[test]
    fn test_risk_tiers() {
        assert_eq!(RiskTier::from_probability(0.82), RiskTier::High);
        assert_eq!(RiskTier::from_probability(0.55), RiskTier::Moderate);
        assert_eq!(RiskTier::from_probability(0.10), RiskTier::Low);
    }

    #[test]
    fn test_risk_thresholds_inclusive() {
        assert_eq!(RiskTier::from_probability(0.70), RiskTier::High);
        assert_eq!(RiskTier::from_probability(0.40), RiskTier::Moderate);
        assert_eq!(RiskTier::from_probability(0.6999), RiskTier::Moderate);
        assert_eq!(RiskTier::from_probability(0.3999), RiskTier::Low);
        assert_eq!(RiskTier::from_probability(0.0), RiskTier::Low);
        assert_eq!(RiskTier::from_probability(1.0), RiskTier::High);
    }

    #[test]
    fn test_risk_labels() {
        assert_eq!(RiskTier::High.label(), "High Risk");
        assert_eq!(RiskTier::Moderate.label(), "Moderate Risk");
        assert_eq!(RiskTier::Low.label(), "Low Risk");
        assert_eq!(RiskTier::Moderate.variant(), "warning");
    }

    #[test]
    fn test_formatting() {
        assert_eq!(format_percent(0.82), "82%");
        assert_eq!(format_percent(0.004), "0%");
        assert_eq!(format_percent(0.125), "13%");
        assert_eq!(format_percent(0.025), "3%");
        assert_eq!(format_percent(0.625), "63%");
        assert_eq!(format_percent(0.005), "1%");
        assert_eq!(format_hours(6.5), "6.5 hrs");
        assert_eq!(format_hours(7.0), "7 hrs");
        assert_eq!(format_bpm(72.0), "72 bpm");
    }

    #[test]
    fn test_results_view_for_mock() {
        let view = ResultsView::new(MockAnalyzer::fixed_result("001"));

        assert_eq!(view.depression_percent, "82%");
        assert_eq!(view.risk.label, "High Risk");
        assert_eq!(view.risk.variant, "destructive");

        let cards: Vec<(&str, &str)> = view
            .cards
            .iter()
            .map(|c| (c.label, c.value.as_str()))
            .collect();
        assert_eq!(
            cards,
            vec![
                ("Total Sleep Time", "6.5 hrs"),
                ("REM Sleep Duration", "1.2 hrs"),
                ("Awakenings", "4"),
                ("Average Heart Rate", "72 bpm"),
            ]
        );
    }

    #[test]
    fn test_results_view_json_shape() {
        let view = ResultsView::new(MockAnalyzer::fixed_result("001"));
        let json = serde_json::to_value(&view).unwrap();
        assert_eq!(json["risk"]["tier"], "high");
        assert_eq!(json["result"]["subject_id"], "001");
        assert_eq!(json["cards"].as_array().unwrap().len(), 4);
    }
}
