//! UI Components
//!
//! Reusable Leptos components for the dashboard.

pub mod chart;
pub mod metric_card;
pub mod toast;
pub mod upload_form;

pub use chart::{HeartRateCanvas, HypnogramCanvas};
pub use metric_card::{MetricCard, RiskBadge};
pub use toast::Toast;
pub use upload_form::UploadForm;
