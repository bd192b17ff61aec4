//! Metric Card Component
//!
//! Displays one sleep metric of the analysis result.

use leptos::*;

/// Glyph for the icon hint sent by the API
fn icon_glyph(icon: &str) -> &'static str {
    match icon {
        "moon" => "☾",
        "activity" => "∿",
        "alert" => "⚠",
        "heart" => "♥",
        _ => "•",
    }
}

/// Metric card component
#[component]
pub fn MetricCard(
    #[prop(into)]
    label: String,
    #[prop(into)]
    value: String,
    #[prop(into)]
    icon: String,
) -> impl IntoView {
    view! {
        <div class="bg-gray-800 rounded-lg p-4 border border-gray-700">
            <div class="flex items-center justify-between">
                <span class="text-gray-400 text-sm">{label}</span>
                <span class="text-primary-400 text-lg">{icon_glyph(&icon)}</span>
            </div>
            <div class="text-3xl font-bold mt-2">{value}</div>
        </div>
    }
}

/// Depression risk badge
#[component]
pub fn RiskBadge(
    #[prop(into)]
    label: String,
    #[prop(into)]
    variant: String,
) -> impl IntoView {
    let color = match variant.as_str() {
        "destructive" => "bg-red-600",
        "warning" => "bg-yellow-600",
        _ => "bg-green-600",
    };

    view! {
        <span class=format!("px-3 py-1 rounded-full text-sm font-medium text-white {}", color)>
            {label}
        </span>
    }
}
