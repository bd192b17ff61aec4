//! Upload Page
//!
//! Landing view: hero, upload form and feature overview.

use leptos::*;

use crate::components::UploadForm;

/// Upload page component
#[component]
pub fn UploadPage() -> impl IntoView {
    view! {
        <div class="space-y-10">
            // Hero
            <section class="text-center space-y-3">
                <h1 class="text-4xl font-bold">"Sleep & Mental Health Analyzer"</h1>
                <p class="text-gray-400 max-w-2xl mx-auto">
                    "Upload an overnight EEG recording to estimate sleep quality and depression risk."
                </p>
            </section>

            <div class="max-w-xl mx-auto">
                <UploadForm />
            </div>

            // Features
            <section class="grid grid-cols-1 md:grid-cols-3 gap-4">
                <FeatureCard
                    title="Sleep Staging"
                    body="Wake, N1, N2, N3 and REM across the night."
                />
                <FeatureCard
                    title="Depression Risk"
                    body="Probability with a high, moderate or low risk tier."
                />
                <FeatureCard
                    title="Downloadable Report"
                    body="A plain-text summary of every metric."
                />
            </section>
        </div>
    }
}

#[component]
fn FeatureCard(title: &'static str, body: &'static str) -> impl IntoView {
    view! {
        <div class="bg-gray-800 rounded-lg p-5 border border-gray-700">
            <h3 class="font-semibold mb-1">{title}</h3>
            <p class="text-sm text-gray-400">{body}</p>
        </div>
    }
}
