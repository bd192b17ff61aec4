//! Results Page
//!
//! Risk badge, metric cards, charts, report download and reset.

use leptos::*;
use wasm_bindgen::JsCast;

use crate::api::{self, HeartRateChart, HypnogramChart, Report, Results};
use crate::components::{HeartRateCanvas, HypnogramCanvas, MetricCard, RiskBadge};
use crate::state::global::GlobalState;

/// Results page component
#[component]
pub fn ResultsPage(results: Results) -> impl IntoView {
    let state = use_context::<GlobalState>().expect("GlobalState not found");

    let (heart_rate, set_heart_rate) = create_signal::<Option<HeartRateChart>>(None);
    let (hypnogram, set_hypnogram) = create_signal::<Option<HypnogramChart>>(None);

    // Load chart series once per results view
    let state_for_charts = state.clone();
    spawn_local(async move {
        match api::fetch_heart_rate().await {
            Ok(chart) => set_heart_rate.set(Some(chart)),
            Err(e) => state_for_charts.show_error(&e),
        }
        match api::fetch_hypnogram().await {
            Ok(chart) => set_hypnogram.set(Some(chart)),
            Err(e) => state_for_charts.show_error(&e),
        }
    });

    let subject_id = results.result.subject_id.clone();
    let state_for_download = state.clone();
    let download_report = move |_| {
        let subject_id = subject_id.clone();
        let state = state_for_download.clone();
        spawn_local(async move {
            match api::fetch_report(&subject_id).await {
                Ok(report) => {
                    if save_text_file(&report) {
                        state.show_success("Report downloaded");
                    } else {
                        state.show_error("Could not save the report");
                    }
                }
                Err(e) => state.show_error(&e),
            }
        });
    };

    let state_for_reset = state;
    let analyze_another = move |_| {
        let state = state_for_reset.clone();
        spawn_local(async move {
            match api::reset_session().await {
                Ok(()) => state.reset(),
                Err(e) => state.show_error(&e),
            }
        });
    };

    let cards = results
        .cards
        .iter()
        .map(|card| view! {
            <MetricCard label=card.label.clone() value=card.value.clone() icon=card.icon.clone() />
        })
        .collect_view();

    view! {
        <div class="space-y-8">
            <section class="bg-gray-800 rounded-xl p-6 border border-gray-700">
                <div class="flex items-center justify-between">
                    <div>
                        <p class="text-gray-400 text-sm">"Subject " {results.result.subject_id.clone()}</p>
                        <h2 class="text-xl font-semibold">"Depression Probability"</h2>
                    </div>
                    <RiskBadge label=results.risk.label.clone() variant=results.risk.variant.clone() />
                </div>
                <div class="text-5xl font-bold mt-4">{results.depression_percent.clone()}</div>
            </section>

            <section class="grid grid-cols-2 md:grid-cols-4 gap-4">
                {cards}
            </section>

            <section class="grid grid-cols-1 lg:grid-cols-2 gap-6">
                <div class="bg-gray-800 rounded-xl p-4 border border-gray-700">
                    <h3 class="font-semibold mb-3">"Sleep Stages"</h3>
                    <HypnogramCanvas data=hypnogram />
                </div>
                <div class="bg-gray-800 rounded-xl p-4 border border-gray-700">
                    <h3 class="font-semibold mb-3">"Heart Rate"</h3>
                    <HeartRateCanvas data=heart_rate />
                </div>
            </section>

            <div class="flex justify-center space-x-4">
                <button
                    on:click=download_report
                    class="px-6 py-3 bg-primary-600 hover:bg-primary-700 rounded-lg font-medium transition-colors"
                >
                    "Download Report"
                </button>
                <button
                    on:click=analyze_another
                    class="px-6 py-3 bg-gray-700 hover:bg-gray-600 rounded-lg font-medium transition-colors"
                >
                    "Analyze Another File"
                </button>
            </div>
        </div>
    }
}

/// Save text through a temporary object URL and anchor click
fn save_text_file(report: &Report) -> bool {
    let Some(document) = web_sys::window().and_then(|w| w.document()) else {
        return false;
    };
    let Ok(blob) = web_sys::Blob::new_with_str_sequence(&js_sys::Array::of1(
        &report.text.as_str().into(),
    )) else {
        return false;
    };
    let Ok(url) = web_sys::Url::create_object_url_with_blob(&blob) else {
        return false;
    };

    let clicked = document
        .create_element("a")
        .ok()
        .and_then(|a| a.dyn_into::<web_sys::HtmlAnchorElement>().ok())
        .map(|a| {
            a.set_href(&url);
            a.set_download(&report.filename);
            a.click();
        })
        .is_some();

    let _ = web_sys::Url::revoke_object_url(&url);
    clicked
}
