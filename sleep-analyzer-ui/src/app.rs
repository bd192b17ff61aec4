//! App Root Component
//!
//! Main application component with the global providers. The view is the
//! upload form until a result arrives, then the results page.

use leptos::*;

use crate::components::Toast;
use crate::pages::{ResultsPage, UploadPage};
use crate::state::global::{provide_global_state, GlobalState};

/// Root application component
#[component]
pub fn App() -> impl IntoView {
    // Provide global state to all components
    provide_global_state();

    let state = use_context::<GlobalState>().expect("GlobalState not found");
    let results = state.results;

    view! {
        <div class="min-h-screen bg-gray-900 text-white flex flex-col">
            <Header />

            // Main content area
            <main class="flex-1 container mx-auto px-4 py-8 pb-24">
                {move || match results.get() {
                    Some(results) => view! { <ResultsPage results=results /> }.into_view(),
                    None => view! { <UploadPage /> }.into_view(),
                }}
            </main>

            <Footer />

            // Toast notifications
            <Toast />
        </div>
    }
}

#[component]
fn Header() -> impl IntoView {
    view! {
        <header class="bg-gray-800 border-b border-gray-700">
            <div class="container mx-auto px-4 py-4 flex items-center space-x-3">
                <span class="text-2xl">"☾"</span>
                <span class="text-lg font-semibold">"Sleep & Mental Health Analyzer"</span>
            </div>
        </header>
    }
}

/// Footer with the research-use notice and the processing indicator
#[component]
fn Footer() -> impl IntoView {
    let state = use_context::<GlobalState>().expect("GlobalState not found");

    view! {
        <footer class="fixed bottom-0 left-0 right-0 bg-gray-800 border-t border-gray-700 py-3 px-4">
            <div class="container mx-auto flex items-center justify-between text-sm">
                <div class="text-gray-400">
                    "For research and demonstration only. Not a medical diagnosis."
                </div>

                // Loading indicator
                {move || {
                    if state.loading.get() {
                        view! {
                            <div class="flex items-center space-x-2 text-primary-400">
                                <div class="loading-spinner w-4 h-4" />
                                <span>"Processing..."</span>
                            </div>
                        }.into_view()
                    } else {
                        view! {}.into_view()
                    }
                }}
            </div>
        </footer>
    }
}
