//! Upload Form Component
//!
//! File picker, subject ID input and submit button.

use leptos::*;
use wasm_bindgen::JsCast;

use crate::api;
use crate::state::global::GlobalState;

/// Upload card on the landing page
#[component]
pub fn UploadForm() -> impl IntoView {
    let state = use_context::<GlobalState>().expect("GlobalState not found");

    let state_for_file = state.clone();
    let on_file_change = move |ev: web_sys::Event| {
        let Some(input) = ev
            .target()
            .and_then(|t| t.dyn_into::<web_sys::HtmlInputElement>().ok())
        else {
            return;
        };
        let Some(file) = input.files().and_then(|files| files.get(0)) else {
            return;
        };

        if !api::has_accepted_extension(&file.name()) {
            state_for_file.show_error("Please upload a .edf or .npy file");
            input.set_value("");
            return;
        }

        let state_clone = state_for_file.clone();
        spawn_local(async move {
            match api::upload_file(&file).await {
                Ok(uploaded) => {
                    state_clone.file_name.set(Some(uploaded.filename));
                    state_clone.show_success(&uploaded.message);
                }
                Err(e) => {
                    state_clone.show_error(&e);
                }
            }
        });
    };

    let state_for_submit = state.clone();
    let on_submit = move |ev: ev::SubmitEvent| {
        ev.prevent_default();

        let state = state_for_submit.clone();
        if state.loading.get_untracked() {
            return;
        }
        if state.file_name.get_untracked().is_none() {
            state.show_error("Please upload an EEG data file");
            return;
        }
        let subject_id = state.subject_id.get_untracked();
        if subject_id.trim().is_empty() {
            state.show_error("Please enter a subject ID");
            return;
        }

        state.loading.set(true);
        spawn_local(async move {
            match api::analyze(&subject_id).await {
                Ok(results) => {
                    state.results.set(Some(results));
                }
                Err(e) => {
                    state.show_error(&e);
                }
            }
            state.loading.set(false);
        });
    };

    let accept_hint = api::ACCEPTED_EXTENSIONS
        .iter()
        .map(|ext| format!(".{}", ext))
        .collect::<Vec<_>>()
        .join(",");

    let loading = state.loading;
    let subject_id = state.subject_id;
    let file_name = state.file_name;

    view! {
        <form on:submit=on_submit class="bg-gray-800 rounded-xl p-6 space-y-5 border border-gray-700">
            <h2 class="text-xl font-semibold">"Upload EEG Data"</h2>

            <div>
                <label class="block text-sm text-gray-400 mb-2">"EEG recording (.edf or .npy)"</label>
                <input
                    type="file"
                    accept=accept_hint
                    on:change=on_file_change
                    class="block w-full text-sm text-gray-300 file:mr-4 file:py-2 file:px-4 \
                           file:rounded-lg file:border-0 file:bg-primary-600 file:text-white"
                />
                {move || file_name.get().map(|name| view! {
                    <p class="text-sm text-green-400 mt-2">"Selected: " {name}</p>
                })}
            </div>

            <div>
                <label class="block text-sm text-gray-400 mb-2">"Subject ID"</label>
                <input
                    type="text"
                    placeholder="e.g. 001"
                    prop:value=move || subject_id.get()
                    on:input=move |ev| subject_id.set(event_target_value(&ev))
                    class="w-full bg-gray-700 border border-gray-600 rounded-lg px-3 py-2 text-white"
                />
            </div>

            <button
                type="submit"
                disabled=move || loading.get()
                class="w-full px-6 py-3 bg-primary-600 hover:bg-primary-700 disabled:opacity-50 \
                       rounded-lg font-medium transition-colors"
            >
                {move || if loading.get() {
                    "Processing..."
                } else {
                    "Analyze Sleep and Depression Risk"
                }}
            </button>
        </form>
    }
}
