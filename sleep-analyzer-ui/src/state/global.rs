//! Global Application State
//!
//! Reactive state management using Leptos signals.

use leptos::*;

use crate::api::Results;

/// Global application state provided to all components
#[derive(Clone)]
pub struct GlobalState {
    /// Name of the file the server accepted
    pub file_name: RwSignal<Option<String>>,
    /// Subject ID as typed
    pub subject_id: RwSignal<String>,
    /// Submission in progress
    pub loading: RwSignal<bool>,
    /// Results of the last analysis; `Some` switches to the results view
    pub results: RwSignal<Option<Results>>,
    /// Error message to display
    pub error: RwSignal<Option<String>>,
    /// Success message (for toasts)
    pub success: RwSignal<Option<String>>,
}

/// Provide global state to the component tree
pub fn provide_global_state() {
    let state = GlobalState {
        file_name: create_rw_signal(None),
        subject_id: create_rw_signal(String::new()),
        loading: create_rw_signal(false),
        results: create_rw_signal(None),
        error: create_rw_signal(None),
        success: create_rw_signal(None),
    };

    provide_context(state);
}

impl GlobalState {
    /// Back to an empty upload form
    pub fn reset(&self) {
        self.file_name.set(None);
        self.subject_id.set(String::new());
        self.loading.set(false);
        self.results.set(None);
    }

    /// Show a success message (auto-clears after timeout)
    pub fn show_success(&self, message: &str) {
        self.success.set(Some(message.to_string()));

        let success_signal = self.success;
        gloo_timers::callback::Timeout::new(3000, move || {
            success_signal.set(None);
        }).forget();
    }

    /// Show an error message (auto-clears after timeout)
    pub fn show_error(&self, message: &str) {
        self.error.set(Some(message.to_string()));

        let error_signal = self.error;
        gloo_timers::callback::Timeout::new(5000, move || {
            error_signal.set(None);
        }).forget();
    }
}
