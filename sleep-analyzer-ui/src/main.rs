//! Sleep Analyzer Dashboard
//!
//! EEG sleep and depression risk dashboard built with Leptos (WASM).
//!
//! # Features
//!
//! - Upload of an overnight recording (`.edf` or `.npy`) with a subject ID
//! - Depression risk badge and sleep metric cards
//! - Hypnogram and heart-rate charts
//! - Plain-text report download
//!
//! # Architecture
//!
//! This is a client-side rendered (CSR) Leptos application that compiles to
//! WebAssembly. It talks to the Sleep Analyzer API over HTTP.

use leptos::*;

mod api;
mod app;
mod components;
mod pages;
mod state;

fn main() {
    // Set up panic hook for better error messages in WASM
    console_error_panic_hook::set_once();

    // Mount the app to the document body
    mount_to_body(|| view! { <app::App /> });
}
