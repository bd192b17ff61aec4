//! API Access
//!
//! HTTP client for the Sleep Analyzer REST API.

pub mod client;

pub use client::*;
