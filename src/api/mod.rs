//! Upstream video API access.
//!
//! [`ApiClient`] issues exactly one HTTP request per call. It never retries,
//! and it sends the API key from [`ApiConfig`] as a header on every request.

mod client;
pub mod types;

pub use client::{ApiClient, ApiConfig, API_KEY_HEADER};
