//! HTTP transport: a reqwest client wrapped in the retry pipeline.

pub mod client;
pub mod resilience;

pub use client::{HttpClient, HttpClientBuilder, HttpResponse};
pub use resilience::{AttemptFailure, ResiliencePolicy, TransientHttpPolicy};
