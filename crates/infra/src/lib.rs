//! # EveryOrg Infrastructure
//!
//! Network-facing implementation of the every.org partner API client.
//!
//! This crate contains:
//! - The HTTP transport with retry and idempotency-key rotation
//! - The public/private client pool
//! - The API client operations and the donation link builder
//!
//! ## Architecture
//! - Depends on `everyorg-domain` for models and errors
//! - Depends on `everyorg-common` for the retry engine
//! - Contains all I/O

pub mod api;
pub mod donation;
pub mod http;

// Re-export commonly used items
pub use api::{ClientOptions, ClientPool, EveryOrgClient};
pub use donation::build_donation_url;
pub use http::{HttpClient, HttpClientBuilder, HttpResponse, ResiliencePolicy};
pub use tokio_util::sync::CancellationToken;
