//! every.org partner API client
//!
//! # Architecture
//!
//! - [`ClientPool`] builds the public and private [`crate::http::HttpClient`]
//!   handles once from `Settings`
//! - [`EveryOrgClient`] validates input, builds paths and maps responses
//! - Retries and idempotency keys are handled below this layer by the HTTP
//!   resilience policy

pub mod client;
pub mod pool;

pub use client::EveryOrgClient;
pub use pool::{ClientOptions, ClientPool};
