//! Resilience patterns for transient-failure handling
//!
//! Generic retry machinery, independent of HTTP:
//! - **Backoff**: fixed or decorrelated jitter
//! - **Policy**: a [`RetryPolicy`] decides per error whether to retry
//! - **Executor**: [`RetryExecutor`] drives attempts and reports each
//!   attempt's position so callers can build per-attempt state
//!
//! The HTTP-specific policy (transient status classification and idempotency
//! key rotation) lives in `everyorg-infra`.

pub mod retry;

// Re-export retry types
pub use retry::{
    Attempt, BackoffStrategy, RetryConfig, RetryConfigBuilder, RetryDecision, RetryError,
    RetryExecutor, RetryPolicy, RetryResult,
};
