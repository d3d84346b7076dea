//! Retry executor with pluggable backoff and retry conditions
//!
//! The executor hands each attempt an [`Attempt`] describing its position in
//! the sequence so callers can derive per-attempt state (for example a fresh
//! idempotency key on every retry) instead of mutating shared state between
//! attempts.

use std::fmt;
use std::future::Future;
use std::time::Duration;

use rand::Rng;
use thiserror::Error;
use tracing::{debug, warn};

/// Errors that can occur during retry operations
#[derive(Debug, Error)]
pub enum RetryError<E> {
    /// All retry attempts have been exhausted; carries the last failure.
    #[error("All retry attempts exhausted after {attempts} tries")]
    AttemptsExhausted { attempts: u32, last_error: E },

    /// The operation failed with a non-retryable error
    #[error("Operation failed with non-retryable error")]
    NonRetryable { source: E },

    /// The retry strategy configuration is invalid
    #[error("Invalid retry configuration: {message}")]
    InvalidConfiguration { message: String },
}

impl<E> RetryError<E> {
    /// The failure that ended the sequence, if an attempt produced one.
    pub fn into_last_error(self) -> Option<E> {
        match self {
            Self::AttemptsExhausted { last_error, .. } => Some(last_error),
            Self::NonRetryable { source } => Some(source),
            Self::InvalidConfiguration { .. } => None,
        }
    }
}

/// Result type for retry operations
pub type RetryResult<T, E> = Result<T, RetryError<E>>;

/// Position of one attempt within a retry sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Attempt {
    /// Zero-based attempt number; `0` is the initial try.
    pub number: u32,
}

impl Attempt {
    pub fn is_retry(self) -> bool {
        self.number > 0
    }
}

/// Trait for determining whether an error should be retried
pub trait RetryPolicy<E> {
    /// Determine if the error should be retried
    fn should_retry(&self, error: &E, attempt: u32) -> RetryDecision;
}

/// Decision for whether to retry an operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryDecision {
    /// Retry the operation after the configured backoff delay
    Retry,
    /// Don't retry the operation
    Stop,
}

/// Backoff strategy for calculating retry delays
#[derive(Debug, Clone, PartialEq)]
pub enum BackoffStrategy {
    /// Fixed delay between retries
    Fixed(Duration),
    /// Decorrelated jitter: the first delay is drawn around
    /// `median_first_delay`, each later delay from `[previous, previous * 3]`,
    /// capped at `max_delay`.
    DecorrelatedJitter { median_first_delay: Duration, max_delay: Duration },
}

impl BackoffStrategy {
    /// Delay before the next retry, given the delay used before the previous
    /// one.
    pub fn calculate_delay(&self, previous: Option<Duration>) -> Duration {
        match self {
            BackoffStrategy::Fixed(delay) => *delay,
            BackoffStrategy::DecorrelatedJitter { median_first_delay, max_delay } => {
                let cap = max_delay.as_millis() as u64;
                let (low, high) = match previous {
                    None => {
                        let median = median_first_delay.as_millis() as u64;
                        (median / 2, median + median / 2)
                    }
                    Some(previous) => {
                        let previous = previous.as_millis() as u64;
                        (previous, previous.saturating_mul(3))
                    }
                };
                let high = high.min(cap);
                let low = low.min(high);
                Duration::from_millis(random_between(low, high))
            }
        }
    }
}

fn random_between(low: u64, high: u64) -> u64 {
    if low >= high {
        return low;
    }
    rand::thread_rng().gen_range(low..=high)
}

/// Configuration for retry behavior
#[derive(Debug, Clone, PartialEq)]
pub struct RetryConfig {
    /// Retries after the initial attempt; `0` disables retrying.
    pub max_retries: u32,
    /// Backoff strategy for calculating delays
    pub backoff: BackoffStrategy,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 5,
            backoff: BackoffStrategy::DecorrelatedJitter {
                median_first_delay: Duration::from_secs(1),
                max_delay: Duration::from_secs(30),
            },
        }
    }
}

impl RetryConfig {
    /// Create a configuration builder
    pub fn builder() -> RetryConfigBuilder {
        RetryConfigBuilder::new()
    }

    /// Total attempts including the initial one.
    pub fn max_attempts(&self) -> u32 {
        self.max_retries.saturating_add(1)
    }

    /// Delay before the next retry.
    pub fn delay_for(&self, previous: Option<Duration>) -> Duration {
        self.backoff.calculate_delay(previous)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), RetryError<()>> {
        match &self.backoff {
            BackoffStrategy::DecorrelatedJitter { median_first_delay, max_delay }
                if max_delay < median_first_delay =>
            {
                Err(RetryError::InvalidConfiguration {
                    message: "max_delay must not be shorter than median_first_delay".to_string(),
                })
            }
            _ => Ok(()),
        }
    }
}

/// Builder for RetryConfig with fluent API
#[derive(Debug, Default)]
pub struct RetryConfigBuilder {
    config: RetryConfig,
}

impl RetryConfigBuilder {
    pub fn new() -> Self {
        Self { config: RetryConfig::default() }
    }

    pub fn max_retries(mut self, retries: u32) -> Self {
        self.config.max_retries = retries;
        self
    }

    pub fn fixed_backoff(mut self, delay: Duration) -> Self {
        self.config.backoff = BackoffStrategy::Fixed(delay);
        self
    }

    pub fn decorrelated_jitter(mut self, median_first_delay: Duration, max_delay: Duration) -> Self {
        self.config.backoff = BackoffStrategy::DecorrelatedJitter { median_first_delay, max_delay };
        self
    }

    pub fn build(self) -> Result<RetryConfig, RetryError<()>> {
        self.config.validate()?;
        Ok(self.config)
    }
}

/// The main retry executor
#[derive(Debug, Clone)]
pub struct RetryExecutor<P> {
    config: RetryConfig,
    policy: P,
}

impl<P> RetryExecutor<P> {
    /// Create a new retry executor with the given configuration and policy
    pub fn new(config: RetryConfig, policy: P) -> Self {
        Self { config, policy }
    }

    pub fn config(&self) -> &RetryConfig {
        &self.config
    }

    /// Execute an operation with retry logic.
    ///
    /// `operation` is invoked once per attempt with that attempt's position.
    /// The sequence stops on success, on a [`RetryDecision::Stop`], or after
    /// `max_retries` retries, in which case the last failure is returned in
    /// [`RetryError::AttemptsExhausted`].
    pub async fn execute<F, Fut, T, E>(&self, mut operation: F) -> RetryResult<T, E>
    where
        P: RetryPolicy<E>,
        E: fmt::Debug,
        F: FnMut(Attempt) -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        let mut previous_delay = None;
        let mut number = 0;

        loop {
            debug!(attempt = number + 1, max_attempts = self.config.max_attempts(), "executing operation");

            let error = match operation(Attempt { number }).await {
                Ok(value) => {
                    if number > 0 {
                        debug!(retries = number, "operation succeeded after retries");
                    }
                    return Ok(value);
                }
                Err(error) => error,
            };

            if self.policy.should_retry(&error, number) == RetryDecision::Stop {
                debug!(error = ?error, "retry policy declined to retry");
                return Err(RetryError::NonRetryable { source: error });
            }
            if number >= self.config.max_retries {
                warn!(attempts = number + 1, error = ?error, "all retry attempts exhausted");
                return Err(RetryError::AttemptsExhausted { attempts: number + 1, last_error: error });
            }

            let delay = self.config.delay_for(previous_delay);

            warn!(attempt = number + 1, ?delay, error = ?error, "operation failed, retrying");
            tokio::time::sleep(delay).await;
            previous_delay = Some(delay);
            number += 1;
        }
    }
}
