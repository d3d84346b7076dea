//! Outbound-call resilience for the every.org HTTP pipeline
//!
//! Wraps each logical request in the shared [`RetryExecutor`] with a policy
//! that retries transient statuses (5xx, 408) and transport failures
//! (timeouts, refused connections). Every attempt receives its own header set;
//! when idempotency is enabled that set carries a freshly generated
//! `X-Idempotency-Key`, so retries never replay a stale key and concurrent
//! requests never share one.

use std::future::Future;

use everyorg_common::resilience::{
    Attempt, RetryConfig, RetryDecision, RetryError, RetryExecutor, RetryPolicy,
};
use everyorg_domain::constants::HEADER_IDEMPOTENCY_KEY;
use everyorg_domain::{is_transient_status, ApiClientError, ApiErrorKind};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use tracing::debug;
use uuid::Uuid;

use super::client::HttpResponse;

/// Failure of a single attempt as seen by the retry policy.
#[derive(Debug)]
pub enum AttemptFailure {
    /// The server answered with a retry-eligible status. The response is kept
    /// so the final one can be handed back for classification.
    Status(HttpResponse),
    /// The request or the body read failed.
    Transport(reqwest::Error),
}

/// Retries transient statuses and transport failures, stops on anything else.
#[derive(Debug, Clone, Copy, Default)]
pub struct TransientHttpPolicy;

impl RetryPolicy<AttemptFailure> for TransientHttpPolicy {
    fn should_retry(&self, error: &AttemptFailure, _attempt: u32) -> RetryDecision {
        let retry = match error {
            AttemptFailure::Status(response) => is_transient_status(response.status().as_u16()),
            AttemptFailure::Transport(err) => should_retry_error(err),
        };

        if retry {
            RetryDecision::Retry
        } else {
            RetryDecision::Stop
        }
    }
}

/// Retry policy plus per-attempt header construction.
#[derive(Debug, Clone)]
pub struct ResiliencePolicy {
    executor: RetryExecutor<TransientHttpPolicy>,
    include_idempotency: bool,
}

impl ResiliencePolicy {
    pub fn new(config: RetryConfig, include_idempotency: bool) -> Self {
        Self { executor: RetryExecutor::new(config, TransientHttpPolicy), include_idempotency }
    }

    pub fn retry_config(&self) -> &RetryConfig {
        self.executor.config()
    }

    pub fn include_idempotency(&self) -> bool {
        self.include_idempotency
    }

    /// Headers that belong to one attempt only.
    pub fn attempt_headers(&self, attempt: Attempt) -> HeaderMap {
        let mut headers = HeaderMap::new();

        if self.include_idempotency {
            let key = Uuid::new_v4().to_string();
            if attempt.is_retry() {
                debug!(attempt = attempt.number + 1, "rotating idempotency key for retry");
            }
            // A hyphenated UUID is always a valid header value.
            if let (Ok(name), Ok(value)) =
                (HeaderName::from_bytes(HEADER_IDEMPOTENCY_KEY.as_bytes()), HeaderValue::from_str(&key))
            {
                headers.insert(name, value);
            }
        }

        headers
    }

    /// Run `send` until it yields a non-transient outcome or the retry budget
    /// is spent.
    ///
    /// A transient status that survives every retry is returned as `Ok` so the
    /// caller classifies it like any other status. Transport failures become a
    /// [`ApiErrorKind::Transient`] error (or [`ApiErrorKind::Request`] when the
    /// failure was not retry-eligible) with the `reqwest` error as source.
    pub async fn run<F, Fut>(&self, mut send: F) -> Result<HttpResponse, ApiClientError>
    where
        F: FnMut(Attempt, HeaderMap) -> Fut,
        Fut: Future<Output = Result<HttpResponse, reqwest::Error>>,
    {
        let outcome = self
            .executor
            .execute(|attempt| {
                let pending = send(attempt, self.attempt_headers(attempt));
                async move {
                    match pending.await {
                        Ok(response) if is_transient_status(response.status().as_u16()) => {
                            Err(AttemptFailure::Status(response))
                        }
                        Ok(response) => Ok(response),
                        Err(err) => Err(AttemptFailure::Transport(err)),
                    }
                }
            })
            .await;

        match outcome {
            Ok(response) => Ok(response),
            Err(RetryError::AttemptsExhausted { last_error, .. }) => {
                Self::surface(last_error, ApiErrorKind::Transient)
            }
            Err(RetryError::NonRetryable { source }) => Self::surface(source, ApiErrorKind::Request),
            Err(RetryError::InvalidConfiguration { message }) => {
                Err(ApiClientError::new(ApiErrorKind::Request, message))
            }
        }
    }

    fn surface(failure: AttemptFailure, kind: ApiErrorKind) -> Result<HttpResponse, ApiClientError> {
        match failure {
            AttemptFailure::Status(response) => Ok(response),
            AttemptFailure::Transport(err) => {
                let message = format!("HTTP transport failure: {err}");
                Err(ApiClientError::new(kind, message).with_source(err))
            }
        }
    }
}

pub(crate) fn should_retry_error(err: &reqwest::Error) -> bool {
    if err.is_timeout() || err.is_request() {
        return true;
    }
    #[cfg(not(target_arch = "wasm32"))]
    {
        if err.is_connect() {
            return true;
        }
    }
    false
}
