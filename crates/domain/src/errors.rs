//! Error types used throughout the client
//!
//! Every network-originating failure is surfaced as a single
//! [`ApiClientError`] carrying a message, an optional HTTP status code and an
//! optional root cause. Callers distinguish failures by [`ApiErrorKind`] and
//! status code rather than by transport-specific error types.

use thiserror::Error;

/// Boxed root cause carried by [`ApiClientError`].
pub type BoxedError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Classification of an API failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ApiErrorKind {
    /// The remote service reported that the resource does not exist (404).
    NotFound,
    /// Server error, timeout or transport failure that exhausted the retry
    /// budget.
    Transient,
    /// Any other non-success outcome (non-retryable 4xx, unexpected status).
    Request,
    /// A success response whose body could not be deserialized.
    Decode,
}

impl ApiErrorKind {
    /// Classify an HTTP status code by range.
    pub fn from_status(status: u16) -> Self {
        match status {
            404 => Self::NotFound,
            408 | 500..=599 => Self::Transient,
            _ => Self::Request,
        }
    }

    /// Whether failures of this kind are eligible for retry.
    pub fn is_transient(self) -> bool {
        matches!(self, Self::Transient)
    }
}

/// Returns `true` for statuses the resilience policy retries: 408 and 5xx.
pub fn is_transient_status(status: u16) -> bool {
    ApiErrorKind::from_status(status).is_transient()
}

/// Typed error for every API-classified failure.
#[derive(Debug, Error)]
#[error("{message}")]
pub struct ApiClientError {
    kind: ApiErrorKind,
    message: String,
    status: Option<u16>,
    #[source]
    source: Option<BoxedError>,
}

impl ApiClientError {
    pub fn new(kind: ApiErrorKind, message: impl Into<String>) -> Self {
        Self { kind, message: message.into(), status: None, source: None }
    }

    /// Build an error for a non-success HTTP status, classifying it by range.
    pub fn from_status(status: u16, message: impl Into<String>) -> Self {
        Self::new(ApiErrorKind::from_status(status), message).with_status(status)
    }

    pub fn with_status(mut self, status: u16) -> Self {
        self.status = Some(status);
        self
    }

    pub fn with_source<E>(mut self, source: E) -> Self
    where
        E: Into<BoxedError>,
    {
        self.source = Some(source.into());
        self
    }

    pub fn kind(&self) -> ApiErrorKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// HTTP status code, if the failure came from a response.
    pub fn status_code(&self) -> Option<u16> {
        self.status
    }

    pub fn is_not_found(&self) -> bool {
        self.kind == ApiErrorKind::NotFound
    }
}

/// Main error type for the client
#[derive(Debug, Error)]
pub enum EveryOrgError {
    /// Caller input rejected before any network attempt.
    #[error("Invalid argument `{field}`: {message}")]
    Validation { field: &'static str, message: String },

    #[error("Configuration error: {0}")]
    Config(String),

    /// The caller's cancellation signal fired while the operation was in
    /// flight.
    #[error("Operation cancelled")]
    Cancelled,

    #[error(transparent)]
    Api(#[from] ApiClientError),
}

impl EveryOrgError {
    pub fn validation(field: &'static str, message: impl Into<String>) -> Self {
        Self::Validation { field, message: message.into() }
    }

    /// HTTP status code carried by an API error.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::Api(err) => err.status_code(),
            _ => None,
        }
    }

    pub fn api_kind(&self) -> Option<ApiErrorKind> {
        match self {
            Self::Api(err) => Some(err.kind()),
            _ => None,
        }
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation { .. })
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }
}

/// Result type alias for client operations
pub type Result<T> = std::result::Result<T, EveryOrgError>;
