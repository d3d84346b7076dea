//! Public and private client handles built once from [`Settings`]
//!
//! Both handles share the same transport configuration. The private handle
//! additionally sends `Authorization: Basic base64(public:private)` and only
//! exists when the settings carry a private key.

use std::time::Duration;

use everyorg_common::resilience::RetryConfig;
use everyorg_domain::constants::{
    BASE_URL, CONTENT_TYPE_JSON, DEFAULT_REQUEST_TIMEOUT_SECS,
};
use everyorg_domain::{EveryOrgError, Result, Settings};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, CONTENT_TYPE};
use tracing::debug;

use crate::http::HttpClient;

/// Transport knobs that do not belong in [`Settings`].
#[derive(Debug, Clone)]
pub struct ClientOptions {
    /// Service root; override to point at a mock server.
    pub base_url: String,
    /// Per-attempt request timeout. Elapsed timeouts count as transient.
    pub timeout: Duration,
    pub retry: RetryConfig,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            base_url: BASE_URL.to_string(),
            timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
            retry: RetryConfig::default(),
        }
    }
}

impl ClientOptions {
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_retry(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }
}

/// The two long-lived client handles.
#[derive(Debug, Clone)]
pub struct ClientPool {
    public: HttpClient,
    private: Option<HttpClient>,
}

impl ClientPool {
    pub fn new(settings: &Settings, options: &ClientOptions) -> Result<Self> {
        let headers = base_headers();

        let public = configure(settings, options, headers.clone())?;

        let private = match settings.basic_authorization() {
            Some(credentials) => {
                let mut value = HeaderValue::from_str(&credentials).map_err(|err| {
                    EveryOrgError::Config(format!("Invalid authorization header: {err}"))
                })?;
                value.set_sensitive(true);

                let mut private_headers = headers;
                private_headers.insert(AUTHORIZATION, value);
                Some(configure(settings, options, private_headers)?)
            }
            None => None,
        };

        debug!(
            base_url = %options.base_url,
            private = private.is_some(),
            idempotency = settings.include_idempotency(),
            "configured client pool"
        );

        Ok(Self { public, private })
    }

    /// Client for read operations; authenticates with the `apiKey` query
    /// parameter.
    pub fn public(&self) -> &HttpClient {
        &self.public
    }

    /// Client for authenticated operations.
    ///
    /// # Errors
    /// Returns `EveryOrgError::Config` when the settings carry no private key.
    pub fn private(&self) -> Result<&HttpClient> {
        self.private.as_ref().ok_or_else(|| {
            EveryOrgError::Config(
                "A private key is required for authenticated operations.".to_string(),
            )
        })
    }

    pub fn has_private(&self) -> bool {
        self.private.is_some()
    }
}

fn base_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(ACCEPT, HeaderValue::from_static(CONTENT_TYPE_JSON));
    headers.insert(CONTENT_TYPE, HeaderValue::from_static(CONTENT_TYPE_JSON));
    headers
}

fn configure(settings: &Settings, options: &ClientOptions, headers: HeaderMap) -> Result<HttpClient> {
    let mut builder = HttpClient::builder(options.base_url.clone())
        .timeout(options.timeout)
        .retry_config(options.retry.clone())
        .include_idempotency(settings.include_idempotency())
        .default_headers(headers);

    if !settings.agent_name().trim().is_empty() {
        builder = builder.user_agent(settings.agent_name());
    }

    builder.build()
}
