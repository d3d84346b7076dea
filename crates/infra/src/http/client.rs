use std::sync::Arc;
use std::time::Duration;

use everyorg_common::resilience::RetryConfig;
use everyorg_domain::constants::DEFAULT_REQUEST_TIMEOUT_SECS;
use everyorg_domain::{ApiClientError, ApiErrorKind, EveryOrgError};
use reqwest::header::HeaderMap;
use reqwest::{Client as ReqwestClient, Method, StatusCode};
use tracing::debug;
use url::Url;

use super::resilience::ResiliencePolicy;

/// Status and fully buffered body of one HTTP exchange.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    status: StatusCode,
    body: Vec<u8>,
}

impl HttpResponse {
    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn body(&self) -> &[u8] {
        &self.body
    }

    /// Body as text, with invalid UTF-8 replaced.
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

/// HTTP client bound to one base address, with retry and per-attempt headers.
#[derive(Clone)]
pub struct HttpClient {
    client: ReqwestClient,
    base_url: Url,
    resilience: Arc<ResiliencePolicy>,
}

impl std::fmt::Debug for HttpClient {
    // Default headers may hold credentials; keep them out of debug output.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpClient")
            .field("base_url", &self.base_url.as_str())
            .field("resilience", &self.resilience)
            .finish_non_exhaustive()
    }
}

impl HttpClient {
    /// Start building a new HTTP client.
    pub fn builder(base_url: impl Into<String>) -> HttpClientBuilder {
        HttpClientBuilder::new(base_url)
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn resilience(&self) -> &ResiliencePolicy {
        &self.resilience
    }

    /// Resolve a relative path (with optional query) against the base address.
    pub fn endpoint(&self, path_and_query: &str) -> Result<Url, ApiClientError> {
        self.base_url.join(path_and_query.trim_start_matches('/')).map_err(|err| {
            ApiClientError::new(ApiErrorKind::Request, format!("Invalid request path: {err}"))
                .with_source(err)
        })
    }

    /// Send a request with retry semantics.
    ///
    /// The request is rebuilt for every attempt from `method`, `url` and the
    /// buffered `body`, merged with that attempt's headers. The response body
    /// is read inside the attempt, so a timeout while it streams is retried
    /// like any other transport failure.
    pub async fn send(
        &self,
        method: Method,
        url: Url,
        body: Option<Vec<u8>>,
    ) -> Result<HttpResponse, ApiClientError> {
        let path = url.path().to_string();

        self.resilience
            .run(|attempt, headers| {
                let mut request =
                    self.client.request(method.clone(), url.clone()).headers(headers);
                if let Some(bytes) = &body {
                    request = request.body(bytes.clone());
                }

                let method = method.clone();
                let path = path.clone();
                async move {
                    // Path only: the query may carry the public API key.
                    debug!(attempt = attempt.number + 1, %method, url = %path, "sending HTTP request");
                    let response = match request.send().await {
                        Ok(response) => response,
                        Err(err) => {
                            debug!(attempt = attempt.number + 1, %method, url = %path, error = %err, "HTTP request failed");
                            return Err(err);
                        }
                    };

                    let status = response.status();
                    match response.bytes().await {
                        Ok(body) => {
                            debug!(attempt = attempt.number + 1, %method, url = %path, %status, bytes = body.len(), "received HTTP response");
                            Ok(HttpResponse { status, body: body.to_vec() })
                        }
                        Err(err) => {
                            debug!(attempt = attempt.number + 1, %method, url = %path, %status, error = %err, "failed to read HTTP response body");
                            Err(err)
                        }
                    }
                }
            })
            .await
    }
}

/// Builder for [`HttpClient`].
#[derive(Debug)]
pub struct HttpClientBuilder {
    base_url: String,
    timeout: Duration,
    retry: RetryConfig,
    include_idempotency: bool,
    user_agent: Option<String>,
    default_headers: Option<HeaderMap>,
}

impl HttpClientBuilder {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
            retry: RetryConfig::default(),
            include_idempotency: false,
            user_agent: None,
            default_headers: None,
        }
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn retry_config(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }

    /// Attach a fresh `X-Idempotency-Key` to every attempt.
    pub fn include_idempotency(mut self, enabled: bool) -> Self {
        self.include_idempotency = enabled;
        self
    }

    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.user_agent = Some(agent.into());
        self
    }

    pub fn default_headers(mut self, headers: HeaderMap) -> Self {
        self.default_headers = Some(headers);
        self
    }

    pub fn build(self) -> Result<HttpClient, EveryOrgError> {
        let base_url = parse_base_url(&self.base_url)?;

        self.retry
            .validate()
            .map_err(|err| EveryOrgError::Config(format!("Invalid retry configuration: {err}")))?;

        let mut builder = ReqwestClient::builder().timeout(self.timeout).no_proxy();

        if let Some(agent) = self.user_agent {
            builder = builder.user_agent(agent);
        }

        if let Some(headers) = self.default_headers {
            builder = builder.default_headers(headers);
        }

        let client = builder
            .build()
            .map_err(|err| EveryOrgError::Config(format!("Failed to build HTTP client: {err}")))?;

        Ok(HttpClient {
            client,
            base_url,
            resilience: Arc::new(ResiliencePolicy::new(self.retry, self.include_idempotency)),
        })
    }
}

/// Parse the base address, making sure it ends with `/` so relative paths
/// append to it instead of replacing its last segment.
fn parse_base_url(raw: &str) -> Result<Url, EveryOrgError> {
    let mut url = Url::parse(raw)
        .map_err(|err| EveryOrgError::Config(format!("Invalid base URL `{raw}`: {err}")))?;

    if url.cannot_be_a_base() {
        return Err(EveryOrgError::Config(format!("Base URL `{raw}` cannot be a base")));
    }

    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }

    Ok(url)
}

#[cfg(test)]
mod tests {
    use std::net::TcpListener;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    use everyorg_domain::constants::HEADER_IDEMPOTENCY_KEY;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use wiremock::matchers::{body_string, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    fn fast_retry(retries: u32) -> RetryConfig {
        RetryConfig::builder()
            .max_retries(retries)
            .fixed_backoff(Duration::from_millis(5))
            .build()
            .expect("retry config")
    }

    /// Raw server whose first `stalled` connections send headers and part of
    /// the body, then hang. Later connections get a complete `ok` response.
    async fn spawn_stalling_server(stalled: usize) -> (String, Arc<AtomicUsize>) {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let connections = Arc::new(AtomicUsize::new(0));
        let counter = connections.clone();

        tokio::spawn(async move {
            while let Ok((mut socket, _)) = listener.accept().await {
                let index = counter.fetch_add(1, Ordering::SeqCst);
                tokio::spawn(async move {
                    let mut buf = [0u8; 4096];
                    let _ = socket.read(&mut buf).await;
                    if index < stalled {
                        let _ = socket
                            .write_all(b"HTTP/1.1 200 OK\r\nContent-Length: 100\r\n\r\n{\"partial")
                            .await;
                        tokio::time::sleep(Duration::from_secs(10)).await;
                    } else {
                        let _ = socket
                            .write_all(b"HTTP/1.1 200 OK\r\nContent-Length: 2\r\nConnection: close\r\n\r\nok")
                            .await;
                    }
                });
            }
        });

        (format!("http://{addr}"), connections)
    }

    fn client_for(uri: &str, retries: u32, idempotency: bool) -> HttpClient {
        HttpClient::builder(uri)
            .retry_config(fast_retry(retries))
            .include_idempotency(idempotency)
            .build()
            .expect("http client")
    }

    #[tokio::test]
    async fn returns_successful_response_without_retry() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v0.2/ping"))
            .respond_with(ResponseTemplate::new(200).set_body_string("ok"))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server.uri(), 3, false);
        let url = client.endpoint("v0.2/ping").unwrap();
        let response = client.send(Method::GET, url, None).await.expect("response");

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.text(), "ok");
        let requests = server.received_requests().await.unwrap();
        assert_eq!(requests.len(), 1);
    }

    #[tokio::test]
    async fn retries_server_errors_until_success() {
        let server = MockServer::start().await;
        let attempts = Arc::new(AtomicUsize::new(0));
        let attempts_clone = attempts.clone();
        Mock::given(method("GET"))
            .respond_with(move |_req: &wiremock::Request| -> ResponseTemplate {
                let current = attempts_clone.fetch_add(1, Ordering::SeqCst);
                if current < 2 {
                    ResponseTemplate::new(503)
                } else {
                    ResponseTemplate::new(200)
                }
            })
            .expect(3)
            .mount(&server)
            .await;

        let client = client_for(&server.uri(), 5, false);
        let url = client.endpoint("/anything").unwrap();
        let response = client.send(Method::GET, url, None).await.expect("response");

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(attempts.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn returns_last_transient_response_when_retries_exhausted() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(500))
            .expect(3)
            .mount(&server)
            .await;

        let client = client_for(&server.uri(), 2, false);
        let url = client.endpoint("down").unwrap();
        let response = client.send(Method::GET, url, None).await.expect("final response");

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn retries_request_timeout_status() {
        let server = MockServer::start().await;
        let attempts = Arc::new(AtomicUsize::new(0));
        let attempts_clone = attempts.clone();
        Mock::given(method("GET"))
            .respond_with(move |_req: &wiremock::Request| -> ResponseTemplate {
                if attempts_clone.fetch_add(1, Ordering::SeqCst) == 0 {
                    ResponseTemplate::new(408)
                } else {
                    ResponseTemplate::new(200)
                }
            })
            .mount(&server)
            .await;

        let client = client_for(&server.uri(), 3, false);
        let url = client.endpoint("slow").unwrap();
        let response = client.send(Method::GET, url, None).await.expect("response");

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(attempts.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn does_not_retry_client_errors() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server.uri(), 3, false);
        let url = client.endpoint("missing").unwrap();
        let response = client.send(Method::GET, url, None).await.expect("response");

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let requests = server.received_requests().await.unwrap();
        assert_eq!(requests.len(), 1);
    }

    #[tokio::test]
    async fn resends_body_on_every_attempt() {
        let server = MockServer::start().await;
        let attempts = Arc::new(AtomicUsize::new(0));
        let attempts_clone = attempts.clone();
        Mock::given(method("POST"))
            .and(body_string("{\"title\":\"run\"}"))
            .respond_with(move |_req: &wiremock::Request| -> ResponseTemplate {
                if attempts_clone.fetch_add(1, Ordering::SeqCst) == 0 {
                    ResponseTemplate::new(502)
                } else {
                    ResponseTemplate::new(201)
                }
            })
            .expect(2)
            .mount(&server)
            .await;

        let client = client_for(&server.uri(), 3, false);
        let url = client.endpoint("v0.2/fundraiser").unwrap();
        let body = br#"{"title":"run"}"#.to_vec();
        let response = client.send(Method::POST, url, Some(body)).await.expect("response");

        assert_eq!(response.status(), StatusCode::CREATED);
    }

    #[tokio::test]
    async fn rotates_idempotency_key_between_attempts() {
        let server = MockServer::start().await;
        let seen = Arc::new(Mutex::new(Vec::<String>::new()));
        let seen_clone = seen.clone();
        Mock::given(method("GET"))
            .respond_with(move |req: &wiremock::Request| -> ResponseTemplate {
                let key = req
                    .headers
                    .get(HEADER_IDEMPOTENCY_KEY)
                    .map(|v| v.to_str().unwrap().to_string())
                    .unwrap_or_default();
                let mut seen = seen_clone.lock().unwrap();
                seen.push(key);
                if seen.len() < 3 {
                    ResponseTemplate::new(503)
                } else {
                    ResponseTemplate::new(200)
                }
            })
            .mount(&server)
            .await;

        let client = client_for(&server.uri(), 5, true);
        let url = client.endpoint("v0.2/fundraiser").unwrap();
        client.send(Method::GET, url, None).await.expect("response");

        let seen = seen.lock().unwrap();
        assert_eq!(seen.len(), 3);
        assert!(seen.iter().all(|key| !key.is_empty()));
        assert_ne!(seen[0], seen[1]);
        assert_ne!(seen[1], seen[2]);
        assert_ne!(seen[0], seen[2]);
    }

    #[tokio::test]
    async fn omits_idempotency_key_when_disabled() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200))
            .mount(&server)
            .await;

        let client = client_for(&server.uri(), 0, false);
        let url = client.endpoint("plain").unwrap();
        client.send(Method::GET, url, None).await.expect("response");

        let requests = server.received_requests().await.unwrap();
        assert!(requests[0].headers.get(HEADER_IDEMPOTENCY_KEY).is_none());
    }

    #[tokio::test]
    async fn retries_on_network_failure() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener); // release the port so that requests fail with ECONNREFUSED
        let base = format!("http://{}", addr);

        let client = client_for(&base, 1, false);
        let url = client.endpoint("v0.2/nonprofit/x").unwrap();
        let err = client.send(Method::GET, url, None).await.expect_err("connection refused");

        assert_eq!(err.kind(), ApiErrorKind::Transient);
        assert_eq!(err.status_code(), None);
        assert!(std::error::Error::source(&err).is_some());
    }

    #[tokio::test]
    async fn retries_timeout_while_reading_body() {
        let (base, connections) = spawn_stalling_server(1).await;
        let client = HttpClient::builder(base)
            .timeout(Duration::from_millis(300))
            .retry_config(fast_retry(3))
            .build()
            .expect("http client");

        let url = client.endpoint("v0.2/search/dogs").unwrap();
        let response = client.send(Method::GET, url, None).await.expect("response after retry");

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.body(), b"ok");
        assert_eq!(connections.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn body_timeouts_exhaust_as_transient() {
        let (base, connections) = spawn_stalling_server(usize::MAX).await;
        let client = HttpClient::builder(base)
            .timeout(Duration::from_millis(200))
            .retry_config(fast_retry(2))
            .build()
            .expect("http client");

        let url = client.endpoint("v0.2/search/dogs").unwrap();
        let err = client.send(Method::GET, url, None).await.expect_err("body never completes");

        assert_eq!(err.kind(), ApiErrorKind::Transient);
        assert_eq!(err.status_code(), None);
        assert_eq!(connections.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn endpoint_keeps_base_path_prefix() {
        let client = HttpClient::builder("http://localhost:9000/partners")
            .build()
            .expect("http client");
        let url = client.endpoint("/v0.2/browse/animals?take=5").unwrap();

        assert_eq!(url.as_str(), "http://localhost:9000/partners/v0.2/browse/animals?take=5");
    }

    #[test]
    fn build_rejects_invalid_base_url() {
        let err = HttpClient::builder("not a url").build().unwrap_err();
        assert!(matches!(err, EveryOrgError::Config(_)));
    }
}
