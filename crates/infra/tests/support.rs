//! Shared helpers for the infra integration tests.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Once};
use std::time::Duration;

use everyorg_common::resilience::RetryConfig;
use everyorg_domain::Settings;
use everyorg_infra::{ClientOptions, EveryOrgClient};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use wiremock::MockServer;

static TRACING: Once = Once::new();

/// Install a test-writer subscriber once per binary. Honors `RUST_LOG`.
pub fn init_tracing() {
    TRACING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

/// Retry budget identical to production in count, with millisecond delays.
pub fn fast_retry(max_retries: u32) -> RetryConfig {
    RetryConfig::builder()
        .max_retries(max_retries)
        .decorrelated_jitter(Duration::from_millis(2), Duration::from_millis(20))
        .build()
        .expect("retry config should be valid")
}

pub fn options_for(server: &MockServer) -> ClientOptions {
    ClientOptions::default().with_base_url(server.uri()).with_retry(fast_retry(5))
}

pub fn public_client(server: &MockServer) -> EveryOrgClient {
    let settings = Settings::new("pk_integration").expect("settings should build");
    EveryOrgClient::with_options(settings, options_for(server)).expect("client should build")
}

pub fn private_client(server: &MockServer, include_idempotency: bool) -> EveryOrgClient {
    let settings = Settings::builder()
        .public_key("pk_integration")
        .private_key("sk_integration")
        .include_idempotency(include_idempotency)
        .build()
        .expect("settings should build");
    EveryOrgClient::with_options(settings, options_for(server)).expect("client should build")
}

/// Raw TCP server that answers every connection with `200` headers and a
/// truncated body, then hangs. Returns its base URL and a connection counter.
pub async fn spawn_stalled_body_server() -> (String, Arc<AtomicUsize>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind stalled server");
    let addr = listener.local_addr().expect("local addr");
    let connections = Arc::new(AtomicUsize::new(0));
    let counter = connections.clone();

    tokio::spawn(async move {
        while let Ok((mut socket, _)) = listener.accept().await {
            counter.fetch_add(1, Ordering::SeqCst);
            tokio::spawn(async move {
                let mut buf = [0u8; 4096];
                let _ = socket.read(&mut buf).await;
                let _ = socket
                    .write_all(
                        b"HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: 100\r\n\r\n{\"nonprofits\":",
                    )
                    .await;
                tokio::time::sleep(Duration::from_secs(10)).await;
            });
        }
    });

    (format!("http://{addr}"), connections)
}
