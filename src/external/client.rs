use std::sync::LazyLock;
use std::time::Duration;

/// Shared HTTP client for message delivery
///
/// Built lazily on first use and reused for every send. Connection pooling
/// lives here, and the client is internally synchronized, so independent
/// step invocations in one process can share it safely.
///
/// # Features
/// - **Timeouts**: 30s request timeout, 10s connect timeout
/// - **Connection pooling**: idle connections kept warm between sends
/// - **Security**: Rustls for TLS
pub static HTTP_CLIENT: LazyLock<reqwest::Client> = LazyLock::new(|| {
    reqwest::Client::builder()
        // Timeouts
        .timeout(Duration::from_secs(30))
        .connect_timeout(Duration::from_secs(10))
        // Connection pooling
        .pool_max_idle_per_host(10)
        .pool_idle_timeout(Duration::from_secs(90))
        // Security
        .use_rustls_tls()
        .build()
        .expect("Failed to build HTTP client")
});
