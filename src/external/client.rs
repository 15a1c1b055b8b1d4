use std::sync::LazyLock;
use std::time::Duration;

/// User-Agent sent to HTTP providers
pub const USER_AGENT: &str = concat!("northstar-notify/", env!("CARGO_PKG_VERSION"));

/// Global HTTP client instance
///
/// Initialized lazily on first access and reused across invocations, so
/// warm Lambda containers and the polling loop keep their connection pool.
///
/// # Features
/// - **HTTP/2**: negotiated over TLS (required by APNs), with keep-alive pings
/// - **Timeouts**: 30s request timeout, 10s connect timeout
/// - **TLS**: Rustls
pub static HTTP_CLIENT: LazyLock<reqwest::Client> = LazyLock::new(|| {
    reqwest::Client::builder()
        // Timeouts
        .timeout(Duration::from_secs(30))
        .connect_timeout(Duration::from_secs(10))
        // Connection pooling
        .pool_max_idle_per_host(10)
        .pool_idle_timeout(Duration::from_secs(90))
        // HTTP/2 settings
        .http2_adaptive_window(true)
        .http2_keep_alive_interval(Duration::from_secs(10))
        .http2_keep_alive_timeout(Duration::from_secs(20))
        .user_agent(USER_AGENT)
        .build()
        .expect("Failed to build HTTP client")
});

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_initialization() {
        let _ = &*HTTP_CLIENT;
    }

    #[tokio::test]
    async fn test_client_sends_user_agent() {
        let server = httpmock::MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(httpmock::Method::GET)
                    .path("/ping")
                    .header("user-agent", USER_AGENT);
                then.status(204);
            })
            .await;

        let response = HTTP_CLIENT.get(server.url("/ping")).send().await.unwrap();
        assert_eq!(response.status().as_u16(), 204);
        mock.assert_async().await;
    }
}
