use manga_link_resolver::http_client::{EnhancedHttpClient, HttpClientConfig, HttpRequest, Transport};
use manga_link_resolver::ResolveError;
use std::time::Duration;

#[tokio::test]
async fn test_http_client_creation() {
    let client = EnhancedHttpClient::new();
    assert!(client.is_ok(), "Failed to create HTTP client");
}

#[tokio::test]
async fn test_http_client_with_custom_config() {
    let config = HttpClientConfig {
        timeout: Duration::from_secs(10),
        user_agent: Some("manga_link_resolver-tests".to_string()),
        enable_cookies: false,
        enable_gzip: true,
    };

    let client = EnhancedHttpClient::with_config(config).expect("client from custom config");
    assert_eq!(client.config().timeout, Duration::from_secs(10));
}

#[tokio::test]
async fn test_force_network_fetch() {
    let client = EnhancedHttpClient::new().expect("Failed to create client");

    let result = client
        .execute(HttpRequest::get("https://httpbin.org/headers").force_network())
        .await;

    match result {
        Ok(response) => {
            assert_eq!(response.status, 200);
            assert!(response.body.contains("No-Cache") || response.body.contains("no-cache"));
        }
        Err(e) => {
            // Network might be unavailable in test environment
            eprintln!("Warning: Network request failed (may be expected in CI): {}", e);
        }
    }
}

#[tokio::test]
async fn test_non_200_is_not_retried() {
    let client = EnhancedHttpClient::new().expect("Failed to create client");

    let result = client.execute(HttpRequest::get("https://httpbin.org/status/503")).await;

    match result {
        Ok(response) => {
            assert_eq!(response.status, 503);
            assert_eq!(
                response.into_success_body().unwrap_err(),
                ResolveError::RemoteUnavailable(503)
            );
        }
        Err(e) => {
            eprintln!("Warning: Network request failed (may be expected in CI): {}", e);
        }
    }
}

#[tokio::test]
async fn test_unreachable_host_is_transport_error() {
    let config = HttpClientConfig {
        timeout: Duration::from_secs(2),
        ..HttpClientConfig::default()
    };
    let client = EnhancedHttpClient::with_config(config).unwrap();

    let err = client
        .execute(HttpRequest::get("http://127.0.0.1:9/unreachable"))
        .await
        .unwrap_err();
    assert!(matches!(err, ResolveError::Transport(_)));
}
