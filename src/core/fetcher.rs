use crate::core::Fetcher;
use crate::utils::error::{FetchError, Result};
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use url::Url;

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
pub const DEFAULT_USER_AGENT: &str = concat!("popsolar/", env!("CARGO_PKG_VERSION"));

/// `reqwest`-backed fetcher. Every call is bounded by `timeout`.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
    timeout: Duration,
}

impl HttpFetcher {
    pub fn new(timeout: Duration, user_agent: &str) -> Result<Self> {
        let client = Client::builder().user_agent(user_agent).build()?;
        Ok(Self { client, timeout })
    }

    async fn get_bytes(&self, url: &Url) -> Result<Vec<u8>> {
        let response = self.client.get(url.clone()).send().await?;
        let status = response.status();
        tracing::debug!("Response status {} from {}", status, url);

        if !status.is_success() {
            return Err(FetchError::HttpStatus {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        let body = response.bytes().await?;
        Ok(body.to_vec())
    }
}

impl Default for HttpFetcher {
    fn default() -> Self {
        Self::new(DEFAULT_TIMEOUT, DEFAULT_USER_AGENT).expect("default HTTP client builds")
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(&self, url: &Url) -> Result<Vec<u8>> {
        tracing::debug!("GET {}", url);

        match tokio::time::timeout(self.timeout, self.get_bytes(url)).await {
            Ok(Ok(bytes)) => {
                tracing::debug!("Fetched {} bytes from {}", bytes.len(), url);
                Ok(bytes)
            }
            Ok(Err(e)) => Err(e),
            Err(_) => Err(FetchError::Timeout {
                url: url.to_string(),
                timeout: self.timeout,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;

    #[tokio::test]
    async fn test_fetch_returns_raw_body() {
        let server = MockServer::start_async().await;
        let api_mock = server
            .mock_async(|when, then| {
                when.method(GET).path("/raw");
                then.status(200).body("not even json");
            })
            .await;

        let fetcher = HttpFetcher::default();
        let url = Url::parse(&server.url("/raw")).unwrap();
        let bytes = fetcher.fetch(&url).await.unwrap();

        api_mock.assert_async().await;
        assert_eq!(bytes, b"not even json".to_vec());
    }

    #[tokio::test]
    async fn test_default_fetcher_sends_user_agent() {
        let server = MockServer::start_async().await;
        let api_mock = server
            .mock_async(|when, then| {
                when.method(GET)
                    .path("/agent")
                    .header("user-agent", DEFAULT_USER_AGENT);
                then.status(200).body("ok");
            })
            .await;

        let fetcher = HttpFetcher::default();
        let url = Url::parse(&server.url("/agent")).unwrap();
        let bytes = fetcher.fetch(&url).await.unwrap();

        api_mock.assert_async().await;
        assert_eq!(bytes, b"ok".to_vec());
    }

    #[tokio::test]
    async fn test_fetch_non_success_status_is_error() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/missing");
                then.status(404);
            })
            .await;

        let fetcher = HttpFetcher::default();
        let url = Url::parse(&server.url("/missing")).unwrap();
        let err = fetcher.fetch(&url).await.unwrap_err();

        match err {
            FetchError::HttpStatus { status, .. } => assert_eq!(status, 404),
            other => panic!("expected HttpStatus, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_fetch_times_out() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/slow");
                then.status(200)
                    .body("{}")
                    .delay(Duration::from_millis(1500));
            })
            .await;

        let fetcher = HttpFetcher::new(Duration::from_millis(100), DEFAULT_USER_AGENT).unwrap();
        let url = Url::parse(&server.url("/slow")).unwrap();
        let err = fetcher.fetch(&url).await.unwrap_err();

        assert!(matches!(err, FetchError::Timeout { .. }));
    }

    #[tokio::test]
    async fn test_fetch_connection_refused_is_transport_error() {
        // Port 9 (discard) is not expected to accept HTTP connections locally.
        let fetcher = HttpFetcher::new(Duration::from_secs(5), DEFAULT_USER_AGENT).unwrap();
        let url = Url::parse("http://127.0.0.1:9/").unwrap();
        let err = fetcher.fetch(&url).await.unwrap_err();

        assert!(err.is_transient());
    }
}
