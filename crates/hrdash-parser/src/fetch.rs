//! Remote document fetching over HTTP(S)

use std::time::Duration;

use async_trait::async_trait;
use hrdash_core::{DocumentFetcher, HrError, Result};
use reqwest::Client;

/// HTTP document fetcher with a bounded request timeout
#[derive(Clone)]
pub struct HttpFetcher {
    client: Client,
    timeout: Duration,
}

impl HttpFetcher {
    /// Create a fetcher whose requests give up after `timeout`
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| HrError::FetchError(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self { client, timeout })
    }

    /// Configured request timeout
    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}

#[async_trait]
impl DocumentFetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| HrError::FetchError(format!("Request to {url} failed: {e}")))?
            .error_for_status()
            .map_err(|e| HrError::FetchError(format!("{url} returned an error status: {e}")))?;

        let bytes = response
            .bytes()
            .await
            .map_err(|e| HrError::FetchError(format!("Failed to read body of {url}: {e}")))?;

        Ok(bytes.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timeout_is_kept() {
        let fetcher = HttpFetcher::new(Duration::from_secs(3)).unwrap();
        assert_eq!(fetcher.timeout(), Duration::from_secs(3));
    }

    #[tokio::test]
    async fn test_unreachable_host_is_a_fetch_error() {
        let fetcher = HttpFetcher::new(Duration::from_secs(2)).unwrap();
        // Port 9 (discard) is closed on test machines
        let err = fetcher.fetch("http://127.0.0.1:9/cv.pdf").await.unwrap_err();
        assert!(matches!(err, HrError::FetchError(_)));
    }
}
