//! HTTP fetching shared by the payment clients

use std::time::Duration;

use serde::de::DeserializeOwned;
use url::Url;

use crate::error::FetchError;

/// Configuration for a [`Fetcher`].
#[derive(Debug, Clone)]
pub struct FetcherConfig {
    /// End-to-end timeout per request
    pub timeout: Duration,
    /// User-Agent header value
    pub user_agent: String,
}

impl Default for FetcherConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            user_agent: format!("msct-payment/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl FetcherConfig {
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }
}

/// Thin GET client wrapping [`reqwest::Client`].
///
/// Cheap to clone; clones share the underlying connection pool.
#[derive(Clone)]
pub struct Fetcher {
    client: reqwest::Client,
}

impl Fetcher {
    pub fn new() -> Self {
        Self::with_config(&FetcherConfig::default())
    }

    pub fn with_config(config: &FetcherConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(config.user_agent.clone())
            .build()
            .expect("Failed to create HTTP client");
        Self { client }
    }

    /// GET a URL and decode the JSON body.
    pub async fn fetch_json<T: DeserializeOwned>(&self, url: &Url) -> Result<T, FetchError> {
        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(FetchError::Network)?;
        let status = response.status();
        tracing::debug!("GET {} -> {}", url, status);
        if !status.is_success() {
            return Err(FetchError::Status {
                status: status.as_u16(),
                url: url.clone(),
            });
        }
        response
            .json::<T>()
            .await
            .map_err(|e| FetchError::Decode(e.to_string()))
    }

    /// GET a URL and return the body as text.
    pub async fn fetch_text(&self, url: &Url) -> Result<String, FetchError> {
        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(FetchError::Network)?;
        let status = response.status();
        tracing::debug!("GET {} -> {}", url, status);
        if !status.is_success() {
            return Err(FetchError::Status {
                status: status.as_u16(),
                url: url.clone(),
            });
        }
        response
            .text()
            .await
            .map_err(|e| FetchError::Decode(e.to_string()))
    }
}

impl Default for Fetcher {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults() {
        let config = FetcherConfig::default();
        assert_eq!(config.timeout, Duration::from_secs(30));
        assert!(config.user_agent.starts_with("msct-payment/"));
    }

    #[test]
    fn test_config_builders() {
        let config = FetcherConfig::default()
            .with_timeout(Duration::from_secs(5))
            .with_user_agent("wallet-test/0.0");
        assert_eq!(config.timeout, Duration::from_secs(5));
        assert_eq!(config.user_agent, "wallet-test/0.0");
    }
}
