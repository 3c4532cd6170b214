//! Page fetching
//!
//! This module defines the fetch session used by the traversal and its HTTP
//! implementation:
//! - Building HTTP clients with a proper user agent string
//! - GET requests returning the page body
//! - Classifying transport and status failures as navigation errors

use crate::config::FetcherConfig;
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use thiserror::Error;

/// A page could not be loaded
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Request to {url} failed: {source}")]
    Request { url: String, source: reqwest::Error },

    #[error("HTTP {status} for {url}")]
    Status { url: String, status: u16 },

    #[error("Fetch session already released, cannot load {url}")]
    SessionClosed { url: String },
}

impl FetchError {
    /// URL of the page that failed to load
    pub fn url(&self) -> &str {
        match self {
            Self::Request { url, .. } | Self::Status { url, .. } | Self::SessionClosed { url } => {
                url
            }
        }
    }
}

/// A fetch session: one logical browser tab reused for the whole crawl
///
/// The traversal borrows the session mutably for each step and releases it
/// exactly once when the crawl ends.
#[async_trait]
pub trait PageFetcher: Send {
    /// Loads `url` and returns the document markup
    async fn fetch(&mut self, url: &str) -> Result<String, FetchError>;

    /// Releases the resources held by the session
    async fn release(&mut self);
}

#[async_trait]
impl<'a, T: PageFetcher + ?Sized> PageFetcher for &'a mut T {
    async fn fetch(&mut self, url: &str) -> Result<String, FetchError> {
        (**self).fetch(url).await
    }

    async fn release(&mut self) {
        (**self).release().await
    }
}

/// Builds an HTTP client with proper configuration
///
/// # Example
///
/// ```no_run
/// use transcript_crawler::config::FetcherConfig;
/// use transcript_crawler::crawler::build_http_client;
///
/// let client = build_http_client(&FetcherConfig::default()).unwrap();
/// ```
pub fn build_http_client(config: &FetcherConfig) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(config.user_agent())
        .timeout(Duration::from_secs(config.timeout_secs))
        .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
        .gzip(true)
        .brotli(true)
        .build()
}

/// HTTP-backed fetch session
pub struct HttpFetcher {
    client: Option<Client>,
}

impl HttpFetcher {
    /// Opens a session with a freshly built client
    pub fn new(config: &FetcherConfig) -> Result<Self, reqwest::Error> {
        Ok(Self::with_client(build_http_client(config)?))
    }

    /// Opens a session over an existing client
    pub fn with_client(client: Client) -> Self {
        Self {
            client: Some(client),
        }
    }

    /// Returns true until the session has been released
    pub fn is_open(&self) -> bool {
        self.client.is_some()
    }
}

#[async_trait]
impl PageFetcher for HttpFetcher {
    async fn fetch(&mut self, url: &str) -> Result<String, FetchError> {
        let client = self.client.as_ref().ok_or_else(|| FetchError::SessionClosed {
            url: url.to_string(),
        })?;

        let response = client
            .get(url)
            .send()
            .await
            .map_err(|source| FetchError::Request {
                url: url.to_string(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        response.text().await.map_err(|source| FetchError::Request {
            url: url.to_string(),
            source,
        })
    }

    async fn release(&mut self) {
        if self.client.take().is_some() {
            tracing::debug!("Fetch session released");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_http_client() {
        let client = build_http_client(&FetcherConfig::default());
        assert!(client.is_ok());
    }

    #[tokio::test]
    async fn test_fetch_after_release_fails() {
        let mut fetcher = HttpFetcher::new(&FetcherConfig::default()).unwrap();
        assert!(fetcher.is_open());

        fetcher.release().await;
        assert!(!fetcher.is_open());

        let err = fetcher.fetch("https://example.com/").await.unwrap_err();
        assert!(matches!(err, FetchError::SessionClosed { .. }));
        assert_eq!(err.url(), "https://example.com/");
    }

    #[test]
    fn test_status_error_message() {
        let err = FetchError::Status {
            url: "https://site.com/x".to_string(),
            status: 404,
        };
        assert_eq!(err.to_string(), "HTTP 404 for https://site.com/x");
    }
}
