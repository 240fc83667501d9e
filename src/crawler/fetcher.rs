//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests for the aggregator, including:
//! - Building HTTP clients with proper user agent strings and finite timeouts
//! - GET requests to fetch listing pages
//! - Error classification into [`FetchError`] variants

use crate::config::{FetcherConfig, UserAgentConfig};
use crate::FetchError;
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

/// A fetched listing page
#[derive(Debug, Clone)]
pub struct FetchedPage {
    /// The address that was requested
    pub address: String,
    /// Final URL after redirects; relative links resolve against it
    pub final_url: String,
    /// HTTP status code
    pub status_code: u16,
    /// Page body content
    pub body: String,
}

/// Retrieves listing pages by address
#[async_trait]
pub trait DocumentFetcher: Send + Sync {
    async fn fetch(&self, address: &str) -> Result<FetchedPage, FetchError>;
}

/// Builds an HTTP client with proper configuration
///
/// # Arguments
///
/// * `fetcher` - Timeout configuration
/// * `user_agent` - The user agent configuration
///
/// # Example
///
/// ```no_run
/// use paged_aggregator::config::{FetcherConfig, UserAgentConfig};
/// use paged_aggregator::crawler::build_http_client;
///
/// let user_agent = UserAgentConfig {
///     crawler_name: "PagedAggregator".to_string(),
///     crawler_version: "0.1".to_string(),
///     contact_url: "https://example.com/about".to_string(),
///     contact_email: "admin@example.com".to_string(),
/// };
///
/// let client = build_http_client(&FetcherConfig::default(), &user_agent).unwrap();
/// ```
pub fn build_http_client(
    fetcher: &FetcherConfig,
    user_agent: &UserAgentConfig,
) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(user_agent_string(user_agent))
        .timeout(Duration::from_millis(fetcher.timeout_ms))
        .connect_timeout(Duration::from_millis(fetcher.connect_timeout_ms()))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Format: CrawlerName/Version (+ContactURL; ContactEmail)
pub fn user_agent_string(config: &UserAgentConfig) -> String {
    format!(
        "{}/{} (+{}; {})",
        config.crawler_name, config.crawler_version, config.contact_url, config.contact_email
    )
}

/// [`DocumentFetcher`] over a shared `reqwest` client
///
/// # Error Classification
///
/// | Condition | Result |
/// |-----------|--------|
/// | Unparsable address | `FetchError::InvalidAddress` |
/// | Timeout | `FetchError::Timeout` |
/// | Non-2xx status | `FetchError::Status` |
/// | Connection or body error | `FetchError::Network` |
///
/// Redirects are followed by the client's default policy.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Builds a fetcher with its own client
    pub fn from_config(
        fetcher: &FetcherConfig,
        user_agent: &UserAgentConfig,
    ) -> Result<Self, reqwest::Error> {
        Ok(Self::new(build_http_client(fetcher, user_agent)?))
    }
}

#[async_trait]
impl DocumentFetcher for HttpFetcher {
    async fn fetch(&self, address: &str) -> Result<FetchedPage, FetchError> {
        let url = reqwest::Url::parse(address)
            .map_err(|e| FetchError::InvalidAddress(format!("{}: {}", address, e)))?;

        tracing::debug!("GET {}", url);

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| classify_error(address, e))?;

        let status = response.status();
        let final_url = response.url().to_string();

        if !status.is_success() {
            return Err(FetchError::Status {
                url: address.to_string(),
                status: status.as_u16(),
            });
        }

        let body = response
            .text()
            .await
            .map_err(|e| classify_error(address, e))?;

        tracing::debug!(
            "Fetched {} ({} bytes, final URL {})",
            address,
            body.len(),
            final_url
        );

        Ok(FetchedPage {
            address: address.to_string(),
            final_url,
            status_code: status.as_u16(),
            body,
        })
    }
}

fn classify_error(address: &str, e: reqwest::Error) -> FetchError {
    if e.is_timeout() {
        FetchError::Timeout {
            url: address.to_string(),
        }
    } else if e.is_connect() {
        FetchError::Network {
            url: address.to_string(),
            message: "Connection refused".to_string(),
        }
    } else {
        FetchError::Network {
            url: address.to_string(),
            message: e.to_string(),
        }
    }
}
