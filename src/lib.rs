//! Paged-Aggregator: paginated article listing scraper
//!
//! This crate fetches article listing pages from configured web sources,
//! extracts a fixed set of fields per article and follows "next page" links
//! until the listing is exhausted.

pub mod article;
pub mod config;
pub mod crawler;
pub mod output;
pub mod source;
pub mod url;

use thiserror::Error;

/// Main error type for Paged-Aggregator operations
#[derive(Debug, Error)]
pub enum AggregatorError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Fetch error: {0}")]
    Fetch(#[from] FetchError),

    #[error("Extraction error: {0}")]
    Extraction(#[from] ExtractionError),

    #[error("URL error: {0}")]
    Url(#[from] UrlError),

    #[error("Pagination cycle detected: {address} was already visited")]
    CycleDetected { address: String },

    #[error("Page limit of {limit} reached before fetching {address}")]
    PageLimitExceeded { limit: usize, address: String },

    #[error("Unknown source: {0}")]
    UnknownSource(String),

    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Transport failures while fetching a listing page
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Request timeout for {url}")]
    Timeout { url: String },

    #[error("HTTP {status} for {url}")]
    Status { url: String, status: u16 },

    #[error("Network error for {url}: {message}")]
    Network { url: String, message: String },

    #[error("Invalid address: {0}")]
    InvalidAddress(String),
}

/// Failures while turning a parsed page into articles
#[derive(Debug, Error)]
pub enum ExtractionError {
    /// The article selector could not be parsed. Absorbed by
    /// [`source::extract_articles`] into an empty page.
    #[error("Invalid article selector '{selector}': {message}")]
    InvalidSelector { selector: String, message: String },

    #[error("Failed to extract {field}: {message}")]
    Field { field: &'static str, message: String },
}

impl ExtractionError {
    /// Returns true if this error is absorbed into an empty page
    pub fn is_soft_failure(&self) -> bool {
        matches!(self, Self::InvalidSelector { .. })
    }
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// URL-specific errors
#[derive(Debug, Error)]
pub enum UrlError {
    #[error("Failed to parse URL: {0}")]
    Parse(String),

    #[error("Invalid URL scheme: {0}")]
    InvalidScheme(String),

    #[error("Missing domain in URL")]
    MissingDomain,
}

/// Result type alias for Paged-Aggregator operations
pub type Result<T> = std::result::Result<T, AggregatorError>;

/// Result type alias for extraction operations
pub type ExtractionResult<T> = std::result::Result<T, ExtractionError>;

// Re-export commonly used types
pub use article::Article;
pub use config::Config;
pub use crawler::{DocumentFetcher, HttpFetcher, Pager, Traversal, TraversalStats};
pub use source::{extract_articles, ArticleSource, SelectorSource};
