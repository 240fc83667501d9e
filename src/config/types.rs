use serde::Deserialize;

/// Main configuration structure for Paged-Aggregator
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(rename = "user-agent")]
    pub user_agent: UserAgentConfig,
    #[serde(default)]
    pub fetcher: FetcherConfig,
    #[serde(default)]
    pub traversal: TraversalConfig,
    #[serde(rename = "source", default)]
    pub sources: Vec<SourceConfig>,
}

impl Config {
    /// Looks up a source by provider label (case-insensitive)
    pub fn source(&self, provider: &str) -> Option<&SourceConfig> {
        self.sources
            .iter()
            .find(|s| s.provider.eq_ignore_ascii_case(provider))
    }
}

/// HTTP fetcher configuration
#[derive(Debug, Clone, Deserialize)]
pub struct FetcherConfig {
    /// Overall request timeout (milliseconds)
    #[serde(rename = "timeout-ms", default = "default_timeout_ms")]
    pub timeout_ms: u64,

    /// Connection establishment timeout (milliseconds); see
    /// [`Self::connect_timeout_ms`] for the value used when absent
    #[serde(rename = "connect-timeout-ms", default)]
    pub connect_timeout_ms: Option<u64>,
}

impl FetcherConfig {
    /// Effective connect timeout: the configured value, otherwise 10 s
    /// capped at the overall timeout
    pub fn connect_timeout_ms(&self) -> u64 {
        self.connect_timeout_ms
            .unwrap_or_else(|| DEFAULT_CONNECT_TIMEOUT_MS.min(self.timeout_ms))
    }
}

impl Default for FetcherConfig {
    fn default() -> Self {
        Self {
            timeout_ms: default_timeout_ms(),
            connect_timeout_ms: None,
        }
    }
}

const DEFAULT_CONNECT_TIMEOUT_MS: u64 = 10_000;

fn default_timeout_ms() -> u64 {
    30_000
}

/// Pagination limits
#[derive(Debug, Clone, Deserialize)]
pub struct TraversalConfig {
    /// Maximum number of pages fetched by one traversal
    #[serde(rename = "max-pages", default = "default_max_pages")]
    pub max_pages: usize,
}

impl Default for TraversalConfig {
    fn default() -> Self {
        Self {
            max_pages: default_max_pages(),
        }
    }
}

fn default_max_pages() -> usize {
    1000
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
pub struct UserAgentConfig {
    /// Name of the crawler
    #[serde(rename = "crawler-name")]
    pub crawler_name: String,

    /// Version of the crawler
    #[serde(rename = "crawler-version")]
    pub crawler_version: String,

    /// URL with information about the crawler
    #[serde(rename = "contact-url")]
    pub contact_url: String,

    /// Email address for crawler-related contact
    #[serde(rename = "contact-email")]
    pub contact_email: String,
}

/// One article listing source
#[derive(Debug, Clone, Deserialize)]
pub struct SourceConfig {
    /// Provider label attached to every article
    pub provider: String,

    /// Logo asset name shown next to the provider
    #[serde(default)]
    pub logo: Option<String>,

    /// Listing page used when no start address is given
    #[serde(rename = "default-address")]
    pub default_address: String,

    /// CSS selector of the repeating article container
    #[serde(rename = "article-selector")]
    pub article_selector: String,

    /// How to find the next listing page; no pagination when absent
    #[serde(rename = "next-link", default)]
    pub next_link: Option<NextLinkRule>,

    #[serde(default)]
    pub fields: FieldsConfig,
}

/// Field extraction rules, evaluated against each article container
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FieldsConfig {
    #[serde(default)]
    pub image: Option<FieldRule>,
    #[serde(default)]
    pub title: Option<FieldRule>,
    #[serde(default)]
    pub content: Option<FieldRule>,
    #[serde(default)]
    pub link: Option<FieldRule>,
    #[serde(rename = "created-at", default)]
    pub created_at: Option<FieldRule>,
    #[serde(rename = "updated-at", default)]
    pub updated_at: Option<FieldRule>,
}

/// Locates one value inside an article container
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FieldRule {
    /// Descendant selector; the container itself when absent
    #[serde(default)]
    pub selector: Option<String>,

    /// Attribute to read; the element text when absent
    #[serde(default)]
    pub attr: Option<String>,

    /// chrono format string for date fields
    #[serde(default)]
    pub format: Option<String>,
}

/// Locates the "next page" control on a listing page
#[derive(Debug, Clone, Deserialize)]
pub struct NextLinkRule {
    pub selector: String,

    /// Attribute holding the address (defaults to `href`)
    #[serde(default)]
    pub attr: Option<String>,

    /// Class marking the control as disabled on the last page
    #[serde(rename = "disabled-class", default)]
    pub disabled_class: Option<String>,
}
