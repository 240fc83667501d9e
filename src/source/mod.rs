//! Article sources and record extraction
//!
//! An [`ArticleSource`] describes one listing site: its provider label,
//! default address, the selector of the repeating article container, one
//! extractor per article field and the next-link resolver. Sources are
//! plain values; [`SelectorSource`] builds one from configuration.

mod fields;
mod links;
mod selector;

pub use fields::{extract_date, extract_value, parse_date};
pub use links::{find_next_link, resolve_link};
pub use selector::SelectorSource;

use crate::article::Article;
use crate::{ExtractionError, ExtractionResult};
use chrono::{DateTime, Utc};
use scraper::{ElementRef, Html, Selector};
use url::Url;

/// Capability interface of one article listing source
pub trait ArticleSource: Send + Sync {
    /// Label attached to every article of this source
    fn provider(&self) -> &str;

    /// Listing page used when a traversal has no explicit start address
    fn default_address(&self) -> &str;

    /// Logo asset name, if the source has one
    fn logo(&self) -> Option<&str> {
        None
    }

    /// CSS query for the repeating per-article container
    fn article_selector(&self) -> &str;

    fn image(&self, node: ElementRef<'_>) -> ExtractionResult<Option<String>>;

    fn title(&self, node: ElementRef<'_>) -> ExtractionResult<Option<String>>;

    fn content(&self, node: ElementRef<'_>) -> ExtractionResult<Option<String>>;

    fn link(&self, node: ElementRef<'_>) -> ExtractionResult<Option<String>>;

    /// Creation time; implementations must fall back to some value when the
    /// page has none
    fn created_at(&self, node: ElementRef<'_>) -> ExtractionResult<DateTime<Utc>>;

    /// Last update time, given the article's already extracted creation
    /// time for use as a fallback
    fn updated_at(
        &self,
        node: ElementRef<'_>,
        created_at: DateTime<Utc>,
    ) -> ExtractionResult<DateTime<Utc>>;

    /// Address of the next listing page, or None on the last page
    fn next_address(&self, document: &Html, page_url: &Url) -> Option<String>;
}

/// Extracts all articles of a listing page, in document order
///
/// An article selector that cannot be parsed yields an empty page instead of
/// an error, exactly like a selector that matches nothing. Every other
/// extraction failure is returned.
///
/// # Arguments
///
/// * `source` - The source describing the page layout
/// * `document` - The parsed listing page
pub fn extract_articles<S>(source: &S, document: &Html) -> ExtractionResult<Vec<Article>>
where
    S: ArticleSource + ?Sized,
{
    match build_articles(source, document) {
        Err(e) if e.is_soft_failure() => {
            tracing::warn!("{}; treating page as empty", e);
            Ok(Vec::new())
        }
        result => result,
    }
}

/// Parses a CSS selector, describing failures with the error's `Debug` form
///
/// The `Display` impl of scraper's selector error panics on some tokens
/// (`div!!`), so it is never used.
pub(crate) fn parse_selector(query: &str) -> Result<Selector, String> {
    Selector::parse(query).map_err(|e| format!("{:?}", e))
}

fn build_articles<S>(source: &S, document: &Html) -> ExtractionResult<Vec<Article>>
where
    S: ArticleSource + ?Sized,
{
    let query = source.article_selector();
    let selector = parse_selector(query).map_err(|message| ExtractionError::InvalidSelector {
        selector: query.to_string(),
        message,
    })?;

    document
        .select(&selector)
        .map(|node| build_article(source, node))
        .collect()
}

fn build_article<S>(source: &S, node: ElementRef<'_>) -> ExtractionResult<Article>
where
    S: ArticleSource + ?Sized,
{
    let created_at = source.created_at(node)?;

    Ok(Article {
        image: source.image(node)?,
        title: source.title(node)?.unwrap_or_default(),
        content: source.content(node)?.unwrap_or_default(),
        provider: source.provider().to_string(),
        link: source.link(node)?,
        created_at,
        updated_at: source.updated_at(node, created_at)?,
    })
}
