//! Pull-based traversal of a paginated listing
//!
//! A [`Pager`] holds the state of one traversal session: the next address,
//! the visited set, the page count and the articles of the current page
//! that have not been handed out yet. Pages are fetched lazily, one at a
//! time, only after every article of the previous page was consumed.

use crate::article::Article;
use crate::crawler::fetcher::{DocumentFetcher, FetchedPage};
use crate::source::{extract_articles, ArticleSource};
use crate::url::visit_key;
use crate::AggregatorError;
use futures::Stream;
use scraper::Html;
use std::collections::{HashSet, VecDeque};
use url::Url;

/// Counters for one traversal session
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TraversalStats {
    /// Number of pages fetched successfully
    pub pages_fetched: usize,

    /// Number of articles extracted across all pages
    pub articles_extracted: usize,

    /// Pages that produced no articles
    pub empty_pages: usize,
}

/// Restartable lazy sequence over the articles of a paginated listing
pub struct Pager<'a, F: ?Sized, S: ?Sized> {
    fetcher: &'a F,
    source: &'a S,
    fetch_all: bool,
    max_pages: usize,
    start: String,
    next: Option<String>,
    visited: HashSet<String>,
    buffer: VecDeque<Article>,
    stats: TraversalStats,
}

impl<'a, F, S> Pager<'a, F, S>
where
    F: DocumentFetcher + ?Sized,
    S: ArticleSource + ?Sized,
{
    /// Creates a pager positioned before the first page
    ///
    /// # Arguments
    ///
    /// * `fetcher` - Transport used for every page of the session
    /// * `source` - Layout of the listing
    /// * `fetch_all` - Follow next links; otherwise stop after one page
    /// * `start` - Start address; the source's default address when None
    /// * `max_pages` - Upper bound on pages fetched by the session
    pub fn new(
        fetcher: &'a F,
        source: &'a S,
        fetch_all: bool,
        start: Option<&str>,
        max_pages: usize,
    ) -> Self {
        let start = start.unwrap_or_else(|| source.default_address()).to_string();

        Self {
            fetcher,
            source,
            fetch_all,
            max_pages,
            next: Some(start.clone()),
            start,
            visited: HashSet::new(),
            buffer: VecDeque::new(),
            stats: TraversalStats::default(),
        }
    }

    /// Address the session starts from
    pub fn start_address(&self) -> &str {
        &self.start
    }

    /// Address that the next call to [`Self::next_page`] will fetch
    pub fn pending_address(&self) -> Option<&str> {
        self.next.as_deref()
    }

    pub fn stats(&self) -> &TraversalStats {
        &self.stats
    }

    /// Resets the session to its start address
    pub fn restart(&mut self) {
        self.next = Some(self.start.clone());
        self.visited.clear();
        self.buffer.clear();
        self.stats = TraversalStats::default();
    }

    /// Fetches the next page and returns its articles
    ///
    /// Articles still buffered from a previous page are discarded.
    ///
    /// # Returns
    ///
    /// * `Ok(Some(articles))` - One page, in document order
    /// * `Ok(None)` - The listing is exhausted
    /// * `Err(AggregatorError::CycleDetected)` - The next link points to a
    ///   page already visited in this session
    /// * `Err(AggregatorError::PageLimitExceeded)` - Another page exists
    ///   but the page limit was reached
    /// * `Err(_)` - Fetch or extraction failure
    pub async fn next_page(&mut self) -> Result<Option<Vec<Article>>, AggregatorError> {
        self.buffer.clear();

        let Some(address) = self.next.take() else {
            return Ok(None);
        };

        if !self.visited.insert(visit_key(&address)) {
            return Err(AggregatorError::CycleDetected { address });
        }

        if self.stats.pages_fetched >= self.max_pages {
            return Err(AggregatorError::PageLimitExceeded {
                limit: self.max_pages,
                address,
            });
        }

        let page = self.fetcher.fetch(&address).await?;
        self.stats.pages_fetched += 1;

        let (articles, next) = read_page(self.source, &page)?;

        tracing::debug!(
            "Page {} of {}: {} articles from {} (HTTP {})",
            self.stats.pages_fetched,
            self.source.provider(),
            articles.len(),
            page.address,
            page.status_code
        );

        self.stats.articles_extracted += articles.len();
        if articles.is_empty() {
            self.stats.empty_pages += 1;
        }

        match next {
            Some(next) if self.fetch_all => self.next = Some(next),
            Some(next) => tracing::debug!("Single-page mode, not following {}", next),
            None => tracing::debug!("No next page after {}", address),
        }

        Ok(Some(articles))
    }

    /// Returns the next article, fetching a new page only when the current
    /// one is exhausted
    pub async fn next_article(&mut self) -> Result<Option<Article>, AggregatorError> {
        loop {
            if let Some(article) = self.buffer.pop_front() {
                return Ok(Some(article));
            }

            match self.next_page().await? {
                Some(articles) => self.buffer.extend(articles),
                None => return Ok(None),
            }
        }
    }

    /// Drains the remaining articles into an ordered list
    pub async fn collect(mut self) -> Result<Vec<Article>, AggregatorError> {
        let mut articles: Vec<Article> = self.buffer.drain(..).collect();
        while let Some(page) = self.next_page().await? {
            articles.extend(page);
        }
        Ok(articles)
    }

    /// Adapts the pager into a stream of articles
    ///
    /// The stream ends after the first error.
    pub fn into_stream(self) -> impl Stream<Item = Result<Article, AggregatorError>> + 'a
    where
        F: 'a,
        S: 'a,
    {
        futures::stream::try_unfold(self, |mut pager| async move {
            let article = pager.next_article().await?;
            Ok::<_, AggregatorError>(article.map(|article| (article, pager)))
        })
    }
}

/// Parses a fetched page and extracts its articles and next address
///
/// The parsed document never outlives this call, which keeps the async
/// callers `Send`.
fn read_page<S>(
    source: &S,
    page: &FetchedPage,
) -> Result<(Vec<Article>, Option<String>), AggregatorError>
where
    S: ArticleSource + ?Sized,
{
    let document = Html::parse_document(&page.body);
    let articles = extract_articles(source, &document)?;

    let next = match Url::parse(&page.final_url) {
        Ok(page_url) => source.next_address(&document, &page_url),
        Err(e) => {
            tracing::warn!(
                "Cannot resolve next link on {}: invalid page URL ({})",
                page.final_url,
                e
            );
            None
        }
    };

    Ok((articles, next))
}
