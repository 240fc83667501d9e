//! Paginated traversal of one article source
//!
//! [`Traversal`] binds a fetcher to a source and runs sessions over it,
//! delivering articles either to a callback ([`Traversal::traverse`]) or
//! through pull-based accessors ([`Traversal::pager`],
//! [`Traversal::collect`], [`Traversal::stream`]). All delivery modes share
//! the same loop, so ordering and limits are identical.

use crate::article::Article;
use crate::config::TraversalConfig;
use crate::crawler::fetcher::DocumentFetcher;
use crate::crawler::pager::{Pager, TraversalStats};
use crate::source::ArticleSource;
use crate::AggregatorError;
use futures::Stream;

/// Default upper bound on pages fetched by one traversal
pub const DEFAULT_MAX_PAGES: usize = 1000;

/// Runs paginated traversals of one source
pub struct Traversal<F, S> {
    fetcher: F,
    source: S,
    max_pages: usize,
}

impl<F, S> Traversal<F, S>
where
    F: DocumentFetcher,
    S: ArticleSource,
{
    pub fn new(fetcher: F, source: S) -> Self {
        Self {
            fetcher,
            source,
            max_pages: DEFAULT_MAX_PAGES,
        }
    }

    /// Sets the page limit from configuration
    pub fn with_config(self, config: &TraversalConfig) -> Self {
        self.with_max_pages(config.max_pages)
    }

    pub fn with_max_pages(mut self, max_pages: usize) -> Self {
        self.max_pages = max_pages;
        self
    }

    pub fn fetcher(&self) -> &F {
        &self.fetcher
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn max_pages(&self) -> usize {
        self.max_pages
    }

    /// Fetches listing pages and hands every article to `on_record`
    ///
    /// # Flow
    ///
    /// 1. Fetch `start_address` (or the source's default address)
    /// 2. Extract the page's articles; an invalid article selector yields
    ///    an empty page
    /// 3. Call `on_record` once per article, in document order
    /// 4. Resolve the next address; continue only when one exists and
    ///    `fetch_all` is set
    ///
    /// Every article of a page is delivered before the next page is
    /// fetched. A failure aborts the traversal; articles delivered before
    /// it stay delivered.
    ///
    /// # Returns
    ///
    /// * `Ok(TraversalStats)` - The listing was exhausted
    /// * `Err(AggregatorError::Fetch)` - A page could not be fetched
    /// * `Err(AggregatorError::Extraction)` - A field extractor failed
    /// * `Err(AggregatorError::CycleDetected)` - A next link revisits a page
    /// * `Err(AggregatorError::PageLimitExceeded)` - More than
    ///   [`Self::max_pages`] pages would be fetched
    ///
    /// # Example
    ///
    /// ```no_run
    /// use paged_aggregator::config::load_config;
    /// use paged_aggregator::{Article, HttpFetcher, SelectorSource, Traversal};
    /// use std::path::Path;
    ///
    /// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
    /// let config = load_config(Path::new("sources.toml"))?;
    /// let fetcher = HttpFetcher::from_config(&config.fetcher, &config.user_agent)?;
    /// let source = SelectorSource::new(config.sources[0].clone());
    /// let traversal = Traversal::new(fetcher, source).with_config(&config.traversal);
    ///
    /// let mut print = |article: Article| println!("{}", article.title);
    /// let stats = traversal.traverse(true, None, Some(&mut print)).await?;
    /// println!("{} pages", stats.pages_fetched);
    /// # Ok(())
    /// # }
    /// ```
    pub async fn traverse(
        &self,
        fetch_all: bool,
        start_address: Option<&str>,
        mut on_record: Option<&mut (dyn FnMut(Article) + Send)>,
    ) -> Result<TraversalStats, AggregatorError> {
        let mut pager = self.pager(fetch_all, start_address);

        tracing::info!(
            "Traversing {} from {}",
            self.source.provider(),
            pager.start_address()
        );

        while let Some(articles) = pager.next_page().await? {
            if let Some(callback) = on_record.as_deref_mut() {
                for article in articles {
                    callback(article);
                }
            }
        }

        let stats = pager.stats().clone();
        tracing::info!(
            "Finished {}: {} pages, {} articles",
            self.source.provider(),
            stats.pages_fetched,
            stats.articles_extracted
        );

        Ok(stats)
    }

    /// Starts a pull-based session
    pub fn pager(&self, fetch_all: bool, start_address: Option<&str>) -> Pager<'_, F, S> {
        Pager::new(
            &self.fetcher,
            &self.source,
            fetch_all,
            start_address,
            self.max_pages,
        )
    }

    /// Runs a session and returns every article in delivery order
    pub async fn collect(
        &self,
        fetch_all: bool,
        start_address: Option<&str>,
    ) -> Result<Vec<Article>, AggregatorError> {
        self.pager(fetch_all, start_address).collect().await
    }

    /// Runs a session as a stream of articles
    pub fn stream(
        &self,
        fetch_all: bool,
        start_address: Option<&str>,
    ) -> impl Stream<Item = Result<Article, AggregatorError>> + '_ {
        self.pager(fetch_all, start_address).into_stream()
    }
}
