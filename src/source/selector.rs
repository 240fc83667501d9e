//! Configuration-driven article source

use crate::config::{FieldRule, SourceConfig};
use crate::source::fields::{extract_date, extract_value};
use crate::source::links::find_next_link;
use crate::source::{parse_selector, ArticleSource};
use crate::ExtractionResult;
use chrono::{DateTime, Utc};
use scraper::{ElementRef, Html};
use url::Url;

/// An [`ArticleSource`] defined entirely by a `[[source]]` table
///
/// # Timestamp fallbacks
///
/// - `created_at`: extraction time when the page has no date node
/// - `updated_at`: the article's `created_at` when the page has no
///   update node
///
/// A date node that exists but does not parse is an extraction error.
#[derive(Debug, Clone)]
pub struct SelectorSource {
    config: SourceConfig,
}

impl SelectorSource {
    pub fn new(config: SourceConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SourceConfig {
        &self.config
    }

    /// Lists every configured selector that fails to parse
    ///
    /// Used by `--dry-run`; traversals do not require a clean report.
    pub fn check_selectors(&self) -> Vec<String> {
        let fields = &self.config.fields;
        let mut selectors = vec![("article-selector", Some(self.config.article_selector.as_str()))];
        selectors.push((
            "next-link",
            self.config.next_link.as_ref().map(|n| n.selector.as_str()),
        ));
        for (name, rule) in [
            ("image", &fields.image),
            ("title", &fields.title),
            ("content", &fields.content),
            ("link", &fields.link),
            ("created-at", &fields.created_at),
            ("updated-at", &fields.updated_at),
        ] {
            selectors.push((name, rule.as_ref().and_then(|r| r.selector.as_deref())));
        }

        selectors
            .into_iter()
            .filter_map(|(name, selector)| {
                let selector = selector?;
                parse_selector(selector)
                    .err()
                    .map(|e| format!("{} '{}': {}", name, selector, e))
            })
            .collect()
    }

    fn text_field(
        &self,
        node: ElementRef<'_>,
        rule: &Option<FieldRule>,
        field: &'static str,
    ) -> ExtractionResult<Option<String>> {
        match rule {
            Some(rule) => extract_value(node, rule, field),
            None => Ok(None),
        }
    }

    fn date_field(
        &self,
        node: ElementRef<'_>,
        rule: &Option<FieldRule>,
        field: &'static str,
    ) -> ExtractionResult<Option<DateTime<Utc>>> {
        match rule {
            Some(rule) => extract_date(node, rule, field),
            None => Ok(None),
        }
    }
}

impl From<SourceConfig> for SelectorSource {
    fn from(config: SourceConfig) -> Self {
        Self::new(config)
    }
}

impl ArticleSource for SelectorSource {
    fn provider(&self) -> &str {
        &self.config.provider
    }

    fn default_address(&self) -> &str {
        &self.config.default_address
    }

    fn logo(&self) -> Option<&str> {
        self.config.logo.as_deref()
    }

    fn article_selector(&self) -> &str {
        &self.config.article_selector
    }

    fn image(&self, node: ElementRef<'_>) -> ExtractionResult<Option<String>> {
        self.text_field(node, &self.config.fields.image, "image")
    }

    fn title(&self, node: ElementRef<'_>) -> ExtractionResult<Option<String>> {
        self.text_field(node, &self.config.fields.title, "title")
    }

    fn content(&self, node: ElementRef<'_>) -> ExtractionResult<Option<String>> {
        self.text_field(node, &self.config.fields.content, "content")
    }

    fn link(&self, node: ElementRef<'_>) -> ExtractionResult<Option<String>> {
        self.text_field(node, &self.config.fields.link, "link")
    }

    fn created_at(&self, node: ElementRef<'_>) -> ExtractionResult<DateTime<Utc>> {
        Ok(self
            .date_field(node, &self.config.fields.created_at, "created_at")?
            .unwrap_or_else(Utc::now))
    }

    fn updated_at(
        &self,
        node: ElementRef<'_>,
        created_at: DateTime<Utc>,
    ) -> ExtractionResult<DateTime<Utc>> {
        Ok(self
            .date_field(node, &self.config.fields.updated_at, "updated_at")?
            .unwrap_or(created_at))
    }

    fn next_address(&self, document: &Html, page_url: &Url) -> Option<String> {
        let rule = self.config.next_link.as_ref()?;
        find_next_link(document, rule, page_url)
    }
}
