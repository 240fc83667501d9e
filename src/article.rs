//! The article record produced by extraction

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One article extracted from a listing page
///
/// `title` and `content` are never absent: an extractor that finds nothing
/// produces an empty string. `image` and `link` stay `None` when missing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Article {
    /// Image URL as found on the page
    pub image: Option<String>,

    /// Article headline
    pub title: String,

    /// Teaser or body text
    pub content: String,

    /// Label of the source the article was extracted from
    pub provider: String,

    /// Link to the article (absolute or relative)
    pub link: Option<String>,

    pub created_at: DateTime<Utc>,

    pub updated_at: DateTime<Utc>,
}

impl Article {
    /// Returns true if the extractor found neither a title nor any content
    pub fn is_blank(&self) -> bool {
        self.title.is_empty() && self.content.is_empty()
    }
}
