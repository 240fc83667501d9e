//! Crawler module for listing page traversal
//!
//! This module contains the traversal logic, including:
//! - HTTP fetching with finite timeouts
//! - Lazy, pull-based paging with cycle and page-limit guards
//! - Callback-driven traversal of a whole listing

mod fetcher;
mod pager;
mod traversal;

pub use fetcher::{build_http_client, user_agent_string, DocumentFetcher, FetchedPage, HttpFetcher};
pub use pager::{Pager, TraversalStats};
pub use traversal::{Traversal, DEFAULT_MAX_PAGES};
