//! URL handling module for Paged-Aggregator
//!
//! Listing addresses are compared in normalized form so that pagination
//! cycles are detected even when a site links back to an already visited
//! page with a fragment, reordered query or tracking parameters.

mod normalize;

pub use normalize::{normalize_address, visit_key};
