//! Traversal statistics display
//!
//! Statistics go to stderr; stdout carries only article lines.

use crate::crawler::TraversalStats;

/// Renders the statistics of one source's traversal
pub fn format_statistics(provider: &str, stats: &TraversalStats) -> String {
    let mut out = format!("=== {} ===\n", provider);
    out.push_str(&format!("  Pages fetched: {}\n", stats.pages_fetched));
    out.push_str(&format!(
        "  Articles extracted: {}\n",
        stats.articles_extracted
    ));
    out.push_str(&format!("  Empty pages: {}\n", stats.empty_pages));

    if stats.pages_fetched > 0 {
        let average = stats.articles_extracted as f64 / stats.pages_fetched as f64;
        out.push_str(&format!("  Articles per page: {:.1}\n", average));
    }

    out
}

/// Prints statistics to stderr in a formatted manner
pub fn print_statistics(provider: &str, stats: &TraversalStats) {
    eprint!("{}", format_statistics(provider, stats));
}
