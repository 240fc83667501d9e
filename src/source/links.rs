//! Next-link resolution for listing pages

use crate::config::NextLinkRule;
use crate::source::parse_selector;
use scraper::{ElementRef, Html};
use url::Url;

/// Finds the address of the next listing page
///
/// # Resolution Rules
///
/// The first element matching the rule's selector is the "next" control.
/// There is no next page when:
/// - no element matches
/// - the element carries the rule's disabled class
/// - the element has a `disabled` attribute or `aria-disabled="true"`
/// - the address attribute (default `href`) is missing or not followable
///
/// An unparsable selector is logged and treated as "no next page".
///
/// # Arguments
///
/// * `document` - The parsed listing page
/// * `rule` - The source's next-link rule
/// * `page_url` - The final URL of the page, for resolving relative links
pub fn find_next_link(document: &Html, rule: &NextLinkRule, page_url: &Url) -> Option<String> {
    let selector = match parse_selector(&rule.selector) {
        Ok(selector) => selector,
        Err(e) => {
            tracing::warn!("Invalid next-link selector '{}': {}", rule.selector, e);
            return None;
        }
    };

    let element = document.select(&selector).next()?;

    if is_disabled(element, rule.disabled_class.as_deref()) {
        tracing::debug!("Next-link control is disabled on {}", page_url);
        return None;
    }

    let href = element.value().attr(rule.attr.as_deref().unwrap_or("href"))?;
    let next = resolve_link(href, page_url);

    if next.is_none() {
        tracing::debug!("Ignoring unfollowable next link '{}' on {}", href, page_url);
    }

    next
}

fn is_disabled(element: ElementRef<'_>, disabled_class: Option<&str>) -> bool {
    let value = element.value();

    if let Some(class) = disabled_class {
        if value.classes().any(|c| c == class) {
            return true;
        }
    }

    value.attr("disabled").is_some()
        || value
            .attr("aria-disabled")
            .is_some_and(|v| v.eq_ignore_ascii_case("true"))
}

/// Resolves a link href to an absolute URL and validates it
///
/// Returns None if the link should be excluded:
/// - javascript:, mailto:, tel: schemes
/// - data: URIs
/// - fragment-only links
/// - Invalid URLs
/// - Non-HTTP(S) URLs after resolution
pub fn resolve_link(href: &str, base_url: &Url) -> Option<String> {
    let href = href.trim();

    if href.is_empty() || href.starts_with('#') {
        return None;
    }

    let lower = href.to_ascii_lowercase();
    if lower.starts_with("javascript:")
        || lower.starts_with("mailto:")
        || lower.starts_with("tel:")
        || lower.starts_with("data:")
    {
        return None;
    }

    match base_url.join(href) {
        Ok(absolute_url) => {
            if absolute_url.scheme() == "http" || absolute_url.scheme() == "https" {
                Some(absolute_url.to_string())
            } else {
                None
            }
        }
        Err(_) => None,
    }
}
