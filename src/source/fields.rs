//! Field rule evaluation against one article container
//!
//! A [`FieldRule`] picks a node (the container itself or its first
//! descendant matching a selector) and reads either its text or one of its
//! attributes. Date fields additionally parse the value with chrono.

use crate::config::FieldRule;
use crate::source::parse_selector;
use crate::{ExtractionError, ExtractionResult};
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use scraper::ElementRef;

/// Reads the value a rule points at
///
/// # Returns
///
/// * `Ok(Some(String))` - Non-empty, trimmed value
/// * `Ok(None)` - No matching node, missing attribute or blank value
/// * `Err(ExtractionError::Field)` - The rule's selector cannot be parsed
pub fn extract_value(
    node: ElementRef<'_>,
    rule: &FieldRule,
    field: &'static str,
) -> ExtractionResult<Option<String>> {
    let target = match rule.selector.as_deref() {
        Some(selector) => {
            let selector = parse_selector(selector).map_err(|e| ExtractionError::Field {
                field,
                message: format!("invalid selector '{}': {}", selector, e),
            })?;
            match node.select(&selector).next() {
                Some(element) => element,
                None => return Ok(None),
            }
        }
        None => node,
    };

    let value = match rule.attr.as_deref() {
        Some(attr) => target.value().attr(attr).map(|v| v.trim().to_string()),
        None => Some(collapse_whitespace(target)),
    };

    Ok(value.filter(|v| !v.is_empty()))
}

/// Reads and parses a date value
///
/// A missing node is `Ok(None)`; a value that is present but does not parse
/// is an error.
pub fn extract_date(
    node: ElementRef<'_>,
    rule: &FieldRule,
    field: &'static str,
) -> ExtractionResult<Option<DateTime<Utc>>> {
    let Some(raw) = extract_value(node, rule, field)? else {
        return Ok(None);
    };

    parse_date(&raw, rule.format.as_deref())
        .map(Some)
        .ok_or_else(|| ExtractionError::Field {
            field,
            message: match rule.format.as_deref() {
                Some(format) => format!("'{}' does not match format '{}'", raw, format),
                None => format!("'{}' is neither RFC 3339 nor RFC 2822", raw),
            },
        })
}

/// Parses a date string into UTC
///
/// With a format: tried as a full timestamp with offset, then as a naive
/// timestamp (read as UTC), then as a bare date (midnight UTC). Without a
/// format: RFC 3339, then RFC 2822.
pub fn parse_date(raw: &str, format: Option<&str>) -> Option<DateTime<Utc>> {
    let raw = raw.trim();

    let Some(format) = format else {
        return DateTime::parse_from_rfc3339(raw)
            .or_else(|_| DateTime::parse_from_rfc2822(raw))
            .ok()
            .map(|dt| dt.with_timezone(&Utc));
    };

    if let Ok(dt) = DateTime::parse_from_str(raw, format) {
        return Some(dt.with_timezone(&Utc));
    }

    if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
        return Some(naive.and_utc());
    }

    NaiveDate::parse_from_str(raw, format)
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

fn collapse_whitespace(element: ElementRef<'_>) -> String {
    element
        .text()
        .flat_map(str::split_whitespace)
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use scraper::{Html, Selector};

    const CARD: &str = r#"
        <article class="card">
            <img src=" /img/1.jpg " alt="">
            <h2>  Breaking
                news </h2>
            <p class="summary"></p>
            <time datetime="2024-03-01">1 March</time>
        </article>
    "#;

    fn rule(selector: Option<&str>, attr: Option<&str>, format: Option<&str>) -> FieldRule {
        FieldRule {
            selector: selector.map(str::to_string),
            attr: attr.map(str::to_string),
            format: format.map(str::to_string),
        }
    }

    fn with_card<T>(f: impl FnOnce(ElementRef<'_>) -> T) -> T {
        let document = Html::parse_fragment(CARD);
        let selector = Selector::parse("article").unwrap();
        let card = document.select(&selector).next().unwrap();
        f(card)
    }

    #[test]
    fn test_text_is_whitespace_collapsed() {
        let value = with_card(|card| extract_value(card, &rule(Some("h2"), None, None), "title"));
        assert_eq!(value.unwrap(), Some("Breaking news".to_string()));
    }

    #[test]
    fn test_attribute_is_trimmed() {
        let value =
            with_card(|card| extract_value(card, &rule(Some("img"), Some("src"), None), "image"));
        assert_eq!(value.unwrap(), Some("/img/1.jpg".to_string()));
    }

    #[test]
    fn test_container_itself_without_selector() {
        let value =
            with_card(|card| extract_value(card, &rule(None, Some("class"), None), "content"));
        assert_eq!(value.unwrap(), Some("card".to_string()));
    }

    #[test]
    fn test_missing_values_are_none() {
        with_card(|card| {
            assert_eq!(
                extract_value(card, &rule(Some("h3"), None, None), "title").unwrap(),
                None
            );
            assert_eq!(
                extract_value(card, &rule(Some("p.summary"), None, None), "content").unwrap(),
                None
            );
            assert_eq!(
                extract_value(card, &rule(Some("img"), Some("alt"), None), "image").unwrap(),
                None
            );
        });
    }

    #[test]
    fn test_invalid_field_selector_is_field_error() {
        let result = with_card(|card| extract_value(card, &rule(Some("h2[["), None, None), "title"));
        assert!(matches!(
            result,
            Err(ExtractionError::Field { field: "title", .. })
        ));

        let result = with_card(|card| extract_value(card, &rule(Some("h2!!"), None, None), "title"));
        match result {
            Err(ExtractionError::Field { field, message }) => {
                assert_eq!(field, "title");
                assert!(message.contains("'h2!!'"));
            }
            other => panic!("expected field error, got {:?}", other),
        }
    }

    #[test]
    fn test_extract_date_with_format() {
        let value = with_card(|card| {
            extract_date(
                card,
                &rule(Some("time"), Some("datetime"), Some("%Y-%m-%d")),
                "created_at",
            )
        });
        assert_eq!(
            value.unwrap(),
            Some(Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap())
        );
    }

    #[test]
    fn test_extract_date_unparseable_is_error() {
        let result = with_card(|card| extract_date(card, &rule(Some("time"), None, None), "created_at"));
        let err = result.unwrap_err();
        assert!(!err.is_soft_failure());
        assert!(err.to_string().contains("1 March"));
    }

    #[test]
    fn test_extract_date_missing_is_none() {
        let result =
            with_card(|card| extract_date(card, &rule(Some("time.updated"), None, None), "updated_at"));
        assert_eq!(result.unwrap(), None);
    }

    #[test]
    fn test_parse_date_defaults() {
        assert_eq!(
            parse_date("2024-03-01T10:30:00+02:00", None),
            Some(Utc.with_ymd_and_hms(2024, 3, 1, 8, 30, 0).unwrap())
        );
        assert_eq!(
            parse_date("Fri, 01 Mar 2024 10:30:00 GMT", None),
            Some(Utc.with_ymd_and_hms(2024, 3, 1, 10, 30, 0).unwrap())
        );
        assert_eq!(parse_date("yesterday", None), None);
    }

    #[test]
    fn test_parse_date_with_formats() {
        assert_eq!(
            parse_date("2024/03/01 13:19:56 +0700", Some("%Y/%m/%d %H:%M:%S %z")),
            Some(Utc.with_ymd_and_hms(2024, 3, 1, 6, 19, 56).unwrap())
        );
        assert_eq!(
            parse_date("01.03.2024 09:15", Some("%d.%m.%Y %H:%M")),
            Some(Utc.with_ymd_and_hms(2024, 3, 1, 9, 15, 0).unwrap())
        );
        assert_eq!(
            parse_date("March 1, 2024", Some("%B %d, %Y")),
            Some(Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap())
        );
    }
}
