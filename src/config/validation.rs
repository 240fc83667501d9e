use crate::config::types::{
    Config, FetcherConfig, FieldRule, SourceConfig, TraversalConfig, UserAgentConfig,
};
use crate::ConfigError;
use std::collections::HashSet;
use url::Url;

/// Upper bound for request timeouts (10 minutes)
const MAX_TIMEOUT_MS: u64 = 600_000;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_user_agent_config(&config.user_agent)?;
    validate_fetcher_config(&config.fetcher)?;
    validate_traversal_config(&config.traversal)?;
    validate_sources(&config.sources)?;
    Ok(())
}

/// Validates fetcher timeouts
fn validate_fetcher_config(config: &FetcherConfig) -> Result<(), ConfigError> {
    if config.timeout_ms < 1 || config.timeout_ms > MAX_TIMEOUT_MS {
        return Err(ConfigError::Validation(format!(
            "timeout_ms must be between 1 and {}, got {}",
            MAX_TIMEOUT_MS, config.timeout_ms
        )));
    }

    if let Some(connect) = config.connect_timeout_ms {
        if connect < 1 || connect > config.timeout_ms {
            return Err(ConfigError::Validation(format!(
                "connect_timeout_ms must be between 1 and timeout_ms ({}), got {}",
                config.timeout_ms, connect
            )));
        }
    }

    Ok(())
}

fn validate_traversal_config(config: &TraversalConfig) -> Result<(), ConfigError> {
    if config.max_pages < 1 {
        return Err(ConfigError::Validation(format!(
            "max_pages must be >= 1, got {}",
            config.max_pages
        )));
    }
    Ok(())
}

/// Validates user agent configuration
fn validate_user_agent_config(config: &UserAgentConfig) -> Result<(), ConfigError> {
    // Validate crawler name: non-empty, alphanumeric + hyphens only
    if config.crawler_name.is_empty() {
        return Err(ConfigError::Validation(
            "crawler_name cannot be empty".to_string(),
        ));
    }

    if !config
        .crawler_name
        .chars()
        .all(|c| c.is_alphanumeric() || c == '-')
    {
        return Err(ConfigError::Validation(format!(
            "crawler_name must contain only alphanumeric characters and hyphens, got '{}'",
            config.crawler_name
        )));
    }

    Url::parse(&config.contact_url)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid contact_url: {}", e)))?;

    validate_email(&config.contact_email)?;

    Ok(())
}

/// Validates source entries
///
/// Selector syntax is deliberately left unchecked here: an unparsable
/// article selector is handled at extraction time as an empty page.
fn validate_sources(sources: &[SourceConfig]) -> Result<(), ConfigError> {
    let mut providers = HashSet::new();

    for source in sources {
        let provider = source.provider.trim();
        if provider.is_empty() {
            return Err(ConfigError::Validation(
                "source provider cannot be empty".to_string(),
            ));
        }

        if !providers.insert(provider.to_lowercase()) {
            return Err(ConfigError::Validation(format!(
                "Duplicate source provider '{}'",
                provider
            )));
        }

        let url = Url::parse(&source.default_address).map_err(|e| {
            ConfigError::InvalidUrl(format!(
                "Invalid default address '{}' for '{}': {}",
                source.default_address, provider, e
            ))
        })?;

        if url.scheme() != "http" && url.scheme() != "https" {
            return Err(ConfigError::Validation(format!(
                "Default address '{}' for '{}' must use HTTP or HTTPS",
                source.default_address, provider
            )));
        }

        if source.article_selector.trim().is_empty() {
            return Err(ConfigError::Validation(format!(
                "article_selector for '{}' cannot be empty",
                provider
            )));
        }

        if let Some(next) = &source.next_link {
            if next.selector.trim().is_empty() {
                return Err(ConfigError::Validation(format!(
                    "next-link selector for '{}' cannot be empty",
                    provider
                )));
            }
        }

        let fields = &source.fields;
        for (name, rule) in [
            ("image", &fields.image),
            ("title", &fields.title),
            ("content", &fields.content),
            ("link", &fields.link),
            ("created-at", &fields.created_at),
            ("updated-at", &fields.updated_at),
        ] {
            if let Some(rule) = rule {
                validate_field_rule(provider, name, rule)?;
            }
        }
    }

    Ok(())
}

fn validate_field_rule(provider: &str, name: &str, rule: &FieldRule) -> Result<(), ConfigError> {
    let blank = |value: &Option<String>| value.as_deref().is_some_and(|v| v.trim().is_empty());

    if blank(&rule.selector) || blank(&rule.attr) || blank(&rule.format) {
        return Err(ConfigError::Validation(format!(
            "Field '{}' of '{}' has an empty selector, attr or format",
            name, provider
        )));
    }

    Ok(())
}

/// Basic email validation
fn validate_email(email: &str) -> Result<(), ConfigError> {
    if email.is_empty() {
        return Err(ConfigError::Validation(
            "contact_email cannot be empty".to_string(),
        ));
    }

    // Basic email format check: must contain @ and have text on both sides
    let parts: Vec<&str> = email.split('@').collect();
    if parts.len() != 2 {
        return Err(ConfigError::Validation(format!(
            "Invalid email format: '{}'",
            email
        )));
    }

    let local = parts[0];
    let domain = parts[1];

    if local.is_empty() || domain.is_empty() {
        return Err(ConfigError::Validation(format!(
            "Invalid email format: '{}'",
            email
        )));
    }

    if !domain.contains('.') {
        return Err(ConfigError::Validation(format!(
            "Invalid email domain: '{}'",
            email
        )));
    }

    Ok(())
}
