use crate::config::types::{Config, CrawlerConfig, FetchSettings, PolicyConfig, UserAgentConfig};
use crate::ConfigError;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_crawler_config(&config.crawler)?;
    validate_fetch_settings(&config.fetch)?;
    validate_user_agent_config(&config.user_agent)?;
    validate_policy(&config.policy)?;
    validate_seeds(&config.seeds)?;
    Ok(())
}

/// Validates traversal budgets
fn validate_crawler_config(config: &CrawlerConfig) -> Result<(), ConfigError> {
    // max_depth >= 0 is always true for u32, so no check needed

    if config.max_pages < 1 {
        return Err(ConfigError::Validation(
            "max_pages must be >= 1".to_string(),
        ));
    }

    if config.max_links_per_page < 1 {
        return Err(ConfigError::Validation(
            "max_links_per_page must be >= 1".to_string(),
        ));
    }

    if config.max_concurrent_fetches < 1 || config.max_concurrent_fetches > 100 {
        return Err(ConfigError::Validation(format!(
            "max_concurrent_fetches must be between 1 and 100, got {}",
            config.max_concurrent_fetches
        )));
    }

    if !config.base_url.is_empty() {
        let url = Url::parse(&config.base_url)
            .map_err(|e| ConfigError::InvalidUrl(format!("Invalid base_url: {}", e)))?;
        if url.scheme() != "http" && url.scheme() != "https" {
            return Err(ConfigError::InvalidUrl(format!(
                "base_url '{}' must use http or https",
                config.base_url
            )));
        }
    }

    Ok(())
}

/// Slowest accepted request rate: one request every 1000 seconds
pub(crate) const MIN_REQUESTS_PER_SECOND: f64 = 0.001;

/// Validates rate limiting and retry settings
fn validate_fetch_settings(config: &FetchSettings) -> Result<(), ConfigError> {
    if !config.requests_per_second.is_finite()
        || config.requests_per_second < MIN_REQUESTS_PER_SECOND
    {
        return Err(ConfigError::Validation(format!(
            "requests_per_second must be at least {}, got {}",
            MIN_REQUESTS_PER_SECOND, config.requests_per_second
        )));
    }

    if !config.backoff_factor.is_finite() || config.backoff_factor < 1.0 {
        return Err(ConfigError::Validation(format!(
            "backoff_factor must be >= 1.0, got {}",
            config.backoff_factor
        )));
    }

    if config.timeout_secs < 1 {
        return Err(ConfigError::Validation(
            "timeout_secs must be >= 1".to_string(),
        ));
    }

    Ok(())
}

/// Validates user agent configuration
fn validate_user_agent_config(config: &UserAgentConfig) -> Result<(), ConfigError> {
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

/// Validates the admission policy
///
/// Patterns that are not valid regular expressions are accepted; they are
/// matched as plain substrings at crawl time.
fn validate_policy(config: &PolicyConfig) -> Result<(), ConfigError> {
    if config.blocked_patterns.iter().any(|p| p.is_empty()) {
        return Err(ConfigError::InvalidPattern(
            "blocked pattern cannot be empty (it would block every URL)".to_string(),
        ));
    }

    if config.allowed_domains.iter().any(|d| d.is_empty()) {
        return Err(ConfigError::Validation(
            "allowed domain cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// Validates seed URLs
fn validate_seeds(seeds: &[String]) -> Result<(), ConfigError> {
    for seed in seeds {
        let url = Url::parse(seed)
            .map_err(|e| ConfigError::InvalidUrl(format!("Invalid seed URL '{}': {}", seed, e)))?;

        if url.scheme() != "http" && url.scheme() != "https" {
            return Err(ConfigError::Validation(format!(
                "Seed URL '{}' must use http or https",
                seed
            )));
        }
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

    let parts: Vec<&str> = email.split('@').collect();
    if parts.len() != 2 || parts[0].is_empty() || parts[1].is_empty() {
        return Err(ConfigError::Validation(format!(
            "Invalid email format: '{}'",
            email
        )));
    }

    if !parts[1].contains('.') {
        return Err(ConfigError::Validation(format!(
            "Invalid email domain: '{}'",
            email
        )));
    }

    Ok(())
}
