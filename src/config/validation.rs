use crate::config::types::{Config, HarvestConfig, RetryConfig, UserAgentConfig};
use crate::ConfigError;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_harvest_config(&config.harvest)?;
    validate_retry_config(&config.retry)?;
    validate_user_agent_config(&config.user_agent)?;
    Ok(())
}

/// Validates catalog traversal configuration
fn validate_harvest_config(config: &HarvestConfig) -> Result<(), ConfigError> {
    validate_http_url("root_catalog_url", &config.root_catalog_url)?;

    if config.catalog_timeout_ms == 0 {
        return Err(ConfigError::Validation(
            "catalog_timeout_ms must be >= 1ms".to_string(),
        ));
    }

    // max_depth and max_concurrent_requests accept every value; 0 has meaning for both

    Ok(())
}

/// Validates retry configuration
fn validate_retry_config(config: &RetryConfig) -> Result<(), ConfigError> {
    if config.max_attempts < 1 {
        return Err(ConfigError::Validation(format!(
            "max_attempts must be >= 1, got {}",
            config.max_attempts
        )));
    }

    let both_zero = config.min_backoff_ms == 0 && config.max_backoff_ms == 0;
    if !both_zero && config.min_backoff_ms >= config.max_backoff_ms {
        return Err(ConfigError::Validation(format!(
            "min_backoff_ms ({}) must be lower than max_backoff_ms ({})",
            config.min_backoff_ms, config.max_backoff_ms
        )));
    }

    if let Some(status) = config
        .retryable_statuses
        .iter()
        .find(|s| !(100..=599).contains(*s))
    {
        return Err(ConfigError::Validation(format!(
            "retryable status {} is not an HTTP status code",
            status
        )));
    }

    Ok(())
}

/// Validates user agent configuration
fn validate_user_agent_config(config: &UserAgentConfig) -> Result<(), ConfigError> {
    if config.name.is_empty() {
        return Err(ConfigError::Validation(
            "user agent name cannot be empty".to_string(),
        ));
    }

    if config.name.chars().any(char::is_whitespace) {
        return Err(ConfigError::Validation(format!(
            "user agent name must not contain whitespace, got '{}'",
            config.name
        )));
    }

    if let Some(contact) = &config.contact_url {
        validate_http_url("contact_url", contact)?;
    }

    Ok(())
}

/// Checks that a value parses as an absolute http(s) URL
fn validate_http_url(field: &str, value: &str) -> Result<(), ConfigError> {
    let url = Url::parse(value)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid {} '{}': {}", field, value, e)))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ConfigError::InvalidUrl(format!(
            "{} '{}' must use http or https",
            field, value
        )));
    }

    Ok(())
}
