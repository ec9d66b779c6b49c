use crate::config::types::{Config, CrawlerConfig, FetchConfig, OutputConfig, UserAgentConfig};
use crate::{ConfigError, ConfigResult};
use std::time::Duration;
use url::Url;

/// Validates the entire configuration
///
/// The seed URL is only checked for presence here; its syntax is checked when
/// the domain scope is resolved, which reports a dedicated invalid-seed error.
pub fn validate(config: &Config) -> ConfigResult<()> {
    validate_crawler_config(&config.crawler)?;
    validate_fetch_config(&config.fetch)?;
    validate_user_agent_config(&config.user_agent)?;
    validate_output_config(&config.output)?;
    Ok(())
}

/// Validates crawl session configuration
fn validate_crawler_config(config: &CrawlerConfig) -> ConfigResult<()> {
    if config.seed_url.trim().is_empty() {
        return Err(ConfigError::Validation(
            "seed_url is required (config file or command line)".to_string(),
        ));
    }

    if config.max_pages < 1 {
        return Err(ConfigError::Validation(format!(
            "max_pages must be >= 1, got {}",
            config.max_pages
        )));
    }

    if Duration::try_from_secs_f64(config.request_delay_seconds).is_err() {
        return Err(ConfigError::Validation(format!(
            "request_delay_seconds must be a finite value >= 0 that fits a duration, got {}",
            config.request_delay_seconds
        )));
    }

    for domain in &config.allowed_domains {
        validate_hostname(domain)?;
    }

    Ok(())
}

/// Validates fetch limits
fn validate_fetch_config(config: &FetchConfig) -> ConfigResult<()> {
    if config.timeout_seconds == 0 {
        return Err(ConfigError::Validation(
            "timeout_seconds must be > 0".to_string(),
        ));
    }

    if config.max_content_length == 0 {
        return Err(ConfigError::Validation(
            "max_content_length must be > 0".to_string(),
        ));
    }

    Ok(())
}

/// Validates user agent configuration
fn validate_user_agent_config(config: &UserAgentConfig) -> ConfigResult<()> {
    if config.crawler_name.is_empty() {
        return Err(ConfigError::Validation(
            "crawler_name cannot be empty".to_string(),
        ));
    }

    if !config
        .crawler_name
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-')
    {
        return Err(ConfigError::Validation(format!(
            "crawler_name must contain only alphanumeric characters and hyphens, got '{}'",
            config.crawler_name
        )));
    }

    if config.crawler_version.trim().is_empty() {
        return Err(ConfigError::Validation(
            "crawler_version cannot be empty".to_string(),
        ));
    }

    Url::parse(&config.contact_url)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid contact_url: {}", e)))?;

    Ok(())
}

/// Validates output configuration
fn validate_output_config(config: &OutputConfig) -> ConfigResult<()> {
    if config.directory.trim().is_empty() {
        return Err(ConfigError::Validation(
            "output directory cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// Validates a bare hostname used as an allowed-domain entry
fn validate_hostname(domain: &str) -> ConfigResult<()> {
    let domain = domain.trim();

    if domain.is_empty() {
        return Err(ConfigError::InvalidPattern(
            "Allowed domain cannot be empty".to_string(),
        ));
    }

    if domain.contains("://") || domain.contains('/') {
        return Err(ConfigError::InvalidPattern(format!(
            "Allowed domain '{}' must be a hostname, not a URL",
            domain
        )));
    }

    if !domain
        .chars()
        .all(|c| c.is_alphanumeric() || c == '.' || c == '-')
    {
        return Err(ConfigError::InvalidPattern(format!(
            "Domain '{}' contains invalid characters",
            domain
        )));
    }

    if domain.starts_with('.')
        || domain.ends_with('.')
        || domain.starts_with('-')
        || domain.ends_with('-')
    {
        return Err(ConfigError::InvalidPattern(format!(
            "Domain '{}' cannot start or end with '.' or '-'",
            domain
        )));
    }

    if domain.contains("..") {
        return Err(ConfigError::InvalidPattern(format!(
            "Domain '{}' cannot contain consecutive dots",
            domain
        )));
    }

    Ok(())
}
