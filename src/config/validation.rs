use crate::config::types::{Config, CrawlerConfig, FetcherConfig, StorageConfig};
use crate::ConfigError;
use scraper::Selector;
use url::Url;

/// Upper bound accepted for `max-depth`
pub const MAX_DEPTH_LIMIT: u32 = 16;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_crawler_config(&config.crawler)?;
    validate_fetcher_config(&config.fetcher)?;
    validate_storage_config(&config.storage)?;
    Ok(())
}

/// Validates traversal configuration
fn validate_crawler_config(config: &CrawlerConfig) -> Result<(), ConfigError> {
    let url = Url::parse(&config.starting_url)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid starting-url: {}", e)))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ConfigError::Validation(format!(
            "starting-url must use http or https, got '{}'",
            url.scheme()
        )));
    }

    if url.host_str().is_none() {
        return Err(ConfigError::Validation(format!(
            "starting-url '{}' has no host",
            config.starting_url
        )));
    }

    if config.max_depth > MAX_DEPTH_LIMIT {
        return Err(ConfigError::Validation(format!(
            "max-depth must be <= {}, got {}",
            MAX_DEPTH_LIMIT, config.max_depth
        )));
    }

    Selector::parse(&config.content_selector).map_err(|e| {
        ConfigError::InvalidSelector(format!("'{}': {:?}", config.content_selector, e))
    })?;

    Ok(())
}

/// Validates HTTP client configuration
fn validate_fetcher_config(config: &FetcherConfig) -> Result<(), ConfigError> {
    if config.crawler_name.is_empty() {
        return Err(ConfigError::Validation(
            "crawler-name cannot be empty".to_string(),
        ));
    }

    if !config
        .crawler_name
        .chars()
        .all(|c| c.is_alphanumeric() || c == '-')
    {
        return Err(ConfigError::Validation(format!(
            "crawler-name must contain only alphanumeric characters and hyphens, got '{}'",
            config.crawler_name
        )));
    }

    if let Some(contact) = &config.contact_url {
        Url::parse(contact)
            .map_err(|e| ConfigError::InvalidUrl(format!("Invalid contact-url: {}", e)))?;
    }

    if config.timeout_secs == 0 || config.connect_timeout_secs == 0 {
        return Err(ConfigError::Validation(
            "timeouts must be greater than zero".to_string(),
        ));
    }

    Ok(())
}

/// Validates object storage configuration
fn validate_storage_config(config: &StorageConfig) -> Result<(), ConfigError> {
    if config.bucket.trim().is_empty() {
        return Err(ConfigError::Validation("bucket cannot be empty".to_string()));
    }

    if config.database_path.is_empty() {
        return Err(ConfigError::Validation(
            "database-path cannot be empty".to_string(),
        ));
    }

    Ok(())
}
