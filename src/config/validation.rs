use crate::config::types::{Config, CrawlerConfig, HttpConfig, OutputConfig, SiteConfig};
use crate::document::{is_metadata_key, METADATA_KEYS};
use crate::url::parse_site_url;
use crate::ConfigError;

/// Upper bound for concurrent fetches against a single documentation site
const MAX_IN_FLIGHT_LIMIT: usize = 256;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_site_config(&config.site)?;
    validate_http_config(&config.http)?;
    validate_crawler_config(&config.crawler)?;
    validate_output_config(&config.output)?;
    Ok(())
}

/// Validates the crawl root, filters and metadata filter
fn validate_site_config(config: &SiteConfig) -> Result<(), ConfigError> {
    parse_site_url(&config.url)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid site url: {}", e)))?;

    validate_sections("sections-filter", &config.sections_filter)?;
    validate_sections("sections-exclude", &config.sections_exclude)?;

    for key in &config.metadata_filter {
        if !is_metadata_key(key) {
            return Err(ConfigError::Validation(format!(
                "metadata-filter entry '{}' is not one of {:?}",
                key, METADATA_KEYS
            )));
        }
    }

    Ok(())
}

/// Rejects empty section strings, which would match every URL
fn validate_sections(name: &str, sections: &[String]) -> Result<(), ConfigError> {
    if sections.iter().any(|s| s.trim().is_empty()) {
        return Err(ConfigError::Validation(format!(
            "{} cannot contain empty entries",
            name
        )));
    }
    Ok(())
}

/// Validates HTTP transport configuration
fn validate_http_config(config: &HttpConfig) -> Result<(), ConfigError> {
    if config.user_agent.trim().is_empty() {
        return Err(ConfigError::Validation(
            "user-agent cannot be empty".to_string(),
        ));
    }

    if config.request_timeout_secs < 1 {
        return Err(ConfigError::Validation(format!(
            "request-timeout-secs must be >= 1, got {}",
            config.request_timeout_secs
        )));
    }

    if config.connect_timeout_secs < 1 {
        return Err(ConfigError::Validation(format!(
            "connect-timeout-secs must be >= 1, got {}",
            config.connect_timeout_secs
        )));
    }

    Ok(())
}

/// Validates crawler configuration
fn validate_crawler_config(config: &CrawlerConfig) -> Result<(), ConfigError> {
    if config.max_in_flight < 1 || config.max_in_flight > MAX_IN_FLIGHT_LIMIT {
        return Err(ConfigError::Validation(format!(
            "max-in-flight must be between 1 and {}, got {}",
            MAX_IN_FLIGHT_LIMIT, config.max_in_flight
        )));
    }

    if config.crawl_deadline_secs == Some(0) {
        return Err(ConfigError::Validation(
            "crawl-deadline-secs must be >= 1 when set".to_string(),
        ));
    }

    if config.text_separator.is_empty() {
        return Err(ConfigError::Validation(
            "text-separator cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// Validates output configuration
fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    if config.documents_path.is_empty() {
        return Err(ConfigError::Validation(
            "documents-path cannot be empty".to_string(),
        ));
    }

    Ok(())
}
