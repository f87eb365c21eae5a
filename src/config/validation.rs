use crate::config::types::{Config, CrawlerConfig, OutputConfig, RequestConfig, SiteConfig};
use crate::ConfigError;
use reqwest::header::{HeaderName, HeaderValue};
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_site_config(&config.site)?;
    validate_crawler_config(&config.crawler)?;
    validate_request_config(&config.request)?;
    validate_output_config(&config.output)?;
    Ok(())
}

/// Validates the forum identity
fn validate_site_config(config: &SiteConfig) -> Result<(), ConfigError> {
    let url = Url::parse(&config.base_url)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid base_url: {}", e)))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ConfigError::InvalidUrl(format!(
            "base_url must use http or https, got '{}'",
            config.base_url
        )));
    }

    if url.host_str().is_none() {
        return Err(ConfigError::InvalidUrl(format!(
            "base_url has no host: '{}'",
            config.base_url
        )));
    }

    if config.next_label.trim().is_empty() {
        return Err(ConfigError::Validation(
            "next_label cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// Validates crawl loop configuration
fn validate_crawler_config(config: &CrawlerConfig) -> Result<(), ConfigError> {
    if config.politeness_delay_ms < 100 {
        return Err(ConfigError::Validation(format!(
            "politeness_delay_ms must be >= 100ms, got {}ms",
            config.politeness_delay_ms
        )));
    }

    if config.request_timeout_secs < 1 {
        return Err(ConfigError::Validation(format!(
            "request_timeout_secs must be >= 1, got {}",
            config.request_timeout_secs
        )));
    }

    if config.block_markers.iter().any(|m| m.trim().is_empty()) {
        return Err(ConfigError::Validation(
            "block_markers cannot contain empty entries".to_string(),
        ));
    }

    Ok(())
}

/// Validates that every static header is sendable
fn validate_request_config(config: &RequestConfig) -> Result<(), ConfigError> {
    for (name, value) in &config.headers {
        HeaderName::from_bytes(name.as_bytes())
            .map_err(|_| ConfigError::InvalidHeader(format!("bad header name '{}'", name)))?;
        HeaderValue::from_str(value)
            .map_err(|_| ConfigError::InvalidHeader(format!("bad value for header '{}'", name)))?;
    }
    Ok(())
}

/// Validates output configuration
fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    if let Some(path) = &config.path {
        if path.trim().is_empty() {
            return Err(ConfigError::Validation(
                "output path cannot be empty when set".to_string(),
            ));
        }
    }

    let mut chars = config.delimiter.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) if c.is_ascii() && c != '"' && c != '\n' && c != '\r' => Ok(()),
        _ => Err(ConfigError::Validation(format!(
            "delimiter must be a single ASCII character, got '{}'",
            config.delimiter
        ))),
    }
}
