use crate::config::types::Config;
use crate::config::validation::validate;
use crate::ConfigError;
use sha2::{Digest, Sha256};
use std::path::Path;

/// Loads and parses a configuration file from the given path
///
/// # Arguments
///
/// * `path` - Path to the TOML configuration file
///
/// # Returns
///
/// * `Ok(Config)` - Successfully loaded and validated configuration
/// * `Err(ConfigError)` - Failed to load, parse, or validate the configuration
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    let config: Config = toml::from_str(&content)?;
    validate(&config)?;
    Ok(config)
}

/// Computes a SHA-256 hash of the configuration file content
///
/// Logged at startup so two runs can be told apart by their settings.
pub fn compute_config_hash(path: &Path) -> Result<String, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    Ok(hex::encode(hasher.finalize()))
}

/// Loads a configuration and returns both the config and its hash
pub fn load_config_with_hash(path: &Path) -> Result<(Config, String), ConfigError> {
    let config = load_config(path)?;
    let hash = compute_config_hash(path)?;
    Ok((config, hash))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn create_temp_config(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn test_load_valid_config() {
        let config_content = r#"
[site]
base-url = "https://forum.example.se"
next-label = "Next"

[crawler]
politeness-delay-ms = 2000
request-timeout-secs = 5
max-pages = 3
block-markers = ["Just a moment"]

[request.headers]
User-Agent = "TestAgent/1.0"

[output]
path = "out.csv"
delimiter = ","
"#;

        let file = create_temp_config(config_content);
        let config = load_config(file.path()).unwrap();

        assert_eq!(config.site.base_url, "https://forum.example.se");
        assert_eq!(config.site.next_label, "Next");
        assert_eq!(config.crawler.politeness_delay_ms, 2000);
        assert_eq!(config.crawler.max_pages, 3);
        assert_eq!(config.crawler.block_markers, vec!["Just a moment"]);
        assert_eq!(config.request.headers.len(), 1);
        assert_eq!(config.output.path.as_deref(), Some("out.csv"));
        assert_eq!(config.output.delimiter, ",");
    }

    #[test]
    fn test_empty_config_uses_defaults() {
        let file = create_temp_config("");
        let config = load_config(file.path()).unwrap();

        assert_eq!(config.site.base_url, "https://www.flashback.org");
        assert_eq!(config.site.next_label, "Nästa");
        assert_eq!(config.crawler.politeness_delay_ms, 1500);
        assert_eq!(config.crawler.request_timeout_secs, 10);
        assert_eq!(config.output.delimiter, ";");
        assert!(config.output.path.is_none());
        assert!(config.request.headers.contains_key("User-Agent"));
    }

    #[test]
    fn test_partial_section_keeps_other_defaults() {
        let file = create_temp_config("[crawler]\nmax-pages = 7\n");
        let config = load_config(file.path()).unwrap();

        assert_eq!(config.crawler.max_pages, 7);
        assert_eq!(config.crawler.politeness_delay_ms, 1500);
        assert_eq!(config.crawler.block_markers.len(), 2);
    }

    #[test]
    fn test_load_config_with_invalid_path() {
        let result = load_config(Path::new("/nonexistent/scrape.toml"));
        assert!(matches!(result, Err(ConfigError::Io(_))));
    }

    #[test]
    fn test_load_config_with_invalid_toml() {
        let file = create_temp_config("this is not valid TOML {{{");
        let result = load_config(file.path());
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_load_config_with_validation_error() {
        let file = create_temp_config("[crawler]\npoliteness-delay-ms = 10\n");
        let result = load_config(file.path());
        assert!(matches!(result, Err(ConfigError::Validation(_))));
    }

    #[test]
    fn test_compute_config_hash() {
        let file = create_temp_config("test content");

        let hash1 = compute_config_hash(file.path()).unwrap();
        let hash2 = compute_config_hash(file.path()).unwrap();

        assert_eq!(hash1, hash2);
        assert_eq!(hash1.len(), 64);
    }

    #[test]
    fn test_different_content_different_hash() {
        let file1 = create_temp_config("content 1");
        let file2 = create_temp_config("content 2");

        let hash1 = compute_config_hash(file1.path()).unwrap();
        let hash2 = compute_config_hash(file2.path()).unwrap();

        assert_ne!(hash1, hash2);
    }

    #[test]
    fn test_load_config_with_hash() {
        let file = create_temp_config("[output]\ndelimiter = \"\\t\"\n");
        let (config, hash) = load_config_with_hash(file.path()).unwrap();
        assert_eq!(config.output.delimiter, "\t");
        assert_eq!(hash.len(), 64);
    }
}
