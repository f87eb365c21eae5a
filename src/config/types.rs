use crate::{ConfigError, ConfigResult};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::time::Duration;
use url::Url;

/// Main configuration structure for Thread-Scrape
///
/// Every section is optional; an empty file yields the defaults tuned for
/// Flashback-style forums.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub site: SiteConfig,
    pub crawler: CrawlerConfig,
    pub request: RequestConfig,
    pub output: OutputConfig,
}

/// Forum identity used to resolve links and synthesize permalinks
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    /// Forum origin, e.g. `https://www.flashback.org`
    #[serde(rename = "base-url")]
    pub base_url: String,

    /// Localized label of the "next page" link
    #[serde(rename = "next-label")]
    pub next_label: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            base_url: "https://www.flashback.org".to_string(),
            next_label: "Nästa".to_string(),
        }
    }
}

impl SiteConfig {
    /// The parsed forum origin
    pub fn base(&self) -> ConfigResult<Url> {
        Url::parse(&self.base_url)
            .map_err(|e| ConfigError::InvalidUrl(format!("Invalid base_url: {}", e)))
    }
}

/// Crawl loop behavior
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CrawlerConfig {
    /// Pause between consecutive page fetches (milliseconds)
    #[serde(rename = "politeness-delay-ms")]
    pub politeness_delay_ms: u64,

    /// Per-request timeout (seconds)
    #[serde(rename = "request-timeout-secs")]
    pub request_timeout_secs: u64,

    /// Stop after this many pages; 0 means no limit
    #[serde(rename = "max-pages")]
    pub max_pages: u32,

    /// Phrases whose presence marks a page as an anti-bot or denial page
    #[serde(rename = "block-markers")]
    pub block_markers: Vec<String>,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            politeness_delay_ms: 1500,
            request_timeout_secs: 10,
            max_pages: 0,
            block_markers: vec!["Cloudflare".to_string(), "Access denied".to_string()],
        }
    }
}

impl CrawlerConfig {
    pub fn politeness_delay(&self) -> Duration {
        Duration::from_millis(self.politeness_delay_ms)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

/// Static request headers sent with every fetch
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RequestConfig {
    pub headers: BTreeMap<String, String>,
}

impl Default for RequestConfig {
    fn default() -> Self {
        let headers = [
            (
                "User-Agent",
                "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36",
            ),
            (
                "Accept",
                "text/html,application/xhtml+xml,application/xml;q=0.9,image/avif,image/webp,*/*;q=0.8",
            ),
            ("Accept-Language", "sv-SE,sv;q=0.9,en-US;q=0.8,en;q=0.7"),
            ("Referer", "https://www.flashback.org/"),
            ("Connection", "keep-alive"),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();

        Self { headers }
    }
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Explicit output file; derived from the thread URL when absent
    pub path: Option<String>,

    /// Column delimiter (a single ASCII character)
    pub delimiter: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            path: None,
            delimiter: ";".to_string(),
        }
    }
}

impl OutputConfig {
    /// The delimiter as the single byte the CSV writer expects
    pub fn delimiter_byte(&self) -> ConfigResult<u8> {
        let mut chars = self.delimiter.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) if c.is_ascii() => Ok(c as u8),
            _ => Err(ConfigError::Validation(format!(
                "delimiter must be a single ASCII character, got '{}'",
                self.delimiter
            ))),
        }
    }
}
