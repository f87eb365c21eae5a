//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests for the crawler, including:
//! - The `Fetcher` seam the crawl loop fetches pages through
//! - Building the default reqwest client
//! - Applying the configured static headers per request
//! - Error classification

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, CONTENT_TYPE};
use reqwest::{redirect::Policy, Client};
use std::collections::BTreeMap;
use std::time::Duration;
use thiserror::Error;
use url::Url;

/// Maximum redirect hops followed for one page
const MAX_REDIRECTS: usize = 10;

/// A failed page fetch
///
/// Every variant is fatal to the crawl; there are no retries.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("Request timeout for {url}")]
    Timeout { url: String },

    #[error("Connection failed for {url}: {message}")]
    Connect { url: String, message: String },

    #[error("HTTP {status} for {url}")]
    Status { url: String, status: u16 },

    #[error("Request failed for {url}: {message}")]
    Request { url: String, message: String },
}

impl TransportError {
    /// The URL whose fetch failed
    pub fn url(&self) -> &str {
        match self {
            Self::Timeout { url }
            | Self::Connect { url, .. }
            | Self::Status { url, .. }
            | Self::Request { url, .. } => url,
        }
    }

    fn classify(url: &Url, error: reqwest::Error) -> Self {
        let url = url.to_string();
        if error.is_timeout() {
            Self::Timeout { url }
        } else if error.is_connect() {
            Self::Connect {
                url,
                message: error.to_string(),
            }
        } else {
            Self::Request {
                url,
                message: error.to_string(),
            }
        }
    }
}

/// A fetched page body, before any status check
#[derive(Debug, Clone)]
pub struct FetchResponse {
    /// HTTP status code
    pub status: u16,
    /// Content-Type header value, if sent
    pub content_type: Option<String>,
    /// Raw body bytes
    pub body: Vec<u8>,
}

impl FetchResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Retrieves one page
#[async_trait]
pub trait Fetcher: Send + Sync {
    /// Fetches `url` with the given static headers, giving up after `timeout`
    ///
    /// Non-success statuses are returned as responses; only failures to get
    /// a response at all are errors.
    async fn fetch(
        &self,
        url: &Url,
        headers: &BTreeMap<String, String>,
        timeout: Duration,
    ) -> Result<FetchResponse, TransportError>;
}

/// Builds the HTTP client used by [`HttpFetcher`]
///
/// # Example
///
/// ```
/// use thread_scrape::crawler::build_http_client;
///
/// let client = build_http_client().unwrap();
/// ```
pub fn build_http_client() -> Result<Client, reqwest::Error> {
    Client::builder()
        .connect_timeout(Duration::from_secs(10))
        .redirect(Policy::limited(MAX_REDIRECTS))
        .gzip(true)
        .brotli(true)
        .build()
}

/// [`Fetcher`] backed by reqwest
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new() -> Result<Self, reqwest::Error> {
        Ok(Self {
            client: build_http_client()?,
        })
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(
        &self,
        url: &Url,
        headers: &BTreeMap<String, String>,
        timeout: Duration,
    ) -> Result<FetchResponse, TransportError> {
        let header_map = build_header_map(headers).map_err(|message| TransportError::Request {
            url: url.to_string(),
            message,
        })?;

        let response = self
            .client
            .get(url.clone())
            .headers(header_map)
            .timeout(timeout)
            .send()
            .await
            .map_err(|e| TransportError::classify(url, e))?;

        let status = response.status().as_u16();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);

        let body = response
            .bytes()
            .await
            .map_err(|e| TransportError::classify(url, e))?;

        tracing::debug!("GET {} -> {} ({} bytes)", url, status, body.len());

        Ok(FetchResponse {
            status,
            content_type,
            body: body.to_vec(),
        })
    }
}

fn build_header_map(headers: &BTreeMap<String, String>) -> Result<HeaderMap, String> {
    let mut map = HeaderMap::with_capacity(headers.len());
    for (name, value) in headers {
        let name = HeaderName::from_bytes(name.as_bytes())
            .map_err(|e| format!("invalid header name '{}': {}", name, e))?;
        let value = HeaderValue::from_str(value)
            .map_err(|e| format!("invalid value for header '{}': {}", name, e))?;
        map.insert(name, value);
    }
    Ok(map)
}
