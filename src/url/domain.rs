use url::Url;

/// Extracts the lowercase host of a URL
///
/// Returns `None` for URLs without a host (`data:`, `mailto:` and the like).
///
/// # Examples
///
/// ```
/// use url::Url;
/// use thread_scrape::url::extract_domain;
///
/// let url = Url::parse("https://WWW.Flashback.org/t123").unwrap();
/// assert_eq!(extract_domain(&url), Some("www.flashback.org".to_string()));
/// ```
pub fn extract_domain(url: &Url) -> Option<String> {
    url.host_str().map(|h| h.to_lowercase())
}

/// Returns the scheme-and-host origin of the forum, without a trailing slash
///
/// `https://www.flashback.org/some/path` becomes `https://www.flashback.org`.
/// Root-relative links and synthesized permalinks are anchored here.
pub fn site_origin(base: &Url) -> String {
    base.origin().ascii_serialization()
}
