use crate::url::domain::{extract_domain, site_origin};
use crate::{UrlError, UrlResult};
use url::Url;

/// Validates and normalizes the thread URL a crawl starts from
///
/// # Normalization Steps
///
/// 1. Trim surrounding whitespace (URLs are often pasted)
/// 2. Parse the URL; reject if malformed
/// 3. Require an http or https scheme
/// 4. Require a host
/// 5. Drop the fragment, which never selects a different page
///
/// # Examples
///
/// ```
/// use thread_scrape::url::normalize_start_url;
///
/// let url = normalize_start_url("  https://www.flashback.org/t123456#post9 ").unwrap();
/// assert_eq!(url.as_str(), "https://www.flashback.org/t123456");
/// ```
pub fn normalize_start_url(url_str: &str) -> UrlResult<Url> {
    let mut url = Url::parse(url_str.trim()).map_err(|e| UrlError::Parse(e.to_string()))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(UrlError::InvalidScheme(format!(
            "Only HTTP and HTTPS schemes are supported, got: {}",
            url.scheme()
        )));
    }

    if extract_domain(&url).is_none() {
        return Err(UrlError::MissingDomain);
    }

    url.set_fragment(None);
    Ok(url)
}

/// Turns an href/src found on a forum page into an absolute URL string
///
/// | Input | Result |
/// |-------|--------|
/// | empty | empty |
/// | `//host/path` | `https://host/path` |
/// | `/path` | forum origin + `/path` |
/// | has a scheme | unchanged |
/// | other relative | resolved against the forum base |
///
/// Unresolvable references are returned as found rather than dropped.
pub fn absolutize(raw: &str, base: &Url) -> String {
    let raw = raw.trim();

    if raw.is_empty() {
        return String::new();
    }

    if raw.starts_with("//") {
        return format!("https:{}", raw);
    }

    if raw.starts_with('/') {
        return format!("{}{}", site_origin(base), raw);
    }

    if Url::parse(raw).is_ok() {
        return raw.to_string();
    }

    base.join(raw)
        .map(|u| u.to_string())
        .unwrap_or_else(|_| raw.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> Url {
        Url::parse("https://www.flashback.org").unwrap()
    }

    #[test]
    fn test_start_url_trimmed() {
        let result = normalize_start_url("  https://www.flashback.org/t1  ").unwrap();
        assert_eq!(result.as_str(), "https://www.flashback.org/t1");
    }

    #[test]
    fn test_start_url_fragment_removed() {
        let result = normalize_start_url("https://www.flashback.org/t1p2#p55").unwrap();
        assert_eq!(result.as_str(), "https://www.flashback.org/t1p2");
    }

    #[test]
    fn test_start_url_keeps_query() {
        let result = normalize_start_url("https://forum.example.com/showthread.php?t=5").unwrap();
        assert_eq!(result.query(), Some("t=5"));
    }

    #[test]
    fn test_start_url_invalid_scheme() {
        let result = normalize_start_url("ftp://www.flashback.org/t1");
        assert!(matches!(result, Err(UrlError::InvalidScheme(_))));
    }

    #[test]
    fn test_start_url_malformed() {
        assert!(matches!(normalize_start_url("t123456"), Err(UrlError::Parse(_))));
        assert!(normalize_start_url("").is_err());
    }

    #[test]
    fn test_absolutize_protocol_relative() {
        assert_eq!(
            absolutize("//cdn.example/img.png", &base()),
            "https://cdn.example/img.png"
        );
    }

    #[test]
    fn test_absolutize_root_relative() {
        assert_eq!(
            absolutize("/img.png", &base()),
            "https://www.flashback.org/img.png"
        );
    }

    #[test]
    fn test_absolutize_absolute_untouched() {
        assert_eq!(
            absolutize("http://other.example/a.gif", &base()),
            "http://other.example/a.gif"
        );
    }

    #[test]
    fn test_absolutize_plain_relative() {
        assert_eq!(
            absolutize("t123456p2", &base()),
            "https://www.flashback.org/t123456p2"
        );
    }

    #[test]
    fn test_absolutize_empty_and_blank() {
        assert_eq!(absolutize("", &base()), "");
        assert_eq!(absolutize("   ", &base()), "");
    }

    #[test]
    fn test_absolutize_trims() {
        assert_eq!(
            absolutize("  /t1p3 ", &base()),
            "https://www.flashback.org/t1p3"
        );
    }
}
