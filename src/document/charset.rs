//! Decoding of raw page bytes into text
//!
//! Older forum themes are still served as ISO-8859-1/windows-1252, so the
//! body cannot be assumed to be UTF-8.

use encoding_rs::{Encoding, UTF_8};
use regex::Regex;
use std::sync::LazyLock;

/// How far into the body a `<meta charset>` declaration is looked for
const META_SNIFF_LIMIT: usize = 1024;

static HEADER_CHARSET: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)charset\s*=\s*["']?([^\s;"']+)"#)
        .expect("header charset pattern should compile")
});

static META_CHARSET: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)<meta[^>]+charset\s*=\s*["']?\s*([A-Za-z0-9_:.\-]+)"#)
        .expect("meta charset pattern should compile")
});

/// Decodes a page body into a `String`
///
/// The encoding is chosen in this order:
/// 1. A byte-order mark
/// 2. The `charset` parameter of the Content-Type header
/// 3. A `<meta charset=..>` or `http-equiv` declaration near the top of the page
/// 4. UTF-8
///
/// Malformed sequences are replaced rather than rejected.
pub fn decode_body(body: &[u8], content_type: Option<&str>) -> String {
    let encoding = Encoding::for_bom(body)
        .map(|(encoding, _)| encoding)
        .or_else(|| content_type.and_then(charset_from_header))
        .or_else(|| charset_from_meta(body))
        .unwrap_or(UTF_8);

    let (text, actual, had_errors) = encoding.decode(body);
    if had_errors {
        tracing::debug!("Body contained invalid {} sequences", actual.name());
    }
    text.into_owned()
}

fn charset_from_header(content_type: &str) -> Option<&'static Encoding> {
    let caps = HEADER_CHARSET.captures(content_type)?;
    Encoding::for_label(caps.get(1)?.as_str().as_bytes())
}

fn charset_from_meta(body: &[u8]) -> Option<&'static Encoding> {
    let head = &body[..body.len().min(META_SNIFF_LIMIT)];
    let head = String::from_utf8_lossy(head);
    let caps = META_CHARSET.captures(&head)?;
    Encoding::for_label(caps.get(1)?.as_str().as_bytes())
}
