//! Output file naming

use chrono::{Local, NaiveDateTime};
use regex::Regex;
use std::path::PathBuf;
use std::sync::LazyLock;
use url::Url;

/// Stem used when nothing usable can be taken from the thread URL
const DEFAULT_STEM: &str = "flashback_trad";

static THREAD_TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"t\d+").expect("thread token pattern should compile"));

static UNSAFE_CHARS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^A-Za-z0-9_-]+").expect("filename pattern should compile"));

/// Builds `<stem>_<YYYYMMDD-HHMMSS>.csv` for a thread URL
///
/// The stem is the first `t<digits>` token in the URL, else the last
/// non-empty path segment, else `flashback_trad`. Runs of characters outside
/// `[A-Za-z0-9_-]` become a single `_`.
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use thread_scrape::output::derive_output_filename;
///
/// let now = NaiveDate::from_ymd_opt(2024, 3, 9).unwrap().and_hms_opt(14, 5, 0).unwrap();
/// assert_eq!(
///     derive_output_filename("https://www.flashback.org/t123456p2", now),
///     "t123456_20240309-140500.csv"
/// );
/// ```
pub fn derive_output_filename(url: &str, now: NaiveDateTime) -> String {
    let candidate = THREAD_TOKEN
        .find(url)
        .map(|m| m.as_str().to_string())
        .or_else(|| last_path_segment(url))
        .unwrap_or_default();

    let mut stem = UNSAFE_CHARS.replace_all(&candidate, "_").into_owned();
    if stem.is_empty() {
        stem = DEFAULT_STEM.to_string();
    }

    format!("{}_{}.csv", stem, now.format("%Y%m%d-%H%M%S"))
}

/// Picks the output path: an explicitly configured one, else a derived name
/// in the working directory
pub fn resolve_output_path(configured: Option<&str>, start_url: &Url) -> PathBuf {
    match configured {
        Some(path) => PathBuf::from(path),
        None => PathBuf::from(derive_output_filename(
            start_url.as_str(),
            Local::now().naive_local(),
        )),
    }
}

fn last_path_segment(url: &str) -> Option<String> {
    let without_query = url.split(['?', '#']).next().unwrap_or_default();
    let path = match without_query.split_once("://") {
        Some((_, rest)) => rest.split_once('/').map_or("", |(_, path)| path),
        None => without_query,
    };

    path.split('/')
        .filter(|segment| !segment.is_empty())
        .last()
        .map(str::to_string)
}
