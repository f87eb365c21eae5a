//! "Next page" discovery

use crate::document::{NodeQuery, PageDocument};
use crate::url::absolutize;
use crate::{ConfigError, ConfigResult};
use regex::Regex;
use scraper::{ElementRef, Selector};
use std::sync::LazyLock;
use url::Url;

static LINK_REL_NEXT: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse(r#"link[rel~="next"][href]"#).expect("link selector should parse")
});

static ANCHOR_REL_NEXT: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse(r#"a[rel~="next"][href]"#).expect("anchor selector should parse")
});

static ANCHORS: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("a[href]").expect("anchor selector should parse"));

/// Resolves the URL of the page following the current one
#[derive(Debug, Clone)]
pub struct PaginationResolver {
    base: Url,
    label: String,
    label_pattern: Regex,
}

impl PaginationResolver {
    /// Creates a resolver for a forum at `base` whose "next" links read `next_label`
    pub fn new(base: Url, next_label: &str) -> ConfigResult<Self> {
        let label_pattern = Regex::new(&format!("(?i){}", regex::escape(next_label)))
            .map_err(|e| ConfigError::Validation(format!("Invalid next label: {}", e)))?;

        Ok(Self {
            base,
            label: next_label.to_string(),
            label_pattern,
        })
    }

    /// Returns the absolute URL of the next page, or `None` on the last page
    ///
    /// Tried in order, first hit wins:
    /// 1. `<link rel="next">`
    /// 2. `<a rel="next">`
    /// 3. An anchor whose text contains the next label (any case)
    /// 4. An anchor whose `aria-label` or `title` contains the next label
    pub fn next_url(&self, doc: &PageDocument) -> Option<Url> {
        let candidate = doc
            .select(&LINK_REL_NEXT)
            .next()
            .or_else(|| doc.select(&ANCHOR_REL_NEXT).next())
            .or_else(|| {
                doc.select(&ANCHORS)
                    .find(|a| self.label_pattern.is_match(&a.visible_text()))
            })
            .or_else(|| doc.select(&ANCHORS).find(|a| self.labelled_next(a)))?;

        let href = candidate.attr_value("href")?;
        let resolved = absolutize(href, &self.base);

        match Url::parse(&resolved) {
            Ok(url) => {
                tracing::debug!("Next page: {}", url);
                Some(url)
            }
            Err(e) => {
                tracing::warn!("Ignoring unusable next link '{}': {}", href, e);
                None
            }
        }
    }

    fn labelled_next(&self, anchor: &ElementRef<'_>) -> bool {
        ["aria-label", "title"].iter().any(|name| {
            anchor
                .attr_value(name)
                .map_or(false, |value| value.contains(&self.label))
        })
    }
}
