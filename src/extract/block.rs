use crate::document::PageDocument;

/// Recognizes anti-bot interstitials and access-denied pages
#[derive(Debug, Clone)]
pub struct BlockDetector {
    markers: Vec<String>,
}

impl BlockDetector {
    /// Creates a detector for the given denial markers (case-sensitive)
    pub fn new<I, S>(markers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            markers: markers.into_iter().map(Into::into).collect(),
        }
    }

    /// True when the page's visible text contains any marker
    pub fn is_blocked(&self, doc: &PageDocument) -> bool {
        self.matched_marker(doc).is_some()
    }

    /// The first marker found in the page's visible text
    pub fn matched_marker(&self, doc: &PageDocument) -> Option<&str> {
        let text = doc.visible_text();
        self.markers
            .iter()
            .find(|marker| text.contains(marker.as_str()))
            .map(String::as_str)
    }
}
