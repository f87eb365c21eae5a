//! Parsed page model
//!
//! This module wraps the HTML parser so the rest of the crate sees:
//! - `PageDocument`: one fetched page, parsed once and read many times
//! - `PostNode`: a borrowed handle on one post container inside a page
//! - `NodeQuery`: the query capability extractors use on elements
//! - Text normalization and charset decoding helpers

mod charset;
mod node;
mod text;

pub use charset::decode_body;
pub use node::NodeQuery;
pub use text::{collapse_preserving_newlines, collapse_whitespace};

use scraper::{ElementRef, Html, Selector};
use url::Url;

/// An immutable parsed page
///
/// Created once per fetch and dropped after the page's posts and next link
/// have been read. Every `PostNode` borrows from it.
pub struct PageDocument {
    html: Html,
    url: Url,
}

impl PageDocument {
    /// Parses page markup fetched from `url`
    ///
    /// # Example
    ///
    /// ```
    /// use thread_scrape::document::PageDocument;
    /// use url::Url;
    ///
    /// let url = Url::parse("https://www.flashback.org/t1").unwrap();
    /// let doc = PageDocument::parse("<html><body><p>Hej</p></body></html>", url);
    /// assert_eq!(doc.visible_text(), "Hej");
    /// ```
    pub fn parse(markup: &str, url: Url) -> Self {
        Self {
            html: Html::parse_document(markup),
            url,
        }
    }

    /// The URL this page was fetched from
    pub fn url(&self) -> &Url {
        &self.url
    }

    /// The `<html>` element
    pub fn root(&self) -> ElementRef<'_> {
        self.html.root_element()
    }

    /// All elements of the page matching a selector, in document order
    pub fn select<'a, 'b>(&'a self, selector: &'b Selector) -> scraper::html::Select<'a, 'b> {
        self.html.select(selector)
    }

    /// Text a reader would see: script/style contents excluded, whitespace collapsed
    pub fn visible_text(&self) -> String {
        self.root().visible_text()
    }
}

/// A borrowed handle on one post container
///
/// Only valid while the owning [`PageDocument`] is alive.
#[derive(Debug, Clone, Copy)]
pub struct PostNode<'a> {
    element: ElementRef<'a>,
}

impl<'a> PostNode<'a> {
    pub fn new(element: ElementRef<'a>) -> Self {
        Self { element }
    }

    /// The container element itself
    pub fn element(&self) -> ElementRef<'a> {
        self.element
    }
}

impl PartialEq for PostNode<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.element.id() == other.element.id()
    }
}

impl Eq for PostNode<'_> {}
