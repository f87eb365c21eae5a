//! Query capability over parsed elements
//!
//! Extraction code only ever talks to [`NodeQuery`], never to the parser's
//! node internals, so the heuristics read the same regardless of which
//! markup convention a forum theme uses.

use crate::document::text::{collapse_preserving_newlines, collapse_whitespace};
use scraper::{ElementRef, Selector};

/// Elements whose text is never part of what a reader sees
const HIDDEN_TAGS: &[&str] = &["script", "style", "template", "noscript"];

/// Elements that start a new line when rendered
const BLOCK_TAGS: &[&str] = &[
    "address", "article", "aside", "blockquote", "dd", "div", "dl", "dt", "fieldset",
    "figcaption", "figure", "footer", "form", "h1", "h2", "h3", "h4", "h5", "h6", "header",
    "hr", "li", "main", "nav", "ol", "p", "pre", "section", "table", "tbody", "td", "tfoot",
    "th", "thead", "tr", "ul",
];

/// Read-only queries the extractors need from an element
pub trait NodeQuery<'a> {
    /// Lowercase tag name
    fn tag_name(&self) -> &'a str;

    /// Value of an attribute, if present
    fn attr_value(&self, name: &str) -> Option<&'a str>;

    /// True when the element carries `class` as one of its class tokens
    fn has_class_token(&self, class: &str) -> bool;

    /// True when any class token satisfies `pred`
    fn any_class<P>(&self, pred: P) -> bool
    where
        P: Fn(&str) -> bool;

    /// All descendant text runs, each trimmed, empty runs dropped, joined by `sep`
    fn flat_text(&self, sep: &str) -> String;

    /// Concatenated visible text (script/style skipped), whitespace collapsed
    ///
    /// Runs are joined without a separator, so a phrase split across inline
    /// tags still reads as one phrase.
    fn visible_text(&self) -> String;

    /// Rendered-looking text: `<br>` and block boundaries become newlines,
    /// whitespace inside each line is collapsed
    fn lined_text(&self) -> String;

    /// First descendant matching a CSS selector
    fn first_match(&self, selector: &Selector) -> Option<ElementRef<'a>>;

    /// First descendant (document order, self excluded) satisfying `pred`
    fn find_descendant<P>(&self, pred: P) -> Option<ElementRef<'a>>
    where
        P: Fn(&ElementRef<'a>) -> bool;

    /// Nearest ancestor (self excluded) satisfying `pred`
    fn find_ancestor<P>(&self, pred: P) -> Option<ElementRef<'a>>
    where
        P: Fn(&ElementRef<'a>) -> bool;
}

impl<'a> NodeQuery<'a> for ElementRef<'a> {
    fn tag_name(&self) -> &'a str {
        self.value().name()
    }

    fn attr_value(&self, name: &str) -> Option<&'a str> {
        self.value().attr(name)
    }

    fn has_class_token(&self, class: &str) -> bool {
        self.any_class(|c| c == class)
    }

    fn any_class<P>(&self, pred: P) -> bool
    where
        P: Fn(&str) -> bool,
    {
        self.value().classes().any(pred)
    }

    fn flat_text(&self, sep: &str) -> String {
        self.text()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join(sep)
    }

    fn visible_text(&self) -> String {
        let mut raw = String::new();
        push_visible(*self, &mut raw);
        collapse_whitespace(&raw)
    }

    fn lined_text(&self) -> String {
        let mut raw = String::new();
        push_lines(*self, &mut raw);
        collapse_preserving_newlines(&raw)
    }

    fn first_match(&self, selector: &Selector) -> Option<ElementRef<'a>> {
        self.select(selector).next()
    }

    fn find_descendant<P>(&self, pred: P) -> Option<ElementRef<'a>>
    where
        P: Fn(&ElementRef<'a>) -> bool,
    {
        self.descendants()
            .skip(1)
            .filter_map(ElementRef::wrap)
            .find(|el| pred(el))
    }

    fn find_ancestor<P>(&self, pred: P) -> Option<ElementRef<'a>>
    where
        P: Fn(&ElementRef<'a>) -> bool,
    {
        self.ancestors()
            .filter_map(ElementRef::wrap)
            .find(|el| pred(el))
    }
}

fn push_visible(element: ElementRef<'_>, out: &mut String) {
    for child in element.children() {
        if let Some(child_el) = ElementRef::wrap(child) {
            if !HIDDEN_TAGS.contains(&child_el.value().name()) {
                push_visible(child_el, out);
            }
        } else if let Some(text) = child.value().as_text() {
            out.push_str(text);
        }
    }
}

fn push_lines(element: ElementRef<'_>, out: &mut String) {
    for child in element.children() {
        if let Some(child_el) = ElementRef::wrap(child) {
            let name = child_el.value().name();
            if HIDDEN_TAGS.contains(&name) {
                continue;
            }
            if name == "br" {
                out.push('\n');
                continue;
            }
            let block = BLOCK_TAGS.contains(&name);
            if block {
                out.push('\n');
            }
            push_lines(child_el, out);
            if block {
                out.push('\n');
            }
        } else if let Some(text) = child.value().as_text() {
            out.push_str(text);
        }
    }
}
