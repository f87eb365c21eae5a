//! Post container discovery
//!
//! Forum themes disagree on how a post is wrapped, so containers are found
//! with an ordered list of selector strategies. The first strategy that
//! yields anything wins; results are never merged across strategies, even if
//! a later one would have found more.

use crate::document::{NodeQuery, PageDocument, PostNode};
use regex::Regex;
use scraper::{ElementRef, Selector};
use std::sync::LazyLock;

/// Container strategies, most specific first
const STRATEGIES: &[&str] = &[
    r#"div.post[id^="post"]"#,
    r#"div[id^="post"][class*="post"]"#,
    "div.post_box",
    r#"div[id^="post_box_root_"]"#,
    "article[data-post-id], article[data-postid]",
    "div[data-post-id], div[data-postid]",
    r#"li[id^="post"]"#,
];

static COMPILED_STRATEGIES: LazyLock<Vec<(&'static str, Selector)>> = LazyLock::new(|| {
    STRATEGIES
        .iter()
        .map(|css| (*css, Selector::parse(css).expect("strategy selector should parse")))
        .collect()
});

/// Message bodies, used when no strategy matches
static MESSAGE_NODES: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse(r#"div.post_message, div[id^="post_message_"], .post__content"#)
        .expect("message selector should parse")
});

static POST_CONTAINER_ID: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^post\d+").expect("container id pattern should compile"));

/// Finds post containers on a page
#[derive(Debug, Clone, Copy, Default)]
pub struct PostLocator;

impl PostLocator {
    pub fn new() -> Self {
        Self
    }

    /// Returns the page's post containers in document order
    ///
    /// An empty result means "no posts on this page" and is not an error.
    pub fn locate<'a>(&self, doc: &'a PageDocument) -> Vec<PostNode<'a>> {
        for (css, selector) in COMPILED_STRATEGIES.iter() {
            let posts: Vec<PostNode<'a>> = doc
                .select(selector)
                .filter(|el| !is_message_only(el))
                .map(PostNode::new)
                .collect();

            if !posts.is_empty() {
                tracing::debug!("Strategy '{}' matched {} posts", css, posts.len());
                return posts;
            }
        }

        let posts = climb_from_messages(doc);
        if !posts.is_empty() {
            tracing::debug!("Found {} posts by climbing from message bodies", posts.len());
        }
        posts
    }
}

/// A node that is only the message part of a post, not a whole post
fn is_message_only(el: &ElementRef<'_>) -> bool {
    el.attr_value("id")
        .map_or(false, |id| id.starts_with("post_message_"))
        || el.has_class_token("post_message")
}

fn looks_like_post(el: &ElementRef<'_>) -> bool {
    matches!(el.tag_name(), "article" | "div" | "li")
        && (el
            .attr_value("id")
            .map_or(false, |id| POST_CONTAINER_ID.is_match(id))
            || el.has_class_token("post"))
}

fn climb_from_messages(doc: &PageDocument) -> Vec<PostNode<'_>> {
    let mut posts: Vec<PostNode<'_>> = Vec::new();

    for message in doc.select(&MESSAGE_NODES) {
        if let Some(container) = message.find_ancestor(looks_like_post) {
            let node = PostNode::new(container);
            if !posts.contains(&node) {
                posts.push(node);
            }
        }
    }

    posts
}
