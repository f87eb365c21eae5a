//! Per-field extraction heuristics
//!
//! Every field has its own ordered chain of lookups. A field whose chain
//! finds nothing falls back to its sentinel or to an empty string; it never
//! takes the rest of the record down with it.

use crate::document::{collapse_whitespace, NodeQuery, PostNode};
use crate::extract::record::{PostRecord, GUEST_USERNAME, MISSING_POST_ID, UNKNOWN_TIMESTAMP};
use crate::extract::ExtractionFault;
use crate::url::{absolutize, site_origin};
use regex::Regex;
use scraper::{ElementRef, Selector};
use std::panic::{self, AssertUnwindSafe};
use std::sync::LazyLock;
use url::Url;

fn selector(css: &str) -> Selector {
    Selector::parse(css).expect("field selector should parse")
}

static USER_BLOCK: LazyLock<Selector> = LazyLock::new(|| {
    selector(".post-user-info, .post-user, .post__user, .userinfo, .user-info, .post-user-container")
});

static USERNAME: LazyLock<Selector> = LazyLock::new(|| {
    selector(".post-user-username, a.username, span.username, .post__user a, a[href*=\"member.php\"]")
});

static HEADING: LazyLock<Selector> = LazyLock::new(|| {
    selector(".post-heading, .post-heading-main, .post__details, .posthead, .post-header, time")
});

static CONTENT_FALLBACK: LazyLock<Selector> = LazyLock::new(|| {
    selector(".post_message, div[id^=\"post_message_\"], .post__content, .post-body, .post-content")
});

static AVATAR: LazyLock<Selector> = LazyLock::new(|| {
    selector(
        "img.avatar, .post-user-avatar img, img[alt*=\"Avatar\"], img[src*=\"avatar\"], \
         img[class*=\"avatar\"], img[data-avatar]",
    )
});

static ANY_IMG: LazyLock<Selector> = LazyLock::new(|| selector("img"));

static ID_PREFIX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(post_box_root_|post_message_|postcount|post|p)[-_]?")
        .expect("id prefix pattern should compile")
});

static ANCHOR_ID: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"post_anchor_|post_").expect("anchor id pattern should compile"));

static DIGITS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d+").expect("digit pattern should compile"));

static MESSAGE_CLASS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\bpost_message\b").expect("message class pattern should compile")
});

static REGISTRATION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"Reg[:.]?\s*([0-9]{4}-[0-9]{2}-[0-9]{2}|[0-9]{4}-[0-9]{2}|[0-9]{4}|[0-9]{1,2}\s+\w+\s+[0-9]{4}|[A-Za-zÅÄÖåäö]{3,}\s+[0-9]{4})",
    )
    .expect("registration pattern should compile")
});

static POST_COUNT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)Inl[äa]gg[:.]?\s*([0-9][0-9\s\u{00a0}.,]*)")
        .expect("post count pattern should compile")
});

static COUNT_SEPARATORS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[\s\u{00a0}.,]").expect("separator pattern should compile"));

/// Turns a post container into a [`PostRecord`]
#[derive(Debug, Clone)]
pub struct FieldExtractor {
    base: Url,
}

impl FieldExtractor {
    /// Creates an extractor anchored at the forum's base URL
    ///
    /// The base is used for synthesized permalinks and for resolving
    /// root-relative avatar sources.
    pub fn new(base: Url) -> Self {
        Self { base }
    }

    /// Extracts all eight fields of one post
    ///
    /// Never fails; unrecoverable fields carry their sentinel or are empty.
    pub fn extract(&self, node: PostNode<'_>, page_url: &Url) -> PostRecord {
        let post = node.element();
        let user_block = post.first_match(&USER_BLOCK);
        let user_text = user_block.map(|b| b.flat_text(" ")).unwrap_or_default();

        let post_id = post_id(post);
        let username = username(post, user_block);
        let timestamp = timestamp(post, &username);

        let permalink = if post_id == MISSING_POST_ID {
            page_url.to_string()
        } else {
            format!("{}/sp{}", site_origin(&self.base), post_id)
        };

        PostRecord {
            registration_date: registration_date(&user_text),
            post_count: post_count(&user_text, post),
            avatar_url: self.avatar_url(post, user_block),
            content: content(post),
            username,
            timestamp,
            post_id,
            permalink,
        }
    }

    /// Like [`extract`](Self::extract), but contains a panic to the one post
    ///
    /// Every container yields a record, sentinel-filled where fields are
    /// missing; only a failure inside extraction itself becomes a fault.
    pub fn try_extract(
        &self,
        node: PostNode<'_>,
        index: usize,
        page_url: &Url,
    ) -> Result<PostRecord, ExtractionFault> {
        isolate(index, || self.extract(node, page_url))
    }

    fn avatar_url<'a>(&self, post: ElementRef<'a>, user_block: Option<ElementRef<'a>>) -> String {
        let avatar = user_block
            .and_then(|b| b.first_match(&AVATAR))
            .or_else(|| post.first_match(&AVATAR))
            .or_else(|| user_block.and_then(|b| b.first_match(&ANY_IMG)));

        avatar
            .and_then(|img| img.attr_value("src"))
            .map(|src| absolutize(src, &self.base))
            .unwrap_or_default()
    }
}

fn isolate<F>(index: usize, extract: F) -> Result<PostRecord, ExtractionFault>
where
    F: FnOnce() -> PostRecord,
{
    panic::catch_unwind(AssertUnwindSafe(extract)).map_err(|payload| {
        let message = payload
            .downcast_ref::<&str>()
            .map(|s| s.to_string())
            .or_else(|| payload.downcast_ref::<String>().cloned())
            .unwrap_or_else(|| "unknown cause".to_string());
        ExtractionFault::Panicked { index, message }
    })
}

fn post_id(post: ElementRef<'_>) -> String {
    let raw = ["data-post-id", "data-postid", "id"]
        .iter()
        .filter_map(|name| post.attr_value(name))
        .find(|value| !value.is_empty())
        .unwrap_or("");

    let stripped = ID_PREFIX.replace(raw, "");
    if !stripped.is_empty() {
        return stripped.into_owned();
    }

    let from_anchor = post
        .find_descendant(|el| {
            el.tag_name() == "a"
                && el
                    .attr_value("id")
                    .map_or(false, |id| ANCHOR_ID.is_match(id))
        })
        .and_then(|anchor| {
            let haystack = format!(
                "{}{}",
                anchor.attr_value("id").unwrap_or(""),
                anchor.attr_value("href").unwrap_or("")
            );
            DIGITS.find(&haystack).map(|m| m.as_str().to_string())
        });
    if let Some(id) = from_anchor {
        return id;
    }

    let from_message = post
        .find_descendant(|el| el.any_class(|c| c.contains("post_message")))
        .or_else(|| {
            post.find_descendant(|el| {
                el.attr_value("id")
                    .map_or(false, |id| id.contains("post_message_"))
            })
        })
        .and_then(|message| message.attr_value("id"))
        .and_then(|id| DIGITS.find_iter(id).last())
        .map(|m| m.as_str().to_string());

    from_message.unwrap_or_else(|| MISSING_POST_ID.to_string())
}

fn username<'a>(post: ElementRef<'a>, user_block: Option<ElementRef<'a>>) -> String {
    user_block
        .and_then(|b| b.first_match(&USERNAME))
        .or_else(|| post.first_match(&USERNAME))
        .map(|tag| tag.visible_text())
        .filter(|name| !name.is_empty())
        .unwrap_or_else(|| GUEST_USERNAME.to_string())
}

fn registration_date(user_text: &str) -> String {
    REGISTRATION
        .captures(user_text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
        .unwrap_or_default()
}

fn post_count(user_text: &str, post: ElementRef<'_>) -> String {
    let post_text = post.flat_text(" ");

    let count = [user_text, post_text.as_str()]
        .into_iter()
        .filter(|source| !source.is_empty())
        .find_map(|source| POST_COUNT.captures(source))
        .and_then(|caps| caps.get(1))
        .map(|m| COUNT_SEPARATORS.replace_all(m.as_str(), "").into_owned())
        .unwrap_or_default();
    count
}

fn timestamp(post: ElementRef<'_>, username: &str) -> String {
    let Some(heading) = post.first_match(&HEADING) else {
        return UNKNOWN_TIMESTAMP.to_string();
    };

    let full = heading.flat_text(" ");
    let rest = full.strip_prefix(username).unwrap_or(&full);
    collapse_whitespace(&rest.replace('•', ""))
}

fn content(post: ElementRef<'_>) -> String {
    post.find_descendant(|el| {
        el.tag_name() == "div"
            && el
                .attr_value("id")
                .map_or(false, |id| id.starts_with("post_message_"))
    })
    .or_else(|| {
        post.find_descendant(|el| {
            el.tag_name() == "div" && el.any_class(|c| MESSAGE_CLASS.is_match(c))
        })
    })
    .or_else(|| post.first_match(&CONTENT_FALLBACK))
    .map(|body| body.lined_text())
    .unwrap_or_default()
}
