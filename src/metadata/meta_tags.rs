//! HTML Meta Tag Extraction
//!
//! Title, author, description, thumbnail and type from Open Graph, Twitter
//! card and standard meta tags. Each field has its own ordered key list and
//! the first non-empty value wins.

use dom_query::Document;
use url::Url;

use crate::dom::{self, MetaIndex};
use crate::result::ContentType;
use crate::url_utils;

/// Title keys, before falling back to `<title>`.
const TITLE_KEYS: &[&str] = &["og:title", "twitter:title"];

/// Author keys, consulted after JSON-LD.
const AUTHOR_KEYS: &[&str] = &["author", "article:author", "twitter:creator"];

const DESCRIPTION_KEYS: &[&str] = &["og:description", "description", "twitter:description"];

const THUMBNAIL_KEYS: &[&str] = &["og:image", "og:image:url", "twitter:image", "twitter:image:src"];

/// Hosts whose pages are always classified as social posts.
pub const SOCIAL_HOSTS: &[&str] = &[
    "twitter.com",
    "x.com",
    "instagram.com",
    "facebook.com",
    "linkedin.com",
];

/// Title from `og:title`, `twitter:title`, then `<title>`.
///
/// Entities are decoded by the HTML parser; whitespace is collapsed.
#[must_use]
pub fn extract_title(doc: &Document, meta: &MetaIndex) -> Option<String> {
    meta.first_of(TITLE_KEYS)
        .map(dom::collapse_whitespace)
        .filter(|t| !t.is_empty())
        .or_else(|| {
            // head first: <title> also appears inside inline SVG
            ["head title", "title"]
                .iter()
                .map(|selector| dom::normalized_text(&doc.select(selector).first()))
                .find(|t| !t.is_empty())
        })
}

/// Author from the meta-tag keys, skipping values that aren't names.
#[must_use]
pub fn extract_author(meta: &MetaIndex) -> Option<String> {
    AUTHOR_KEYS
        .iter()
        .flat_map(|key| meta.all(*key))
        .map(dom::collapse_whitespace)
        .find(|name| validate_author_name(name))
}

/// Description from `og:description`, `description`, `twitter:description`.
#[must_use]
pub fn extract_description(meta: &MetaIndex) -> Option<String> {
    meta.first_of(DESCRIPTION_KEYS)
        .map(dom::collapse_whitespace)
        .filter(|d| !d.is_empty())
}

/// Thumbnail from `og:image` or `twitter:image`, made absolute against `base`.
#[must_use]
pub fn extract_thumbnail(meta: &MetaIndex, base: Option<&Url>) -> Option<String> {
    let raw = meta.first_of(THUMBNAIL_KEYS)?;
    let resolved = match base {
        Some(base) => url_utils::create_absolute_url(raw, base),
        None => raw.trim().to_string(),
    };
    (!resolved.is_empty()).then_some(resolved)
}

/// Content type from `og:type` and the page hostname.
///
/// Social hosts always win; otherwise `og:type` containing `video` gives
/// [`ContentType::Video`], `article`/`blog` gives [`ContentType::Article`].
/// `None` means "no signal" (the caller defaults to article).
#[must_use]
pub fn extract_content_type(meta: &MetaIndex, page_url: &str) -> Option<ContentType> {
    if url_utils::host_in(page_url, SOCIAL_HOSTS) {
        return Some(ContentType::Social);
    }

    let og_type = meta.first("og:type")?.to_ascii_lowercase();
    if og_type.contains("video") {
        Some(ContentType::Video)
    } else if og_type.contains("article") || og_type.contains("blog") {
        Some(ContentType::Article)
    } else {
        None
    }
}

/// Reject author values that are URLs, JSON, or empty.
///
/// Twitter handles (`@name`) are accepted as-is.
#[must_use]
pub fn validate_author_name(name: &str) -> bool {
    let name = name.trim();

    if name.is_empty() || name.len() > 200 {
        return false;
    }

    if name.starts_with("http://") || name.starts_with("https://") || name.starts_with("www.") {
        return false;
    }

    !(name.starts_with('{') || name.starts_with('['))
}
