//! Publish date resolution.
//!
//! Five independent evidence collectors run in a fixed priority order against
//! the same page; the first date accepted by the flexible parser wins:
//!
//! 1. platform-specific embedded JSON (YouTube)
//! 2. JSON-LD structured data
//! 3. meta tags and `<time>` elements
//! 4. the URL path
//! 5. phrases in the visible text
//!
//! Earlier sources are more authoritative for their narrow domain, so a
//! JSON-LD date beats a conflicting meta tag.

mod collectors;
pub mod parse;

use chrono::NaiveDate;
use dom_query::Document;
use serde_json::Value;

use crate::dom::MetaIndex;
use crate::metadata::json_ld;

pub use parse::{normalize_date, parse_flexible_date, resolve_relative_date, DateContext};

/// One page as seen by the collectors. Parsed once, shared by all of them.
pub(crate) struct PageInput<'a> {
    pub(crate) html: &'a str,
    pub(crate) url: &'a str,
    pub(crate) doc: &'a Document,
    pub(crate) meta: &'a MetaIndex,
    pub(crate) json_ld: &'a [Value],
}

/// Evidence source that produced a publish date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DateSource {
    /// Platform player JSON (YouTube).
    Platform,
    /// schema.org JSON-LD.
    JsonLd,
    /// Meta tags, `<time>`, hAtom markup.
    MetaTag,
    /// Date segments or parameters in the URL.
    UrlPath,
    /// Phrases in the visible page text.
    Content,
}

impl DateSource {
    /// All sources in resolution order.
    pub const PRIORITY: [DateSource; 5] = [
        DateSource::Platform,
        DateSource::JsonLd,
        DateSource::MetaTag,
        DateSource::UrlPath,
        DateSource::Content,
    ];

    fn collect(self, page: &PageInput<'_>, ctx: &DateContext) -> Option<NaiveDate> {
        match self {
            DateSource::Platform => collectors::platform(page, ctx),
            DateSource::JsonLd => collectors::json_ld(page, ctx),
            DateSource::MetaTag => collectors::meta_tags(page, ctx),
            DateSource::UrlPath => collectors::url_path(page, ctx),
            DateSource::Content => collectors::content(page, ctx),
        }
    }
}

/// Resolve the publish date of a page as `YYYY-MM-DD`.
///
/// # Arguments
/// * `html` - Raw page HTML
/// * `page_url` - The page URL (hostname and path evidence)
/// * `ctx` - Reference date and slash-date convention
#[must_use]
pub fn resolve_published_date(html: &str, page_url: &str, ctx: &DateContext) -> Option<String> {
    resolve_published_date_with_source(html, page_url, ctx).map(|(date, _)| date)
}

/// Like [`resolve_published_date`], also reporting which collector answered.
#[must_use]
pub fn resolve_published_date_with_source(
    html: &str,
    page_url: &str,
    ctx: &DateContext,
) -> Option<(String, DateSource)> {
    let doc = Document::from(html);
    let meta = MetaIndex::build(&doc);
    let json_ld = json_ld::decode_json_ld(&doc);
    let page = PageInput {
        html,
        url: page_url,
        doc: &doc,
        meta: &meta,
        json_ld: &json_ld,
    };
    resolve_in_page(&page, ctx)
}

/// Run the collectors over an already-parsed page.
pub(crate) fn resolve_in_page(page: &PageInput<'_>, ctx: &DateContext) -> Option<(String, DateSource)> {
    let (date, source) = DateSource::PRIORITY
        .iter()
        .find_map(|source| source.collect(page, ctx).map(|date| (date, *source)))?;

    tracing::trace!(url = page.url, ?source, %date, "resolved publish date");
    Some((date.format("%Y-%m-%d").to_string(), source))
}
