//! Publish-date evidence collectors.
//!
//! Each collector looks at one kind of evidence and returns the first
//! candidate accepted by [`parse_flexible_date`]. A candidate that matches a
//! pattern but fails parsing is skipped and the collector moves on.

use chrono::NaiveDate;
use dom_query::Selection;
use regex::Regex;
use std::sync::LazyLock;
use url::Url;

use super::parse::{parse_flexible_date, DateContext};
use super::PageInput;
use crate::dom;
use crate::metadata::json_ld;
use crate::url_utils;

// ============================================================
// PLATFORM-SPECIFIC (YouTube)
// ============================================================

/// Hosts whose pages embed player JSON with date fields.
const PLATFORM_HOSTS: &[&str] = &["youtube.com", "youtu.be"];

/// Embedded JSON fields, in priority order.
#[allow(clippy::expect_used)]
static PLATFORM_FIELDS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r#""publishDate"\s*:\s*"([^"]+)""#,
        r#""publishedTimeText"\s*:\s*\{\s*"simpleText"\s*:\s*"([^"]+)""#,
        r#""uploadDate"\s*:\s*"([^"]+)""#,
        r#""dateText"\s*:\s*\{\s*"simpleText"\s*:\s*"([^"]+)""#,
    ]
    .iter()
    .map(|p| Regex::new(p).expect("valid regex"))
    .collect()
});

/// Dates from YouTube's embedded player/initial data JSON.
pub(crate) fn platform(page: &PageInput<'_>, ctx: &DateContext) -> Option<NaiveDate> {
    if !url_utils::host_in(page.url, PLATFORM_HOSTS) {
        return None;
    }

    PLATFORM_FIELDS.iter().find_map(|re| {
        let raw = re.captures(page.html)?.get(1)?.as_str();
        parse_flexible_date(raw, ctx)
    })
}

// ============================================================
// JSON-LD
// ============================================================

/// Dates from schema.org JSON-LD blocks.
pub(crate) fn json_ld(page: &PageInput<'_>, ctx: &DateContext) -> Option<NaiveDate> {
    json_ld::date_candidates(page.json_ld)
        .iter()
        .find_map(|raw| parse_flexible_date(raw, ctx))
}

// ============================================================
// META TAGS
// ============================================================

/// One entry of the meta-tag date pattern list.
#[derive(Debug, Clone, Copy)]
enum MetaDatePattern {
    /// `<meta name|property|itemprop="key" content="...">`
    Meta(&'static str),
    /// `<time datetime="...">`
    TimeDatetime,
    /// `<time pubdate>text</time>`
    TimePubdate,
    /// hAtom `<abbr class="published" title="...">`
    AbbrPublished,
}

/// Known publish-date locations, in priority order. Modification dates last.
const META_DATE_PATTERNS: &[MetaDatePattern] = &[
    MetaDatePattern::Meta("article:published_time"),
    MetaDatePattern::Meta("og:published_time"),
    MetaDatePattern::Meta("article:published"),
    MetaDatePattern::Meta("pubdate"),
    MetaDatePattern::Meta("publishdate"),
    MetaDatePattern::Meta("publish_date"),
    MetaDatePattern::Meta("parsely-pub-date"),
    MetaDatePattern::Meta("sailthru.date"),
    MetaDatePattern::Meta("dc.date.issued"),
    MetaDatePattern::Meta("dcterms.created"),
    MetaDatePattern::Meta("dc.date"),
    MetaDatePattern::Meta("datepublished"),
    MetaDatePattern::Meta("date"),
    MetaDatePattern::Meta("citation_publication_date"),
    MetaDatePattern::TimeDatetime,
    MetaDatePattern::TimePubdate,
    MetaDatePattern::AbbrPublished,
    MetaDatePattern::Meta("article:modified_time"),
    MetaDatePattern::Meta("og:updated_time"),
];

/// Dates from meta tags and `<time>` elements.
pub(crate) fn meta_tags(page: &PageInput<'_>, ctx: &DateContext) -> Option<NaiveDate> {
    META_DATE_PATTERNS
        .iter()
        .find_map(|pattern| match_meta_pattern(*pattern, page, ctx))
}

fn match_meta_pattern(
    pattern: MetaDatePattern,
    page: &PageInput<'_>,
    ctx: &DateContext,
) -> Option<NaiveDate> {
    match pattern {
        MetaDatePattern::Meta(key) => page
            .meta
            .all(key)
            .find_map(|raw| parse_flexible_date(raw, ctx)),
        MetaDatePattern::TimeDatetime => first_attribute_date(page, "time[datetime]", "datetime", ctx),
        MetaDatePattern::TimePubdate => page.doc.select("time").nodes().iter().find_map(|node| {
            let el = Selection::from(*node);
            if !dom::has_attribute(&el, "pubdate") {
                return None;
            }
            parse_flexible_date(&dom::normalized_text(&el), ctx)
        }),
        MetaDatePattern::AbbrPublished => first_attribute_date(page, "abbr.published", "title", ctx),
    }
}

fn first_attribute_date(
    page: &PageInput<'_>,
    selector: &str,
    attr: &str,
    ctx: &DateContext,
) -> Option<NaiveDate> {
    page.doc.select(selector).nodes().iter().find_map(|node| {
        let raw = dom::get_attribute(&Selection::from(*node), attr)?;
        parse_flexible_date(&raw, ctx)
    })
}

// ============================================================
// URL PATH
// ============================================================

/// Date shapes in URL paths, in priority order: (pattern, has day).
#[allow(clippy::expect_used)]
static URL_PATH_PATTERNS: LazyLock<Vec<(Regex, bool)>> = LazyLock::new(|| {
    vec![
        // /2024/06/10/slug
        (Regex::new(r"/(\d{4})/(\d{1,2})/(\d{1,2})(?:/|$)").expect("valid regex"), true),
        // /2024/06/slug
        (Regex::new(r"/(\d{4})/(\d{1,2})(?:/|$)").expect("valid regex"), false),
        // /2024-06-10-slug
        (Regex::new(r"/(\d{4})-(\d{2})-(\d{2})(?:\D|$)").expect("valid regex"), true),
        // /2024-06-slug
        (Regex::new(r"/(\d{4})-(\d{2})(?:\D|$)").expect("valid regex"), false),
    ]
});

/// Query parameters carrying a date.
const URL_DATE_PARAMS: &[&str] = &["date", "published"];

/// Dates encoded in the page URL. A missing day becomes the 1st.
pub(crate) fn url_path(page: &PageInput<'_>, ctx: &DateContext) -> Option<NaiveDate> {
    let url = Url::parse(page.url).ok()?;
    let path = url.path();

    let from_path = URL_PATH_PATTERNS.iter().find_map(|(re, has_day)| {
        let caps = re.captures(path)?;
        let year = caps.get(1)?.as_str();
        let month = caps.get(2)?.as_str();
        let day = if *has_day { caps.get(3)?.as_str() } else { "1" };
        let candidate = format!("{year}-{month:0>2}-{day:0>2}");
        parse_flexible_date(&candidate, ctx)
    });
    if from_path.is_some() {
        return from_path;
    }

    url.query_pairs()
        .filter(|(key, _)| URL_DATE_PARAMS.contains(&key.as_ref()))
        .find_map(|(_, value)| parse_flexible_date(&value, ctx))
}

// ============================================================
// CONTENT TEXT
// ============================================================

#[allow(clippy::expect_used)]
static SCRIPT_STYLE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)<script\b[^>]*>.*?</script\s*>|<style\b[^>]*>.*?</style\s*>").expect("valid regex")
});

#[allow(clippy::expect_used)]
static TAG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?s)<[^>]*>").expect("valid regex"));

/// A date phrase as it appears in running text, optionally led by a weekday.
const DATE_PHRASE: &str = concat!(
    r"((?:(?:mon|tue|wed|thu|fri|sat|sun)[a-z]*\.?,?\s+)?",
    r"(?:\d+\s+(?:day|month|year)s?\s+ago|[A-Za-z]+\.?\s+\d{1,2}(?:st|nd|rd|th)?,?\s+\d{4}",
    r"|\d{1,2}\s+[A-Za-z]+\.?,?\s+\d{4}|\d{4}-\d{2}-\d{2}|\d{1,2}/\d{1,2}/\d{4}))"
);

/// Text patterns, in priority order.
#[allow(clippy::expect_used)]
static CONTENT_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        format!(r"(?i)published\s+on\s+{DATE_PHRASE}"),
        format!(r"(?i)published:\s*{DATE_PHRASE}"),
        format!(r"(?i)posted:\s*{DATE_PHRASE}"),
        format!(r"(?i)\bdate:\s*{DATE_PHRASE}"),
        r"\b(\d{1,2}/\d{1,2}/\d{4})\b".to_string(),
        format!(r"(?i)updated:\s*{DATE_PHRASE}"),
    ]
    .iter()
    .map(|p| Regex::new(p).expect("valid regex"))
    .collect()
});

/// Visible text of a page: scripts and styles dropped, tags replaced by spaces.
#[must_use]
pub(crate) fn visible_text(html: &str) -> String {
    let without_code = SCRIPT_STYLE.replace_all(html, " ");
    let text = TAG.replace_all(&without_code, " ");
    let text = text.replace("&nbsp;", " ").replace("&#160;", " ");
    dom::collapse_whitespace(&text)
}

/// Dates from phrases like "Published on June 3, 2024" in the page text.
pub(crate) fn content(page: &PageInput<'_>, ctx: &DateContext) -> Option<NaiveDate> {
    let text = visible_text(page.html);

    CONTENT_PATTERNS.iter().find_map(|re| {
        re.captures_iter(&text)
            .filter_map(|caps| caps.get(1))
            .find_map(|m| parse_flexible_date(m.as_str(), ctx))
    })
}
