//! HTML metadata extraction.
//!
//! Title, author, description, thumbnail, type and publish date from raw page
//! HTML. Every field is extracted independently and may be absent; the
//! resolver applies defaults (hostname title, article type) afterwards.

pub mod json_ld;
pub mod meta_tags;

use dom_query::Document;
use url::Url;

use crate::dates::{self, DateContext, PageInput};
use crate::dom::MetaIndex;
use crate::result::PartialMetadata;

pub use meta_tags::{extract_content_type, validate_author_name, SOCIAL_HOSTS};

/// Extract all metadata from a page.
///
/// Sources, per field:
/// - title: `og:title`, `twitter:title`, `<title>`
/// - author: JSON-LD `author`, then `author` / `article:author` / `twitter:creator`
/// - description: `og:description`, `description`, `twitter:description`
/// - thumbnail: `og:image`, `twitter:image` (absolute)
/// - type: social hostname, else `og:type`
/// - published date: the five-collector date resolution
///
/// # Arguments
/// * `html` - The page HTML
/// * `page_url` - The page URL (relative thumbnails, hostname rules, URL dates)
/// * `ctx` - Date parsing context
#[must_use]
pub fn extract_html_metadata(html: &str, page_url: &str, ctx: &DateContext) -> PartialMetadata {
    let doc = Document::from(html);
    let meta = MetaIndex::build(&doc);
    let json_ld_docs = json_ld::decode_json_ld(&doc);
    let base = Url::parse(page_url).ok();

    let page = PageInput {
        html,
        url: page_url,
        doc: &doc,
        meta: &meta,
        json_ld: &json_ld_docs,
    };

    let author = json_ld::extract_author(&json_ld_docs)
        .filter(|name| validate_author_name(name))
        .or_else(|| meta_tags::extract_author(&meta));

    PartialMetadata {
        title: meta_tags::extract_title(&doc, &meta),
        author,
        published_at: dates::resolve_in_page(&page, ctx).map(|(date, _)| date),
        content_type: meta_tags::extract_content_type(&meta, page_url),
        description: meta_tags::extract_description(&meta),
        thumbnail: meta_tags::extract_thumbnail(&meta, base.as_ref()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::result::ContentType;
    use chrono::NaiveDate;

    fn ctx() -> DateContext {
        DateContext::new(NaiveDate::from_ymd_opt(2024, 6, 10).unwrap())
    }

    #[test]
    fn test_full_article_page() {
        let html = r#"<!DOCTYPE html>
        <html>
        <head>
            <title>Fallback Title</title>
            <meta property="og:title" content="Rust &amp; You">
            <meta property="og:type" content="article">
            <meta property="og:description" content="Why Rust.">
            <meta property="og:image" content="/images/hero.jpg">
            <meta name="author" content="Meta Author">
            <script type="application/ld+json">
            {"@type": "NewsArticle", "author": {"@type": "Person", "name": "Jane Roe"}, "datePublished": "2024-05-01T09:00:00Z"}
            </script>
        </head>
        <body><p>Hello</p></body>
        </html>"#;

        let meta = extract_html_metadata(html, "https://news.example.com/story", &ctx());

        assert_eq!(meta.title.as_deref(), Some("Rust & You"));
        assert_eq!(meta.author.as_deref(), Some("Jane Roe"));
        assert_eq!(meta.published_at.as_deref(), Some("2024-05-01"));
        assert_eq!(meta.content_type, Some(ContentType::Article));
        assert_eq!(meta.description.as_deref(), Some("Why Rust."));
        assert_eq!(meta.thumbnail.as_deref(), Some("https://news.example.com/images/hero.jpg"));
    }

    #[test]
    fn test_meta_author_when_json_ld_has_none() {
        let html = r#"<head><meta name="author" content="Meta Author"></head>"#;
        let meta = extract_html_metadata(html, "https://example.com/", &ctx());
        assert_eq!(meta.author.as_deref(), Some("Meta Author"));
    }

    #[test]
    fn test_empty_page_yields_empty_partial() {
        let meta = extract_html_metadata("", "https://example.com/", &ctx());
        assert!(meta.is_empty());
    }

    #[test]
    fn test_social_host_forces_social_type() {
        let html = r#"<meta property="og:type" content="article"><title>Post</title>"#;
        let meta = extract_html_metadata(html, "https://twitter.com/user/status/1", &ctx());
        assert_eq!(meta.content_type, Some(ContentType::Social));
    }
}
