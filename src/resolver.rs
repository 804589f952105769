//! Metadata resolution entry point.
//!
//! One call per URL: classify, try oEmbed, fetch and parse the page, merge.
//! Every failure degrades into a smaller result; nothing is returned as an
//! error.

use crate::dates::DateContext;
use crate::fetch::{Fetcher, HttpFetcher};
use crate::metadata::extract_html_metadata;
use crate::oembed::{fetch_oembed, is_oembed_provider};
use crate::options::Options;
use crate::result::ResolvedMetadata;
use crate::url_utils;
use crate::Result;

/// Resolves URLs into [`ResolvedMetadata`].
///
/// Holds no mutable state, so one resolver can serve concurrent calls.
///
/// # Example
///
/// ```no_run
/// use rs_linkmeta::{MetadataResolver, Options};
///
/// # async fn run() -> rs_linkmeta::Result<()> {
/// let resolver = MetadataResolver::with_options(Options::default())?;
/// let meta = resolver.resolve("https://example.com/post").await;
/// println!("{} ({})", meta.title, meta.content_type);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct MetadataResolver<F = HttpFetcher> {
    fetcher: F,
    options: Options,
}

impl MetadataResolver<HttpFetcher> {
    /// Resolver backed by an [`HttpFetcher`] built from `options`.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be constructed.
    pub fn with_options(options: Options) -> Result<Self> {
        let fetcher = HttpFetcher::new(&options)?;
        Ok(Self { fetcher, options })
    }
}

impl<F: Fetcher> MetadataResolver<F> {
    /// Resolver over a custom fetcher.
    #[must_use]
    pub fn new(fetcher: F, options: Options) -> Self {
        Self { fetcher, options }
    }

    /// The options this resolver was built with.
    #[must_use]
    pub fn options(&self) -> &Options {
        &self.options
    }

    /// Resolve one URL.
    ///
    /// Always returns a populated `title` and `content_type`. If the page
    /// cannot be fetched (bad URL, network error, non-2xx, timeout) the result
    /// is the hostname with type `other`.
    pub async fn resolve(&self, url: &str) -> ResolvedMetadata {
        let canonical = url_utils::canonicalize(url);
        let fallback_title = url_utils::fallback_title(&canonical);
        let ctx = DateContext::new(self.options.today()).with_slash_order(self.options.slash_date_order);

        let oembed = if is_oembed_provider(&canonical) {
            fetch_oembed(&self.fetcher, &canonical, &self.options, &ctx).await
        } else {
            None
        };

        if let Some(partial) = oembed.as_ref().filter(|p| p.published_at.is_some()) {
            tracing::debug!(url = %canonical, "resolved from oEmbed alone");
            return ResolvedMetadata::from_partial(canonical, &fallback_title, partial.clone());
        }

        let page = match self.fetcher.fetch(&canonical).await {
            Ok(page) => page,
            Err(err) => {
                tracing::debug!(
                    url = %canonical,
                    error = %err,
                    transport = err.is_transport(),
                    "page fetch failed, using minimal fallback"
                );
                return ResolvedMetadata::minimal(canonical, fallback_title);
            }
        };

        let html = extract_html_metadata(&page.body, &canonical, &ctx);
        tracing::trace!(url = %canonical, final_url = %page.url, oembed = oembed.is_some(), "merging metadata sources");

        let merged = match oembed {
            Some(oembed) => oembed.or(html),
            None => html,
        };

        ResolvedMetadata::from_partial(canonical, &fallback_title, merged)
    }

    /// Run the HTML extractor over already-fetched markup, skipping the network.
    #[must_use]
    pub fn resolve_html(&self, url: &str, html: &str) -> ResolvedMetadata {
        let canonical = url_utils::canonicalize(url);
        let fallback_title = url_utils::fallback_title(&canonical);
        let ctx = DateContext::new(self.options.today()).with_slash_order(self.options.slash_date_order);
        let partial = extract_html_metadata(html, &canonical, &ctx);
        ResolvedMetadata::from_partial(canonical, &fallback_title, partial)
    }
}

/// Resolve one URL with default options.
///
/// Each call builds a fresh HTTP client, so connections are not reused
/// between calls. Resolving many URLs should go through one
/// [`MetadataResolver`], which keeps its client and connection pool.
///
/// # Example
///
/// ```no_run
/// # async fn run() {
/// let meta = rs_linkmeta::resolve("https://www.youtube.com/watch?v=dQw4w9WgXcQ").await;
/// assert!(!meta.title.is_empty());
/// # }
/// ```
///
/// Many URLs, one client:
///
/// ```no_run
/// use rs_linkmeta::{MetadataResolver, Options};
///
/// # async fn run(urls: &[&str]) -> rs_linkmeta::Result<()> {
/// let resolver = MetadataResolver::with_options(Options::default())?;
/// for url in urls {
///     let meta = resolver.resolve(url).await;
///     println!("{url}: {}", meta.title);
/// }
/// # Ok(())
/// # }
/// ```
pub async fn resolve(url: &str) -> ResolvedMetadata {
    match MetadataResolver::with_options(Options::default()) {
        Ok(resolver) => resolver.resolve(url).await,
        Err(err) => {
            tracing::warn!(error = %err, "HTTP client unavailable");
            let canonical = url_utils::canonicalize(url);
            let title = url_utils::fallback_title(&canonical);
            ResolvedMetadata::minimal(canonical, title)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::fetch::FetchedPage;
    use crate::result::ContentType;
    use async_trait::async_trait;
    use chrono::NaiveDate;
    use std::collections::HashMap;
    use std::sync::Mutex;

    /// Serves canned bodies by URL prefix and records every request.
    #[derive(Default)]
    struct StubFetcher {
        routes: HashMap<&'static str, &'static str>,
        calls: Mutex<Vec<String>>,
    }

    impl StubFetcher {
        fn route(mut self, prefix: &'static str, body: &'static str) -> Self {
            self.routes.insert(prefix, body);
            self
        }

        fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl Fetcher for StubFetcher {
        async fn fetch(&self, url: &str) -> Result<FetchedPage> {
            self.calls.lock().unwrap().push(url.to_string());
            let body = self
                .routes
                .iter()
                .find(|(prefix, _)| url.starts_with(*prefix))
                .map(|(_, body)| (*body).to_string())
                .ok_or(Error::Status(404))?;
            Ok(FetchedPage {
                url: url.to_string(),
                status: 200,
                content_type: None,
                body,
            })
        }
    }

    fn options() -> Options {
        Options {
            reference_date: NaiveDate::from_ymd_opt(2024, 6, 10),
            ..Options::default()
        }
    }

    #[tokio::test]
    async fn test_oembed_with_date_skips_page_fetch() {
        let fetcher = StubFetcher::default().route(
            "https://www.youtube.com/oembed",
            r#"{"title":"Talk","author_name":"Chan","type":"video","published_date":"2024-01-15"}"#,
        );
        let resolver = MetadataResolver::new(fetcher, options());

        let meta = resolver.resolve("https://youtube.com/watch?v=abc").await;

        assert_eq!(meta.title, "Talk");
        assert_eq!(meta.published_at.as_deref(), Some("2024-01-15"));
        assert_eq!(meta.content_type, ContentType::Video);

        let calls = resolver.fetcher.calls();
        assert_eq!(calls.len(), 1);
        assert!(calls[0].starts_with("https://www.youtube.com/oembed"));
    }

    #[tokio::test]
    async fn test_oembed_without_date_is_merged_with_html() {
        let fetcher = StubFetcher::default()
            .route(
                "https://vimeo.com/api/oembed.json",
                r#"{"title":"oEmbed Title","type":"video","thumbnail_url":"https://i.vimeocdn.com/1.jpg"}"#,
            )
            .route(
                "https://vimeo.com/42",
                r#"<head><title>HTML Title</title>
                <meta name="author" content="Director">
                <meta property="og:description" content="A short film.">
                <meta property="og:image" content="https://vimeo.com/og.jpg">
                <script type="application/ld+json">{"uploadDate":"2023-09-09"}</script></head>"#,
            );
        let resolver = MetadataResolver::new(fetcher, options());

        let meta = resolver.resolve("https://vimeo.com/42").await;

        assert_eq!(meta.title, "oEmbed Title");
        assert_eq!(meta.thumbnail.as_deref(), Some("https://i.vimeocdn.com/1.jpg"));
        assert_eq!(meta.content_type, ContentType::Video);
        assert_eq!(meta.author.as_deref(), Some("Director"));
        assert_eq!(meta.description.as_deref(), Some("A short film."));
        assert_eq!(meta.published_at.as_deref(), Some("2023-09-09"));

        // one oEmbed call, one page fetch
        assert_eq!(resolver.fetcher.calls().len(), 2);
    }

    #[tokio::test]
    async fn test_failed_oembed_uses_html_alone() {
        let fetcher = StubFetcher::default().route(
            "https://soundcloud.com/artist/track",
            r#"<meta property="og:title" content="Track"><meta property="og:type" content="music.song">"#,
        );
        let resolver = MetadataResolver::new(fetcher, options());

        let meta = resolver.resolve("https://soundcloud.com/artist/track").await;

        assert_eq!(meta.title, "Track");
        assert_eq!(meta.content_type, ContentType::Article);
    }

    #[tokio::test]
    async fn test_page_failure_gives_minimal_fallback() {
        let resolver = MetadataResolver::new(StubFetcher::default(), options());

        let meta = resolver.resolve("https://blog.example.org/post").await;

        assert_eq!(meta, ResolvedMetadata::minimal("https://blog.example.org/post", "blog.example.org"));
    }

    #[tokio::test]
    async fn test_malformed_url_never_panics() {
        let resolver = MetadataResolver::new(StubFetcher::default(), options());

        for input in ["", "   ", "not a url", "http://", "javascript:alert(1)"] {
            let meta = resolver.resolve(input).await;
            assert!(!meta.title.is_empty(), "empty title for {input:?}");
            assert_eq!(meta.content_type, ContentType::Other);
        }
    }

    #[tokio::test]
    async fn test_repeated_resolution_is_identical() {
        let fetcher = StubFetcher::default().route(
            "https://news.example.com/",
            r#"<title>Story</title><meta name="pubdate" content="2024-04-04">"#,
        );
        let resolver = MetadataResolver::new(fetcher, options());

        let first = resolver.resolve("https://news.example.com/story").await;
        let second = resolver.resolve("https://news.example.com/story").await;

        assert_eq!(first, second);
        assert_eq!(first.published_at.as_deref(), Some("2024-04-04"));
    }

    #[test]
    fn test_resolve_html_without_network() {
        let resolver = MetadataResolver::new(StubFetcher::default(), options());
        let meta = resolver.resolve_html("https://example.com/a", "<p>no head</p>");
        assert_eq!(meta.title, "example.com");
        assert_eq!(meta.content_type, ContentType::Article);
        assert!(resolver.fetcher.calls().is_empty());
    }
}
