//! oEmbed provider classification and lookup.
//!
//! A fixed allow-list of hosts publish oEmbed endpoints. For those URLs the
//! endpoint is asked for `title`, `author_name`, `type` and `thumbnail_url`
//! (and, for the few providers that send one, a publish date).

use serde::Deserialize;
use url::Url;

use crate::dates::{normalize_date, DateContext};
use crate::error::{Error, Result};
use crate::fetch::Fetcher;
use crate::metadata::SOCIAL_HOSTS;
use crate::options::Options;
use crate::result::{ContentType, PartialMetadata};
use crate::url_utils;

// ============================================================================
// Providers
// ============================================================================

/// A host with a known oEmbed endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Provider {
    YouTube,
    Vimeo,
    Twitter,
    Instagram,
    Flickr,
    SoundCloud,
    Spotify,
}

/// Domain → provider. Subdomains of each domain match too.
const PROVIDER_DOMAINS: &[(&str, Provider)] = &[
    ("youtube.com", Provider::YouTube),
    ("youtu.be", Provider::YouTube),
    ("vimeo.com", Provider::Vimeo),
    ("twitter.com", Provider::Twitter),
    ("x.com", Provider::Twitter),
    ("instagram.com", Provider::Instagram),
    ("flickr.com", Provider::Flickr),
    ("soundcloud.com", Provider::SoundCloud),
    ("spotify.com", Provider::Spotify),
];

impl Provider {
    /// Classify a URL by hostname (case-insensitive, `www.` stripped).
    ///
    /// Returns `None` for other hosts and for malformed URLs.
    #[must_use]
    pub fn from_url(url: &str) -> Option<Provider> {
        let host = url_utils::normalized_host(url)?;
        PROVIDER_DOMAINS
            .iter()
            .find(|(domain, _)| url_utils::host_matches(&host, domain))
            .map(|(_, provider)| *provider)
    }

    /// The provider's oEmbed JSON endpoint.
    #[must_use]
    pub fn endpoint(self) -> &'static str {
        match self {
            Provider::YouTube => "https://www.youtube.com/oembed",
            Provider::Vimeo => "https://vimeo.com/api/oembed.json",
            Provider::Twitter => "https://publish.twitter.com/oembed",
            Provider::Instagram => "https://graph.facebook.com/v16.0/instagram_oembed",
            Provider::Flickr => "https://www.flickr.com/services/oembed/",
            Provider::SoundCloud => "https://soundcloud.com/oembed",
            Provider::Spotify => "https://open.spotify.com/oembed",
        }
    }
}

/// Whether the URL belongs to an oEmbed provider on the allow-list.
///
/// # Examples
///
/// ```
/// use rs_linkmeta::is_oembed_provider;
///
/// assert!(is_oembed_provider("https://m.youtube.com/watch?v=abc"));
/// assert!(is_oembed_provider("https://WWW.Vimeo.com/123"));
/// assert!(!is_oembed_provider("https://example.com/video"));
/// assert!(!is_oembed_provider("not a url"));
/// ```
#[must_use]
pub fn is_oembed_provider(url: &str) -> bool {
    Provider::from_url(url).is_some()
}

// ============================================================================
// Lookup
// ============================================================================

/// The subset of an oEmbed response this crate reads.
///
/// Unknown fields are ignored; every field may be missing.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OEmbedResponse {
    pub title: Option<String>,
    pub author_name: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub thumbnail_url: Option<String>,
    pub published_date: Option<String>,
    pub upload_date: Option<String>,
    pub date: Option<String>,
}

impl OEmbedResponse {
    /// Map onto the common partial shape.
    ///
    /// Social hosts are `social`, `type: "video"` is `video`, everything
    /// else `other`.
    #[must_use]
    pub fn into_partial(self, page_url: &str, ctx: &DateContext) -> PartialMetadata {
        let content_type = if url_utils::host_in(page_url, SOCIAL_HOSTS) {
            ContentType::Social
        } else if self.kind.as_deref().is_some_and(|k| k.eq_ignore_ascii_case("video")) {
            ContentType::Video
        } else {
            ContentType::Other
        };

        let published_at = [&self.published_date, &self.upload_date, &self.date]
            .into_iter()
            .flatten()
            .find_map(|raw| normalize_date(raw, ctx));

        PartialMetadata {
            title: non_empty(self.title),
            author: non_empty(self.author_name),
            published_at,
            content_type: Some(content_type),
            description: None,
            thumbnail: non_empty(self.thumbnail_url),
        }
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Build the request URL: `{endpoint}?url=<page url>&format=json`.
///
/// # Errors
///
/// Returns [`Error::InvalidUrl`] if the endpoint itself does not parse.
pub fn request_url(endpoint: &str, page_url: &str) -> Result<Url> {
    let mut url = Url::parse(endpoint).map_err(|_| Error::InvalidUrl(endpoint.to_string()))?;
    url.query_pairs_mut()
        .append_pair("url", page_url)
        .append_pair("format", "json");
    Ok(url)
}

/// Query the oEmbed endpoint for `page_url`.
///
/// # Errors
///
/// Fails if the URL is not on the allow-list, the request fails, the body is
/// not JSON, or the response carries no usable fields.
pub async fn lookup<F: Fetcher + ?Sized>(
    fetcher: &F,
    page_url: &str,
    options: &Options,
    ctx: &DateContext,
) -> Result<PartialMetadata> {
    let provider = Provider::from_url(page_url)
        .ok_or_else(|| Error::OEmbed(format!("no provider for {page_url}")))?;
    let endpoint = options
        .oembed_endpoint
        .as_deref()
        .unwrap_or_else(|| provider.endpoint());

    let request = request_url(endpoint, page_url)?;
    let page = fetcher.fetch(request.as_str()).await?;
    let response: OEmbedResponse = serde_json::from_str(&page.body)?;

    let partial = response.into_partial(page_url, ctx);
    if partial.title.is_none()
        && partial.author.is_none()
        && partial.thumbnail.is_none()
        && partial.published_at.is_none()
    {
        return Err(Error::OEmbed("response has no usable fields".to_string()));
    }

    Ok(partial)
}

/// [`lookup`], with every failure logged and mapped to `None`.
pub async fn fetch_oembed<F: Fetcher + ?Sized>(
    fetcher: &F,
    page_url: &str,
    options: &Options,
    ctx: &DateContext,
) -> Option<PartialMetadata> {
    match lookup(fetcher, page_url, options, ctx).await {
        Ok(partial) => Some(partial),
        Err(err) => {
            tracing::debug!(url = page_url, error = %err, "oEmbed lookup failed");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetch::FetchedPage;
    use async_trait::async_trait;
    use chrono::NaiveDate;
    use std::sync::Mutex;

    struct JsonFetcher {
        body: String,
        requested: Mutex<Vec<String>>,
    }

    impl JsonFetcher {
        fn new(body: &str) -> Self {
            Self {
                body: body.to_string(),
                requested: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl Fetcher for JsonFetcher {
        async fn fetch(&self, url: &str) -> Result<FetchedPage> {
            self.requested.lock().unwrap().push(url.to_string());
            Ok(FetchedPage {
                url: url.to_string(),
                status: 200,
                content_type: Some("application/json".to_string()),
                body: self.body.clone(),
            })
        }
    }

    struct FailingFetcher;

    #[async_trait]
    impl Fetcher for FailingFetcher {
        async fn fetch(&self, _url: &str) -> Result<FetchedPage> {
            Err(Error::Status(500))
        }
    }

    fn ctx() -> DateContext {
        DateContext::new(NaiveDate::from_ymd_opt(2024, 6, 10).unwrap())
    }

    #[test]
    fn test_provider_classification() {
        assert_eq!(Provider::from_url("https://youtu.be/abc"), Some(Provider::YouTube));
        assert_eq!(Provider::from_url("https://x.com/u/status/1"), Some(Provider::Twitter));
        assert_eq!(Provider::from_url("https://open.spotify.com/track/1"), Some(Provider::Spotify));
        assert_eq!(Provider::from_url("https://notyoutube.com/watch"), None);
        assert_eq!(Provider::from_url("https://youtube.com.evil.example/"), None);
        assert_eq!(Provider::from_url("::::"), None);
    }

    #[test]
    fn test_request_url_encodes_page_url() {
        let url = request_url(
            Provider::YouTube.endpoint(),
            "https://www.youtube.com/watch?v=abc&t=10",
        )
        .unwrap();
        assert_eq!(
            url.as_str(),
            "https://www.youtube.com/oembed?url=https%3A%2F%2Fwww.youtube.com%2Fwatch%3Fv%3Dabc%26t%3D10&format=json"
        );
    }

    #[test]
    fn test_type_mapping() {
        let video = OEmbedResponse {
            kind: Some("video".to_string()),
            ..OEmbedResponse::default()
        };
        let partial = video.clone().into_partial("https://vimeo.com/1", &ctx());
        assert_eq!(partial.content_type, Some(ContentType::Video));

        let partial = video.into_partial("https://twitter.com/u/status/1", &ctx());
        assert_eq!(partial.content_type, Some(ContentType::Social));

        let rich = OEmbedResponse {
            kind: Some("rich".to_string()),
            ..OEmbedResponse::default()
        };
        let partial = rich.into_partial("https://soundcloud.com/a/b", &ctx());
        assert_eq!(partial.content_type, Some(ContentType::Other));
    }

    #[tokio::test]
    async fn test_lookup_maps_fields_and_dates() {
        let fetcher = JsonFetcher::new(
            r#"{"title":"Clip","author_name":"Channel","type":"video",
                "thumbnail_url":"https://i.ytimg.com/vi/abc/hq.jpg",
                "upload_date":"2024-03-05T10:00:00-07:00","html":"<iframe></iframe>"}"#,
        );

        let partial = fetch_oembed(&fetcher, "https://www.youtube.com/watch?v=abc", &Options::default(), &ctx())
            .await
            .unwrap();

        assert_eq!(partial.title.as_deref(), Some("Clip"));
        assert_eq!(partial.author.as_deref(), Some("Channel"));
        assert_eq!(partial.published_at.as_deref(), Some("2024-03-05"));
        assert_eq!(partial.content_type, Some(ContentType::Video));
        assert_eq!(partial.thumbnail.as_deref(), Some("https://i.ytimg.com/vi/abc/hq.jpg"));

        let requested = fetcher.requested.lock().unwrap();
        assert!(requested[0].starts_with("https://www.youtube.com/oembed?url="));
    }

    #[tokio::test]
    async fn test_endpoint_override() {
        let fetcher = JsonFetcher::new(r#"{"title":"Proxied"}"#);
        let options = Options {
            oembed_endpoint: Some("http://127.0.0.1:9/oembed".to_string()),
            ..Options::default()
        };

        fetch_oembed(&fetcher, "https://vimeo.com/42", &options, &ctx())
            .await
            .unwrap();

        let requested = fetcher.requested.lock().unwrap();
        assert!(requested[0].starts_with("http://127.0.0.1:9/oembed?url=https%3A%2F%2Fvimeo.com%2F42"));
    }

    #[tokio::test]
    async fn test_failures_are_none() {
        let url = "https://www.youtube.com/watch?v=abc";

        assert!(fetch_oembed(&FailingFetcher, url, &Options::default(), &ctx()).await.is_none());
        assert!(fetch_oembed(&JsonFetcher::new("<html>"), url, &Options::default(), &ctx()).await.is_none());
        assert!(fetch_oembed(&JsonFetcher::new("[1, 2]"), url, &Options::default(), &ctx()).await.is_none());
        assert!(fetch_oembed(&JsonFetcher::new(r#"{"type":"video"}"#), url, &Options::default(), &ctx()).await.is_none());
        assert!(fetch_oembed(&JsonFetcher::new("{}"), "https://example.com/", &Options::default(), &ctx()).await.is_none());
    }

    #[tokio::test]
    async fn test_implausible_date_is_dropped() {
        let fetcher = JsonFetcher::new(r#"{"title":"Old","published_date":"1850-01-01"}"#);
        let partial = fetch_oembed(&fetcher, "https://vimeo.com/1", &Options::default(), &ctx())
            .await
            .unwrap();
        assert_eq!(partial.title.as_deref(), Some("Old"));
        assert!(partial.published_at.is_none());
    }
}
