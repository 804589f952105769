//! Result types for metadata resolution.
//!
//! [`ResolvedMetadata`] is the only value handed back to callers. The
//! intermediate [`PartialMetadata`] shape is what each metadata source (oEmbed,
//! HTML) produces before defaults are applied.

use serde::{Deserialize, Serialize};

/// Coarse classification of the resolved page.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentType {
    /// Written content: news, blog posts, documentation.
    #[default]
    Article,
    /// Video pages (YouTube, Vimeo, `og:type=video.*`).
    Video,
    /// Posts on social platforms.
    Social,
    /// Anything else, including pages that could not be fetched.
    Other,
}

impl ContentType {
    /// Lowercase wire name (`article`, `video`, `social`, `other`).
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            ContentType::Article => "article",
            ContentType::Video => "video",
            ContentType::Social => "social",
            ContentType::Other => "other",
        }
    }
}

impl std::fmt::Display for ContentType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Best-effort structured description of a URL.
///
/// `title` and `content_type` are always populated; everything else is
/// optional. `published_at`, when present, is a `YYYY-MM-DD` string whose year
/// lies in the sane window accepted by [`crate::dates::parse_flexible_date`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedMetadata {
    /// Canonicalized input URL.
    pub url: String,

    /// Page title, or the hostname when none could be found.
    pub title: String,

    /// Author or channel name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,

    /// Publish date as `YYYY-MM-DD`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub published_at: Option<String>,

    /// Page classification.
    #[serde(rename = "type")]
    pub content_type: ContentType,

    /// Short description / summary.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Absolute URL of a preview image.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<String>,
}

impl ResolvedMetadata {
    /// The degraded-but-valid result returned when nothing could be fetched.
    #[must_use]
    pub fn minimal(url: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            title: title.into(),
            author: None,
            published_at: None,
            content_type: ContentType::Other,
            description: None,
            thumbnail: None,
        }
    }

    /// Apply defaults to partial metadata: missing title becomes `fallback_title`,
    /// missing type becomes [`ContentType::Article`].
    #[must_use]
    pub fn from_partial(url: impl Into<String>, fallback_title: &str, partial: PartialMetadata) -> Self {
        Self {
            url: url.into(),
            title: partial.title.unwrap_or_else(|| fallback_title.to_string()),
            author: partial.author,
            published_at: partial.published_at,
            content_type: partial.content_type.unwrap_or_default(),
            description: partial.description,
            thumbnail: partial.thumbnail,
        }
    }
}

/// Metadata produced by a single source, every field optional.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PartialMetadata {
    /// Title.
    pub title: Option<String>,
    /// Author name.
    pub author: Option<String>,
    /// Normalized `YYYY-MM-DD` publish date.
    pub published_at: Option<String>,
    /// Classification, if the source could tell.
    pub content_type: Option<ContentType>,
    /// Description.
    pub description: Option<String>,
    /// Thumbnail URL.
    pub thumbnail: Option<String>,
}

impl PartialMetadata {
    /// True when the source produced nothing usable.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.author.is_none()
            && self.published_at.is_none()
            && self.content_type.is_none()
            && self.description.is_none()
            && self.thumbnail.is_none()
    }

    /// Merge two sources field by field: `self` wins where present,
    /// `fallback` fills the gaps.
    #[must_use]
    pub fn or(self, fallback: PartialMetadata) -> PartialMetadata {
        PartialMetadata {
            title: self.title.or(fallback.title),
            author: self.author.or(fallback.author),
            published_at: self.published_at.or(fallback.published_at),
            content_type: self.content_type.or(fallback.content_type),
            description: self.description.or(fallback.description),
            thumbnail: self.thumbnail.or(fallback.thumbnail),
        }
    }
}
