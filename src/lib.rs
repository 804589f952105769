//! # rs-linkmeta
//!
//! Best-effort structured metadata for arbitrary URLs.
//!
//! Given a user-submitted link, this library produces a title, author,
//! publish date, content type, description and thumbnail by combining the
//! oEmbed protocol (for known providers) with heuristic HTML parsing.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! # async fn run() {
//! let meta = rs_linkmeta::resolve("https://example.com/2024/06/10/launch").await;
//! println!("{} [{}] {:?}", meta.title, meta.content_type, meta.published_at);
//! # }
//! ```
//!
//! Parsing already-fetched HTML needs no network:
//!
//! ```rust
//! use chrono::NaiveDate;
//! use rs_linkmeta::{extract_html_metadata, DateContext};
//!
//! let html = r#"<html><head>
//!     <meta property="og:title" content="Launch Day">
//!     <meta property="article:published_time" content="2024-06-10T08:00:00Z">
//! </head></html>"#;
//!
//! let ctx = DateContext::new(NaiveDate::from_ymd_opt(2024, 6, 12).unwrap());
//! let meta = extract_html_metadata(html, "https://example.com/launch", &ctx);
//! assert_eq!(meta.title.as_deref(), Some("Launch Day"));
//! assert_eq!(meta.published_at.as_deref(), Some("2024-06-10"));
//! ```
//!
//! ## Features
//!
//! - **oEmbed**: YouTube, Vimeo, Twitter/X, Instagram, Flickr, SoundCloud, Spotify
//! - **HTML metadata**: Open Graph, Twitter cards, standard meta tags, JSON-LD
//! - **Publish dates**: five evidence sources in priority order, relative
//!   dates (`3 days ago`), ambiguous `D/D/YYYY`, sanity-checked years
//! - **Never fails**: unreachable or malformed URLs resolve to the hostname

mod error;
mod options;
mod result;

/// DOM helpers over `dom_query` (attributes, text, meta-tag index).
pub mod dom;

/// Publish date parsing and the five date collectors.
pub mod dates;

/// HTML metadata extraction (JSON-LD, meta tags, Open Graph).
pub mod metadata;

/// oEmbed provider classification and lookup.
pub mod oembed;

/// Page fetching (the `Fetcher` seam and its reqwest implementation).
pub mod fetch;

/// Character encoding detection and transcoding.
pub mod encoding;

/// URL utilities for validation, resolution, and hostname matching.
pub mod url_utils;

mod resolver;

// Public API - re-exports
pub use dates::{
    normalize_date, parse_flexible_date, resolve_published_date, resolve_published_date_with_source,
    resolve_relative_date, DateContext, DateSource,
};
pub use error::{Error, Result};
pub use fetch::{FetchedPage, Fetcher, HttpFetcher};
pub use metadata::extract_html_metadata;
pub use oembed::{is_oembed_provider, Provider};
pub use options::{Options, SlashDateOrder, DEFAULT_USER_AGENT};
pub use resolver::{resolve, MetadataResolver};
pub use result::{ContentType, PartialMetadata, ResolvedMetadata};
