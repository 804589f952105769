//! Error types for rs-linkmeta.
//!
//! These errors are produced by the fetch and oEmbed layers. The public
//! resolution entry point never returns them: every variant degrades into a
//! partial or minimal [`crate::ResolvedMetadata`] instead.

/// Error type for fetch and oEmbed operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The input could not be parsed as an absolute URL.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// The URL scheme is not http or https.
    #[error("Unsupported URL scheme: {0}")]
    UnsupportedScheme(String),

    /// Transport-level failure (DNS, TLS, connection reset, body read).
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The server answered with a non-2xx status.
    #[error("HTTP {0} response")]
    Status(u16),

    /// The request did not complete within the configured timeout.
    #[error("Request timed out")]
    Timeout,

    /// The oEmbed response was unusable (no fields, unsupported shape).
    #[error("oEmbed failed: {0}")]
    OEmbed(String),

    /// A JSON payload could not be decoded.
    #[error("JSON decoding failed: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Whether the error came from the network rather than the payload.
    #[must_use]
    pub fn is_transport(&self) -> bool {
        matches!(self, Error::Http(_) | Error::Status(_) | Error::Timeout)
    }
}

/// Result type alias for fetch and oEmbed operations.
pub type Result<T> = std::result::Result<T, Error>;
