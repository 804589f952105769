//! Page fetching.
//!
//! The resolver only needs "GET a URL, give me its text". That capability is
//! the [`Fetcher`] trait; [`HttpFetcher`] is the reqwest implementation used in
//! production, and tests substitute their own.

use async_trait::async_trait;
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use reqwest::redirect::Policy;
use reqwest::Client;
use url::Url;

use crate::encoding;
use crate::error::{Error, Result};
use crate::options::Options;

const ACCEPT_VALUE: &str = "text/html,application/xhtml+xml,application/json;q=0.9,*/*;q=0.8";
const MAX_REDIRECTS: usize = 10;

/// A successfully fetched (2xx) response, decoded to UTF-8.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchedPage {
    /// Final URL after redirects.
    pub url: String,
    /// HTTP status code.
    pub status: u16,
    /// `Content-Type` header value, if any.
    pub content_type: Option<String>,
    /// Decoded body, possibly truncated to the configured cap.
    pub body: String,
}

/// Source of page bytes.
#[async_trait]
pub trait Fetcher: Send + Sync {
    /// GET `url`. Non-2xx statuses are errors.
    async fn fetch(&self, url: &str) -> Result<FetchedPage>;
}

/// reqwest-backed fetcher with a fixed User-Agent, timeout and body cap.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
    max_body_bytes: usize,
}

impl HttpFetcher {
    /// Build a client from `options` (User-Agent, timeout, body cap).
    ///
    /// # Errors
    ///
    /// Returns [`Error::Http`] if the TLS backend cannot be initialized.
    pub fn new(options: &Options) -> Result<Self> {
        let client = Client::builder()
            .user_agent(options.user_agent.as_str())
            .timeout(options.timeout)
            .connect_timeout(options.timeout)
            .redirect(Policy::limited(MAX_REDIRECTS))
            .build()?;

        Ok(Self {
            client,
            max_body_bytes: options.max_body_bytes,
        })
    }

    /// Wrap an existing client (shared connection pool).
    #[must_use]
    pub fn with_client(client: Client, max_body_bytes: usize) -> Self {
        Self {
            client,
            max_body_bytes,
        }
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<FetchedPage> {
        let parsed = Url::parse(url).map_err(|_| Error::InvalidUrl(url.to_string()))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(Error::UnsupportedScheme(parsed.scheme().to_string()));
        }

        tracing::trace!(url = %parsed, "GET");

        let mut response = self
            .client
            .get(parsed)
            .header(ACCEPT, ACCEPT_VALUE)
            .send()
            .await
            .map_err(classify)?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::Status(status.as_u16()));
        }

        let final_url = response.url().to_string();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);

        let mut bytes: Vec<u8> = Vec::new();
        while let Some(chunk) = response.chunk().await.map_err(classify)? {
            let remaining = self.max_body_bytes.saturating_sub(bytes.len());
            if chunk.len() >= remaining {
                bytes.extend_from_slice(&chunk[..remaining]);
                tracing::debug!(url = %final_url, cap = self.max_body_bytes, "body truncated");
                break;
            }
            bytes.extend_from_slice(&chunk);
        }

        let body = encoding::decode_body(&bytes, content_type.as_deref());

        Ok(FetchedPage {
            url: final_url,
            status: status.as_u16(),
            content_type,
            body,
        })
    }
}

/// Timeouts get their own variant; everything else is transport.
fn classify(err: reqwest::Error) -> Error {
    if err.is_timeout() {
        Error::Timeout
    } else {
        Error::Http(err)
    }
}
