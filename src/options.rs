//! Configuration options for metadata resolution.
//!
//! The `Options` struct controls network behavior (timeout, User-Agent, body
//! cap, oEmbed endpoint) and date interpretation.

use std::time::Duration;

use chrono::NaiveDate;

/// Default User-Agent sent with every outbound request.
pub const DEFAULT_USER_AGENT: &str = concat!(
    "rs-linkmeta/",
    env!("CARGO_PKG_VERSION"),
    " (+https://github.com/Murrough-Foley/rs-linkmeta; metadata resolver)"
);

/// How to read an ambiguous `D/D/YYYY` date such as `03/04/2024`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SlashDateOrder {
    /// `03/04/2024` is March 4th. Day-first is tried only when this reading
    /// is not a valid calendar date.
    #[default]
    MonthFirst,
    /// `03/04/2024` is April 3rd. Month-first is tried only when this reading
    /// is not a valid calendar date.
    DayFirst,
}

/// Configuration options for metadata resolution.
///
/// All fields are public for easy configuration. Use `Default::default()`
/// for standard settings.
///
/// # Example
///
/// ```rust
/// use std::time::Duration;
/// use rs_linkmeta::{Options, SlashDateOrder};
///
/// let options = Options {
///     timeout: Duration::from_secs(5),
///     slash_date_order: SlashDateOrder::DayFirst,
///     ..Options::default()
/// };
/// assert_eq!(options.timeout, Duration::from_secs(5));
/// ```
#[derive(Debug, Clone)]
pub struct Options {
    /// Upper bound for each outbound request (oEmbed call, page fetch).
    ///
    /// A timeout is treated the same as any other fetch failure.
    ///
    /// Default: 10 seconds
    pub timeout: Duration,

    /// User-Agent header sent with every request.
    ///
    /// Default: [`DEFAULT_USER_AGENT`]
    pub user_agent: String,

    /// Maximum number of body bytes read from a response.
    ///
    /// Longer bodies are truncated; page metadata lives in the head, so
    /// the tail is rarely needed.
    ///
    /// Default: 5 MiB
    pub max_body_bytes: usize,

    /// Override the oEmbed endpoint for every provider.
    ///
    /// When set, requests go to `{oembed_endpoint}?url=...&format=json`
    /// instead of the provider's own endpoint. Useful for oEmbed proxies.
    ///
    /// Default: `None`
    pub oembed_endpoint: Option<String>,

    /// Preferred reading of ambiguous slash-delimited dates.
    ///
    /// Default: [`SlashDateOrder::MonthFirst`]
    pub slash_date_order: SlashDateOrder,

    /// Fixed "today" for relative dates and the year sanity window.
    ///
    /// Default: `None` (current UTC date at resolution time)
    pub reference_date: Option<NaiveDate>,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(10),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            max_body_bytes: 5 * 1024 * 1024,
            oembed_endpoint: None,
            slash_date_order: SlashDateOrder::MonthFirst,
            reference_date: None,
        }
    }
}

impl Options {
    /// Set the per-request timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the User-Agent header.
    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Today's date as seen by date parsing.
    #[must_use]
    pub fn today(&self) -> NaiveDate {
        self.reference_date
            .unwrap_or_else(|| chrono::Utc::now().date_naive())
    }
}
