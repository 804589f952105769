//! Flexible and relative date parsing.
//!
//! Every date candidate found on a page, in a URL, or in an oEmbed response is
//! normalized here. A candidate is accepted only when it lands on a calendar
//! date inside the sanity window `1990 < year <= today.year + 1`.

use chrono::{DateTime, Datelike, Days, Months, NaiveDate, NaiveDateTime, Utc};
use regex::Regex;
use std::sync::LazyLock;

use crate::options::SlashDateOrder;

// ============================================================
// REGEX PATTERNS
// ============================================================

/// `<count> <unit>[s] ago`, unit one of day / month / year
#[allow(clippy::expect_used)]
static RELATIVE_DATE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(\d+)\s*(day|month|year)s?\s+ago\b").expect("valid regex")
});

/// `D/D/YYYY` with one or two digit leading parts
#[allow(clippy::expect_used)]
static SLASH_DATE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(\d{1,2})/(\d{1,2})/(\d{4})\b").expect("valid regex")
});

/// Ordinal suffixes: `10th` -> `10`
#[allow(clippy::expect_used)]
static ORDINAL_SUFFIX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(\d{1,2})(?:st|nd|rd|th)\b").expect("valid regex")
});

/// Leading label some platforms put in front of the date
#[allow(clippy::expect_used)]
static DATE_LABEL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(?:premiered|streamed live on|streamed live|published on|posted on|published|posted|updated|uploaded on)\s*:?\s*")
        .expect("valid regex")
});

/// ISO calendar date at the start of a longer string
#[allow(clippy::expect_used)]
static LEADING_ISO_DATE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\d{4})-(\d{1,2})-(\d{1,2})").expect("valid regex")
});

/// A standalone four-digit year
#[allow(clippy::expect_used)]
static FOUR_DIGIT_YEAR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?:^|\D)(?:19|20)\d{2}(?:\D|$)").expect("valid regex"));

/// Date-time layouts with an explicit offset that RFC 3339 rejects.
const OFFSET_DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f%z",
    "%Y-%m-%dT%H:%M:%S%z",
    "%Y-%m-%d %H:%M:%S%.f%z",
    "%Y-%m-%d %H:%M:%S%z",
];

/// Naive date-time layouts.
const NAIVE_DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y/%m/%d %H:%M:%S",
    "%Y/%m/%d %H:%M",
];

/// Date-only layouts. `%B` also accepts abbreviated month names, `%A` abbreviated weekdays.
const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%Y.%m.%d",
    "%Y%m%d",
    "%B %d, %Y",
    "%B %d %Y",
    "%B. %d, %Y",
    "%d %B %Y",
    "%d %B, %Y",
    "%d-%B-%Y",
    "%A, %B %d, %Y",
    "%A %B %d, %Y",
    "%A, %d %B %Y",
    "%A %B %d %Y",
];

// ============================================================
// CONTEXT
// ============================================================

/// Anchors date parsing to a fixed "today" and slash-date convention.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateContext {
    /// Reference date for relative expressions and the sanity window.
    pub today: NaiveDate,
    /// Preferred reading of ambiguous `D/D/YYYY`.
    pub slash_order: SlashDateOrder,
}

impl DateContext {
    /// Month-first context anchored at `today`.
    #[must_use]
    pub fn new(today: NaiveDate) -> Self {
        Self {
            today,
            slash_order: SlashDateOrder::MonthFirst,
        }
    }

    /// Same context with a different slash-date preference.
    #[must_use]
    pub fn with_slash_order(mut self, slash_order: SlashDateOrder) -> Self {
        self.slash_order = slash_order;
        self
    }

    /// Whether `date` falls in `1990 < year <= today.year + 1`.
    #[must_use]
    pub fn is_plausible(&self, date: NaiveDate) -> bool {
        date.year() > 1990 && date.year() <= self.today.year() + 1
    }
}

// ============================================================
// FLEXIBLE DATE PARSER
// ============================================================

/// Parse a heterogeneous date string into a calendar date.
///
/// Tried in order, first plausible result wins:
/// 1. strings containing `ago` go to [`resolve_relative_date`] exclusively
/// 2. ISO 8601 / RFC 3339 / RFC 2822 / month-name layouts
/// 3. month-name layouts followed by a time of day (`June 10, 2024 10:00 AM`)
/// 4. `D/D/YYYY`, in the context's preferred order, then the other order
/// 5. `dateparser` for anything else carrying a four-digit year
///
/// Results outside the sanity window are rejected rather than returned.
#[must_use]
pub fn parse_flexible_date(raw: &str, ctx: &DateContext) -> Option<NaiveDate> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if raw.to_ascii_lowercase().contains("ago") {
        return resolve_relative_date(raw, ctx.today).filter(|d| ctx.is_plausible(*d));
    }

    let cleaned = clean_date_text(raw);
    let keep = |date: Option<NaiveDate>| date.filter(|d| ctx.is_plausible(*d));

    keep(parse_native(raw, &cleaned, ctx))
        .or_else(|| keep(parse_date_prefix(&cleaned, ctx)))
        .or_else(|| keep(parse_slash_date(raw, ctx.slash_order)))
        .or_else(|| keep(parse_fallback(raw)))
}

/// [`parse_flexible_date`] serialized as `YYYY-MM-DD`.
#[must_use]
pub fn normalize_date(raw: &str, ctx: &DateContext) -> Option<String> {
    parse_flexible_date(raw, ctx).map(|date| date.format("%Y-%m-%d").to_string())
}

/// Best-effort parse without relative or slash handling.
fn parse_native(raw: &str, cleaned: &str, ctx: &DateContext) -> Option<NaiveDate> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.date_naive());
    }

    if let Ok(dt) = DateTime::parse_from_rfc2822(raw) {
        return Some(dt.date_naive());
    }

    for fmt in OFFSET_DATETIME_FORMATS {
        if let Ok(dt) = DateTime::parse_from_str(raw, fmt) {
            return Some(dt.date_naive());
        }
    }

    for fmt in NAIVE_DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(raw, fmt) {
            return Some(dt.date());
        }
    }

    // "June 2024" -> first of the month
    if let Ok(date) = NaiveDate::parse_from_str(&format!("1 {cleaned}"), "%d %B %Y") {
        return Some(date);
    }

    // "May 2023" also reads as `%B %d %Y` in year 23
    let table = DATE_FORMATS
        .iter()
        .filter_map(|fmt| NaiveDate::parse_from_str(cleaned, fmt).ok())
        .find(|d| ctx.is_plausible(*d));
    if table.is_some() {
        return table;
    }

    // "2024-06-10 10:00 UTC", "2024-06-10T10:00:00.000+0000Z" and friends
    let caps = LEADING_ISO_DATE.captures(cleaned)?;
    let year = caps.get(1)?.as_str().parse().ok()?;
    let month = caps.get(2)?.as_str().parse().ok()?;
    let day = caps.get(3)?.as_str().parse().ok()?;
    NaiveDate::from_ymd_opt(year, month, day)
}

/// A date layout at the start of `cleaned`, ignoring whatever follows it.
///
/// The remainder must begin at a separator so `June 10, 20245` stays
/// unparsed. The written calendar date is kept; a trailing time or zone
/// never shifts the day.
fn parse_date_prefix(cleaned: &str, ctx: &DateContext) -> Option<NaiveDate> {
    DATE_FORMATS.iter().find_map(|fmt| {
        let (date, rest) = NaiveDate::parse_and_remainder(cleaned, fmt).ok()?;
        let boundary = rest
            .chars()
            .next()
            .is_some_and(|c| c.is_whitespace() || matches!(c, ',' | 'T' | '|' | '@' | '-'));
        (boundary && ctx.is_plausible(date)).then_some(date)
    })
}

/// Last resort for layouts none of the tables cover.
///
/// Only tried when a four-digit year is present, since `dateparser` fills a
/// missing date from the wall clock.
fn parse_fallback(raw: &str) -> Option<NaiveDate> {
    if !FOUR_DIGIT_YEAR.is_match(raw) {
        return None;
    }
    dateparser::parse_with_timezone(raw, &Utc)
        .ok()
        .map(|dt| dt.date_naive())
}

/// Strip labels and ordinal suffixes, collapse whitespace.
fn clean_date_text(raw: &str) -> String {
    let text = DATE_LABEL.replace(raw.trim(), "");
    let text = ORDINAL_SUFFIX.replace_all(&text, "$1");
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Parse the first `D/D/YYYY` in `raw`, preferred order first.
fn parse_slash_date(raw: &str, order: SlashDateOrder) -> Option<NaiveDate> {
    let caps = SLASH_DATE.captures(raw)?;
    let first: u32 = caps.get(1)?.as_str().parse().ok()?;
    let second: u32 = caps.get(2)?.as_str().parse().ok()?;
    let year: i32 = caps.get(3)?.as_str().parse().ok()?;

    let month_first = NaiveDate::from_ymd_opt(year, first, second);
    let day_first = NaiveDate::from_ymd_opt(year, second, first);

    match order {
        SlashDateOrder::MonthFirst => month_first.or(day_first),
        SlashDateOrder::DayFirst => day_first.or(month_first),
    }
}

// ============================================================
// RELATIVE DATE RESOLVER
// ============================================================

/// Resolve `"<n> days|months|years ago"` against `today`.
///
/// Months and years use calendar arithmetic; `2024-03-31` minus one month is
/// `2024-02-29`. Any other phrasing, or an overflowing count, yields `None`.
#[must_use]
pub fn resolve_relative_date(raw: &str, today: NaiveDate) -> Option<NaiveDate> {
    let caps = RELATIVE_DATE.captures(raw)?;
    let count: u32 = caps.get(1)?.as_str().parse().ok()?;
    let unit = caps.get(2)?.as_str().to_ascii_lowercase();

    match unit.as_str() {
        "day" => today.checked_sub_days(Days::new(u64::from(count))),
        "month" => today.checked_sub_months(Months::new(count)),
        "year" => today.checked_sub_months(Months::new(count.checked_mul(12)?)),
        _ => None,
    }
}
