//! HTTP date formatting

use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Deserializer};

/// Output patterns for header dates
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DateFormat {
    /// `Mon, 01 Jan 2001 00:00:00 GMT`
    #[default]
    Normal,
    /// Seconds dropped, for comparisons that must not race the clock
    Test,
}

impl DateFormat {
    /// Look up a format by key; unknown keys give [`DateFormat::Normal`]
    pub fn from_key(key: &str) -> Self {
        match key {
            "test" => DateFormat::Test,
            _ => DateFormat::Normal,
        }
    }

    /// chrono pattern, without the zone suffix
    pub fn pattern(&self) -> &'static str {
        match self {
            DateFormat::Normal => "%a, %d %b %Y %H:%M:%S",
            DateFormat::Test => "%a, %d %b %Y %H:%M",
        }
    }
}

impl<'de> Deserialize<'de> for DateFormat {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let key = String::deserialize(deserializer)?;
        Ok(DateFormat::from_key(&key))
    }
}

/// 9999-12-31 23:59:59 UTC, the last instant with a four-digit year
pub const MAX_HTTP_DATE_SECS: i64 = 253_402_300_799;

/// Latest instant an HTTP date can express
pub fn latest_http_date() -> DateTime<Utc> {
    DateTime::from_timestamp(MAX_HTTP_DATE_SECS, 0).unwrap_or(DateTime::<Utc>::MAX_UTC)
}

/// Format an instant for a header; always ends in `GMT`
///
/// Instants past the year 9999 are written as the last second of 9999.
pub fn format_http_date(instant: DateTime<Utc>, format: DateFormat) -> String {
    let instant = instant.min(latest_http_date());
    format!("{} GMT", instant.format(format.pattern()))
}

/// `base` plus `secs` seconds, saturating at [`latest_http_date`]
pub fn add_time(base: DateTime<Utc>, secs: u64) -> DateTime<Utc> {
    i64::try_from(secs)
        .ok()
        .and_then(TimeDelta::try_seconds)
        .and_then(|delta| base.checked_add_signed(delta))
        .unwrap_or(DateTime::<Utc>::MAX_UTC)
        .min(latest_http_date())
}

/// The most recent of a set of instants
pub fn latest_timestamp<I>(instants: I) -> Option<DateTime<Utc>>
where
    I: IntoIterator<Item = DateTime<Utc>>,
{
    instants.into_iter().max()
}
