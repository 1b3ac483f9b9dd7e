//! `Expires` and `Last-Modified` headers

use chrono::{DateTime, Utc};
use http::header::{EXPIRES, LAST_MODIFIED};
use skp_headers_core::TimeValue;
use skp_headers_core::time::TEN_MINUTES;

use crate::dates::{DateFormat, add_time, format_http_date};
use crate::response::HeaderResult;

/// Options for [`generate_expires`]
#[derive(Debug, Clone, Default)]
pub struct ExpiresOptions {
    /// Offset from `base`; ten minutes when absent, matching the default max-age
    pub max_age: Option<TimeValue>,
    /// Start instant; now when absent
    pub base: Option<DateTime<Utc>>,
    pub format: DateFormat,
}

impl ExpiresOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn max_age(mut self, value: impl Into<TimeValue>) -> Self {
        self.max_age = Some(value.into());
        self
    }

    pub fn base(mut self, instant: DateTime<Utc>) -> Self {
        self.base = Some(instant);
        self
    }

    pub fn format(mut self, format: DateFormat) -> Self {
        self.format = format;
        self
    }
}

/// `Expires: <base + max_age>`
pub fn generate_expires(options: &ExpiresOptions) -> HeaderResult {
    let base = options.base.unwrap_or_else(Utc::now);
    let offset = options
        .max_age
        .as_ref()
        .map(TimeValue::resolve)
        .unwrap_or(TEN_MINUTES);
    HeaderResult::generated(
        EXPIRES,
        format_http_date(add_time(base, offset), options.format),
    )
}

/// `Last-Modified: <instant>`
pub fn generate_last_modified(instant: DateTime<Utc>, format: DateFormat) -> HeaderResult {
    HeaderResult::generated(LAST_MODIFIED, format_http_date(instant, format))
}
