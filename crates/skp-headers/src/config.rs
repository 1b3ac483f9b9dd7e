//! Middleware configuration

use std::path::PathBuf;
use std::time::Duration;

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::Deserialize;
use serde_json::Value;
use skp_headers_core::{CachePolicy, Result};
use skp_headers_http::{DateFormat, HeaderConvention};

/// Default bound on a filesystem timestamp lookup
pub const DEFAULT_LOOKUP_TIMEOUT_MS: u64 = 1000;

/// Where `Last-Modified` comes from
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum LastModifiedSource {
    /// A fixed RFC 3339 instant
    Instant(DateTime<Utc>),
    /// A file, or a directory whose newest file is used
    Path(PathBuf),
}

/// Configuration for [`CacheHeaders`](crate::CacheHeaders)
///
/// Read once when the middleware is built. Keys follow the camelCase
/// spelling of the JSON form:
///
/// ```json
/// {
///   "cacheSettings": { "maxAge": 60 },
///   "paths": { "/static/**": "ONE_YEAR", "/api/**": false },
///   "convention": "surrogate",
///   "expires": true,
///   "lastModified": { "path": "./public" },
///   "lookupTimeoutMs": 1000,
///   "overwrite": false
/// }
/// ```
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CacheHeadersConfig {
    /// Applies to every request, ahead of path matching
    pub cache_settings: Option<CachePolicy>,
    /// Glob pattern to raw policy value, in registration order
    pub paths: IndexMap<String, Value>,
    pub convention: HeaderConvention,
    /// Also emit `Expires`
    pub expires: bool,
    pub last_modified: Option<LastModifiedSource>,
    pub date_format: DateFormat,
    pub lookup_timeout_ms: u64,
    /// Replace headers already set on the response
    pub overwrite: bool,
}

impl Default for CacheHeadersConfig {
    fn default() -> Self {
        Self {
            cache_settings: None,
            paths: IndexMap::new(),
            convention: HeaderConvention::default(),
            expires: false,
            last_modified: None,
            date_format: DateFormat::default(),
            lookup_timeout_ms: DEFAULT_LOOKUP_TIMEOUT_MS,
            overwrite: false,
        }
    }
}

impl CacheHeadersConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse the JSON form
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read from an already parsed JSON value
    pub fn from_value(value: Value) -> Result<Self> {
        Ok(serde_json::from_value(value)?)
    }

    /// Global policy, overriding every path
    pub fn cache_settings(mut self, policy: impl Into<CachePolicy>) -> Self {
        self.cache_settings = Some(policy.into());
        self
    }

    /// Register a pattern; `value` takes the same shapes as the JSON form
    pub fn path(mut self, pattern: impl Into<String>, value: impl Into<Value>) -> Self {
        self.paths.insert(pattern.into(), value.into());
        self
    }

    pub fn convention(mut self, convention: HeaderConvention) -> Self {
        self.convention = convention;
        self
    }

    pub fn expires(mut self, enabled: bool) -> Self {
        self.expires = enabled;
        self
    }

    pub fn last_modified_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.last_modified = Some(LastModifiedSource::Path(path.into()));
        self
    }

    pub fn last_modified_at(mut self, instant: DateTime<Utc>) -> Self {
        self.last_modified = Some(LastModifiedSource::Instant(instant));
        self
    }

    pub fn date_format(mut self, format: DateFormat) -> Self {
        self.date_format = format;
        self
    }

    pub fn lookup_timeout(mut self, timeout: Duration) -> Self {
        self.lookup_timeout_ms = timeout.as_millis().try_into().unwrap_or(u64::MAX);
        self
    }

    pub fn overwrite(mut self, enabled: bool) -> Self {
        self.overwrite = enabled;
        self
    }

    pub fn lookup_timeout_duration(&self) -> Duration {
        Duration::from_millis(self.lookup_timeout_ms)
    }
}
