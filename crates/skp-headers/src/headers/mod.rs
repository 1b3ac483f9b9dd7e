//! Per-request header orchestration

mod additional;

pub use additional::AdditionalHeaders;

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use http::HeaderMap;
use skp_headers_core::{CachePolicy, PathPolicyMap, PolicyKind, Result};
use skp_headers_http::{
    DateFormat, ExpiresOptions, FixedTimestamp, HeaderConvention, HeaderResult, HeaderSet,
    PathTimestamp, TimestampSource, generate_expires, last_modified_header, synthesize,
};
use tracing::debug;

use crate::config::{CacheHeadersConfig, LastModifiedSource};

static DEFAULTS: PolicyKind = PolicyKind::Absent;

/// Which rule produced a request's policy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PolicySource<'a> {
    /// `cacheSettings`
    Override,
    /// A configured path pattern
    Pattern(&'a str),
    /// Nothing matched
    Default,
}

/// Result of resolving a request path
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resolution<'a> {
    pub source: PolicySource<'a>,
    pub kind: &'a PolicyKind,
}

/// Builds the caching headers for each request path
///
/// Everything is compiled in [`CacheHeaders::new`]; afterwards the value is
/// read-only and can be shared across threads.
#[derive(Clone)]
pub struct CacheHeaders {
    settings: Option<PolicyKind>,
    paths: PathPolicyMap,
    convention: HeaderConvention,
    expires: bool,
    date_format: DateFormat,
    last_modified: Option<Arc<dyn TimestampSource>>,
    lookup_timeout: Duration,
    overwrite: bool,
}

impl CacheHeaders {
    /// Compile a configuration
    ///
    /// Fails on malformed glob patterns and unsupported policy values.
    pub fn new(config: CacheHeadersConfig) -> Result<Self> {
        let paths = PathPolicyMap::from_values(config.paths)?;
        let settings = config
            .cache_settings
            .filter(|policy| !policy.is_default())
            .map(PolicyKind::Structured);
        let last_modified = config.last_modified.map(|source| -> Arc<dyn TimestampSource> {
            match source {
                LastModifiedSource::Instant(instant) => Arc::new(FixedTimestamp(instant)),
                LastModifiedSource::Path(path) => Arc::new(PathTimestamp::new(path)),
            }
        });

        debug!(
            target: "skp_headers",
            patterns = paths.len(),
            has_override = settings.is_some(),
            convention = ?config.convention,
            "cache headers configured"
        );

        Ok(Self {
            settings,
            paths,
            convention: config.convention,
            expires: config.expires,
            date_format: config.date_format,
            last_modified,
            lookup_timeout: Duration::from_millis(config.lookup_timeout_ms),
            overwrite: config.overwrite,
        })
    }

    /// Use a custom `Last-Modified` source
    pub fn with_timestamp_source(mut self, source: impl TimestampSource) -> Self {
        self.last_modified = Some(Arc::new(source));
        self
    }

    /// Whether headers already on a response are replaced
    pub fn overwrite(&self) -> bool {
        self.overwrite
    }

    /// Find the policy for a request path; any query string is ignored
    pub fn policy_for<'a>(&'a self, path: &str) -> Resolution<'a> {
        if let Some(kind) = &self.settings {
            return Resolution {
                source: PolicySource::Override,
                kind,
            };
        }

        let path = strip_query(path);
        match self.paths.resolve(path) {
            Some(found) => Resolution {
                source: PolicySource::Pattern(found.pattern),
                kind: found.kind,
            },
            None => Resolution {
                source: PolicySource::Default,
                kind: &DEFAULTS,
            },
        }
    }

    /// Synchronous headers for a path: cache directives and `Expires`
    pub fn headers_for(&self, path: &str) -> HeaderSet {
        self.headers_for_at(path, Utc::now())
    }

    /// Like [`headers_for`](Self::headers_for), with `Expires` counted from `now`
    pub fn headers_for_at(&self, path: &str, now: DateTime<Utc>) -> HeaderSet {
        let resolution = self.policy_for(path);
        debug!(
            target: "skp_headers",
            path = %path,
            source = ?resolution.source,
            kind = resolution.kind.as_str(),
            "resolved cache policy"
        );

        let mut headers = synthesize(resolution.kind, self.convention);
        if self.expires {
            if let Some(max_age) = expires_max_age(resolution.kind) {
                let options = ExpiresOptions::new()
                    .max_age(max_age)
                    .base(now)
                    .format(self.date_format);
                headers.push(generate_expires(&options));
            }
        }
        headers
    }

    /// `Last-Modified`, when a source is configured
    ///
    /// Lookup failures and timeouts give the current time.
    pub async fn last_modified(&self) -> Option<HeaderResult> {
        let source = self.last_modified.as_deref()?;
        Some(last_modified_header(source, self.lookup_timeout, self.date_format).await)
    }

    /// Every header for a path, `Last-Modified` included
    pub async fn headers(&self, path: &str) -> HeaderSet {
        let mut headers = self.headers_for(path);
        if let Some(header) = self.last_modified().await {
            headers.push(header);
        }
        headers
    }

    /// Write every header for `path` onto a response header map
    pub async fn apply(&self, path: &str, target: &mut HeaderMap) {
        self.headers(path).await.apply(target, self.overwrite);
    }
}

impl fmt::Debug for CacheHeaders {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CacheHeaders")
            .field("settings", &self.settings)
            .field("paths", &self.paths)
            .field("convention", &self.convention)
            .field("expires", &self.expires)
            .field("date_format", &self.date_format)
            .field(
                "last_modified",
                &self.last_modified.as_ref().map(|source| source.describe()),
            )
            .field("lookup_timeout", &self.lookup_timeout)
            .field("overwrite", &self.overwrite)
            .finish()
    }
}

impl TryFrom<CacheHeadersConfig> for CacheHeaders {
    type Error = skp_headers_core::HeaderError;

    fn try_from(config: CacheHeadersConfig) -> Result<Self> {
        Self::new(config)
    }
}

/// `Expires` follows the browser max-age; verbatim values get none
fn expires_max_age(kind: &PolicyKind) -> Option<u64> {
    match kind {
        PolicyKind::Verbatim(_) => None,
        PolicyKind::NoStore => Some(0),
        other => Some(
            other
                .to_policy()
                .map(|policy| effective_max_age(&policy))
                .unwrap_or_else(|| CachePolicy::default().resolved_max_age()),
        ),
    }
}

fn effective_max_age(policy: &CachePolicy) -> u64 {
    if policy.set_no_cache {
        0
    } else {
        policy.resolved_max_age()
    }
}

fn strip_query(path: &str) -> &str {
    path.split(['?', '#']).next().unwrap_or(path)
}
