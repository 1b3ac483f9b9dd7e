//! Cache policy and builder

use std::time::Duration;

use serde::Deserialize;

use crate::time::{TEN_MINUTES, TimeValue, deserialize_optional};

/// Normalized caching policy for one response
///
/// Every field is optional. Absent durations are disabled, except
/// `max_age` which defaults to [`TEN_MINUTES`].
///
/// Deserializes from camelCase field names (`maxAge`, `sMaxAge`, ...) as
/// well as the directive names they produce (`max-age`, `s-maxage`, ...).
/// Unknown keys are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CachePolicy {
    /// Browser cache length
    #[serde(default, alias = "max-age", deserialize_with = "deserialize_optional")]
    pub max_age: Option<TimeValue>,
    /// CDN cache length
    #[serde(
        default,
        alias = "s-maxage",
        alias = "surrogateControl",
        alias = "Surrogate-Control",
        deserialize_with = "deserialize_optional"
    )]
    pub s_max_age: Option<TimeValue>,
    /// Window for serving stale content while refreshing in the background
    #[serde(
        default,
        alias = "stale-while-revalidate",
        alias = "staleWhileRevalidate",
        deserialize_with = "deserialize_optional"
    )]
    pub stale_revalidate: Option<TimeValue>,
    /// Window for serving stale content when the origin errors
    #[serde(
        default,
        alias = "stale-if-error",
        alias = "staleIfError",
        deserialize_with = "deserialize_optional"
    )]
    pub stale_error: Option<TimeValue>,
    /// Force `no-cache, max-age=0`, ignoring every duration
    #[serde(default, alias = "no-cache")]
    pub set_no_cache: bool,
    /// Mark the response `private`; ignored when `s_max_age` is set
    // user-specific pages only, e.g. account pages
    #[serde(default, alias = "private")]
    pub set_private: bool,
}

impl CachePolicy {
    /// Create an empty policy (all defaults)
    pub fn new() -> Self {
        Self::default()
    }

    /// The no-store policy that a `false` path value stands for
    pub fn no_store() -> Self {
        Self {
            max_age: Some(TimeValue::Seconds(0)),
            s_max_age: Some(TimeValue::Seconds(0)),
            set_no_cache: true,
            ..Default::default()
        }
    }

    /// The same duration for browser and CDN
    pub fn shared(secs: u64) -> Self {
        Self {
            max_age: Some(TimeValue::Seconds(secs)),
            s_max_age: Some(TimeValue::Seconds(secs)),
            ..Default::default()
        }
    }

    /// Resolved browser max-age, defaulting to ten minutes
    pub fn resolved_max_age(&self) -> u64 {
        self.max_age
            .as_ref()
            .map(TimeValue::resolve)
            .unwrap_or(TEN_MINUTES)
    }

    /// Whether `private` ends up in the header
    pub fn emits_private(&self) -> bool {
        self.set_private && self.s_max_age.is_none()
    }

    /// True when no field differs from the defaults
    pub fn is_default(&self) -> bool {
        *self == Self::default()
    }
}

/// Builder for CachePolicy with fluent API
#[derive(Debug, Clone, Default)]
pub struct PolicyOpts(CachePolicy);

impl PolicyOpts {
    /// Create new policy builder
    pub fn new() -> Self {
        Self::default()
    }

    /// Set browser max-age (seconds, numeric string or time name)
    pub fn max_age(mut self, value: impl Into<TimeValue>) -> Self {
        self.0.max_age = Some(value.into());
        self
    }

    /// Set CDN max-age
    pub fn s_max_age(mut self, value: impl Into<TimeValue>) -> Self {
        self.0.s_max_age = Some(value.into());
        self
    }

    /// Set stale-while-revalidate window
    pub fn stale_revalidate(mut self, value: impl Into<TimeValue>) -> Self {
        self.0.stale_revalidate = Some(value.into());
        self
    }

    /// Set stale-if-error window
    pub fn stale_error(mut self, value: impl Into<TimeValue>) -> Self {
        self.0.stale_error = Some(value.into());
        self
    }

    /// Send `no-cache`
    pub fn no_cache(mut self) -> Self {
        self.0.set_no_cache = true;
        self
    }

    /// Send `private` (unless a CDN max-age is set)
    pub fn private(mut self) -> Self {
        self.0.set_private = true;
        self
    }

    /// Build the policy
    pub fn build(self) -> CachePolicy {
        self.0
    }
}

impl From<PolicyOpts> for CachePolicy {
    fn from(opts: PolicyOpts) -> Self {
        opts.0
    }
}

impl From<Duration> for CachePolicy {
    fn from(max_age: Duration) -> Self {
        CachePolicy {
            max_age: Some(TimeValue::Seconds(max_age.as_secs())),
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::{ONE_DAY, ONE_WEEK};

    #[test]
    fn test_builder_default() {
        let policy = PolicyOpts::new().build();
        assert!(policy.is_default());
        assert_eq!(policy.resolved_max_age(), TEN_MINUTES);
    }

    #[test]
    fn test_builder_fluent() {
        let policy = PolicyOpts::new()
            .max_age(600)
            .s_max_age("ONE_WEEK")
            .stale_revalidate("30")
            .stale_error(ONE_DAY)
            .private()
            .build();

        assert_eq!(policy.max_age, Some(TimeValue::Seconds(600)));
        assert_eq!(policy.s_max_age.as_ref().map(TimeValue::resolve), Some(ONE_WEEK));
        assert_eq!(policy.stale_revalidate, Some(TimeValue::Seconds(30)));
        assert_eq!(policy.stale_error, Some(TimeValue::Seconds(ONE_DAY)));
        assert!(policy.set_private);
        assert!(!policy.emits_private());
    }

    #[test]
    fn test_from_duration() {
        let policy: CachePolicy = Duration::from_secs(300).into();
        assert_eq!(policy.resolved_max_age(), 300);
    }

    #[test]
    fn test_zero_is_not_unset() {
        let policy = PolicyOpts::new().max_age(0).build();
        assert_eq!(policy.resolved_max_age(), 0);
        assert!(!policy.is_default());
    }

    #[test]
    fn test_deserialize_field_names() {
        let policy: CachePolicy = serde_json::from_str(
            r#"{"maxAge": "ONE_DAY", "sMaxAge": 60, "staleRevalidate": 5, "staleError": "10", "setPrivate": true}"#,
        )
        .unwrap();
        assert_eq!(policy.resolved_max_age(), ONE_DAY);
        assert_eq!(policy.s_max_age, Some(TimeValue::Seconds(60)));
        assert_eq!(policy.stale_revalidate, Some(TimeValue::Seconds(5)));
        assert_eq!(policy.stale_error, Some(TimeValue::Seconds(10)));
        assert!(policy.set_private);
        assert!(!policy.set_no_cache);
    }

    #[test]
    fn test_deserialize_directive_aliases() {
        let policy: CachePolicy = serde_json::from_str(
            r#"{"max-age": 10, "Surrogate-Control": 300, "stale-while-revalidate": 400, "stale-if-error": 600, "no-cache": true}"#,
        )
        .unwrap();
        assert_eq!(policy.max_age, Some(TimeValue::Seconds(10)));
        assert_eq!(policy.s_max_age, Some(TimeValue::Seconds(300)));
        assert_eq!(policy.stale_revalidate, Some(TimeValue::Seconds(400)));
        assert_eq!(policy.stale_error, Some(TimeValue::Seconds(600)));
        assert!(policy.set_no_cache);
    }

    #[test]
    fn test_deserialize_ignores_unknown_and_disabled() {
        let policy: CachePolicy =
            serde_json::from_str(r#"{"notValid": 10, "sMaxAge": false, "staleError": null}"#)
                .unwrap();
        assert!(policy.is_default());
    }

    #[test]
    fn test_deserialize_rejects_bad_shapes() {
        assert!(serde_json::from_str::<CachePolicy>(r#"{"maxAge": [1]}"#).is_err());
        assert!(serde_json::from_str::<CachePolicy>(r#"{"maxAge": true}"#).is_err());
        assert!(serde_json::from_str::<CachePolicy>(r#"{"setPrivate": "yes"}"#).is_err());
    }
}
