use http::header::CACHE_CONTROL;
use skp_headers_core::{CachePolicy, TimeValue};

use crate::response::{HeaderResult, SURROGATE_CONTROL};

/// Cache-Control header directives
///
/// Rendered in a fixed order: `private`, `no-cache`, `max-age`, `s-maxage`,
/// `stale-while-revalidate`, `stale-if-error`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CacheControl {
    /// Private directive
    pub private: bool,
    /// No-cache directive
    pub no_cache: bool,
    /// Max age in seconds
    pub max_age: Option<u64>,
    /// S-Maxage (shared cache max age)
    pub s_maxage: Option<u64>,
    /// Stale-while-revalidate window
    pub stale_while_revalidate: Option<u64>,
    /// Stale-if-error window
    pub stale_if_error: Option<u64>,
}

impl CacheControl {
    /// All directives in one header
    ///
    /// `no-cache` replaces every duration with `max-age=0`. `private` is
    /// added only when no CDN max-age was given.
    pub fn combined(policy: Option<&CachePolicy>) -> Self {
        let Some(policy) = policy else {
            return Self::browser(None);
        };

        if policy.set_no_cache {
            return Self::browser(Some(policy));
        }

        Self {
            private: policy.emits_private(),
            no_cache: false,
            max_age: Some(policy.resolved_max_age()),
            s_maxage: resolve(&policy.s_max_age),
            stale_while_revalidate: resolve(&policy.stale_revalidate),
            stale_if_error: resolve(&policy.stale_error),
        }
    }

    /// Browser-facing directives only: `private`, `no-cache`, `max-age`
    pub fn browser(policy: Option<&CachePolicy>) -> Self {
        let Some(policy) = policy else {
            return Self {
                max_age: Some(CachePolicy::default().resolved_max_age()),
                ..Default::default()
            };
        };

        Self {
            private: policy.emits_private(),
            no_cache: policy.set_no_cache,
            max_age: Some(if policy.set_no_cache {
                0
            } else {
                policy.resolved_max_age()
            }),
            ..Default::default()
        }
    }

    /// CDN-facing directives for `Surrogate-Control`
    ///
    /// `max-age` is the CDN max-age when set, otherwise the browser max-age
    /// (defaults included). `no-cache` gives `max-age=0` and drops the stale
    /// windows; `private` does not apply here.
    pub fn surrogate(policy: Option<&CachePolicy>) -> Self {
        let default = CachePolicy::default();
        let policy = policy.unwrap_or(&default);
        if policy.set_no_cache {
            return Self {
                max_age: Some(0),
                ..Default::default()
            };
        }
        let max_age = match &policy.s_max_age {
            Some(value) => value.resolve(),
            None => policy.resolved_max_age(),
        };

        Self {
            max_age: Some(max_age),
            stale_while_revalidate: resolve(&policy.stale_revalidate),
            stale_if_error: resolve(&policy.stale_error),
            ..Default::default()
        }
    }

    /// Render as a header value string
    pub fn to_header_value(&self) -> String {
        let mut directives: Vec<String> = Vec::with_capacity(6);
        if self.private {
            directives.push("private".to_string());
        }
        if self.no_cache {
            directives.push("no-cache".to_string());
        }
        if let Some(secs) = self.max_age {
            directives.push(format!("max-age={secs}"));
        }
        if let Some(secs) = self.s_maxage {
            directives.push(format!("s-maxage={secs}"));
        }
        if let Some(secs) = self.stale_while_revalidate {
            directives.push(format!("stale-while-revalidate={secs}"));
        }
        if let Some(secs) = self.stale_if_error {
            directives.push(format!("stale-if-error={secs}"));
        }
        directives.join(", ")
    }
}

fn resolve(value: &Option<TimeValue>) -> Option<u64> {
    value.as_ref().map(TimeValue::resolve)
}

/// Build the combined `Cache-Control` header for a policy
///
/// `None` yields the defaults: `max-age=600`.
pub fn generate(policy: Option<&CachePolicy>) -> HeaderResult {
    HeaderResult::generated(
        CACHE_CONTROL,
        CacheControl::combined(policy).to_header_value(),
    )
}

/// Build the browser-only `Cache-Control` header
pub fn generate_browser(policy: Option<&CachePolicy>) -> HeaderResult {
    HeaderResult::generated(
        CACHE_CONTROL,
        CacheControl::browser(policy).to_header_value(),
    )
}

/// Build the `Surrogate-Control` header
pub fn generate_surrogate(policy: Option<&CachePolicy>) -> HeaderResult {
    HeaderResult::generated(
        SURROGATE_CONTROL,
        CacheControl::surrogate(policy).to_header_value(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use skp_headers_core::PolicyOpts;

    fn value(policy: CachePolicy) -> String {
        generate(Some(&policy)).value_str().to_string()
    }

    #[test]
    fn test_defaults() {
        assert_eq!(generate(None).value_str(), "max-age=600");
        assert_eq!(value(CachePolicy::new()), "max-age=600");
        assert_eq!(generate(None).name, CACHE_CONTROL);
    }

    #[test]
    fn test_all_fields_in_order() {
        let policy = PolicyOpts::new()
            .stale_error(600)
            .stale_revalidate(400)
            .s_max_age(300)
            .max_age(10)
            .build();
        assert_eq!(
            value(policy),
            "max-age=10, s-maxage=300, stale-while-revalidate=400, stale-if-error=600"
        );
    }

    #[test]
    fn test_no_cache_ignores_durations() {
        let policy = PolicyOpts::new()
            .no_cache()
            .max_age(999)
            .s_max_age(999)
            .stale_revalidate(5)
            .build();
        assert_eq!(value(policy), "no-cache, max-age=0");
    }

    #[test]
    fn test_private() {
        let policy = PolicyOpts::new().private().max_age(600).build();
        assert_eq!(value(policy), "private, max-age=600");

        let policy = PolicyOpts::new()
            .private()
            .max_age(600)
            .s_max_age(604_800)
            .build();
        assert_eq!(value(policy), "max-age=600, s-maxage=604800");

        let policy = PolicyOpts::new().private().no_cache().build();
        assert_eq!(value(policy), "private, no-cache, max-age=0");
    }

    #[test]
    fn test_zero_durations_are_present() {
        let policy = PolicyOpts::new().max_age(0).s_max_age(0).build();
        assert_eq!(value(policy), "max-age=0, s-maxage=0");
    }

    #[test]
    fn test_symbolic_and_invalid_names() {
        let policy = PolicyOpts::new().max_age("one_hour").s_max_age("nope").build();
        assert_eq!(value(policy), "max-age=3600, s-maxage=10");
    }

    #[test]
    fn test_browser_split() {
        let policy = PolicyOpts::new()
            .max_age(10)
            .s_max_age(300)
            .stale_revalidate(400)
            .stale_error(600)
            .build();
        assert_eq!(generate_browser(Some(&policy)).value_str(), "max-age=10");
        let surrogate = generate_surrogate(Some(&policy));
        assert_eq!(surrogate.name.as_str(), "surrogate-control");
        assert_eq!(
            surrogate.value_str(),
            "max-age=300, stale-while-revalidate=400, stale-if-error=600"
        );
    }

    #[test]
    fn test_surrogate_falls_back_to_browser_max_age() {
        assert_eq!(generate_surrogate(None).value_str(), "max-age=600");

        let policy = PolicyOpts::new().max_age(9_999_999_999u64).build();
        assert_eq!(generate_surrogate(Some(&policy)).value_str(), "max-age=9999999999");

        let policy = CachePolicy::no_store();
        assert_eq!(generate_browser(Some(&policy)).value_str(), "no-cache, max-age=0");
        assert_eq!(generate_surrogate(Some(&policy)).value_str(), "max-age=0");
    }

    #[test]
    fn test_surrogate_no_cache_ignores_durations() {
        let policy = PolicyOpts::new()
            .no_cache()
            .max_age(999)
            .s_max_age(999)
            .stale_revalidate(30)
            .stale_error(60)
            .build();
        assert_eq!(generate_browser(Some(&policy)).value_str(), "no-cache, max-age=0");
        assert_eq!(generate_surrogate(Some(&policy)).value_str(), "max-age=0");

        let bare = PolicyOpts::new().no_cache().build();
        assert_eq!(generate_surrogate(Some(&bare)).value_str(), "max-age=0");
    }

    #[test]
    fn test_generate_is_deterministic() {
        let policy = PolicyOpts::new().max_age("ONE_DAY").private().build();
        assert_eq!(generate(Some(&policy)), generate(Some(&policy)));
    }
}
