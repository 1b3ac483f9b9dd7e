use http::header::{CACHE_CONTROL, PRAGMA};
use serde::Deserialize;
use skp_headers_core::{CachePolicy, PolicyKind};

use crate::cache_control::{generate, generate_browser, generate_surrogate};
use crate::response::{HeaderResult, HeaderSet};

/// Where CDN-facing directives are written
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HeaderConvention {
    /// Browser directives in `Cache-Control`, CDN directives in `Surrogate-Control`
    #[default]
    Surrogate,
    /// Everything in one `Cache-Control` header
    Combined,
}

/// Headers for a classified policy
///
/// A no-cache policy also gets `Pragma: no-cache`. Verbatim values are
/// written to `Cache-Control` unchanged and nothing else is emitted.
pub fn synthesize(kind: &PolicyKind, convention: HeaderConvention) -> HeaderSet {
    if let PolicyKind::Verbatim(value) = kind {
        let mut set = HeaderSet::new();
        set.push(HeaderResult::generated(CACHE_CONTROL, value.clone()));
        return set;
    }
    synthesize_policy(kind.to_policy().as_ref(), convention)
}

/// Headers for an optional policy; `None` gives the defaults
pub fn synthesize_policy(policy: Option<&CachePolicy>, convention: HeaderConvention) -> HeaderSet {
    let mut set = HeaderSet::new();
    match convention {
        HeaderConvention::Combined => set.push(generate(policy)),
        HeaderConvention::Surrogate => {
            set.push(generate_browser(policy));
            set.push(generate_surrogate(policy));
        }
    }
    if policy.is_some_and(|p| p.set_no_cache) {
        set.push(HeaderResult::generated(PRAGMA, "no-cache".to_string()));
    }
    set
}
