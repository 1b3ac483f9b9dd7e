//! Path to policy resolution
//!
//! [`PathPolicyMap`] keeps positive patterns sorted most-specific first and
//! answers a lookup with the first one that matches. Negated patterns are
//! consulted only when no positive pattern matched.

mod glob;

pub use glob::{PathPattern, Specificity, normalize_path, split_path};

use std::cmp::Reverse;

use serde_json::Value;

use tracing::debug;

use crate::error::Result;
use crate::types::PolicyKind;

/// Request paths longer than this resolve to no match
pub const MAX_PATH_LENGTH: usize = 4096;
/// Request paths with more segments than this resolve to no match
pub const MAX_PATH_SEGMENTS: usize = 256;

#[derive(Debug, Clone)]
struct PathEntry {
    pattern: PathPattern,
    kind: PolicyKind,
    order: usize,
}

/// The pattern that won a lookup and its policy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PathMatch<'a> {
    /// Pattern as configured, `!` included
    pub pattern: &'a str,
    /// Classified policy value
    pub kind: &'a PolicyKind,
}

/// Ordered mapping from glob patterns to policies
///
/// Precedence among matching positive patterns:
/// 1. a wildcard-free pattern beats any glob
/// 2. more leading literal segments
/// 3. fewer `**` segments
/// 4. fewer wildcard segments
/// 5. more literal segments
/// 6. registered earlier
///
/// Among negated patterns the first registered one that applies wins.
#[derive(Debug, Clone, Default)]
pub struct PathPolicyMap {
    positive: Vec<PathEntry>,
    negated: Vec<PathEntry>,
    next_order: usize,
}

impl PathPolicyMap {
    /// Create an empty map
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from raw configuration values, in iteration order
    ///
    /// Fails on the first malformed pattern or unsupported value.
    pub fn from_values<I, K>(values: I) -> Result<Self>
    where
        I: IntoIterator<Item = (K, Value)>,
        K: AsRef<str>,
    {
        let mut map = Self::new();
        for (pattern, value) in values {
            let pattern = pattern.as_ref();
            let kind = PolicyKind::classify(pattern, &value)?;
            map.insert(pattern, kind)?;
        }
        Ok(map)
    }

    /// Add a pattern
    ///
    /// Re-inserting an existing pattern replaces its policy and keeps its
    /// original registration position.
    pub fn insert(&mut self, pattern: &str, kind: impl Into<PolicyKind>) -> Result<()> {
        let compiled = PathPattern::new(pattern)?;
        let kind = kind.into();

        let list = if compiled.is_negated() {
            &mut self.negated
        } else {
            &mut self.positive
        };

        if let Some(existing) = list.iter_mut().find(|e| e.pattern == compiled) {
            existing.kind = kind;
            return Ok(());
        }

        list.push(PathEntry {
            pattern: compiled,
            kind,
            order: self.next_order,
        });
        self.next_order += 1;

        self.positive
            .sort_by_key(|e| (Reverse(e.pattern.specificity()), e.order));
        self.negated.sort_by_key(|e| e.order);
        Ok(())
    }

    /// Builder-style [`insert`](Self::insert)
    pub fn with(mut self, pattern: &str, kind: impl Into<PolicyKind>) -> Result<Self> {
        self.insert(pattern, kind)?;
        Ok(self)
    }

    /// Find the policy for a request path (query string already removed)
    ///
    /// Paths over [`MAX_PATH_LENGTH`] bytes or [`MAX_PATH_SEGMENTS`]
    /// segments match nothing, so the caller falls back to defaults.
    pub fn resolve(&self, path: &str) -> Option<PathMatch<'_>> {
        if path.len() > MAX_PATH_LENGTH {
            debug!(target: "skp_headers", length = path.len(), "request path too long to match");
            return None;
        }
        let segments: Vec<&str> = split_path(path).collect();
        if segments.len() > MAX_PATH_SEGMENTS {
            debug!(
                target: "skp_headers",
                segments = segments.len(),
                "request path has too many segments to match"
            );
            return None;
        }

        self.positive
            .iter()
            .find(|e| e.pattern.matches_segments(&segments))
            .or_else(|| {
                self.negated
                    .iter()
                    .find(|e| !e.pattern.matches_segments(&segments))
            })
            .map(|e| PathMatch {
                pattern: e.pattern.as_str(),
                kind: &e.kind,
            })
    }

    /// Number of patterns
    pub fn len(&self) -> usize {
        self.positive.len() + self.negated.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Patterns in the order they are tried
    pub fn patterns(&self) -> impl Iterator<Item = &str> {
        self.positive
            .iter()
            .chain(self.negated.iter())
            .map(|e| e.pattern.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::HeaderError;
    use crate::time::TimeValue;
    use crate::types::CachePolicy;
    use serde_json::json;

    fn map(value: Value) -> PathPolicyMap {
        let Value::Object(obj) = value else {
            panic!("expected an object")
        };
        PathPolicyMap::from_values(obj).unwrap()
    }

    fn kind_of<'a>(map: &'a PathPolicyMap, path: &str) -> Option<&'a PolicyKind> {
        map.resolve(path).map(|m| m.kind)
    }

    #[test]
    fn test_exact_beats_glob() {
        let paths = map(json!({
            "/root/**": false,
            "/root/sub": { "maxAge": 300 }
        }));

        let expected = PolicyKind::Structured(CachePolicy {
            max_age: Some(TimeValue::Seconds(300)),
            ..Default::default()
        });
        assert_eq!(kind_of(&paths, "/root/sub"), Some(&expected));
        assert_eq!(kind_of(&paths, "/root/other"), Some(&PolicyKind::NoStore));
        assert_eq!(kind_of(&paths, "/elsewhere"), None);
    }

    #[test]
    fn test_negation() {
        let paths = map(json!({ "!/anything/**": false }));
        let hit = paths.resolve("/negation").unwrap();
        assert_eq!(hit.pattern, "!/anything/**");
        assert_eq!(hit.kind, &PolicyKind::NoStore);
        assert_eq!(paths.resolve("/anything/x.html"), None);
    }

    #[test]
    fn test_first_negation_wins() {
        let paths = map(json!({ "!/a/**": 1, "!/b/**": 2 }));
        assert_eq!(kind_of(&paths, "/c"), Some(&PolicyKind::Shared(1)));
        assert_eq!(kind_of(&paths, "/a/x"), Some(&PolicyKind::Shared(2)));
        assert_eq!(kind_of(&paths, "/b/x"), Some(&PolicyKind::Shared(1)));

        let paths = map(json!({ "!/b/**": 2, "!/a/**": 1 }));
        assert_eq!(kind_of(&paths, "/c"), Some(&PolicyKind::Shared(2)));
        assert_eq!(kind_of(&paths, "/b/x"), Some(&PolicyKind::Shared(1)));
    }

    #[test]
    fn test_oversized_paths_match_nothing() {
        let paths = map(json!({ "/**": 60, "!/never": 1 }));
        assert_eq!(kind_of(&paths, "/a/b"), Some(&PolicyKind::Shared(60)));

        let too_deep = "/a".repeat(MAX_PATH_SEGMENTS + 1);
        assert!(too_deep.len() <= MAX_PATH_LENGTH);
        assert_eq!(paths.resolve(&too_deep), None);

        let too_long = format!("/{}", "x".repeat(MAX_PATH_LENGTH));
        assert_eq!(paths.resolve(&too_long), None);

        let deepest = "/a".repeat(MAX_PATH_SEGMENTS);
        assert_eq!(kind_of(&paths, &deepest), Some(&PolicyKind::Shared(60)));
    }

    #[test]
    fn test_wildcard_heavy_pattern_on_long_path() {
        let paths = map(json!({ "/**/a/**/a/**/a/**/a/**/b": 60 }));
        let path = "/a".repeat(120);

        let start = std::time::Instant::now();
        assert_eq!(paths.resolve(&path), None);
        assert!(start.elapsed() < std::time::Duration::from_secs(1));
        assert_eq!(
            kind_of(&paths, &format!("{path}/b")),
            Some(&PolicyKind::Shared(60))
        );
    }

    #[test]
    fn test_positive_beats_negation() {
        let paths = map(json!({
            "!/static/**": false,
            "/api/**": 60
        }));
        assert_eq!(kind_of(&paths, "/api/users"), Some(&PolicyKind::Shared(60)));
        assert_eq!(kind_of(&paths, "/home"), Some(&PolicyKind::NoStore));
        assert_eq!(kind_of(&paths, "/static/app.js"), None);
    }

    #[test]
    fn test_longer_literal_prefix_wins() {
        let paths = map(json!({
            "/**/subpath": "31536000",
            "/root/**": false,
            "/root": 1024
        }));
        assert_eq!(kind_of(&paths, "/test/subpath"), Some(&PolicyKind::Shared(31_536_000)));
        assert_eq!(kind_of(&paths, "/root/sub/subpath"), Some(&PolicyKind::NoStore));
        assert_eq!(kind_of(&paths, "/root"), Some(&PolicyKind::Shared(1024)));
    }

    #[test]
    fn test_single_star_beats_globstar() {
        let paths = map(json!({
            "/root/**": 1,
            "/root/*": 2
        }));
        assert_eq!(kind_of(&paths, "/root/a"), Some(&PolicyKind::Shared(2)));
        assert_eq!(kind_of(&paths, "/root/a/b"), Some(&PolicyKind::Shared(1)));
    }

    #[test]
    fn test_ties_go_to_first_registered() {
        let paths = map(json!({
            "/*/b": 1,
            "/a/*": 2,
            "/x/*": 3
        }));
        // "/a/*" has the longer literal prefix
        assert_eq!(kind_of(&paths, "/a/b"), Some(&PolicyKind::Shared(2)));

        let paths = map(json!({
            "/a/*.html": 1,
            "/a/index.*": 2
        }));
        assert_eq!(kind_of(&paths, "/a/index.html"), Some(&PolicyKind::Shared(1)));

        let paths = map(json!({
            "/a/index.*": 2,
            "/a/*.html": 1
        }));
        assert_eq!(kind_of(&paths, "/a/index.html"), Some(&PolicyKind::Shared(2)));
    }

    #[test]
    fn test_reinsert_replaces() {
        let mut paths = PathPolicyMap::new();
        paths.insert("/a", PolicyKind::Shared(1)).unwrap();
        paths.insert("/a", PolicyKind::NoStore).unwrap();
        assert_eq!(paths.len(), 1);
        assert_eq!(kind_of(&paths, "/a"), Some(&PolicyKind::NoStore));
    }

    #[test]
    fn test_builder_and_patterns() {
        let paths = PathPolicyMap::new()
            .with("/**", PolicyKind::Shared(1))
            .unwrap()
            .with("!/x", PolicyKind::NoStore)
            .unwrap()
            .with("/a/b", CachePolicy::shared(2))
            .unwrap();
        let order: Vec<&str> = paths.patterns().collect();
        assert_eq!(order, vec!["/a/b", "/**", "!/x"]);
        assert!(!paths.is_empty());
    }

    #[test]
    fn test_malformed_configuration_fails_fast() {
        let result = PathPolicyMap::from_values(vec![("/ok", json!(1)), ("/bad/[x", json!(1))]);
        assert!(matches!(result, Err(HeaderError::InvalidPattern { .. })));

        let result = PathPolicyMap::from_values(vec![("/ok", json!(true))]);
        assert!(matches!(result, Err(HeaderError::InvalidPolicy { .. })));
    }

    #[test]
    fn test_resolution_is_deterministic() {
        let paths = map(json!({ "/a/*": 1, "/*/b": 2 }));
        let first = paths.resolve("/a/b");
        for _ in 0..10 {
            assert_eq!(paths.resolve("/a/b"), first);
        }
    }
}
