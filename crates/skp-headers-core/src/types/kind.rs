//! Classification of raw per-path policy values

use serde::Deserialize;
use serde_json::Value;

use super::policy::CachePolicy;
use crate::error::{HeaderError, Result};
use crate::time::{TIME_CONSTANTS, is_number_like};

/// What a configured path value asks for
///
/// Produced once, when the configuration is loaded, so request handling
/// never has to inspect the raw shape again.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PolicyKind {
    /// `false`: do not cache
    NoStore,
    /// A number, numeric string or time name: same max-age for browser and CDN
    Shared(u64),
    /// A partial [`CachePolicy`]
    Structured(CachePolicy),
    /// Any other string: sent as the `Cache-Control` value as-is
    Verbatim(String),
    /// Null, empty string or empty object: built-in defaults
    Absent,
}

impl PolicyKind {
    /// Classify a raw configuration value
    ///
    /// `pattern` is only used to label errors.
    pub fn classify(pattern: &str, value: &Value) -> Result<Self> {
        match value {
            Value::Null => Ok(PolicyKind::Absent),
            Value::Bool(false) => Ok(PolicyKind::NoStore),
            Value::Bool(true) => Err(HeaderError::policy(
                pattern,
                "`true` is not a cache policy; use `false`, a duration or an object",
            )),
            Value::Number(number) => match number.as_u64() {
                Some(secs) => Ok(PolicyKind::Shared(secs)),
                None => match number.as_f64() {
                    Some(f) if f >= 0.0 && f.fract() == 0.0 && f <= u64::MAX as f64 => {
                        Ok(PolicyKind::Shared(f as u64))
                    }
                    _ => Err(HeaderError::policy(
                        pattern,
                        format!("duration must be a non-negative whole number, got {number}"),
                    )),
                },
            },
            Value::String(s) => Self::classify_str(pattern, s),
            Value::Array(_) => Err(HeaderError::policy(pattern, "arrays are not supported")),
            Value::Object(map) if map.is_empty() => Ok(PolicyKind::Absent),
            Value::Object(_) => {
                let policy = CachePolicy::deserialize(value)
                    .map_err(|e| HeaderError::policy(pattern, e.to_string()))?;
                if policy.is_default() {
                    Ok(PolicyKind::Absent)
                } else {
                    Ok(PolicyKind::Structured(policy))
                }
            }
        }
    }

    fn classify_str(pattern: &str, s: &str) -> Result<Self> {
        if s.is_empty() {
            return Ok(PolicyKind::Absent);
        }
        if is_number_like(s) {
            return s
                .parse::<u64>()
                .map(PolicyKind::Shared)
                .map_err(|e| HeaderError::policy(pattern, e.to_string()));
        }
        if let Some(secs) = TIME_CONSTANTS.get(s) {
            return Ok(PolicyKind::Shared(secs));
        }
        if !is_valid_header_value(s) {
            return Err(HeaderError::policy(
                pattern,
                "string contains characters not allowed in a header value",
            ));
        }
        Ok(PolicyKind::Verbatim(s.to_string()))
    }

    /// The policy to synthesize headers from, if any
    ///
    /// `None` means "use the synthesizer defaults" for [`PolicyKind::Absent`]
    /// and "no synthesis" for [`PolicyKind::Verbatim`].
    pub fn to_policy(&self) -> Option<CachePolicy> {
        match self {
            PolicyKind::NoStore => Some(CachePolicy::no_store()),
            PolicyKind::Shared(secs) => Some(CachePolicy::shared(*secs)),
            PolicyKind::Structured(policy) => Some(policy.clone()),
            PolicyKind::Verbatim(_) | PolicyKind::Absent => None,
        }
    }

    /// Short label for logs
    pub fn as_str(&self) -> &'static str {
        match self {
            PolicyKind::NoStore => "no_store",
            PolicyKind::Shared(_) => "shared",
            PolicyKind::Structured(_) => "structured",
            PolicyKind::Verbatim(_) => "verbatim",
            PolicyKind::Absent => "absent",
        }
    }
}

impl From<CachePolicy> for PolicyKind {
    fn from(policy: CachePolicy) -> Self {
        if policy.is_default() {
            PolicyKind::Absent
        } else {
            PolicyKind::Structured(policy)
        }
    }
}

/// Visible ASCII, space and tab
fn is_valid_header_value(s: &str) -> bool {
    s.bytes().all(|b| b == b'\t' || (0x20..0x7f).contains(&b))
}
