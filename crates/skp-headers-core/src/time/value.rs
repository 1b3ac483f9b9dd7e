//! Duration expressions used by cache policies

use std::fmt;

use serde::de::{self, Deserialize, Deserializer, Visitor};
use tracing::warn;

use super::constants::{INVALID_TIME_FALLBACK, TimeConstants};

/// A duration as written in configuration: whole seconds or a symbolic name
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TimeValue {
    /// Whole seconds
    Seconds(u64),
    /// Symbolic name from [`TimeConstants`], e.g. `ONE_HOUR`
    Named(String),
}

impl TimeValue {
    /// Interpret a string the way configuration does
    ///
    /// Strings made only of ASCII digits become [`TimeValue::Seconds`];
    /// anything else is kept as a name and resolved later.
    pub fn parse(value: &str) -> Self {
        if is_number_like(value) {
            if let Ok(secs) = value.parse::<u64>() {
                return TimeValue::Seconds(secs);
            }
        }
        TimeValue::Named(value.to_string())
    }

    /// Resolve to a second count against the process-wide table
    pub fn resolve(&self) -> u64 {
        self.resolve_with(TimeConstants::global())
    }

    /// Resolve to a second count
    ///
    /// Unknown names are not an error: they log a warning and resolve to
    /// [`INVALID_TIME_FALLBACK`] seconds.
    pub fn resolve_with(&self, constants: &TimeConstants) -> u64 {
        match self {
            TimeValue::Seconds(secs) => *secs,
            TimeValue::Named(name) => match constants.get(name) {
                Some(secs) => secs,
                None => {
                    warn!(
                        target: "skp_headers",
                        value = %name.to_ascii_uppercase(),
                        fallback = INVALID_TIME_FALLBACK,
                        "invalid time value, using fallback"
                    );
                    INVALID_TIME_FALLBACK
                }
            },
        }
    }
}

/// True for strict non-negative integer literals: ASCII digits only, no sign,
/// no whitespace, no fraction
pub fn is_number_like(value: &str) -> bool {
    !value.is_empty() && value.bytes().all(|b| b.is_ascii_digit())
}

impl From<u64> for TimeValue {
    fn from(secs: u64) -> Self {
        TimeValue::Seconds(secs)
    }
}

impl From<&str> for TimeValue {
    fn from(value: &str) -> Self {
        TimeValue::parse(value)
    }
}

impl From<String> for TimeValue {
    fn from(value: String) -> Self {
        TimeValue::parse(&value)
    }
}

impl fmt::Display for TimeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TimeValue::Seconds(secs) => write!(f, "{secs}"),
            TimeValue::Named(name) => f.write_str(name),
        }
    }
}

struct TimeValueVisitor;

impl<'de> Visitor<'de> for TimeValueVisitor {
    type Value = TimeValue;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a non-negative whole number of seconds or a time name such as \"ONE_HOUR\"")
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<TimeValue, E> {
        Ok(TimeValue::Seconds(v))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<TimeValue, E> {
        u64::try_from(v)
            .map(TimeValue::Seconds)
            .map_err(|_| E::invalid_value(de::Unexpected::Signed(v), &self))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<TimeValue, E> {
        if v.is_finite() && v >= 0.0 && v.fract() == 0.0 && v <= u64::MAX as f64 {
            Ok(TimeValue::Seconds(v as u64))
        } else {
            Err(E::invalid_value(de::Unexpected::Float(v), &self))
        }
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<TimeValue, E> {
        Ok(TimeValue::parse(v))
    }
}

impl<'de> Deserialize<'de> for TimeValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(TimeValueVisitor)
    }
}

/// Optional duration field: `false` and `null` mean "disabled"
pub(crate) fn deserialize_optional<'de, D>(deserializer: D) -> Result<Option<TimeValue>, D::Error>
where
    D: Deserializer<'de>,
{
    struct OptionalVisitor;

    impl<'de> Visitor<'de> for OptionalVisitor {
        type Value = Option<TimeValue>;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("a duration, `false` or null")
        }

        fn visit_bool<E: de::Error>(self, v: bool) -> Result<Self::Value, E> {
            if v {
                Err(E::invalid_value(de::Unexpected::Bool(true), &self))
            } else {
                Ok(None)
            }
        }

        fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
            Ok(None)
        }

        fn visit_none<E: de::Error>(self) -> Result<Self::Value, E> {
            Ok(None)
        }

        fn visit_some<D: Deserializer<'de>>(self, d: D) -> Result<Self::Value, D::Error> {
            d.deserialize_any(self)
        }

        fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
            TimeValueVisitor.visit_u64(v).map(Some)
        }

        fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
            TimeValueVisitor.visit_i64(v).map(Some)
        }

        fn visit_f64<E: de::Error>(self, v: f64) -> Result<Self::Value, E> {
            TimeValueVisitor.visit_f64(v).map(Some)
        }

        fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
            TimeValueVisitor.visit_str(v).map(Some)
        }
    }

    deserializer.deserialize_any(OptionalVisitor)
}
