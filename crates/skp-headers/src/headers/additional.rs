use http::HeaderMap;
use serde_json::Value;
use skp_headers_core::{HeaderError, Result};
use skp_headers_http::{HeaderResult, HeaderSet};

/// Fixed headers written on every response
///
/// Built from a list of descriptors, each either a map of header name to
/// value or a `{ "name": .., "value": .. }` pair. Non-string values are
/// written in their JSON text form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AdditionalHeaders {
    headers: HeaderSet,
}

impl AdditionalHeaders {
    pub fn new(descriptors: Vec<Value>) -> Result<Self> {
        let mut headers = HeaderSet::new();
        for descriptor in &descriptors {
            let Value::Object(map) = descriptor else {
                return Err(HeaderError::Config(format!(
                    "header descriptor must be an object, got {descriptor}"
                )));
            };

            if map.len() == 2 {
                if let (Some(Value::String(name)), Some(value)) = (map.get("name"), map.get("value")) {
                    headers.push(HeaderResult::new(name, &stringify(value))?);
                    continue;
                }
            }
            for (name, value) in map {
                headers.push(HeaderResult::new(name, &stringify(value))?);
            }
        }
        Ok(Self { headers })
    }

    /// Parse a JSON array of descriptors
    pub fn from_json_str(json: &str) -> Result<Self> {
        let descriptors: Option<Vec<Value>> = serde_json::from_str(json)?;
        Self::new(descriptors.unwrap_or_default())
    }

    /// From already validated name and value pairs
    pub fn from_pairs<I, N, V>(pairs: I) -> Result<Self>
    where
        I: IntoIterator<Item = (N, V)>,
        N: AsRef<str>,
        V: AsRef<str>,
    {
        let headers = pairs
            .into_iter()
            .map(|(name, value)| HeaderResult::new(name.as_ref(), value.as_ref()))
            .collect::<Result<HeaderSet>>()?;
        Ok(Self { headers })
    }

    pub fn headers(&self) -> &HeaderSet {
        &self.headers
    }

    pub fn is_empty(&self) -> bool {
        self.headers.is_empty()
    }

    /// Write every header, replacing existing values
    pub fn apply(&self, target: &mut HeaderMap) {
        self.headers.apply(target, true);
    }
}

fn stringify(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
