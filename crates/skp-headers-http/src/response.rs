use http::{HeaderMap, HeaderName, HeaderValue};
use skp_headers_core::{HeaderError, Result};
use std::collections::HashMap;

/// `Surrogate-Control` is not among the `http` crate's standard names
pub const SURROGATE_CONTROL: HeaderName = HeaderName::from_static("surrogate-control");

/// One response header to set
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderResult {
    pub name: HeaderName,
    pub value: HeaderValue,
}

impl HeaderResult {
    /// Validate a user-supplied name and value
    pub fn new(name: &str, value: &str) -> Result<Self> {
        let header_name =
            HeaderName::from_bytes(name.as_bytes()).map_err(|e| HeaderError::InvalidHeader {
                name: name.to_string(),
                reason: e.to_string(),
            })?;
        let header_value = HeaderValue::from_str(value).map_err(|e| HeaderError::InvalidHeader {
            name: name.to_string(),
            reason: e.to_string(),
        })?;
        Ok(Self {
            name: header_name,
            value: header_value,
        })
    }

    /// Wrap a value generated by this crate
    pub(crate) fn generated(name: HeaderName, value: String) -> Self {
        // generated values are visible ASCII; the fallback is unreachable
        let value = HeaderValue::try_from(value).unwrap_or_else(|_| HeaderValue::from_static(""));
        Self { name, value }
    }

    /// Value as a string slice
    pub fn value_str(&self) -> &str {
        self.value.to_str().unwrap_or_default()
    }
}

/// Ordered collection of headers produced for one response
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeaderSet {
    headers: Vec<HeaderResult>,
}

impl HeaderSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a header, replacing an earlier one with the same name
    pub fn push(&mut self, header: HeaderResult) {
        match self.headers.iter_mut().find(|h| h.name == header.name) {
            Some(existing) => existing.value = header.value,
            None => self.headers.push(header),
        }
    }

    /// Value of a header by name (case-insensitive)
    pub fn get(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|h| h.name.as_str().eq_ignore_ascii_case(name))
            .map(HeaderResult::value_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = &HeaderResult> {
        self.headers.iter()
    }

    pub fn len(&self) -> usize {
        self.headers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.headers.is_empty()
    }

    /// Write the headers onto a response header map
    ///
    /// With `overwrite == false` a header already present in `target` is
    /// left untouched.
    pub fn apply(&self, target: &mut HeaderMap, overwrite: bool) {
        for header in &self.headers {
            if overwrite || !target.contains_key(&header.name) {
                target.insert(header.name.clone(), header.value.clone());
            }
        }
    }

    /// Convert to HeaderMap
    pub fn to_header_map(&self) -> HeaderMap {
        let mut map = HeaderMap::with_capacity(self.headers.len());
        self.apply(&mut map, true);
        map
    }

    /// Plain name -> value mapping
    pub fn to_map(&self) -> HashMap<String, String> {
        self.headers
            .iter()
            .map(|h| (h.name.to_string(), h.value_str().to_string()))
            .collect()
    }
}

impl Extend<HeaderResult> for HeaderSet {
    fn extend<T: IntoIterator<Item = HeaderResult>>(&mut self, iter: T) {
        for header in iter {
            self.push(header);
        }
    }
}

impl FromIterator<HeaderResult> for HeaderSet {
    fn from_iter<T: IntoIterator<Item = HeaderResult>>(iter: T) -> Self {
        let mut set = HeaderSet::new();
        set.extend(iter);
        set
    }
}

impl IntoIterator for HeaderSet {
    type Item = HeaderResult;
    type IntoIter = std::vec::IntoIter<HeaderResult>;

    fn into_iter(self) -> Self::IntoIter {
        self.headers.into_iter()
    }
}
