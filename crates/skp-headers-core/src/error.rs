//! Error types for header configuration

use thiserror::Error;

/// Main error type for configuration and header construction
///
/// Every variant is raised while the host application sets things up.
/// Request-time code never returns one of these; it falls back to defaults.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum HeaderError {
    /// Glob pattern could not be compiled
    #[error("invalid path pattern '{pattern}': {reason}")]
    InvalidPattern { pattern: String, reason: String },

    /// Policy value attached to a pattern has an unsupported shape
    #[error("invalid cache policy for '{pattern}': {reason}")]
    InvalidPolicy { pattern: String, reason: String },

    /// Header name or value cannot be sent on the wire
    #[error("invalid header '{name}': {reason}")]
    InvalidHeader { name: String, reason: String },

    /// Configuration document could not be read
    #[error("configuration error: {0}")]
    Config(String),
}

impl HeaderError {
    pub(crate) fn pattern(pattern: &str, reason: impl Into<String>) -> Self {
        HeaderError::InvalidPattern {
            pattern: pattern.to_string(),
            reason: reason.into(),
        }
    }

    pub(crate) fn policy(pattern: &str, reason: impl Into<String>) -> Self {
        HeaderError::InvalidPolicy {
            pattern: pattern.to_string(),
            reason: reason.into(),
        }
    }
}

impl From<serde_json::Error> for HeaderError {
    fn from(err: serde_json::Error) -> Self {
        HeaderError::Config(err.to_string())
    }
}

/// Result type alias for header configuration
pub type Result<T> = std::result::Result<T, HeaderError>;
