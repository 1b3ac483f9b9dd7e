//! skp-headers: path-based caching headers for HTTP responses
//!
//! # Features
//!
//! - **Glob path policies** with specificity ordering and `!` negation
//! - **Browser and CDN directives** in `Cache-Control` and `Surrogate-Control`
//! - **Symbolic durations** such as `ONE_HOUR` or `"31536000"`
//! - **`Expires` and `Last-Modified`**, the latter from a file or directory
//!
//! # Quick Start
//!
//! ```rust
//! use serde_json::json;
//! use skp_headers::prelude::*;
//!
//! fn main() -> Result<()> {
//!     let config = CacheHeadersConfig::new()
//!         .path("/static/**", "ONE_YEAR")
//!         .path("/account/**", json!({ "setPrivate": true, "maxAge": 60 }))
//!         .path("/api/**", false);
//!     let cache = CacheHeaders::new(config)?;
//!
//!     let headers = cache.headers_for("/account/settings");
//!     assert_eq!(headers.get("cache-control"), Some("private, max-age=60"));
//!     Ok(())
//! }
//! ```

mod config;
mod headers;

// Re-export core
pub use skp_headers_core::*;

// Re-export header synthesis
pub use skp_headers_http::{
    CacheControl, DateFormat, ExpiresOptions, FixedTimestamp, HeaderConvention, HeaderResult,
    HeaderSet, PathTimestamp, SURROGATE_CONTROL, TimestampSource, generate, generate_expires,
    generate_last_modified,
};

pub use config::{CacheHeadersConfig, DEFAULT_LOOKUP_TIMEOUT_MS, LastModifiedSource};
pub use headers::{AdditionalHeaders, CacheHeaders, PolicySource, Resolution};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::{
        AdditionalHeaders, CacheHeaders, CacheHeadersConfig, CachePolicy, HeaderConvention,
        HeaderError, HeaderSet, PolicyKind, PolicyOpts, Result, TimeValue,
    };
}
