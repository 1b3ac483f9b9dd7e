//! skp-headers-http: header synthesis over `http` types
//!
//! Turns cache policies into `Cache-Control`, `Surrogate-Control` and
//! `Pragma` headers, formats `Expires` and `Last-Modified` dates, and looks
//! up modification times on the filesystem.

pub mod additional;
pub mod cache_control;
pub mod dates;
pub mod last_modified;
pub mod policy;
pub mod response;

pub use additional::{ExpiresOptions, generate_expires, generate_last_modified};
pub use cache_control::{CacheControl, generate, generate_browser, generate_surrogate};
pub use dates::{DateFormat, add_time, format_http_date, latest_timestamp};
pub use last_modified::{
    FixedTimestamp, PathTimestamp, TimestampSource, last_modified_header, resolve_last_modified,
};
pub use policy::{HeaderConvention, synthesize, synthesize_policy};
pub use response::{HeaderResult, HeaderSet, SURROGATE_CONTROL};
