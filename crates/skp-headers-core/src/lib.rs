//! skp-headers-core: Core types for the skp-headers library
//!
//! This crate holds everything that does not touch HTTP types or I/O:
//! named durations, cache policies, the classification of configured path
//! values and the glob matcher that picks one policy per request path.

mod error;
pub mod matcher;
pub mod time;
mod types;

pub use error::{HeaderError, Result};
pub use matcher::{PathMatch, PathPattern, PathPolicyMap};
pub use time::{TimeConstants, TimeValue};
pub use types::*;
