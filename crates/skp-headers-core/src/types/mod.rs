//! Policy types

mod kind;
mod policy;

pub use kind::PolicyKind;
pub use policy::{CachePolicy, PolicyOpts};
