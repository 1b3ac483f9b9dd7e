//! Named durations and duration resolution

pub mod constants;
mod value;

pub use constants::{
    INVALID_TIME_FALLBACK, ONE_DAY, ONE_HOUR, ONE_MINUTE, ONE_MONTH, ONE_WEEK, ONE_YEAR,
    TEN_MINUTES, TIME_CONSTANTS, TimeConstants,
};
pub(crate) use value::deserialize_optional;
pub use value::{TimeValue, is_number_like};
