//! Named durations, in seconds

pub const ONE_MINUTE: u64 = 60;
pub const TEN_MINUTES: u64 = ONE_MINUTE * 10;
pub const ONE_HOUR: u64 = TEN_MINUTES * 6;
pub const ONE_DAY: u64 = ONE_HOUR * 24;
pub const ONE_WEEK: u64 = ONE_DAY * 7;
/// 30 days
pub const ONE_MONTH: u64 = ONE_DAY * 30;
/// 365 days
pub const ONE_YEAR: u64 = ONE_DAY * 365;

/// Seconds used when a symbolic name is not in the table
pub const INVALID_TIME_FALLBACK: u64 = 10;

/// Immutable lookup table of named durations
///
/// Names are matched after ASCII upper-casing, so `one_hour`, `One_Hour`
/// and `ONE_HOUR` all resolve to the same value.
#[derive(Debug)]
pub struct TimeConstants {
    entries: [(&'static str, u64); 7],
}

/// The process-wide table
pub static TIME_CONSTANTS: TimeConstants = TimeConstants {
    entries: [
        ("ONE_MINUTE", ONE_MINUTE),
        ("TEN_MINUTES", TEN_MINUTES),
        ("ONE_HOUR", ONE_HOUR),
        ("ONE_DAY", ONE_DAY),
        ("ONE_WEEK", ONE_WEEK),
        ("ONE_MONTH", ONE_MONTH),
        ("ONE_YEAR", ONE_YEAR),
    ],
};

impl TimeConstants {
    /// Shared reference to the process-wide table
    pub fn global() -> &'static TimeConstants {
        &TIME_CONSTANTS
    }

    /// Look up a duration by name
    pub fn get(&self, name: &str) -> Option<u64> {
        let name = name.to_ascii_uppercase();
        self.entries
            .iter()
            .find(|(key, _)| *key == name)
            .map(|(_, secs)| *secs)
    }

    /// Iterate over `(name, seconds)` pairs in ascending order
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, u64)> + '_ {
        self.entries.iter().copied()
    }

    /// Number of named durations
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
