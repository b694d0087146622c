//! Interface exclusion filters.
//!
//! The parser only ever asks "should this device be skipped?". Anything that
//! can answer that question implements [`DeviceFilter`]: a compiled regex in
//! production, a closure in tests.

use regex::{Regex, RegexSet};

use crate::error::NetDevError;

/// Default ignore pattern. Matches only the empty string, so no real device is skipped.
pub const DEFAULT_IGNORED_DEVICES: &str = "^$";

/// Read-only predicate over interface names.
pub trait DeviceFilter {
    /// Returns true if `device` must be left out of the statistics table.
    fn matches(&self, device: &str) -> bool;
}

impl DeviceFilter for Regex {
    fn matches(&self, device: &str) -> bool {
        self.is_match(device)
    }
}

impl DeviceFilter for RegexSet {
    fn matches(&self, device: &str) -> bool {
        self.is_match(device)
    }
}

impl<F> DeviceFilter for F
where
    F: Fn(&str) -> bool,
{
    fn matches(&self, device: &str) -> bool {
        self(device)
    }
}

/// Compiles the user supplied ignored-devices pattern.
pub fn compile_ignored_devices(pattern: &str) -> Result<Regex, NetDevError> {
    Regex::new(pattern).map_err(|source| NetDevError::InvalidPattern {
        pattern: pattern.to_string(),
        source,
    })
}
