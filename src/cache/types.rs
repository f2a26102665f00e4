//! Strong types for cache entry metadata
//!
//! - [`TimestampMillis`]: wall-clock instant in milliseconds, used for expiry
//!   deadlines and access times
//! - [`AccessSequence`]: monotonic counter for deterministic LRU ordering

use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// Unix timestamp in milliseconds
///
/// Millisecond precision keeps entries written in rapid succession ordered,
/// and lets short TTLs (as used in tests) expire predictably.
///
/// # Examples
///
/// ```
/// use blockenergy::TimestampMillis;
/// use std::time::Duration;
///
/// let deadline = TimestampMillis::now().after(Duration::from_secs(60));
/// assert!(!deadline.has_passed());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimestampMillis(u128);

impl TimestampMillis {
    /// Creates a timestamp representing the current time
    pub fn now() -> Self {
        let millis = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_millis();
        Self(millis)
    }

    /// Creates a timestamp from a raw millisecond value
    pub fn from_millis(millis: u128) -> Self {
        Self(millis)
    }

    /// Returns the raw millisecond value
    pub fn as_millis(&self) -> u128 {
        self.0
    }

    /// Returns the instant `duration` after this one
    pub fn after(&self, duration: Duration) -> Self {
        Self(self.0.saturating_add(duration.as_millis()))
    }

    /// Checks whether this instant lies in the past
    ///
    /// An instant equal to the current millisecond has not passed yet.
    pub fn has_passed(&self) -> bool {
        Self::now() > *self
    }
}

impl Default for TimestampMillis {
    fn default() -> Self {
        Self::now()
    }
}

/// Monotonic sequence number for deterministic LRU ordering
///
/// Entries touched within the same millisecond are ordered by this counter;
/// lower numbers are older.
///
/// # Examples
///
/// ```
/// use blockenergy::AccessSequence;
///
/// let first = AccessSequence::default();
/// assert!(first < first.next());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub struct AccessSequence(u64);

impl AccessSequence {
    /// Returns the next sequence number
    pub fn next(&self) -> Self {
        Self(self.0.saturating_add(1))
    }
}
