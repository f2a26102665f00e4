//! Strong types for configuration values
//!
//! These types keep tuning knobs from being confused with domain values
//! (day counts, byte sizes).

use serde::{Deserialize, Serialize};
use std::ops::Range;

use crate::config::constants::DEFAULT_DAY_BATCH_SIZE;

/// Number of days fetched concurrently in one aggregation step
///
/// Bounds peak concurrency against the explorer: all days within a batch are
/// requested at once, batches themselves run one after another. Always at
/// least one.
///
/// # Examples
///
/// ```
/// use blockenergy::DayBatchSize;
///
/// let size = DayBatchSize::new(5).unwrap();
/// let batches: Vec<_> = size.batches(12).collect();
/// assert_eq!(batches, vec![0..5, 5..10, 10..12]);
///
/// assert!(DayBatchSize::new(0).is_none());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DayBatchSize(u32);

impl DayBatchSize {
    /// Default batch size
    pub const DEFAULT: Self = Self(DEFAULT_DAY_BATCH_SIZE);

    /// Creates a batch size, rejecting zero
    pub const fn new(days: u32) -> Option<Self> {
        if days == 0 {
            None
        } else {
            Some(Self(days))
        }
    }

    /// Get the inner value
    pub const fn as_u32(&self) -> u32 {
        self.0
    }

    /// Number of batches needed to cover `days` days
    pub fn batches_needed(&self, days: u32) -> usize {
        days.div_ceil(self.0) as usize
    }

    /// Splits `[0, days)` into consecutive day-offset ranges of this size
    ///
    /// The last range is shorter when `days` is not a multiple of the size.
    pub fn batches(&self, days: u32) -> impl Iterator<Item = Range<u32>> {
        let size = self.0;
        (0..days)
            .step_by(size as usize)
            .map(move |start| start..start.saturating_add(size).min(days))
    }
}

impl Default for DayBatchSize {
    fn default() -> Self {
        Self::DEFAULT
    }
}
