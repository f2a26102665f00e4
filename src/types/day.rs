// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Sliding-window day timestamps
//!
//! A [`DayTimestamp`] is an instant in epoch milliseconds that the explorer
//! interprets as "blocks as of this moment going back one day". Offsets are
//! counted in whole 24 hour steps from a reference instant, not from calendar
//! midnight, so two timestamps may land on the same UTC date.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::config::constants::MILLIS_PER_DAY;

/// Epoch milliseconds identifying one day of the trailing window
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DayTimestamp(i64);

impl DayTimestamp {
    /// Current wall-clock instant
    pub fn now() -> Self {
        Self(Utc::now().timestamp_millis())
    }

    /// Creates a timestamp from epoch milliseconds
    pub const fn from_millis(millis: i64) -> Self {
        Self(millis)
    }

    /// Returns epoch milliseconds
    pub const fn as_millis(&self) -> i64 {
        self.0
    }

    /// Returns the instant `days` whole days before this one
    ///
    /// # Examples
    ///
    /// ```
    /// use blockenergy::DayTimestamp;
    ///
    /// let now = DayTimestamp::from_millis(1_700_000_000_000);
    /// assert_eq!(now.days_before(0), now);
    /// assert_eq!(now.days_before(2).as_millis(), 1_700_000_000_000 - 2 * 86_400_000);
    /// ```
    pub fn days_before(&self, days: u32) -> Self {
        Self(self.0.saturating_sub(i64::from(days).saturating_mul(MILLIS_PER_DAY)))
    }

    /// Converts to a UTC datetime, if representable
    pub fn to_datetime(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp_millis(self.0)
    }
}

impl fmt::Display for DayTimestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.to_datetime() {
            Some(dt) => write!(f, "{} ({})", self.0, dt.format("%Y-%m-%dT%H:%M:%SZ")),
            None => write!(f, "{}", self.0),
        }
    }
}
