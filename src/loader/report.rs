//! Per-batch and cumulative loader statistics

use serde::{Deserialize, Serialize};
use std::fmt;

/// Outcome of one loader flush
///
/// A flush resolves every request pending at that moment, including requests
/// enqueued by other callers sharing the loader.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchReport {
    /// Requests resolved, duplicates included
    pub requested: usize,
    /// Distinct block hashes in the batch
    pub unique: usize,
    /// Distinct hashes answered by the cache
    pub cache_hits: usize,
    /// Distinct hashes fetched from the block source
    pub fetched: usize,
    /// Fetched hashes that resolved to zero (source error or unusable size)
    pub degraded: usize,
}

impl BatchReport {
    /// Whether the flush found nothing pending
    pub fn is_empty(&self) -> bool {
        self.requested == 0
    }
}

impl fmt::Display for BatchReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "requested={}, unique={}, cache_hits={}, fetched={}, degraded={}",
            self.requested, self.unique, self.cache_hits, self.fetched, self.degraded
        )
    }
}

/// Running totals over every non-empty flush of a loader
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoaderStats {
    /// Non-empty flushes executed
    pub batches: u64,
    /// Requests resolved, duplicates included
    pub requested: u64,
    /// Distinct hashes resolved, summed per batch
    pub unique: u64,
    /// Cache hits, summed per batch
    pub cache_hits: u64,
    /// Source fetches issued
    pub fetched: u64,
    /// Hashes that degraded to zero
    pub degraded: u64,
}

impl LoaderStats {
    pub(crate) fn record(&mut self, report: &BatchReport) {
        self.batches += 1;
        self.requested += report.requested as u64;
        self.unique += report.unique as u64;
        self.cache_hits += report.cache_hits as u64;
        self.fetched += report.fetched as u64;
        self.degraded += report.degraded as u64;
    }

    /// Share of distinct hashes answered by the cache, as a percentage
    pub fn cache_hit_rate(&self) -> f64 {
        if self.unique == 0 {
            0.0
        } else {
            (self.cache_hits as f64 / self.unique as f64) * 100.0
        }
    }
}

impl fmt::Display for LoaderStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "batches={}, requested={}, unique={}, cache_hits={}, fetched={}, degraded={}, cache_hit_rate={:.1}%",
            self.batches,
            self.requested,
            self.unique,
            self.cache_hits,
            self.fetched,
            self.degraded,
            self.cache_hit_rate()
        )
    }
}
