// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Trailing-window energy aggregation
//!
//! The day range `[0, days)` is split into day-batches of
//! [`DayBatchSize`]. Within a batch every day listing is fetched at once and
//! all listed hashes go through the loader in a single `load_many`; the next
//! batch starts only after the previous one has been summed.
//!
//! A day listing that fails contributes nothing and is counted in
//! [`AggregateReport::failed_days`]. Blocks whose size cannot be resolved
//! contribute zero and are counted in [`AggregateReport::degraded_blocks`].

use std::fmt;
use std::ops::Range;
use std::sync::Arc;

use futures::future::join_all;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn, Instrument};

use crate::loader::BatchLoader;
use crate::source::BlockSource;
use crate::tracing::spans;
use crate::types::block::BlockHash;
use crate::types::config::DayBatchSize;
use crate::types::day::DayTimestamp;
use crate::types::energy::EnergyValue;

/// Result of one aggregation with its bookkeeping
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct AggregateReport {
    /// Sum of block energies across the window
    pub total: EnergyValue,
    /// Days requested
    pub days: u32,
    /// Day-batches executed
    pub batches: usize,
    /// Block hashes listed across all successful days
    pub blocks: usize,
    /// Day listings that failed
    pub failed_days: usize,
    /// Blocks that resolved to zero energy in the loader
    ///
    /// Taken from the loader's flush reports, so concurrent callers sharing
    /// the loader may be counted here too.
    pub degraded_blocks: usize,
}

impl fmt::Display for AggregateReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "total={}, days={}, batches={}, blocks={}, failed_days={}, degraded_blocks={}",
            self.total,
            self.days,
            self.batches,
            self.blocks,
            self.failed_days,
            self.degraded_blocks
        )
    }
}

/// Outcome of one day-batch
#[derive(Debug, Default)]
struct DayBatchOutcome {
    energy: EnergyValue,
    blocks: usize,
    failed_days: usize,
    degraded_blocks: usize,
}

/// Sums estimated energy over a trailing window of days
///
/// # Examples
///
/// ```rust,ignore
/// use blockenergy::{DayBatchSize, EnergyAggregator};
///
/// let aggregator = EnergyAggregator::new(source, loader, DayBatchSize::default());
/// let last_week = aggregator.total_energy(7).await;
/// ```
#[derive(Debug, Clone)]
pub struct EnergyAggregator {
    source: Arc<dyn BlockSource>,
    loader: Arc<BatchLoader>,
    batch_size: DayBatchSize,
}

impl EnergyAggregator {
    /// Creates an aggregator sharing `loader` with other components
    pub fn new(
        source: Arc<dyn BlockSource>,
        loader: Arc<BatchLoader>,
        batch_size: DayBatchSize,
    ) -> Self {
        Self {
            source,
            loader,
            batch_size,
        }
    }

    /// Total energy of blocks mined over the last `days` days
    ///
    /// Returns zero without any network call when `days` is zero.
    pub async fn total_energy(&self, days: u32) -> EnergyValue {
        self.total_energy_at(days, DayTimestamp::now()).await
    }

    /// Like [`total_energy`](Self::total_energy), with a caller-supplied "now"
    pub async fn total_energy_at(&self, days: u32, now: DayTimestamp) -> EnergyValue {
        self.aggregate(days, now).await.total
    }

    /// Aggregates the window ending at `now` and reports what happened
    pub async fn aggregate(&self, days: u32, now: DayTimestamp) -> AggregateReport {
        async move {
            let mut report = AggregateReport {
                days,
                ..Default::default()
            };

            for (batch_index, offsets) in self.batch_size.batches(days).enumerate() {
                let first_day = offsets.start;
                let day_count = offsets.end - offsets.start;

                let outcome = self
                    .run_day_batch(now, offsets)
                    .instrument(spans::day_batch(batch_index, first_day, day_count))
                    .await;

                debug!(
                    batch_index,
                    first_day,
                    day_count,
                    blocks = outcome.blocks,
                    failed_days = outcome.failed_days,
                    energy = %outcome.energy,
                    "Day batch complete"
                );

                report.total += outcome.energy;
                report.batches += 1;
                report.blocks += outcome.blocks;
                report.failed_days += outcome.failed_days;
                report.degraded_blocks += outcome.degraded_blocks;
            }

            info!(
                days,
                total = %report.total,
                batches = report.batches,
                blocks = report.blocks,
                failed_days = report.failed_days,
                degraded_blocks = report.degraded_blocks,
                "Computed total energy"
            );
            report
        }
        .instrument(spans::total_energy(days, now))
        .await
    }

    async fn run_day_batch(&self, now: DayTimestamp, offsets: Range<u32>) -> DayBatchOutcome {
        let days: Vec<DayTimestamp> = offsets.map(|offset| now.days_before(offset)).collect();
        let listings = join_all(days.iter().map(|&day| self.source.fetch_blocks_for_day(day))).await;

        let mut outcome = DayBatchOutcome::default();
        let mut hashes: Vec<BlockHash> = Vec::new();
        for (day, listing) in days.iter().zip(listings) {
            match listing {
                Ok(blocks) => hashes.extend(blocks.into_iter().map(|block| block.hash)),
                Err(e) => {
                    warn!(
                        day = %day,
                        source = self.source.name(),
                        error = %e,
                        "Day listing failed, counting no blocks"
                    );
                    outcome.failed_days += 1;
                }
            }
        }

        outcome.blocks = hashes.len();
        let (energies, report) = self.loader.load_many_with_report(&hashes).await;
        outcome.energy = energies.into_iter().sum();
        outcome.degraded_blocks = report.degraded;
        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn report_display() {
        let report = AggregateReport {
            total: EnergyValue::new(4560.0),
            days: 2,
            batches: 1,
            blocks: 1,
            failed_days: 1,
            degraded_blocks: 0,
        };
        assert_eq!(
            report.to_string(),
            format!(
                "total={}, days=2, batches=1, blocks=1, failed_days=1, degraded_blocks=0",
                EnergyValue::new(4560.0)
            )
        );
    }
}
