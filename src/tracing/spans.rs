//! Span creation helpers for blockenergy operations.
//!
//! Telemetry concerns are kept apart from business logic: instead of using
//! `#[instrument]` attributes directly on functions, each instrumented
//! operation has a span helper here, attached with [`tracing::Instrument`].
//!
//! Usage pattern:
//! ```rust,ignore
//! pub async fn my_operation(&self, param: Type) -> Result<T> {
//!     async move {
//!         // Business logic here
//!     }
//!     .instrument(spans::my_operation(param_value))
//!     .await
//! }
//! ```

use tracing::Span;

use crate::types::block::BlockHash;
use crate::types::day::DayTimestamp;

/// Create span for fetching a single block from the explorer.
///
/// Parent: load_batch or transaction_energies span
/// Children: HTTP request retries
#[inline]
pub(crate) fn fetch_block(block_hash: &BlockHash) -> Span {
    tracing::debug_span!("blockenergy.fetch_block", block_hash = %block_hash)
}

/// Create span for fetching the block listing of one day.
///
/// Parent: day_batch span
/// Children: HTTP request retries
#[inline]
pub(crate) fn fetch_blocks_for_day(day: DayTimestamp) -> Span {
    tracing::debug_span!("blockenergy.fetch_blocks_for_day", day_millis = day.as_millis())
}

/// Create span for resolving one loader batch.
///
/// Parent: day_batch span, or none for direct loads
/// Children: fetch_block spans (one per cache miss)
#[inline]
pub(crate) fn load_batch(requested: usize, unique: usize) -> Span {
    tracing::debug_span!(
        "blockenergy.load_batch",
        requested = requested,
        unique = unique,
    )
}

/// Create span for one day-batch of an aggregation.
///
/// Parent: total_energy span
/// Children: fetch_blocks_for_day spans, load_batch span
#[inline]
pub(crate) fn day_batch(batch_index: usize, first_day: u32, day_count: u32) -> Span {
    tracing::debug_span!(
        "blockenergy.day_batch",
        batch_index = batch_index,
        first_day = first_day,
        day_count = day_count,
    )
}

/// Create span for a trailing-window energy aggregation.
///
/// This is the main public API entry point for totals.
///
/// Parent: None (root span for this operation)
/// Children: day_batch spans
#[inline]
pub(crate) fn total_energy(days: u32, now: DayTimestamp) -> Span {
    tracing::info_span!(
        "blockenergy.total_energy",
        days = days,
        now_millis = now.as_millis(),
    )
}

/// Create span for per-transaction energy resolution.
///
/// Parent: None (root span for this operation)
/// Children: fetch_block span
#[inline]
pub(crate) fn transaction_energies(block_hash: &BlockHash, offset: usize, limit: Option<usize>) -> Span {
    tracing::info_span!(
        "blockenergy.transaction_energies",
        block_hash = %block_hash,
        offset = offset,
        limit = ?limit,
    )
}
