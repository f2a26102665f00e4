// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Test helpers for blockenergy integration tests
//!
//! Provides in-memory implementations of [`BlockSource`] and [`CacheStore`]
//! so that loader, aggregator and service behavior can be tested without a
//! real explorer or Redis server.

#![allow(dead_code)]

use async_trait::async_trait;
use blockenergy::{
    BlockHash, BlockSource, BlockSourceError, BlockSummary, CacheError, CacheStats, CacheStore,
    DayTimestamp, EnergyValue, RawBlock,
};
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

/// Reference instant used by aggregation tests
pub const NOW: DayTimestamp = DayTimestamp::from_millis(1_700_000_000_000);

/// Milliseconds in one day
pub const DAY_MILLIS: i64 = 86_400_000;

/// Asserts two energies are equal up to floating-point rounding
///
/// Products such as `20 * 4.56` are not exactly representable, so exact
/// comparison against decimal literals is unreliable.
pub fn assert_energy_eq(actual: EnergyValue, expected: f64) {
    let actual = actual.as_f64();
    assert!(
        (actual - expected).abs() < 1e-9,
        "expected energy {expected}, got {actual}"
    );
}

/// Mock BlockSource with scripted responses and call tracking
///
/// Blocks and day listings that were not configured behave like an explorer
/// that knows nothing: unknown blocks fail with HTTP 404, unknown days list
/// no blocks.
///
/// # Example
///
/// ```rust,ignore
/// let source = MockBlockSource::new()
///     .with_block("00ab", RawBlock::with_size(1000))
///     .with_day(NOW, &["00ab"])
///     .with_failing_day(NOW.days_before(1));
/// ```
#[derive(Default)]
pub struct MockBlockSource {
    blocks: HashMap<String, RawBlock>,
    failing_blocks: HashSet<String>,
    days: HashMap<DayTimestamp, Vec<String>>,
    failing_days: HashSet<DayTimestamp>,
    day_delay: Option<Duration>,
    block_calls: Mutex<HashMap<String, usize>>,
    day_requests: Mutex<Vec<DayTimestamp>>,
    days_in_flight: AtomicUsize,
    max_days_in_flight: AtomicUsize,
}

impl MockBlockSource {
    /// Create a source that knows no blocks and lists empty days
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve `block` for `hash`
    pub fn with_block(mut self, hash: &str, block: RawBlock) -> Self {
        self.blocks.insert(hash.to_string(), block);
        self
    }

    /// Serve a block of `bytes` bytes for every hash in `hashes`
    pub fn with_sized_blocks(mut self, hashes: &[&str], bytes: u64) -> Self {
        for hash in hashes {
            self.blocks
                .insert(hash.to_string(), RawBlock::with_size(bytes));
        }
        self
    }

    /// Fail fetches of `hash` with a server error
    pub fn with_failing_block(mut self, hash: &str) -> Self {
        self.failing_blocks.insert(hash.to_string());
        self
    }

    /// List `hashes` for the day ending at `day`
    pub fn with_day(mut self, day: DayTimestamp, hashes: &[&str]) -> Self {
        self.days
            .insert(day, hashes.iter().map(|h| h.to_string()).collect());
        self
    }

    /// Fail the listing of `day`
    pub fn with_failing_day(mut self, day: DayTimestamp) -> Self {
        self.failing_days.insert(day);
        self
    }

    /// Sleep inside every day listing so concurrency becomes observable
    pub fn with_day_delay(mut self, delay: Duration) -> Self {
        self.day_delay = Some(delay);
        self
    }

    /// Number of `fetch_block` calls for `hash`
    pub fn block_calls(&self, hash: &str) -> usize {
        self.block_calls
            .lock()
            .unwrap()
            .get(hash)
            .copied()
            .unwrap_or(0)
    }

    /// Total number of `fetch_block` calls
    pub fn total_block_calls(&self) -> usize {
        self.block_calls.lock().unwrap().values().sum()
    }

    /// Day timestamps requested, in request order
    pub fn day_requests(&self) -> Vec<DayTimestamp> {
        self.day_requests.lock().unwrap().clone()
    }

    /// Highest number of day listings that were in flight at once
    pub fn max_days_in_flight(&self) -> usize {
        self.max_days_in_flight.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl BlockSource for MockBlockSource {
    async fn fetch_block(&self, hash: &BlockHash) -> Result<RawBlock, BlockSourceError> {
        *self
            .block_calls
            .lock()
            .unwrap()
            .entry(hash.as_str().to_string())
            .or_default() += 1;

        let operation = format!("rawblock/{hash}");
        if self.failing_blocks.contains(hash.as_str()) {
            return Err(BlockSourceError::http_status(operation, 500));
        }
        self.blocks
            .get(hash.as_str())
            .cloned()
            .ok_or_else(|| BlockSourceError::http_status(operation, 404))
    }

    async fn fetch_blocks_for_day(
        &self,
        day: DayTimestamp,
    ) -> Result<Vec<BlockSummary>, BlockSourceError> {
        self.day_requests.lock().unwrap().push(day);
        let in_flight = self.days_in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_days_in_flight.fetch_max(in_flight, Ordering::SeqCst);

        if let Some(delay) = self.day_delay {
            tokio::time::sleep(delay).await;
        }
        self.days_in_flight.fetch_sub(1, Ordering::SeqCst);

        if self.failing_days.contains(&day) {
            return Err(BlockSourceError::upstream_unavailable(
                format!("blocks/{}", day.as_millis()),
                std::io::Error::other("connection reset"),
            ));
        }
        Ok(self
            .days
            .get(&day)
            .map(|hashes| hashes.iter().map(|h| BlockSummary::new(h.as_str())).collect())
            .unwrap_or_default())
    }

    fn name(&self) -> &'static str {
        "MockBlockSource"
    }
}

/// Cache store whose every command fails, counting the attempts
#[derive(Default)]
pub struct FailingCache {
    pub calls: AtomicUsize,
}

impl FailingCache {
    fn fail(&self, operation: &str) -> CacheError {
        self.calls.fetch_add(1, Ordering::SeqCst);
        CacheError::unavailable(
            operation,
            std::io::Error::new(std::io::ErrorKind::ConnectionRefused, "cache down"),
        )
    }
}

#[async_trait]
impl CacheStore for FailingCache {
    async fn get(&self, _key: &str) -> Result<Option<String>, CacheError> {
        Err(self.fail("GET"))
    }

    async fn set(&self, _key: &str, _value: &str, _ttl: Duration) -> Result<(), CacheError> {
        Err(self.fail("SET"))
    }

    async fn mget(&self, _keys: &[String]) -> Result<Vec<Option<String>>, CacheError> {
        Err(self.fail("MGET"))
    }

    async fn stats(&self) -> CacheStats {
        CacheStats::default()
    }

    fn name(&self) -> &'static str {
        "FailingCache"
    }
}

/// Cache that accepts every command and never replies
///
/// Models a Redis server that stopped answering without closing the socket.
#[derive(Default)]
pub struct StalledCache {
    pub calls: AtomicUsize,
}

#[async_trait]
impl CacheStore for StalledCache {
    async fn get(&self, _key: &str) -> Result<Option<String>, CacheError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        futures::future::pending().await
    }

    async fn set(&self, _key: &str, _value: &str, _ttl: Duration) -> Result<(), CacheError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        futures::future::pending().await
    }

    async fn mget(&self, _keys: &[String]) -> Result<Vec<Option<String>>, CacheError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        futures::future::pending().await
    }

    async fn stats(&self) -> CacheStats {
        CacheStats::default()
    }

    fn name(&self) -> &'static str {
        "StalledCache"
    }
}
