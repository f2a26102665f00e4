// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Batching, caching, coalescing block energy loader
//!
//! [`BatchLoader`] turns many independent "energy of block `h`" requests into
//! as few cache and network round trips as possible:
//!
//! 1. Requests are collected in a pending batch ([`BatchLoader::enqueue`]).
//! 2. [`BatchLoader::flush`] takes the whole pending batch, deduplicates the
//!    hashes, and reads them from the cache in one multi-get.
//! 3. Misses are fetched from the block source concurrently. Usable sizes are
//!    written back to the cache before the batch resolves.
//! 4. Every request receives `size * energy_per_byte`, duplicates included.
//!
//! A failed fetch or a non-numeric size resolves to zero, is logged at `warn`
//! and is counted as degraded in the [`BatchReport`]; it never fails the batch
//! and is never cached.
//!
//! # Batching window
//!
//! [`BatchLoader::load`] enqueues its hash, yields once to the scheduler so
//! that sibling futures polled in the same pass can enqueue theirs, then
//! flushes. Whichever caller flushes first resolves everyone in the window;
//! later flushes find the batch empty and simply wait for their result.
//!
//! ```rust,ignore
//! use blockenergy::BatchLoader;
//! use futures::future::join_all;
//!
//! // Both loads land in a single batch: one cache MGET, at most one fetch per hash
//! let energies = join_all([loader.load(&a), loader.load(&b)]).await;
//! ```
//!
//! # Cancellation
//!
//! Not supported. If the future running a flush is dropped, requests from
//! other callers in that batch resolve to zero.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use futures::future::join_all;
use tokio::sync::oneshot;
use tracing::{debug, warn, Instrument};

use crate::cache::{CacheStats, SizeCache};
use crate::source::BlockSource;
use crate::tracing::spans;
use crate::types::block::{BlockHash, BlockSize};
use crate::types::energy::{EnergyPerByte, EnergyValue};

mod report;

pub use report::{BatchReport, LoaderStats};

type Responder = oneshot::Sender<EnergyValue>;

/// A request waiting in the pending batch
#[derive(Debug)]
struct PendingRequest {
    hash: BlockHash,
    responder: Responder,
}

/// Handle to an enqueued request
///
/// Resolves once some flush has processed the batch containing it.
#[derive(Debug)]
pub struct PendingLoad {
    hash: BlockHash,
    receiver: oneshot::Receiver<EnergyValue>,
}

impl PendingLoad {
    /// The requested block hash
    pub fn hash(&self) -> &BlockHash {
        &self.hash
    }

    /// Waits for the request's energy value
    ///
    /// Resolves to zero if the flush carrying this request was dropped.
    pub async fn resolve(self) -> EnergyValue {
        match self.receiver.await {
            Ok(energy) => energy,
            Err(_) => {
                warn!(block_hash = %self.hash, "Batch dropped before resolving, using zero");
                EnergyValue::ZERO
            }
        }
    }
}

/// Coalescing block energy loader
///
/// Cheap to share behind an `Arc`; all state sits behind short-lived locks
/// that are never held across an await point.
pub struct BatchLoader {
    source: Arc<dyn BlockSource>,
    cache: SizeCache,
    energy_per_byte: EnergyPerByte,
    cache_ttl: Duration,
    pending: Mutex<Vec<PendingRequest>>,
    stats: Mutex<LoaderStats>,
}

impl std::fmt::Debug for BatchLoader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BatchLoader")
            .field("source", &self.source.name())
            .field("cache", &self.cache)
            .field("energy_per_byte", &self.energy_per_byte)
            .field("cache_ttl", &self.cache_ttl)
            .finish_non_exhaustive()
    }
}

impl BatchLoader {
    /// Creates a loader over a block source and a size cache
    pub fn new(
        source: Arc<dyn BlockSource>,
        cache: SizeCache,
        energy_per_byte: EnergyPerByte,
        cache_ttl: Duration,
    ) -> Self {
        Self {
            source,
            cache,
            energy_per_byte,
            cache_ttl,
            pending: Mutex::new(Vec::new()),
            stats: Mutex::new(LoaderStats::default()),
        }
    }

    /// Energy factor applied to every resolved size
    pub fn energy_per_byte(&self) -> EnergyPerByte {
        self.energy_per_byte
    }

    /// Cumulative statistics over all flushes so far
    pub fn stats(&self) -> LoaderStats {
        *lock(&self.stats)
    }

    /// Statistics of the underlying cache backend
    pub async fn cache_stats(&self) -> CacheStats {
        self.cache.stats().await
    }

    /// Adds a request to the pending batch without flushing
    pub fn enqueue(&self, hash: BlockHash) -> PendingLoad {
        let (responder, receiver) = oneshot::channel();
        lock(&self.pending).push(PendingRequest {
            hash: hash.clone(),
            responder,
        });
        PendingLoad { hash, receiver }
    }

    /// Hashes currently waiting for a flush, in enqueue order
    pub fn pending_keys(&self) -> Vec<BlockHash> {
        lock(&self.pending)
            .iter()
            .map(|request| request.hash.clone())
            .collect()
    }

    /// Resolves every pending request
    ///
    /// Returns an empty report without touching the cache or the source when
    /// nothing is pending.
    pub async fn flush(&self) -> BatchReport {
        let batch = std::mem::take(&mut *lock(&self.pending));
        if batch.is_empty() {
            return BatchReport::default();
        }

        let unique: Vec<BlockHash> = {
            let mut seen = HashSet::with_capacity(batch.len());
            batch
                .iter()
                .filter(|request| seen.insert(&request.hash))
                .map(|request| request.hash.clone())
                .collect()
        };

        let span = spans::load_batch(batch.len(), unique.len());
        async move {
            let (sizes, mut report) = self.resolve_sizes(&unique).await;
            report.requested = batch.len();

            for request in batch {
                let size = sizes.get(&request.hash).copied().unwrap_or(BlockSize::ZERO);
                // A closed receiver means that caller stopped waiting
                let _ = request
                    .responder
                    .send(self.energy_per_byte.energy_for(size));
            }

            lock(&self.stats).record(&report);
            debug!(
                requested = report.requested,
                unique = report.unique,
                cache_hits = report.cache_hits,
                fetched = report.fetched,
                degraded = report.degraded,
                "Resolved loader batch"
            );
            report
        }
        .instrument(span)
        .await
    }

    /// Energy of one block, coalesced with concurrent loads
    ///
    /// Coalescing covers futures polled together on one task, as with
    /// `join_all`. Loads issued from separately spawned tasks usually land in
    /// different batches on a multi-threaded runtime. To batch across tasks,
    /// have each task [`enqueue`](Self::enqueue) and call
    /// [`flush`](Self::flush) once all of them have.
    pub async fn load(&self, hash: &BlockHash) -> EnergyValue {
        let pending = self.enqueue(hash.clone());
        tokio::task::yield_now().await;
        self.flush().await;
        pending.resolve().await
    }

    /// Energies of several blocks, in input order, duplicates included
    pub async fn load_many(&self, hashes: &[BlockHash]) -> Vec<EnergyValue> {
        self.load_many_with_report(hashes).await.0
    }

    /// Like [`load_many`](Self::load_many), also returning the flush report
    ///
    /// The report describes the whole flushed batch, which may include
    /// requests enqueued concurrently by other callers.
    pub async fn load_many_with_report(
        &self,
        hashes: &[BlockHash],
    ) -> (Vec<EnergyValue>, BatchReport) {
        if hashes.is_empty() {
            return (Vec::new(), BatchReport::default());
        }

        let pending: Vec<PendingLoad> = hashes
            .iter()
            .map(|hash| self.enqueue(hash.clone()))
            .collect();
        let report = self.flush().await;
        let energies = join_all(pending.into_iter().map(PendingLoad::resolve)).await;
        (energies, report)
    }

    /// Reads `unique` from the cache and fetches the misses
    async fn resolve_sizes(
        &self,
        unique: &[BlockHash],
    ) -> (HashMap<BlockHash, BlockSize>, BatchReport) {
        let cached = self.cache.get_many(unique).await;

        let mut sizes = HashMap::with_capacity(unique.len());
        let mut misses = Vec::new();
        for (hash, size) in unique.iter().zip(cached) {
            match size {
                Some(size) => {
                    sizes.insert(hash.clone(), size);
                }
                None => misses.push(hash),
            }
        }

        let mut report = BatchReport {
            unique: unique.len(),
            cache_hits: unique.len() - misses.len(),
            fetched: misses.len(),
            ..Default::default()
        };

        let fetched = join_all(misses.iter().map(|hash| self.fetch_size(hash))).await;
        for (hash, size) in misses.into_iter().zip(fetched) {
            let size = size.unwrap_or_else(|| {
                report.degraded += 1;
                BlockSize::ZERO
            });
            sizes.insert(hash.clone(), size);
        }

        (sizes, report)
    }

    /// Fetches one block's size and caches it; `None` means degraded
    async fn fetch_size(&self, hash: &BlockHash) -> Option<BlockSize> {
        let block = match self.source.fetch_block(hash).await {
            Ok(block) => block,
            Err(e) => {
                warn!(
                    block_hash = %hash,
                    source = self.source.name(),
                    error = %e,
                    "Block fetch failed, counting zero energy"
                );
                return None;
            }
        };

        let Some(size) = block.size() else {
            warn!(
                block_hash = %hash,
                size = ?block.size,
                "Block has no usable size, counting zero energy"
            );
            return None;
        };

        self.cache.set(hash, size, self.cache_ttl).await;
        Some(size)
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
