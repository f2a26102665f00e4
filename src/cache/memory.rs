// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! In-memory cache implementation with per-entry TTL and optional size limit

use async_trait::async_trait;
use std::collections::HashMap;
use std::time::Duration;
use tokio::sync::Mutex;
use tracing::debug;

use super::{
    types::{AccessSequence, TimestampMillis},
    CacheStats, CacheStore,
};
use crate::errors::CacheError;

/// Entry in the memory cache with metadata
#[derive(Debug, Clone)]
struct CacheEntry {
    value: String,
    /// Deadline after which the entry is treated as absent
    expires_at: TimestampMillis,
    /// When this entry was last read or written (for LRU eviction)
    last_accessed: TimestampMillis,
    /// Tie-break for entries accessed within the same millisecond
    access_seq: AccessSequence,
}

impl CacheEntry {
    fn new(value: String, ttl: Duration, access_seq: AccessSequence) -> Self {
        let now = TimestampMillis::now();
        Self {
            value,
            expires_at: now.after(ttl),
            last_accessed: now,
            access_seq,
        }
    }

    fn is_expired(&self) -> bool {
        self.expires_at.has_passed()
    }

    fn touch(&mut self, access_seq: AccessSequence) {
        self.last_accessed = TimestampMillis::now();
        self.access_seq = access_seq;
    }
}

#[derive(Debug, Default)]
struct MemoryCacheState {
    entries: HashMap<String, CacheEntry>,
    stats: CacheStats,
    next_seq: AccessSequence,
}

impl MemoryCacheState {
    /// Looks up `key`, dropping it if expired, and updates statistics
    fn lookup(&mut self, key: &str) -> Option<String> {
        let seq = self.next_seq;

        let expired = match self.entries.get_mut(key) {
            Some(entry) if entry.is_expired() => true,
            Some(entry) => {
                entry.touch(seq);
                let value = entry.value.clone();
                self.next_seq = self.next_seq.next();
                self.stats.hits += 1;
                debug!(key, "Cache hit (memory)");
                return Some(value);
            }
            None => false,
        };

        if expired {
            debug!(key, "Cache entry expired");
            self.entries.remove(key);
            self.stats.expirations += 1;
            self.stats.entries = self.entries.len();
        }
        self.stats.misses += 1;
        debug!(key, "Cache miss (memory)");
        None
    }

    fn evict_lru(&mut self) {
        let lru_key = self
            .entries
            .iter()
            .min_by_key(|(_, entry)| (entry.last_accessed, entry.access_seq))
            .map(|(key, _)| key.clone());

        if let Some(key) = lru_key {
            debug!(key = %key, "Evicting LRU cache entry");
            self.entries.remove(&key);
            self.stats.evictions += 1;
        }
    }
}

/// In-process cache store
///
/// Stores values in a `HashMap` behind an async mutex. It supports:
/// - Per-entry TTL, as passed to [`CacheStore::set`]
/// - Optional size limit with LRU (least recently used) eviction
///
/// Used when no Redis URL is configured, and in tests. Contents are lost when
/// the process exits and are not shared between processes.
///
/// # Examples
///
/// ```rust,ignore
/// use blockenergy::{CacheStore, MemoryCache};
/// use std::time::Duration;
///
/// let cache = MemoryCache::new().with_max_entries(1000);
/// cache.set("00ab", "1000", Duration::from_secs(60)).await?;
/// assert_eq!(cache.get("00ab").await?.as_deref(), Some("1000"));
/// ```
///
/// # Performance
///
/// - Get: O(1) average case (HashMap lookup)
/// - Set: O(1) without eviction, O(n) with eviction (finds LRU)
#[derive(Debug, Default)]
pub struct MemoryCache {
    max_entries: Option<usize>,
    state: Mutex<MemoryCacheState>,
}

impl MemoryCache {
    /// Creates a new memory cache with no size limit
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the maximum number of entries in the cache
    ///
    /// When the limit is reached, the least recently used entry is evicted to
    /// make room for new entries.
    pub fn with_max_entries(mut self, max_entries: usize) -> Self {
        self.max_entries = Some(max_entries.max(1));
        self
    }

    /// Removes every entry
    pub async fn clear(&self) {
        let mut state = self.state.lock().await;
        debug!(entries = state.entries.len(), "Clearing memory cache");
        state.entries.clear();
        state.stats.entries = 0;
    }
}

#[async_trait]
impl CacheStore for MemoryCache {
    async fn get(&self, key: &str) -> Result<Option<String>, CacheError> {
        let mut state = self.state.lock().await;
        Ok(state.lookup(key))
    }

    async fn set(&self, key: &str, value: &str, ttl: Duration) -> Result<(), CacheError> {
        let mut state = self.state.lock().await;

        if let Some(max_entries) = self.max_entries {
            if !state.entries.contains_key(key) {
                while state.entries.len() >= max_entries {
                    state.evict_lru();
                }
            }
        }

        debug!(key, ttl_secs = ttl.as_secs(), "Inserting entry into memory cache");
        let seq = state.next_seq;
        state.next_seq = state.next_seq.next();
        state
            .entries
            .insert(key.to_string(), CacheEntry::new(value.to_string(), ttl, seq));
        state.stats.entries = state.entries.len();

        Ok(())
    }

    async fn mget(&self, keys: &[String]) -> Result<Vec<Option<String>>, CacheError> {
        let mut state = self.state.lock().await;
        Ok(keys.iter().map(|key| state.lookup(key)).collect())
    }

    async fn stats(&self) -> CacheStats {
        let state = self.state.lock().await;
        state.stats.clone()
    }

    fn name(&self) -> &'static str {
        "MemoryCache"
    }
}
