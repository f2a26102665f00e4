// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Cache store backends for block sizes
//!
//! Block sizes never change once a block is mined, so every resolved size is
//! written to a shared key/value store with a bounded lifetime. This module
//! provides:
//!
//! - [`CacheStore`]: the key/value contract (`GET`, `SET EX`, `MGET`)
//! - [`RedisCache`]: shared store backed by Redis
//! - [`MemoryCache`]: in-process store with per-entry TTL and optional LRU limit
//! - [`NoOpCache`]: disables caching entirely
//! - [`SizeCache`]: typed adapter used by the loader; it turns every backend
//!   failure into a miss
//!
//! # Examples
//!
//! ```rust,ignore
//! use blockenergy::{MemoryCache, NoOpCache, RedisCache, SizeCache};
//! use std::sync::Arc;
//!
//! // Shared Redis store
//! let store = Arc::new(RedisCache::connect("redis://127.0.0.1:6379").await?);
//!
//! // Bounded in-process store
//! let store = Arc::new(MemoryCache::new().with_max_entries(10_000));
//!
//! // No cache (always fetch)
//! let store = Arc::new(NoOpCache);
//!
//! let sizes = SizeCache::new(store);
//! ```

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

use crate::errors::CacheError;

mod memory;
mod noop;
mod redis_store;
mod sizes;
pub mod types;

pub use memory::MemoryCache;
pub use noop::NoOpCache;
pub use redis_store::RedisCache;
pub use sizes::SizeCache;

/// Statistics about cache performance
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheStats {
    /// Number of cache hits (successful retrievals)
    pub hits: u64,
    /// Number of cache misses (key not found)
    pub misses: u64,
    /// Number of entries evicted due to size limits
    pub evictions: u64,
    /// Number of entries expired due to TTL
    pub expirations: u64,
    /// Number of backend commands that failed
    pub errors: u64,
    /// Current number of entries in the cache, where the backend knows it
    pub entries: usize,
}

impl CacheStats {
    /// Calculates the cache hit rate as a percentage (0.0 to 100.0)
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            (self.hits as f64 / total as f64) * 100.0
        }
    }
}

impl fmt::Display for CacheStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "hits={}, misses={}, evictions={}, expirations={}, errors={}, entries={}, hit_rate={:.1}%",
            self.hits,
            self.misses,
            self.evictions,
            self.expirations,
            self.errors,
            self.entries,
            self.hit_rate()
        )
    }
}

/// Trait for key/value cache backends
///
/// Mirrors the wire contract of the shared store: `GET`, `SET key value EX
/// seconds` and `MGET`.
///
/// # Thread Safety
///
/// Implementations must be thread-safe and support concurrent access. Use
/// interior mutability (e.g., `Mutex`) as needed.
///
/// # Error Handling
///
/// Backends report failures as [`CacheError`]. Callers on the hot path go
/// through [`SizeCache`], which logs them and treats them as misses.
#[async_trait]
pub trait CacheStore: Send + Sync {
    /// Retrieves the value stored under `key`
    ///
    /// Returns `Ok(None)` if the key is absent or has expired.
    async fn get(&self, key: &str) -> Result<Option<String>, CacheError>;

    /// Stores `value` under `key`, expiring after `ttl`
    async fn set(&self, key: &str, value: &str, ttl: Duration) -> Result<(), CacheError>;

    /// Retrieves several keys in one round trip
    ///
    /// The result has the same length and order as `keys`.
    async fn mget(&self, keys: &[String]) -> Result<Vec<Option<String>>, CacheError>;

    /// Returns current cache statistics
    async fn stats(&self) -> CacheStats;

    /// Returns a human-readable name for this cache backend
    ///
    /// Used for logging and debugging.
    fn name(&self) -> &'static str;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hit_rate_without_traffic_is_zero() {
        assert_eq!(CacheStats::default().hit_rate(), 0.0);
    }

    #[test]
    fn stats_display() {
        let stats = CacheStats {
            hits: 3,
            misses: 1,
            entries: 2,
            ..Default::default()
        };
        assert_eq!(
            stats.to_string(),
            "hits=3, misses=1, evictions=0, expirations=0, errors=0, entries=2, hit_rate=75.0%"
        );
    }
}
