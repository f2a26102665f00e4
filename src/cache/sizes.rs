//! Failure-absorbing block size cache
//!
//! [`SizeCache`] is what the batching loader talks to. It stores block sizes
//! as decimal strings keyed by the raw block hash, and never lets a cache
//! problem reach the caller: backend errors, short `MGET` replies and
//! unparseable values all read as misses, and failed writes are no-ops. Each
//! absorbed failure is logged at `warn`.
//!
//! Every backend command runs under a deadline. A command that outlives it
//! is abandoned and handled like a failed one, so a stalled backend slows a
//! batch down by at most one timeout per command.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tracing::warn;

use super::{CacheStats, CacheStore};
use crate::config::constants::DEFAULT_CACHE_TIMEOUT_MILLIS;
use crate::errors::CacheError;
use crate::types::block::{BlockHash, BlockSize};

/// Typed view of a [`CacheStore`] holding block sizes
#[derive(Clone)]
pub struct SizeCache {
    store: Arc<dyn CacheStore>,
    timeout: Duration,
}

impl std::fmt::Debug for SizeCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SizeCache")
            .field("store", &self.store.name())
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl SizeCache {
    /// Wraps a cache backend with the default command deadline
    pub fn new(store: Arc<dyn CacheStore>) -> Self {
        Self {
            store,
            timeout: Duration::from_millis(DEFAULT_CACHE_TIMEOUT_MILLIS),
        }
    }

    /// Sets the deadline applied to each backend command
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Runs one backend command under the deadline
    async fn bounded<T>(
        &self,
        operation: &'static str,
        command: impl Future<Output = Result<T, CacheError>>,
    ) -> Result<T, CacheError> {
        tokio::time::timeout(self.timeout, command)
            .await
            .unwrap_or_else(|_| Err(CacheError::timeout(operation, self.timeout)))
    }

    /// Looks up one block size
    pub async fn get(&self, hash: &BlockHash) -> Option<BlockSize> {
        match self.bounded("GET", self.store.get(hash.as_str())).await {
            Ok(value) => value.and_then(|raw| parse_cached(hash, &raw)),
            Err(e) => {
                warn!(
                    block_hash = %hash,
                    backend = self.store.name(),
                    error = %e,
                    "Cache read failed, treating as miss"
                );
                None
            }
        }
    }

    /// Looks up several block sizes in one round trip
    ///
    /// The result always has one slot per input hash, in input order.
    pub async fn get_many(&self, hashes: &[BlockHash]) -> Vec<Option<BlockSize>> {
        if hashes.is_empty() {
            return Vec::new();
        }

        let keys: Vec<String> = hashes.iter().map(|h| h.as_str().to_string()).collect();
        let values = match self.bounded("MGET", self.store.mget(&keys)).await {
            Ok(values) if values.len() == hashes.len() => values,
            Ok(values) => {
                warn!(
                    backend = self.store.name(),
                    expected = hashes.len(),
                    received = values.len(),
                    "Cache multi-get returned wrong number of values, treating all as misses"
                );
                return vec![None; hashes.len()];
            }
            Err(e) => {
                warn!(
                    backend = self.store.name(),
                    keys = hashes.len(),
                    error = %e,
                    "Cache multi-get failed, treating all as misses"
                );
                return vec![None; hashes.len()];
            }
        };

        hashes
            .iter()
            .zip(values)
            .map(|(hash, value)| value.and_then(|raw| parse_cached(hash, &raw)))
            .collect()
    }

    /// Stores a block size; failures are logged and otherwise ignored
    pub async fn set(&self, hash: &BlockHash, size: BlockSize, ttl: Duration) {
        let value = size.to_cache_value();
        if let Err(e) = self
            .bounded("SET", self.store.set(hash.as_str(), &value, ttl))
            .await
        {
            warn!(
                block_hash = %hash,
                backend = self.store.name(),
                error = %e,
                "Cache write failed, continuing without caching"
            );
        }
    }

    /// Returns the backend's statistics
    pub async fn stats(&self) -> CacheStats {
        self.store.stats().await
    }
}

fn parse_cached(hash: &BlockHash, raw: &str) -> Option<BlockSize> {
    let size = BlockSize::from_cache_value(raw);
    if size.is_none() {
        warn!(block_hash = %hash, value = raw, "Ignoring unparseable cached size");
    }
    size
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::MemoryCache;
    use crate::errors::CacheError;
    use async_trait::async_trait;

    const TTL: Duration = Duration::from_secs(60);

    /// Backend whose every command fails
    struct BrokenStore;

    #[async_trait]
    impl CacheStore for BrokenStore {
        async fn get(&self, _key: &str) -> Result<Option<String>, CacheError> {
            Err(CacheError::unavailable("GET", std::io::Error::other("down")))
        }

        async fn set(&self, _key: &str, _value: &str, _ttl: Duration) -> Result<(), CacheError> {
            Err(CacheError::unavailable("SET", std::io::Error::other("down")))
        }

        async fn mget(&self, _keys: &[String]) -> Result<Vec<Option<String>>, CacheError> {
            Err(CacheError::unavailable("MGET", std::io::Error::other("down")))
        }

        async fn stats(&self) -> CacheStats {
            CacheStats::default()
        }

        fn name(&self) -> &'static str {
            "BrokenStore"
        }
    }

    /// Backend whose MGET drops the last value
    struct ShortMget(MemoryCache);

    #[async_trait]
    impl CacheStore for ShortMget {
        async fn get(&self, key: &str) -> Result<Option<String>, CacheError> {
            self.0.get(key).await
        }

        async fn set(&self, key: &str, value: &str, ttl: Duration) -> Result<(), CacheError> {
            self.0.set(key, value, ttl).await
        }

        async fn mget(&self, keys: &[String]) -> Result<Vec<Option<String>>, CacheError> {
            let mut values = self.0.mget(keys).await?;
            values.pop();
            Ok(values)
        }

        async fn stats(&self) -> CacheStats {
            self.0.stats().await
        }

        fn name(&self) -> &'static str {
            "ShortMget"
        }
    }

    /// Backend that accepts commands and never answers
    struct StalledStore;

    #[async_trait]
    impl CacheStore for StalledStore {
        async fn get(&self, _key: &str) -> Result<Option<String>, CacheError> {
            futures::future::pending().await
        }

        async fn set(&self, _key: &str, _value: &str, _ttl: Duration) -> Result<(), CacheError> {
            futures::future::pending().await
        }

        async fn mget(&self, _keys: &[String]) -> Result<Vec<Option<String>>, CacheError> {
            futures::future::pending().await
        }

        async fn stats(&self) -> CacheStats {
            CacheStats::default()
        }

        fn name(&self) -> &'static str {
            "StalledStore"
        }
    }

    fn hashes(raw: &[&str]) -> Vec<BlockHash> {
        raw.iter().map(|h| BlockHash::new(*h)).collect()
    }

    #[tokio::test]
    async fn round_trips_sizes() {
        let cache = SizeCache::new(Arc::new(MemoryCache::new()));
        let hash = BlockHash::new("00ab");

        cache.set(&hash, BlockSize::new(1000), TTL).await;

        assert_eq!(cache.get(&hash).await, Some(BlockSize::new(1000)));
        assert_eq!(
            cache.get_many(&hashes(&["00ab", "00cd"])).await,
            vec![Some(BlockSize::new(1000)), None]
        );
    }

    #[tokio::test]
    async fn backend_errors_read_as_misses() {
        let cache = SizeCache::new(Arc::new(BrokenStore));
        let hash = BlockHash::new("00ab");

        cache.set(&hash, BlockSize::new(1000), TTL).await;

        assert_eq!(cache.get(&hash).await, None);
        assert_eq!(
            cache.get_many(&hashes(&["00ab", "00cd"])).await,
            vec![None, None]
        );
    }

    #[tokio::test]
    async fn wrong_length_mget_is_all_miss() {
        let store = MemoryCache::new();
        store.set("a", "1", TTL).await.unwrap();
        store.set("b", "2", TTL).await.unwrap();
        let cache = SizeCache::new(Arc::new(ShortMget(store)));

        assert_eq!(cache.get_many(&hashes(&["a", "b"])).await, vec![None, None]);
    }

    #[tokio::test]
    async fn unparseable_values_are_misses() {
        let store = Arc::new(MemoryCache::new());
        store.set("a", "not-a-number", TTL).await.unwrap();
        store.set("b", "-5", TTL).await.unwrap();
        store.set("c", "42", TTL).await.unwrap();
        let cache = SizeCache::new(store);

        assert_eq!(
            cache.get_many(&hashes(&["a", "b", "c"])).await,
            vec![None, None, Some(BlockSize::new(42))]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn stalled_backend_times_out_as_miss() {
        let cache =
            SizeCache::new(Arc::new(StalledStore)).with_timeout(Duration::from_millis(500));
        let hash = BlockHash::new("00ab");
        let started = tokio::time::Instant::now();

        cache.set(&hash, BlockSize::new(1000), TTL).await;
        assert_eq!(cache.get(&hash).await, None);
        assert_eq!(
            cache.get_many(&hashes(&["00ab", "00cd"])).await,
            vec![None, None]
        );

        // One deadline per command, nothing longer
        let elapsed = started.elapsed();
        assert!(elapsed >= Duration::from_millis(1500));
        assert!(elapsed < Duration::from_millis(1600));
    }

    #[tokio::test]
    async fn empty_input_skips_backend() {
        let cache = SizeCache::new(Arc::new(BrokenStore));
        assert!(cache.get_many(&[]).await.is_empty());
    }
}
