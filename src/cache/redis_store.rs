// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Redis-backed cache store

use async_trait::async_trait;
use redis::aio::{ConnectionManager, ConnectionManagerConfig};
use redis::AsyncCommands;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tracing::{debug, info};

use super::{CacheStats, CacheStore};
use crate::errors::CacheError;

/// Shared cache store backed by Redis
///
/// Uses a [`ConnectionManager`], which multiplexes commands over one
/// connection and reconnects transparently after a dropped connection.
/// Commands issued while the server is unreachable fail with
/// [`CacheError::Unavailable`]. Connecting and each response are bounded by
/// the timeout given to [`RedisCache::connect`].
///
/// # Examples
///
/// ```rust,ignore
/// use blockenergy::RedisCache;
///
/// let cache = RedisCache::connect("redis://127.0.0.1:6379", Duration::from_secs(2)).await?;
/// ```
#[derive(Clone)]
pub struct RedisCache {
    connection: ConnectionManager,
    stats: Arc<Mutex<CacheStats>>,
}

impl std::fmt::Debug for RedisCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedisCache").finish_non_exhaustive()
    }
}

impl RedisCache {
    /// Connects to the Redis server at `url`
    ///
    /// `timeout` bounds both establishing a connection and waiting for any
    /// single reply.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError::Unavailable`] if the URL is invalid or the
    /// initial connection fails.
    pub async fn connect(url: &str, timeout: Duration) -> Result<Self, CacheError> {
        let client =
            redis::Client::open(url).map_err(|e| CacheError::unavailable("open client", e))?;
        let config = ConnectionManagerConfig::new()
            .set_connection_timeout(timeout)
            .set_response_timeout(timeout);
        let connection = client
            .get_connection_manager_with_config(config)
            .await
            .map_err(|e| CacheError::unavailable("connect", e))?;

        info!(
            addr = %client.get_connection_info().addr,
            timeout_ms = timeout.as_millis() as u64,
            "Connected to Redis cache"
        );

        Ok(Self {
            connection,
            stats: Default::default(),
        })
    }

    fn record<T>(&self, result: &Result<T, CacheError>, hits: u64, misses: u64) {
        if let Ok(mut stats) = self.stats.lock() {
            match result {
                Ok(_) => {
                    stats.hits += hits;
                    stats.misses += misses;
                }
                Err(_) => stats.errors += 1,
            }
        }
    }
}

#[async_trait]
impl CacheStore for RedisCache {
    async fn get(&self, key: &str) -> Result<Option<String>, CacheError> {
        let mut connection = self.connection.clone();
        let result: Result<Option<String>, CacheError> = connection
            .get(key)
            .await
            .map_err(|e| CacheError::unavailable("GET", e));

        let hit = matches!(result, Ok(Some(_)));
        self.record(&result, u64::from(hit), u64::from(!hit));
        result
    }

    async fn set(&self, key: &str, value: &str, ttl: Duration) -> Result<(), CacheError> {
        let mut connection = self.connection.clone();
        // EX must be at least one second
        let seconds = ttl.as_secs().max(1);
        let result: Result<(), CacheError> = connection
            .set_ex(key, value, seconds)
            .await
            .map_err(|e| CacheError::unavailable("SET", e));

        debug!(key, ttl_secs = seconds, ok = result.is_ok(), "Redis SET EX");
        self.record(&result, 0, 0);
        result
    }

    async fn mget(&self, keys: &[String]) -> Result<Vec<Option<String>>, CacheError> {
        if keys.is_empty() {
            return Ok(Vec::new());
        }

        let mut connection = self.connection.clone();
        // Explicit MGET: the typed helper sends GET for a single key, which
        // does not decode into a list.
        let result: Result<Vec<Option<String>>, CacheError> = redis::cmd("MGET")
            .arg(keys)
            .query_async(&mut connection)
            .await
            .map_err(|e| CacheError::unavailable("MGET", e));

        let (hits, misses) = match &result {
            Ok(values) => {
                let hits = values.iter().filter(|v| v.is_some()).count() as u64;
                (hits, values.len() as u64 - hits)
            }
            Err(_) => (0, 0),
        };
        self.record(&result, hits, misses);
        result
    }

    async fn stats(&self) -> CacheStats {
        self.stats
            .lock()
            .map(|stats| stats.clone())
            .unwrap_or_default()
    }

    fn name(&self) -> &'static str {
        "RedisCache"
    }
}
