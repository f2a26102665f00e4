//! No-operation cache that disables caching entirely

use async_trait::async_trait;
use std::time::Duration;

use super::{CacheStats, CacheStore};
use crate::errors::CacheError;

/// A no-operation cache that disables caching entirely
///
/// Every read misses and every write is discarded, so each size lookup goes
/// to the block source.
///
/// # Examples
///
/// ```rust,ignore
/// use blockenergy::{EnergyConfig, EnergyService, NoOpCache};
/// use std::sync::Arc;
///
/// let service = EnergyService::new(EnergyConfig::default(), source, Arc::new(NoOpCache));
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOpCache;

#[async_trait]
impl CacheStore for NoOpCache {
    async fn get(&self, _key: &str) -> Result<Option<String>, CacheError> {
        Ok(None)
    }

    async fn set(&self, _key: &str, _value: &str, _ttl: Duration) -> Result<(), CacheError> {
        Ok(())
    }

    async fn mget(&self, keys: &[String]) -> Result<Vec<Option<String>>, CacheError> {
        Ok(vec![None; keys.len()])
    }

    async fn stats(&self) -> CacheStats {
        CacheStats::default()
    }

    fn name(&self) -> &'static str {
        "NoOpCache"
    }
}
