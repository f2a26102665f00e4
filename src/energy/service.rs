// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Inbound API surface
//!
//! [`EnergyService`] wires one block source, one cache store and one shared
//! [`BatchLoader`] into the three operations exposed to API resolvers. It
//! accepts signed integer arguments as they arrive from the API layer and
//! rejects negative values with [`EnergyError::InvalidArgument`].

use std::sync::Arc;

use tracing::info;

use super::aggregator::{AggregateReport, EnergyAggregator};
use super::transactions::{Page, TransactionEnergy, TransactionEnergyResolver};
use crate::cache::{CacheStore, MemoryCache, RedisCache, SizeCache};
use crate::config::EnergyConfig;
use crate::errors::EnergyError;
use crate::loader::BatchLoader;
use crate::source::{BlockSource, BlockchainInfoClient};
use crate::types::block::BlockHash;
use crate::types::day::DayTimestamp;
use crate::types::energy::EnergyValue;

/// Energy estimation service
///
/// # Examples
///
/// ```rust,ignore
/// use blockenergy::{EnergyConfig, EnergyService};
///
/// let service = EnergyService::connect(EnergyConfig::default()).await?;
/// let energy = service.block_energy("0000000000000000000146c8...").await;
/// let last_week = service.total_energy(7).await?;
/// let txs = service.transaction_energies("0000000000000000000146c8...", Some(15), 0).await?;
/// ```
#[derive(Debug, Clone)]
pub struct EnergyService {
    config: EnergyConfig,
    loader: Arc<BatchLoader>,
    aggregator: EnergyAggregator,
    transactions: TransactionEnergyResolver,
}

impl EnergyService {
    /// Wires a service from explicit collaborators
    pub fn new(
        config: EnergyConfig,
        source: Arc<dyn BlockSource>,
        store: Arc<dyn CacheStore>,
    ) -> Self {
        let loader = Arc::new(BatchLoader::new(
            source.clone(),
            SizeCache::new(store).with_timeout(config.cache_timeout),
            config.energy_per_byte,
            config.cache_ttl,
        ));
        let aggregator =
            EnergyAggregator::new(source.clone(), loader.clone(), config.day_batch_size);
        let transactions = TransactionEnergyResolver::new(source, config.energy_per_byte);

        Self {
            config,
            loader,
            aggregator,
            transactions,
        }
    }

    /// Builds the HTTP block source and the configured cache store
    ///
    /// Uses Redis when `config.redis_url` is set and an in-memory cache
    /// otherwise.
    ///
    /// # Errors
    ///
    /// Returns [`EnergyError::Source`] if the HTTP client cannot be built and
    /// [`EnergyError::Cache`] if Redis is configured but unreachable.
    pub async fn connect(config: EnergyConfig) -> Result<Self, EnergyError> {
        let source: Arc<dyn BlockSource> = Arc::new(BlockchainInfoClient::new(&config.source)?);

        let store: Arc<dyn CacheStore> = match &config.redis_url {
            Some(url) => Arc::new(RedisCache::connect(url, config.cache_timeout).await?),
            None => Arc::new(MemoryCache::new()),
        };

        info!(
            base_url = %config.source.base_url,
            cache = store.name(),
            cache_timeout_ms = config.cache_timeout.as_millis() as u64,
            energy_per_byte = %config.energy_per_byte,
            day_batch_size = config.day_batch_size.as_u32(),
            "Energy service ready"
        );

        Ok(Self::new(config, source, store))
    }

    /// Reads configuration from the environment, then [`connect`](Self::connect)s
    pub async fn from_env() -> Result<Self, EnergyError> {
        let config = EnergyConfig::from_env()?;
        Self::connect(config).await
    }

    /// The configuration the service was built with
    pub fn config(&self) -> &EnergyConfig {
        &self.config
    }

    /// The shared batching loader
    pub fn loader(&self) -> &Arc<BatchLoader> {
        &self.loader
    }

    /// Estimated energy of one block
    ///
    /// Never fails: an unavailable block counts as zero.
    pub async fn block_energy(&self, block_hash: &str) -> EnergyValue {
        self.loader.load(&BlockHash::new(block_hash)).await
    }

    /// Estimated energy of all blocks mined over the last `days` days
    ///
    /// # Errors
    ///
    /// Returns [`EnergyError::InvalidArgument`] if `days` is negative or does
    /// not fit in 32 bits.
    pub async fn total_energy(&self, days: i64) -> Result<EnergyValue, EnergyError> {
        Ok(self.total_energy_report(days).await?.total)
    }

    /// Like [`total_energy`](Self::total_energy), returning the full report
    pub async fn total_energy_report(&self, days: i64) -> Result<AggregateReport, EnergyError> {
        let days = u32::try_from(days).map_err(|_| EnergyError::invalid_argument("days", days))?;
        Ok(self.aggregator.aggregate(days, DayTimestamp::now()).await)
    }

    /// Estimated energy of a block's transactions, paginated
    ///
    /// `limit` of `None` returns everything from `offset` on.
    ///
    /// # Errors
    ///
    /// Returns [`EnergyError::InvalidArgument`] for a negative `limit` or
    /// `offset`, and [`EnergyError::Transactions`] if the block's transactions
    /// cannot be fetched.
    pub async fn transaction_energies(
        &self,
        block_hash: &str,
        limit: Option<i64>,
        offset: i64,
    ) -> Result<Vec<TransactionEnergy>, EnergyError> {
        let offset =
            usize::try_from(offset).map_err(|_| EnergyError::invalid_argument("offset", offset))?;
        let limit = limit
            .map(|limit| {
                usize::try_from(limit).map_err(|_| EnergyError::invalid_argument("limit", limit))
            })
            .transpose()?;

        let entries = self
            .transactions
            .transaction_energies(&BlockHash::new(block_hash), Page::new(offset, limit))
            .await?;
        Ok(entries)
    }
}
