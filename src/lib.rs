//! # blockenergy
//!
//! Approximate energy estimates for Bitcoin blocks and transactions, computed
//! as `size_bytes * energy_per_byte` over sizes reported by a public block
//! explorer.
//!
//! The core is a coalescing, cache-aware loader keyed by block hash
//! ([`BatchLoader`]), shared by:
//!
//! - [`EnergyAggregator`]: totals over a trailing window of days, fetched in
//!   sequential day-batches
//! - [`TransactionEnergyResolver`]: per-transaction energies of one block
//! - [`EnergyService`]: the validated entry point for API resolvers
//!
//! Block sizes are cached in a [`CacheStore`] ([`RedisCache`],
//! [`MemoryCache`] or [`NoOpCache`]) for seven days by default. Cache and
//! explorer failures inside the loader and aggregator degrade to a zero
//! contribution and are logged; they never fail a total.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use blockenergy::{EnergyConfig, EnergyService};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let service = EnergyService::connect(EnergyConfig::from_env()?).await?;
//!     println!("last 3 days: {}", service.total_energy(3).await?);
//!     Ok(())
//! }
//! ```

pub mod bootstrap;
pub mod cache;
pub mod config;
pub mod energy;
pub mod errors;
pub mod loader;
pub mod source;
mod tracing;
pub mod types;

pub use cache::types::{AccessSequence, TimestampMillis};
pub use cache::{CacheStats, CacheStore, MemoryCache, NoOpCache, RedisCache, SizeCache};
pub use config::constants::ENERGY_PER_BYTE;
pub use config::{EnergyConfig, EnergyConfigBuilder, SourceConfig};
pub use energy::{
    AggregateReport, EnergyAggregator, EnergyService, Page, TransactionEnergy,
    TransactionEnergyResolver,
};
pub use errors::{BlockSourceError, CacheError, ConfigError, EnergyError, TransactionEnergyError};
pub use loader::{BatchLoader, BatchReport, LoaderStats, PendingLoad};
pub use source::{
    BlockSource, BlockSummary, BlockchainInfoClient, RawBlock, RawTransaction, RetryConfig,
};
pub use types::block::{BlockHash, BlockSize};
pub use types::config::DayBatchSize;
pub use types::day::DayTimestamp;
pub use types::energy::{EnergyPerByte, EnergyValue};
