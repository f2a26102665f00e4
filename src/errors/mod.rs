//! Error types for the blockenergy library.
//!
//! This module provides strongly-typed errors for all public APIs in blockenergy.
//! It follows a hybrid approach:
//!
//! - **Module-specific errors** for fine-grained error handling (`BlockSourceError`,
//!   `CacheError`, etc.)
//! - **Unified error type** (`EnergyError`) for convenience at the service boundary
//!
//! # Architecture
//!
//! - [`BlockSourceError`] - Failures talking to the block explorer
//! - [`CacheError`] - Failures of a cache store backend
//! - [`TransactionEnergyError`] - The single user-visible failure of per-transaction lookups
//! - [`ConfigError`] - Invalid configuration values
//!
//! Source and cache errors are absorbed inside the batching loader and the
//! aggregator (they degrade to a zero contribution). They only reach callers
//! through construction paths such as [`EnergyService::connect`](crate::EnergyService::connect).
//!
//! # Examples
//!
//! ```rust,ignore
//! use blockenergy::{EnergyError, EnergyService, TransactionEnergyError};
//!
//! async fn example(service: &EnergyService) {
//!     match service.transaction_energies("00ab", Some(10), 0).await {
//!         Ok(entries) => println!("{} transactions", entries.len()),
//!         Err(EnergyError::Transactions(TransactionEnergyError::FetchFailure { block_hash, .. })) => {
//!             eprintln!("block {block_hash} unavailable");
//!         }
//!         Err(e) => eprintln!("Other error: {e}"),
//!     }
//! }
//! ```

mod cache;
mod config;
mod source;
mod transactions;

pub use cache::CacheError;
pub use config::ConfigError;
pub use source::BlockSourceError;
pub use transactions::TransactionEnergyError;

/// Unified error type for all blockenergy operations.
///
/// All module-specific error types convert into `EnergyError` via `From`
/// implementations, so `?` propagates them naturally.
#[derive(Debug, thiserror::Error)]
pub enum EnergyError {
    /// A request argument was out of range (e.g., a negative day count).
    #[error("Invalid argument {name}: {value}")]
    InvalidArgument {
        /// Argument name as exposed to callers
        name: &'static str,
        /// The rejected value
        value: i64,
    },

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Cache backend error (only surfaced while connecting).
    #[error("Cache error: {0}")]
    Cache(#[from] CacheError),

    /// Block source error (only surfaced while constructing the client).
    #[error("Block source error: {0}")]
    Source(#[from] BlockSourceError),

    /// Per-transaction energy lookup failed.
    #[error(transparent)]
    Transactions(#[from] TransactionEnergyError),
}

impl EnergyError {
    /// Create an `InvalidArgument` error.
    pub fn invalid_argument(name: &'static str, value: i64) -> Self {
        EnergyError::InvalidArgument { name, value }
    }
}
