//! Error types for per-transaction energy resolution.

use super::BlockSourceError;
use crate::types::block::BlockHash;

/// Errors returned by [`TransactionEnergyResolver`](crate::TransactionEnergyResolver).
///
/// Callers see one stable failure whether the network, the HTTP status or
/// the payload was at fault. The cause stays available through
/// [`std::error::Error::source`] for logging.
#[derive(Debug, thiserror::Error)]
pub enum TransactionEnergyError {
    /// The block's transaction list could not be obtained.
    #[error("Failed to fetch transactions for block {block_hash}")]
    FetchFailure {
        /// The block that was requested
        block_hash: BlockHash,
        /// What went wrong upstream
        #[source]
        source: BlockSourceError,
    },
}

impl TransactionEnergyError {
    /// Create a `FetchFailure` for a block.
    pub fn fetch_failure(block_hash: BlockHash, source: BlockSourceError) -> Self {
        TransactionEnergyError::FetchFailure { block_hash, source }
    }
}
