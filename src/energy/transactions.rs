//! Per-transaction energy of a single block
//!
//! Transaction lists are fetched on every call; only block sizes are cached.

use std::ops::Range;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, Instrument};

use crate::errors::{BlockSourceError, TransactionEnergyError};
use crate::source::BlockSource;
use crate::tracing::spans;
use crate::types::block::{BlockHash, BlockSize};
use crate::types::energy::{EnergyPerByte, EnergyValue};

/// Offset/limit window over a block's transaction list
///
/// # Examples
///
/// ```
/// use blockenergy::Page;
///
/// assert_eq!(Page::new(1, Some(2)).window(3), 1..3);
/// assert_eq!(Page::new(10, Some(5)).window(3), 3..3);
/// assert_eq!(Page::all().window(3), 0..3);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page {
    /// Entries to skip
    pub offset: usize,
    /// Maximum entries to return; `None` means through the end
    pub limit: Option<usize>,
}

impl Page {
    /// Creates a page
    pub fn new(offset: usize, limit: Option<usize>) -> Self {
        Self { offset, limit }
    }

    /// Every entry
    pub fn all() -> Self {
        Self::default()
    }

    /// Index range selected from a list of `len` entries
    pub fn window(&self, len: usize) -> Range<usize> {
        let start = self.offset.min(len);
        let end = match self.limit {
            Some(limit) => start.saturating_add(limit).min(len),
            None => len,
        };
        start..end
    }
}

/// Energy attributed to one transaction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionEnergy {
    /// Transaction hash
    pub transaction_hash: String,
    /// `size * energy_per_byte`; zero when the size is missing
    pub energy: EnergyValue,
}

/// Maps a block's transactions to their estimated energy
#[derive(Debug, Clone)]
pub struct TransactionEnergyResolver {
    source: Arc<dyn BlockSource>,
    energy_per_byte: EnergyPerByte,
}

impl TransactionEnergyResolver {
    /// Creates a resolver
    pub fn new(source: Arc<dyn BlockSource>, energy_per_byte: EnergyPerByte) -> Self {
        Self {
            source,
            energy_per_byte,
        }
    }

    /// Energy of the transactions of `block_hash` inside `page`, in block order
    ///
    /// # Errors
    ///
    /// Returns [`TransactionEnergyError::FetchFailure`] when the block cannot
    /// be fetched or carries no transaction list.
    pub async fn transaction_energies(
        &self,
        block_hash: &BlockHash,
        page: Page,
    ) -> Result<Vec<TransactionEnergy>, TransactionEnergyError> {
        async move {
            let block = self
                .source
                .fetch_block(block_hash)
                .await
                .map_err(|e| TransactionEnergyError::fetch_failure(block_hash.clone(), e))?;

            let transactions = block.transactions().ok_or_else(|| {
                TransactionEnergyError::fetch_failure(
                    block_hash.clone(),
                    BlockSourceError::invalid_data(
                        format!("rawblock/{block_hash}"),
                        "block has no transaction list",
                    ),
                )
            })?;

            let window = page.window(transactions.len());
            let entries: Vec<TransactionEnergy> = transactions[window]
                .iter()
                .map(|tx| TransactionEnergy {
                    transaction_hash: tx.hash.clone(),
                    energy: self
                        .energy_per_byte
                        .energy_for(tx.size().unwrap_or(BlockSize::ZERO)),
                })
                .collect();

            debug!(
                block_hash = %block_hash,
                total = transactions.len(),
                returned = entries.len(),
                "Resolved transaction energies"
            );
            Ok(entries)
        }
        .instrument(spans::transaction_energies(block_hash, page.offset, page.limit))
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn window_within_bounds() {
        assert_eq!(Page::new(0, Some(2)).window(5), 0..2);
        assert_eq!(Page::new(3, Some(10)).window(5), 3..5);
        assert_eq!(Page::new(2, None).window(5), 2..5);
    }

    #[test]
    fn window_past_end_is_empty() {
        assert!(Page::new(5, None).window(5).is_empty());
        assert!(Page::new(usize::MAX, Some(usize::MAX)).window(5).is_empty());
    }

    #[test]
    fn zero_limit_is_empty() {
        assert!(Page::new(0, Some(0)).window(5).is_empty());
    }
}
