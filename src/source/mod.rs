// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Remote block source
//!
//! The block source is the external explorer API that supplies block sizes,
//! transaction lists and per-day block listings. This module defines:
//!
//! - [`BlockSource`]: the trait the loader, aggregator and transaction resolver
//!   consume. Implement it to plug in another explorer or a test double.
//! - [`RawBlock`], [`RawTransaction`], [`BlockSummary`]: the wire payloads,
//!   deliberately lenient so that a missing or malformed size degrades one
//!   block rather than failing a whole response.
//! - [`BlockchainInfoClient`]: the HTTP implementation.
//!
//! # Example: a fixed in-memory source
//!
//! ```rust,ignore
//! use async_trait::async_trait;
//! use blockenergy::{BlockHash, BlockSource, BlockSourceError, BlockSummary, DayTimestamp, RawBlock};
//!
//! struct FixedSource(RawBlock);
//!
//! #[async_trait]
//! impl BlockSource for FixedSource {
//!     async fn fetch_block(&self, _hash: &BlockHash) -> Result<RawBlock, BlockSourceError> {
//!         Ok(self.0.clone())
//!     }
//!
//!     async fn fetch_blocks_for_day(
//!         &self,
//!         _day: DayTimestamp,
//!     ) -> Result<Vec<BlockSummary>, BlockSourceError> {
//!         Ok(Vec::new())
//!     }
//! }
//! ```

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::errors::BlockSourceError;
use crate::types::block::{BlockHash, BlockSize};
use crate::types::day::DayTimestamp;

mod http;
mod retry;

pub use http::BlockchainInfoClient;
pub use retry::RetryConfig;

/// Block payload returned by `GET /rawblock/{hash}`
///
/// Only the fields used for energy estimation are modelled. `size` is kept as
/// a raw JSON value so a non-numeric size can be detected and degraded per
/// block instead of failing deserialization.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawBlock {
    /// Block hash echoed by the explorer
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hash: Option<String>,

    /// Block size in bytes, as sent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<Value>,

    /// Transactions in block order, when the explorer includes them
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tx: Option<Vec<RawTransaction>>,
}

impl RawBlock {
    /// Creates a block payload with a numeric size and no transactions
    pub fn with_size(bytes: u64) -> Self {
        Self {
            hash: None,
            size: Some(Value::from(bytes)),
            tx: None,
        }
    }

    /// Attaches a transaction list
    pub fn with_transactions(mut self, transactions: Vec<RawTransaction>) -> Self {
        self.tx = Some(transactions);
        self
    }

    /// Returns the block size if the payload carries a usable number
    pub fn size(&self) -> Option<BlockSize> {
        self.size.as_ref().and_then(BlockSize::from_json)
    }

    /// Returns the transaction list, if present
    pub fn transactions(&self) -> Option<&[RawTransaction]> {
        self.tx.as_deref()
    }
}

/// One entry of a block's `tx` array
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawTransaction {
    /// Transaction hash
    #[serde(default)]
    pub hash: String,

    /// Transaction size in bytes, as sent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<Value>,
}

impl RawTransaction {
    /// Creates a transaction with a numeric size
    pub fn new(hash: impl Into<String>, bytes: u64) -> Self {
        Self {
            hash: hash.into(),
            size: Some(Value::from(bytes)),
        }
    }

    /// Returns the transaction size if the payload carries a usable number
    pub fn size(&self) -> Option<BlockSize> {
        self.size.as_ref().and_then(BlockSize::from_json)
    }
}

/// One block in a per-day listing from `GET /blocks/{millis}?format=json`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockSummary {
    /// Block hash
    pub hash: BlockHash,

    /// Block height, when listed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<u64>,

    /// Block time in epoch seconds, when listed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time: Option<i64>,
}

impl BlockSummary {
    /// Creates a summary carrying only the hash
    pub fn new(hash: impl Into<BlockHash>) -> Self {
        Self {
            hash: hash.into(),
            height: None,
            time: None,
        }
    }
}

/// Trait for explorer backends
///
/// Implementations must be thread-safe; the loader and aggregator issue many
/// requests concurrently through a shared `Arc<dyn BlockSource>`.
///
/// # Error Handling
///
/// Return an error for anything that prevents a usable payload (network
/// failure, non-2xx, undecodable body). Callers decide whether to absorb it:
/// the loader and aggregator degrade to zero, the transaction resolver
/// surfaces it.
#[async_trait]
pub trait BlockSource: Send + Sync {
    /// Fetches one block's metadata by hash
    async fn fetch_block(&self, hash: &BlockHash) -> Result<RawBlock, BlockSourceError>;

    /// Lists the blocks mined during the day ending at `day`
    async fn fetch_blocks_for_day(
        &self,
        day: DayTimestamp,
    ) -> Result<Vec<BlockSummary>, BlockSourceError>;

    /// Returns a human-readable name for this source
    ///
    /// Used for logging and debugging.
    fn name(&self) -> &'static str {
        "BlockSource"
    }
}

impl std::fmt::Debug for dyn BlockSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn raw_block_with_numeric_size() {
        let block: RawBlock = serde_json::from_value(json!({
            "hash": "00ab",
            "size": 1000,
            "tx": [{"hash": "t1", "size": 250}]
        }))
        .unwrap();

        assert_eq!(block.size(), Some(BlockSize::new(1000)));
        let txs = block.transactions().unwrap();
        assert_eq!(txs.len(), 1);
        assert_eq!(txs[0].size(), Some(BlockSize::new(250)));
    }

    #[test]
    fn raw_block_tolerates_bad_size() {
        let block: RawBlock = serde_json::from_value(json!({"size": "huge"})).unwrap();
        assert_eq!(block.size(), None);
        assert!(block.transactions().is_none());
    }

    #[test]
    fn raw_block_tolerates_missing_fields() {
        let block: RawBlock = serde_json::from_value(json!({})).unwrap();
        assert_eq!(block.size(), None);
    }

    #[test]
    fn transaction_without_size() {
        let tx: RawTransaction = serde_json::from_value(json!({"hash": "t1"})).unwrap();
        assert_eq!(tx.hash, "t1");
        assert_eq!(tx.size(), None);
    }

    #[test]
    fn block_summary_ignores_unknown_fields() {
        let summary: BlockSummary = serde_json::from_value(json!({
            "hash": "00ab",
            "height": 820000,
            "time": 1700000000,
            "main_chain": true
        }))
        .unwrap();
        assert_eq!(summary.hash, BlockHash::new("00ab"));
        assert_eq!(summary.height, Some(820000));
    }
}
