// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! HTTP block source for the blockchain.info explorer API
//!
//! Endpoints consumed:
//!
//! - `GET {base}/rawblock/{hash}` → block JSON with `size` and optional `tx`
//! - `GET {base}/blocks/{millis}?format=json` → array of `{hash, ...}`
//!
//! Non-2xx statuses and transport errors become [`BlockSourceError`]s after
//! the configured retries are exhausted.

use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::{debug, Instrument};
use url::Url;

use super::retry::retry_with_backoff;
use super::{BlockSource, BlockSummary, RawBlock, RetryConfig};
use crate::config::SourceConfig;
use crate::errors::BlockSourceError;
use crate::tracing::spans;
use crate::types::block::BlockHash;
use crate::types::day::DayTimestamp;

/// Day listings arrive either as a bare array or wrapped in `{"blocks": [...]}`
#[derive(Deserialize)]
#[serde(untagged)]
enum DayListing {
    Bare(Vec<BlockSummary>),
    Wrapped { blocks: Vec<BlockSummary> },
}

impl From<DayListing> for Vec<BlockSummary> {
    fn from(listing: DayListing) -> Self {
        match listing {
            DayListing::Bare(blocks) | DayListing::Wrapped { blocks } => blocks,
        }
    }
}

/// Client for the blockchain.info explorer
///
/// Cheap to clone; clones share the underlying connection pool.
///
/// # Examples
///
/// ```rust,ignore
/// use blockenergy::{BlockchainInfoClient, SourceConfig};
///
/// let client = BlockchainInfoClient::new(&SourceConfig::default())?;
/// let block = client.fetch_block(&"000000000000000000021bf0".into()).await?;
/// println!("size: {:?}", block.size());
/// ```
#[derive(Debug, Clone)]
pub struct BlockchainInfoClient {
    client: Client,
    base_url: Url,
    retry: RetryConfig,
}

impl BlockchainInfoClient {
    /// Creates a client from source settings
    ///
    /// # Errors
    ///
    /// Returns [`BlockSourceError::InvalidData`] if the base URL cannot carry
    /// path segments, and [`BlockSourceError::UpstreamUnavailable`] if the
    /// HTTP client cannot be initialized (e.g., TLS backend failure).
    pub fn new(config: &SourceConfig) -> Result<Self, BlockSourceError> {
        if config.base_url.cannot_be_a_base() {
            return Err(BlockSourceError::invalid_data(
                "client setup",
                format!("{} cannot be used as a base URL", config.base_url),
            ));
        }

        let client = Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| BlockSourceError::upstream_unavailable("client setup", e))?;

        Ok(Self {
            client,
            base_url: config.base_url.clone(),
            retry: config.retry.clone(),
        })
    }

    /// Returns the explorer base URL
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Appends path segments to the base URL, escaping each segment
    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    /// GETs `url` and decodes the JSON body, retrying transient failures
    async fn get_json<T: DeserializeOwned>(
        &self,
        operation: &str,
        url: Url,
    ) -> Result<T, BlockSourceError> {
        let client = &self.client;
        retry_with_backoff(&self.retry, operation, move || {
            let url = url.clone();
            async move {
                let response = client
                    .get(url)
                    .send()
                    .await
                    .map_err(|e| BlockSourceError::upstream_unavailable(operation, e))?;

                let status = response.status();
                if !status.is_success() {
                    return Err(BlockSourceError::http_status(operation, status.as_u16()));
                }

                response
                    .json::<T>()
                    .await
                    .map_err(|e| BlockSourceError::invalid_data(operation, e.to_string()))
            }
        })
        .await
    }
}

#[async_trait]
impl BlockSource for BlockchainInfoClient {
    async fn fetch_block(&self, hash: &BlockHash) -> Result<RawBlock, BlockSourceError> {
        let operation = format!("rawblock/{hash}");
        let url = self.endpoint(&["rawblock", hash.as_str()]);

        async {
            let block: RawBlock = self.get_json(&operation, url).await?;
            debug!(
                block_hash = %hash,
                size = ?block.size(),
                tx_count = ?block.transactions().map(<[_]>::len),
                "Fetched block"
            );
            Ok(block)
        }
        .instrument(spans::fetch_block(hash))
        .await
    }

    async fn fetch_blocks_for_day(
        &self,
        day: DayTimestamp,
    ) -> Result<Vec<BlockSummary>, BlockSourceError> {
        let millis = day.as_millis().to_string();
        let operation = format!("blocks/{millis}");
        let mut url = self.endpoint(&["blocks", &millis]);
        url.query_pairs_mut().append_pair("format", "json");

        async {
            let listing: DayListing = self.get_json(&operation, url).await?;
            let blocks: Vec<BlockSummary> = listing.into();
            debug!(day = %day, block_count = blocks.len(), "Fetched day listing");
            Ok(blocks)
        }
        .instrument(spans::fetch_blocks_for_day(day))
        .await
    }

    fn name(&self) -> &'static str {
        "BlockchainInfoClient"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::block::BlockSize;
    use mockito::Matcher;
    use serde_json::json;
    use std::time::Duration;

    fn create_test_client(base_url: &str) -> BlockchainInfoClient {
        let config = SourceConfig {
            base_url: Url::parse(base_url).unwrap(),
            request_timeout: Duration::from_secs(5),
            retry: RetryConfig::none(),
        };
        BlockchainInfoClient::new(&config).unwrap()
    }

    #[test]
    fn test_endpoint_joins_segments() {
        let client = create_test_client("https://explorer.example/api/");
        let url = client.endpoint(&["rawblock", "00ab"]);
        assert_eq!(url.as_str(), "https://explorer.example/api/rawblock/00ab");

        let client = create_test_client("https://explorer.example");
        let url = client.endpoint(&["blocks", "123"]);
        assert_eq!(url.as_str(), "https://explorer.example/blocks/123");
    }

    #[tokio::test]
    async fn test_fetch_block() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/rawblock/00ab")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                json!({"hash": "00ab", "size": 1000, "tx": [{"hash": "t1", "size": 10}]})
                    .to_string(),
            )
            .create_async()
            .await;

        let client = create_test_client(&server.url());
        let block = client.fetch_block(&BlockHash::new("00ab")).await.unwrap();

        assert_eq!(block.size(), Some(BlockSize::new(1000)));
        assert_eq!(block.transactions().unwrap().len(), 1);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_fetch_block_http_error() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/rawblock/missing")
            .with_status(404)
            .create_async()
            .await;

        let client = create_test_client(&server.url());
        let result = client.fetch_block(&BlockHash::new("missing")).await;

        assert!(matches!(
            result,
            Err(BlockSourceError::HttpStatus { status: 404, .. })
        ));
    }

    #[tokio::test]
    async fn test_fetch_block_invalid_json() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/rawblock/00ab")
            .with_status(200)
            .with_body("<html>rate limited</html>")
            .create_async()
            .await;

        let client = create_test_client(&server.url());
        let result = client.fetch_block(&BlockHash::new("00ab")).await;

        assert!(matches!(result, Err(BlockSourceError::InvalidData { .. })));
    }

    #[tokio::test]
    async fn test_fetch_blocks_for_day_bare_array() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/blocks/1700000000000")
            .match_query(Matcher::UrlEncoded("format".into(), "json".into()))
            .with_status(200)
            .with_body(json!([{"hash": "b1", "height": 1}, {"hash": "b2"}]).to_string())
            .create_async()
            .await;

        let client = create_test_client(&server.url());
        let blocks = client
            .fetch_blocks_for_day(DayTimestamp::from_millis(1_700_000_000_000))
            .await
            .unwrap();

        let hashes: Vec<_> = blocks.iter().map(|b| b.hash.as_str()).collect();
        assert_eq!(hashes, vec!["b1", "b2"]);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_fetch_blocks_for_day_wrapped() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/blocks/42")
            .match_query(Matcher::UrlEncoded("format".into(), "json".into()))
            .with_status(200)
            .with_body(json!({"blocks": [{"hash": "b1"}]}).to_string())
            .create_async()
            .await;

        let client = create_test_client(&server.url());
        let blocks = client
            .fetch_blocks_for_day(DayTimestamp::from_millis(42))
            .await
            .unwrap();

        assert_eq!(blocks, vec![BlockSummary::new("b1")]);
    }

    #[tokio::test]
    async fn test_unreachable_server_is_upstream_unavailable() {
        // Port 9 (discard) is closed on CI hosts; the connection is refused.
        let client = create_test_client("http://127.0.0.1:9");
        let result = client.fetch_block(&BlockHash::new("00ab")).await;

        assert!(matches!(
            result,
            Err(BlockSourceError::UpstreamUnavailable { .. })
        ));
    }
}
