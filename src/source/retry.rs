// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Retry with exponential backoff for explorer requests.
//!
//! Each HTTP request made by [`BlockchainInfoClient`](super::BlockchainInfoClient)
//! runs through [`retry_with_backoff`], which retries transient failures
//! (see [`BlockSourceError::is_retryable`]) with the delay formula:
//!
//! ```text
//! delay = min(base_delay * 2^attempt, max_delay)
//! ```

use std::future::Future;
use std::time::Duration;

use tracing::{debug, warn};

use crate::errors::BlockSourceError;

/// Default maximum number of retry attempts.
const DEFAULT_MAX_RETRIES: u32 = 3;
/// Default base delay for exponential backoff (100ms).
const DEFAULT_BASE_DELAY_MS: u64 = 100;
/// Default maximum delay between retries (30 seconds).
const DEFAULT_MAX_DELAY_MS: u64 = 30_000;

/// Configuration for retry behavior.
///
/// # Example
///
/// ```rust
/// use blockenergy::RetryConfig;
/// use std::time::Duration;
///
/// let config = RetryConfig::default();
/// assert_eq!(config.max_retries, 3);
///
/// let config = RetryConfig::none();
/// assert_eq!(config.max_retries, 0);
///
/// let config = RetryConfig {
///     max_retries: 5,
///     base_delay: Duration::from_millis(200),
///     max_delay: Duration::from_secs(60),
/// };
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RetryConfig {
    /// Maximum number of retry attempts (not including the initial request).
    pub max_retries: u32,
    /// Base delay for exponential backoff.
    pub base_delay: Duration,
    /// Maximum delay between retries.
    pub max_delay: Duration,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: DEFAULT_MAX_RETRIES,
            base_delay: Duration::from_millis(DEFAULT_BASE_DELAY_MS),
            max_delay: Duration::from_millis(DEFAULT_MAX_DELAY_MS),
        }
    }
}

impl RetryConfig {
    /// Single attempt, no retries.
    pub fn none() -> Self {
        Self {
            max_retries: 0,
            ..Default::default()
        }
    }

    /// Calculates the backoff duration for a given attempt.
    ///
    /// Uses exponential backoff: `min(base_delay * 2^attempt, max_delay)`
    pub fn backoff(&self, attempt: u32) -> Duration {
        let multiplier = 2u64.saturating_pow(attempt);
        let delay_ms = self
            .base_delay
            .as_millis()
            .saturating_mul(multiplier as u128);
        let capped_delay_ms = delay_ms.min(self.max_delay.as_millis()) as u64;
        Duration::from_millis(capped_delay_ms)
    }
}

/// Runs `request` until it succeeds, fails permanently or exhausts retries.
pub(crate) async fn retry_with_backoff<T, F, Fut>(
    config: &RetryConfig,
    operation: &str,
    mut request: F,
) -> Result<T, BlockSourceError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, BlockSourceError>>,
{
    let mut attempt = 0u32;
    loop {
        match request().await {
            Ok(response) => {
                if attempt > 0 {
                    debug!(operation, attempt, "Request succeeded after retry");
                }
                return Ok(response);
            }
            Err(error) => {
                if !error.is_retryable() {
                    debug!(operation, error = %error, "Non-retryable error, not retrying");
                    return Err(error);
                }

                if attempt >= config.max_retries {
                    warn!(
                        operation,
                        error = %error,
                        attempts = attempt + 1,
                        "Max retries exceeded"
                    );
                    return Err(error);
                }

                let delay = config.backoff(attempt);
                warn!(
                    operation,
                    error = %error,
                    attempt = attempt + 1,
                    max_retries = config.max_retries,
                    delay_ms = delay.as_millis(),
                    "Retryable error, backing off"
                );

                tokio::time::sleep(delay).await;
                attempt += 1;
            }
        }
    }
}
