//! Error types for cache store backends.

use std::time::Duration;

/// Errors raised by a [`CacheStore`](crate::cache::CacheStore) backend.
///
/// The cache is an optimization: the [`SizeCache`](crate::cache::SizeCache)
/// adapter logs these and carries on as if the key were absent.
#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    /// The backing store could not be reached or rejected the command.
    #[error("Cache unavailable during {operation}")]
    Unavailable {
        /// The command that failed (e.g., "MGET")
        operation: String,
        /// The underlying client error
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// The command did not complete within its deadline.
    #[error("Cache {operation} timed out after {timeout:?}")]
    Timeout {
        /// The command that stalled
        operation: String,
        /// The deadline that elapsed
        timeout: Duration,
    },
}

impl CacheError {
    /// Helper to create an `Unavailable` error from any error type.
    pub fn unavailable(
        operation: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        CacheError::Unavailable {
            operation: operation.into(),
            source: Box::new(source),
        }
    }

    /// Helper to create a `Timeout` error.
    pub fn timeout(operation: impl Into<String>, timeout: Duration) -> Self {
        CacheError::Timeout {
            operation: operation.into(),
            timeout,
        }
    }
}
