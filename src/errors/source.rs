//! Error types for the remote block source.
//!
//! These errors describe failures talking to the blockchain explorer. Most
//! callers absorb them (a missing block contributes zero energy); only the
//! transaction resolver surfaces them, wrapped in
//! [`TransactionEnergyError`](super::TransactionEnergyError).

/// Errors that can occur while fetching data from the block explorer.
///
/// # Examples
///
/// ```rust
/// use blockenergy::BlockSourceError;
///
/// let error = BlockSourceError::http_status("rawblock/00ab", 503);
/// assert!(error.is_retryable());
///
/// let error = BlockSourceError::invalid_data("rawblock/00ab", "missing size");
/// assert!(!error.is_retryable());
/// ```
#[derive(Debug, thiserror::Error)]
pub enum BlockSourceError {
    /// The request never produced a response.
    ///
    /// Covers connection failures, DNS errors and timeouts.
    #[error("Upstream unavailable during {operation}")]
    UpstreamUnavailable {
        /// Description of the request that failed (e.g., "rawblock/00ab")
        operation: String,
        /// The underlying transport error
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// The explorer answered with a non-2xx status.
    #[error("Upstream returned HTTP {status} for {operation}")]
    HttpStatus {
        /// Description of the request that failed
        operation: String,
        /// HTTP status code
        status: u16,
    },

    /// The response could not be decoded or lacks a required field.
    #[error("Invalid data from {operation}: {details}")]
    InvalidData {
        /// Description of the request whose payload was invalid
        operation: String,
        /// What was wrong with the payload
        details: String,
    },
}

impl BlockSourceError {
    /// Helper to create an `UpstreamUnavailable` error from any error type.
    pub fn upstream_unavailable(
        operation: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        BlockSourceError::UpstreamUnavailable {
            operation: operation.into(),
            source: Box::new(source),
        }
    }

    /// Helper to create an `HttpStatus` error.
    pub fn http_status(operation: impl Into<String>, status: u16) -> Self {
        BlockSourceError::HttpStatus {
            operation: operation.into(),
            status,
        }
    }

    /// Helper to create an `InvalidData` error.
    pub fn invalid_data(operation: impl Into<String>, details: impl Into<String>) -> Self {
        BlockSourceError::InvalidData {
            operation: operation.into(),
            details: details.into(),
        }
    }

    /// Whether repeating the same request might succeed.
    ///
    /// Transport failures, `429 Too Many Requests` and `5xx` responses are
    /// retryable; malformed payloads and other `4xx` responses are not.
    pub fn is_retryable(&self) -> bool {
        match self {
            BlockSourceError::UpstreamUnavailable { .. } => true,
            BlockSourceError::HttpStatus { status, .. } => *status == 429 || *status >= 500,
            BlockSourceError::InvalidData { .. } => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn retryable_statuses() {
        assert!(BlockSourceError::http_status("op", 500).is_retryable());
        assert!(BlockSourceError::http_status("op", 429).is_retryable());
        assert!(!BlockSourceError::http_status("op", 404).is_retryable());
    }

    #[test]
    fn display_includes_operation() {
        let error = BlockSourceError::invalid_data("rawblock/00ab", "missing size");
        assert_eq!(
            error.to_string(),
            "Invalid data from rawblock/00ab: missing size"
        );
    }
}
