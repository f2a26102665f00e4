//! Domain constants and defaults
//!
//! This module centralizes the magic numbers used throughout the blockenergy
//! crate, improving discoverability and maintainability.

/// Estimated energy per byte of block data
pub const ENERGY_PER_BYTE: f64 = 4.56;

/// Milliseconds in one sliding-window day
pub const MILLIS_PER_DAY: i64 = 24 * 60 * 60 * 1000;

/// Time-to-live of cached block sizes (7 days)
///
/// Block sizes never change once mined; the TTL only bounds how long stale
/// entries linger in a shared store.
pub const DEFAULT_CACHE_TTL_SECS: u64 = 7 * 24 * 60 * 60;

/// Days requested concurrently per aggregation step
pub const DEFAULT_DAY_BATCH_SIZE: u32 = 5;

/// Public blockchain.info explorer
pub const DEFAULT_EXPLORER_URL: &str = "https://blockchain.info";

/// Per-request HTTP timeout against the explorer
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Deadline for a single cache command; a slower reply counts as a miss
pub const DEFAULT_CACHE_TIMEOUT_MILLIS: u64 = 2_000;

/// Environment variable names read by [`EnergyConfig::from_env`](super::EnergyConfig::from_env)
pub mod env {
    /// Energy factor override
    pub const ENERGY_PER_BYTE: &str = "BLOCK_ENERGY_PER_BYTE";
    /// Cache TTL in seconds
    pub const CACHE_TTL_SECS: &str = "BLOCK_ENERGY_CACHE_TTL_SECS";
    /// Day batch size
    pub const DAY_BATCH_SIZE: &str = "BLOCK_ENERGY_DAY_BATCH_SIZE";
    /// Explorer base URL
    pub const API_URL: &str = "BLOCK_ENERGY_API_URL";
    /// HTTP timeout in seconds
    pub const TIMEOUT_SECS: &str = "BLOCK_ENERGY_TIMEOUT_SECS";
    /// Cache command timeout in milliseconds
    pub const CACHE_TIMEOUT_MILLIS: &str = "BLOCK_ENERGY_CACHE_TIMEOUT_MILLIS";
    /// Maximum HTTP retries
    pub const MAX_RETRIES: &str = "BLOCK_ENERGY_MAX_RETRIES";
    /// Redis connection URL; unset means in-memory caching
    pub const REDIS_URL: &str = "REDIS_URL";
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ttl_is_seven_days() {
        assert_eq!(DEFAULT_CACHE_TTL_SECS, 604_800);
    }

    #[test]
    fn millis_per_day() {
        assert_eq!(MILLIS_PER_DAY, 86_400_000);
    }
}
