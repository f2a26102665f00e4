//! Configuration for blockenergy operations
//!
//! This module provides the configuration surface exposed to embedding
//! applications: the energy factor, the cache TTL, the day batch size and the
//! explorer client settings. All of these are fixed per process; none are
//! request parameters.
//!
//! # Example: Using defaults
//!
//! ```rust
//! use blockenergy::EnergyConfig;
//!
//! let config = EnergyConfig::default();
//! assert_eq!(config.energy_per_byte.as_f64(), 4.56);
//! assert_eq!(config.cache_ttl.as_secs(), 604_800);
//! ```
//!
//! # Example: Custom configuration
//!
//! ```rust
//! use blockenergy::{DayBatchSize, EnergyConfigBuilder, EnergyPerByte};
//! use std::time::Duration;
//!
//! let config = EnergyConfigBuilder::new()
//!     .energy_per_byte(EnergyPerByte::new(5.0).unwrap())
//!     .day_batch_size(DayBatchSize::new(3).unwrap())
//!     .cache_ttl(Duration::from_secs(3600))
//!     .build();
//! assert_eq!(config.day_batch_size.as_u32(), 3);
//! ```

use std::str::FromStr;
use std::time::Duration;

use url::Url;

use crate::errors::ConfigError;
use crate::source::RetryConfig;
use crate::types::config::DayBatchSize;
use crate::types::energy::EnergyPerByte;

pub mod constants;

use constants::{
    env, DEFAULT_CACHE_TIMEOUT_MILLIS, DEFAULT_CACHE_TTL_SECS, DEFAULT_EXPLORER_URL,
    DEFAULT_REQUEST_TIMEOUT_SECS,
};

/// Configuration for blockenergy operations
///
/// Use [`EnergyConfigBuilder`] for a fluent API or [`EnergyConfig::from_env`]
/// to read overrides from the process environment.
#[derive(Debug, Clone)]
pub struct EnergyConfig {
    /// Energy per byte of block or transaction data
    /// Default: 4.56
    pub energy_per_byte: EnergyPerByte,

    /// Expiry applied to every cached block size
    /// Default: 7 days
    pub cache_ttl: Duration,

    /// Deadline for one cache command, and the Redis connect/response timeout
    /// Default: 2 seconds
    pub cache_timeout: Duration,

    /// Days fetched concurrently per aggregation step
    /// Default: 5
    pub day_batch_size: DayBatchSize,

    /// Explorer client settings
    pub source: SourceConfig,

    /// Redis connection URL; `None` selects the in-memory cache
    pub redis_url: Option<String>,
}

/// Settings for the HTTP block source
#[derive(Debug, Clone)]
pub struct SourceConfig {
    /// Explorer base URL
    /// Default: `https://blockchain.info`
    pub base_url: Url,

    /// Timeout for a single HTTP request
    /// Default: 30 seconds
    pub request_timeout: Duration,

    /// Retry policy for transient failures
    pub retry: RetryConfig,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            base_url: default_explorer_url(),
            request_timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
            retry: RetryConfig::default(),
        }
    }
}

fn default_explorer_url() -> Url {
    Url::parse(DEFAULT_EXPLORER_URL).expect("default explorer URL is valid")
}

impl Default for EnergyConfig {
    fn default() -> Self {
        Self {
            energy_per_byte: EnergyPerByte::default(),
            cache_ttl: Duration::from_secs(DEFAULT_CACHE_TTL_SECS),
            cache_timeout: Duration::from_millis(DEFAULT_CACHE_TIMEOUT_MILLIS),
            day_batch_size: DayBatchSize::default(),
            source: SourceConfig::default(),
            redis_url: None,
        }
    }
}

impl EnergyConfig {
    /// Build a configuration from environment variables
    ///
    /// Reads `.env` (if present) through `dotenvy`. Every variable is
    /// optional; unset variables keep their defaults. Variable names live in
    /// [`constants::env`].
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] for values that fail to parse or
    /// violate a constraint (negative energy factor, zero batch size, zero
    /// timeout, invalid URL).
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| dotenvy::var(key).ok())
    }

    /// Build a configuration from an arbitrary key lookup
    ///
    /// Used by [`EnergyConfig::from_env`]; exposed so configuration can be
    /// sourced from maps in tests or embedding applications.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut builder = EnergyConfigBuilder::new();

        if let Some(raw) = lookup(env::ENERGY_PER_BYTE) {
            let factor = parse::<f64>(env::ENERGY_PER_BYTE, &raw)?;
            let factor = EnergyPerByte::new(factor).ok_or_else(|| {
                ConfigError::invalid_value(env::ENERGY_PER_BYTE, &raw, "must be finite and >= 0")
            })?;
            builder = builder.energy_per_byte(factor);
        }

        if let Some(raw) = lookup(env::CACHE_TTL_SECS) {
            let secs = parse::<u64>(env::CACHE_TTL_SECS, &raw)?;
            if secs == 0 {
                return Err(ConfigError::invalid_value(
                    env::CACHE_TTL_SECS,
                    &raw,
                    "must be at least one second",
                ));
            }
            builder = builder.cache_ttl(Duration::from_secs(secs));
        }

        if let Some(raw) = lookup(env::CACHE_TIMEOUT_MILLIS) {
            let millis = parse::<u64>(env::CACHE_TIMEOUT_MILLIS, &raw)?;
            if millis == 0 {
                return Err(ConfigError::invalid_value(
                    env::CACHE_TIMEOUT_MILLIS,
                    &raw,
                    "must be at least one millisecond",
                ));
            }
            builder = builder.cache_timeout(Duration::from_millis(millis));
        }

        if let Some(raw) = lookup(env::DAY_BATCH_SIZE) {
            let days = parse::<u32>(env::DAY_BATCH_SIZE, &raw)?;
            let size = DayBatchSize::new(days).ok_or_else(|| {
                ConfigError::invalid_value(env::DAY_BATCH_SIZE, &raw, "must be non-zero")
            })?;
            builder = builder.day_batch_size(size);
        }

        if let Some(raw) = lookup(env::API_URL) {
            let url = Url::parse(&raw)
                .map_err(|e| ConfigError::invalid_value(env::API_URL, &raw, e.to_string()))?;
            if url.cannot_be_a_base() {
                return Err(ConfigError::invalid_value(
                    env::API_URL,
                    &raw,
                    "must be a base URL",
                ));
            }
            builder = builder.base_url(url);
        }

        if let Some(raw) = lookup(env::TIMEOUT_SECS) {
            let secs = parse::<u64>(env::TIMEOUT_SECS, &raw)?;
            if secs == 0 {
                return Err(ConfigError::invalid_value(
                    env::TIMEOUT_SECS,
                    &raw,
                    "must be at least one second",
                ));
            }
            builder = builder.request_timeout(Duration::from_secs(secs));
        }

        if let Some(raw) = lookup(env::MAX_RETRIES) {
            let retries = parse::<u32>(env::MAX_RETRIES, &raw)?;
            builder = builder.max_retries(retries);
        }

        if let Some(url) = lookup(env::REDIS_URL).filter(|url| !url.trim().is_empty()) {
            builder = builder.redis_url(url);
        }

        Ok(builder.build())
    }
}

fn parse<T>(key: &str, raw: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    raw.trim()
        .parse::<T>()
        .map_err(|e| ConfigError::invalid_value(key, raw, e.to_string()))
}

/// Builder for [`EnergyConfig`]
///
/// Provides a fluent API for constructing configurations. Setters take
/// validated strong types, so `build` cannot fail.
///
/// # Example
///
/// ```rust
/// use blockenergy::EnergyConfigBuilder;
/// use std::time::Duration;
///
/// let config = EnergyConfigBuilder::new()
///     .request_timeout(Duration::from_secs(10))
///     .max_retries(0)
///     .build();
/// assert_eq!(config.source.retry.max_retries, 0);
/// ```
#[derive(Debug, Default)]
pub struct EnergyConfigBuilder {
    config: EnergyConfig,
}

impl EnergyConfigBuilder {
    /// Create a new builder with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the energy factor
    pub fn energy_per_byte(mut self, factor: EnergyPerByte) -> Self {
        self.config.energy_per_byte = factor;
        self
    }

    /// Set the TTL applied to cached block sizes
    pub fn cache_ttl(mut self, ttl: Duration) -> Self {
        self.config.cache_ttl = ttl;
        self
    }

    /// Set the deadline for a single cache command
    pub fn cache_timeout(mut self, timeout: Duration) -> Self {
        self.config.cache_timeout = timeout;
        self
    }

    /// Set the number of days fetched concurrently per aggregation step
    pub fn day_batch_size(mut self, size: DayBatchSize) -> Self {
        self.config.day_batch_size = size;
        self
    }

    /// Set the explorer base URL
    pub fn base_url(mut self, url: Url) -> Self {
        self.config.source.base_url = url;
        self
    }

    /// Set the per-request HTTP timeout
    pub fn request_timeout(mut self, timeout: Duration) -> Self {
        self.config.source.request_timeout = timeout;
        self
    }

    /// Replace the whole retry policy
    pub fn retry(mut self, retry: RetryConfig) -> Self {
        self.config.source.retry = retry;
        self
    }

    /// Convenience: set only the retry count, keeping the backoff delays
    pub fn max_retries(mut self, max_retries: u32) -> Self {
        self.config.source.retry.max_retries = max_retries;
        self
    }

    /// Use Redis at `url` as the cache store
    pub fn redis_url(mut self, url: impl Into<String>) -> Self {
        self.config.redis_url = Some(url.into());
        self
    }

    /// Build the final configuration
    pub fn build(self) -> EnergyConfig {
        self.config
    }
}
