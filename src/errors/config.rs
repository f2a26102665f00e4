//! Error types for configuration loading and validation.

/// Errors raised while building an [`EnergyConfig`](crate::EnergyConfig).
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// A value was present but unusable.
    #[error("Invalid value for {key}: {value:?} ({reason})")]
    InvalidValue {
        /// The configuration key or environment variable
        key: String,
        /// The rejected value as given
        value: String,
        /// Why it was rejected
        reason: String,
    },
}

impl ConfigError {
    /// Create an `InvalidValue` error.
    pub fn invalid_value(
        key: impl Into<String>,
        value: impl ToString,
        reason: impl Into<String>,
    ) -> Self {
        ConfigError::InvalidValue {
            key: key.into(),
            value: value.to_string(),
            reason: reason.into(),
        }
    }
}
