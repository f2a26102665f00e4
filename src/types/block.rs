// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Block identity and size types
//!
//! - [`BlockHash`]: opaque, case-sensitive block identifier used as loader and cache key
//! - [`BlockSize`]: block or transaction size in bytes

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Opaque block identifier as reported by the explorer
///
/// Hashes are compared byte-for-byte: no case folding or trimming is applied,
/// so `"ABC"` and `"abc"` are different keys.
///
/// # Examples
///
/// ```
/// use blockenergy::BlockHash;
///
/// let hash = BlockHash::new("00000000000000000002a7c4");
/// assert_eq!(hash.as_str(), "00000000000000000002a7c4");
/// assert_ne!(BlockHash::from("abc"), BlockHash::from("ABC"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BlockHash(String);

impl BlockHash {
    /// Creates a block hash from any string-like value
    pub fn new(hash: impl Into<String>) -> Self {
        Self(hash.into())
    }

    /// Returns the hash as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BlockHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for BlockHash {
    fn from(hash: &str) -> Self {
        Self::new(hash)
    }
}

impl From<String> for BlockHash {
    fn from(hash: String) -> Self {
        Self(hash)
    }
}

impl AsRef<str> for BlockHash {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Size of a block or transaction in bytes
///
/// Sizes come from untrusted JSON and from cached strings, so both parsers
/// return `None` for anything that is not a non-negative number. Callers decide
/// whether `None` degrades to [`BlockSize::ZERO`] or is reported.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct BlockSize(u64);

impl BlockSize {
    /// Zero bytes
    pub const ZERO: Self = Self(0);

    /// Creates a size from a byte count
    pub const fn new(bytes: u64) -> Self {
        Self(bytes)
    }

    /// Returns the byte count
    pub const fn as_u64(&self) -> u64 {
        self.0
    }

    /// Interprets a JSON value as a byte count
    ///
    /// Accepts non-negative integers and finite, non-negative floats (truncated).
    /// Strings, booleans, nulls and negative numbers are rejected.
    ///
    /// # Examples
    ///
    /// ```
    /// use blockenergy::BlockSize;
    /// use serde_json::json;
    ///
    /// assert_eq!(BlockSize::from_json(&json!(1000)), Some(BlockSize::new(1000)));
    /// assert_eq!(BlockSize::from_json(&json!("1000")), None);
    /// assert_eq!(BlockSize::from_json(&json!(-5)), None);
    /// ```
    pub fn from_json(value: &Value) -> Option<Self> {
        let number = value.as_number()?;
        if let Some(bytes) = number.as_u64() {
            return Some(Self(bytes));
        }
        number
            .as_f64()
            .filter(|bytes| bytes.is_finite() && *bytes >= 0.0)
            .map(|bytes| Self(bytes.trunc() as u64))
    }

    /// Parses a value read back from the cache store
    pub fn from_cache_value(value: &str) -> Option<Self> {
        value.trim().parse::<u64>().ok().map(Self)
    }

    /// Renders the size the way it is written to the cache store
    pub fn to_cache_value(&self) -> String {
        self.0.to_string()
    }
}

impl fmt::Display for BlockSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} bytes", self.0)
    }
}

impl From<u64> for BlockSize {
    fn from(bytes: u64) -> Self {
        Self(bytes)
    }
}
