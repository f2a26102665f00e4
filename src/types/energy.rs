// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Energy estimate types
//!
//! Energy is a linear function of byte size: `size * energy_per_byte`. The
//! factor is a domain constant ([`ENERGY_PER_BYTE`](crate::config::constants::ENERGY_PER_BYTE))
//! that embedding applications may override through [`EnergyConfig`](crate::EnergyConfig).

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign};

use crate::config::constants::ENERGY_PER_BYTE;
use crate::types::block::BlockSize;

/// Conversion factor from bytes to estimated energy
///
/// Always finite and non-negative, which keeps [`EnergyValue`] monotonic in
/// [`BlockSize`].
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EnergyPerByte(f64);

impl EnergyPerByte {
    /// Creates a factor, rejecting negative, NaN and infinite values
    ///
    /// # Examples
    ///
    /// ```
    /// use blockenergy::EnergyPerByte;
    ///
    /// assert!(EnergyPerByte::new(4.56).is_some());
    /// assert!(EnergyPerByte::new(-1.0).is_none());
    /// assert!(EnergyPerByte::new(f64::NAN).is_none());
    /// ```
    pub fn new(factor: f64) -> Option<Self> {
        (factor.is_finite() && factor >= 0.0).then_some(Self(factor))
    }

    /// Returns the raw factor
    pub fn as_f64(&self) -> f64 {
        self.0
    }

    /// Estimates the energy of `size` bytes
    pub fn energy_for(&self, size: BlockSize) -> EnergyValue {
        EnergyValue::new(size.as_u64() as f64 * self.0)
    }
}

impl Default for EnergyPerByte {
    fn default() -> Self {
        Self(ENERGY_PER_BYTE)
    }
}

impl fmt::Display for EnergyPerByte {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/byte", self.0)
    }
}

/// Estimated energy of a block, transaction or time window
///
/// Non-negative and finite by construction: NaN and negative inputs collapse
/// to zero, and overflow saturates at [`f64::MAX`]. Sums over many blocks
/// therefore never turn into NaN and never shrink.
///
/// # Examples
///
/// ```
/// use blockenergy::{BlockSize, EnergyPerByte, EnergyValue};
///
/// let energy = EnergyPerByte::default().energy_for(BlockSize::new(1000));
/// assert_eq!(energy.as_f64(), 4560.0);
///
/// let total: EnergyValue = [energy, EnergyValue::new(f64::NAN)].into_iter().sum();
/// assert_eq!(total, energy);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EnergyValue(f64);

impl EnergyValue {
    /// Zero energy
    pub const ZERO: Self = Self(0.0);

    /// Creates an energy value
    ///
    /// NaN and negative inputs become zero; `+inf` saturates to [`f64::MAX`].
    pub fn new(value: f64) -> Self {
        if value.is_nan() || value <= 0.0 {
            Self::ZERO
        } else {
            Self(value.min(f64::MAX))
        }
    }

    /// Returns the raw value
    pub fn as_f64(&self) -> f64 {
        self.0
    }

    /// Returns true for exactly zero energy
    pub fn is_zero(&self) -> bool {
        self.0 == 0.0
    }
}

impl fmt::Display for EnergyValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Add for EnergyValue {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self::new(self.0 + rhs.0)
    }
}

impl AddAssign for EnergyValue {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl Sum for EnergyValue {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, Add::add)
    }
}

impl<'a> Sum<&'a EnergyValue> for EnergyValue {
    fn sum<I: Iterator<Item = &'a EnergyValue>>(iter: I) -> Self {
        iter.copied().sum()
    }
}

impl From<EnergyValue> for f64 {
    fn from(value: EnergyValue) -> Self {
        value.0
    }
}
