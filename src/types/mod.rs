// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Strong types for type safety across blockenergy.
//!
//! This module provides newtype wrappers for the domain concepts:
//! - Block hashes and byte sizes
//! - Energy factors and energy estimates
//! - Sliding-window day timestamps
//! - Configuration values (day batch size)

pub mod block;
pub mod config;
pub mod day;
pub mod energy;

// Note: Public types are re-exported from lib.rs, not here
