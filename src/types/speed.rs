// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Fan speed type.
//!
//! This module provides a type-safe representation of the speed levels
//! a fan accepts. Speed commands issued through the gateway always carry
//! a validated [`FanSpeed`]; raw observed levels stay plain integers.

use std::fmt;
use std::str::FromStr;

use crate::error::ValueError;

/// Validated fan speed level (1-3).
///
/// # Examples
///
/// ```
/// use fansync_lib::types::FanSpeed;
///
/// let speed = FanSpeed::new(2).unwrap();
/// assert_eq!(speed.value(), 2);
///
/// // Out-of-range values are rejected
/// assert!(FanSpeed::new(0).is_err());
/// assert!(FanSpeed::new(4).is_err());
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct FanSpeed(u8);

impl FanSpeed {
    /// Minimum speed level.
    pub const MIN: u8 = 1;

    /// Maximum speed level.
    pub const MAX: u8 = 3;

    /// Lowest speed.
    pub const LOW: Self = Self(1);

    /// Medium speed.
    pub const MEDIUM: Self = Self(2);

    /// Highest speed.
    pub const HIGH: Self = Self(3);

    /// Creates a new fan speed.
    ///
    /// # Arguments
    ///
    /// * `value` - The speed level (1-3)
    ///
    /// # Errors
    ///
    /// Returns `ValueError::OutOfRange` if value is outside [1, 3].
    pub fn new(value: u8) -> Result<Self, ValueError> {
        if !(Self::MIN..=Self::MAX).contains(&value) {
            return Err(ValueError::OutOfRange {
                min: Self::MIN,
                max: Self::MAX,
                actual: value,
            });
        }
        Ok(Self(value))
    }

    /// Returns the speed level.
    #[must_use]
    pub const fn value(&self) -> u8 {
        self.0
    }
}

impl fmt::Display for FanSpeed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<u8> for FanSpeed {
    type Error = ValueError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl FromStr for FanSpeed {
    type Err = ValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value: u8 = s
            .trim()
            .parse()
            .map_err(|_| ValueError::NotANumber(s.to_string()))?;
        Self::new(value)
    }
}
