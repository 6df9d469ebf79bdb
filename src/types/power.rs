// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Power status of a fan.

use std::fmt;
use std::str::FromStr;

use crate::error::ValueError;

/// Represents whether a fan is powered on or off.
///
/// # Examples
///
/// ```
/// use fansync_lib::types::PowerStatus;
///
/// assert_eq!(PowerStatus::from(true), PowerStatus::On);
/// assert_eq!(PowerStatus::On.as_str(), "on");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PowerStatus {
    /// The fan is powered off.
    Off,
    /// The fan is powered on.
    On,
}

impl PowerStatus {
    /// Returns the wire string representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Off => "off",
            Self::On => "on",
        }
    }

    /// Returns the numeric representation (0 = off, 1 = on).
    #[must_use]
    pub const fn as_num(&self) -> u8 {
        match self {
            Self::Off => 0,
            Self::On => 1,
        }
    }
}

impl fmt::Display for PowerStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for PowerStatus {
    type Err = ValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "off" | "0" | "false" => Ok(Self::Off),
            "on" | "1" | "true" => Ok(Self::On),
            _ => Err(ValueError::InvalidStatus(s.to_string())),
        }
    }
}

impl From<bool> for PowerStatus {
    fn from(value: bool) -> Self {
        if value { Self::On } else { Self::Off }
    }
}
