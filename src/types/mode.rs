// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Fan operating mode.

use std::fmt;
use std::str::FromStr;

use crate::error::ValueError;

/// Operating mode of a fan.
///
/// Parsing trims surrounding whitespace and ignores case, so payloads
/// like `"sleep "` or `"Manual"` resolve to the expected mode.
///
/// # Examples
///
/// ```
/// use fansync_lib::types::FanMode;
///
/// let mode: FanMode = "manual".parse().unwrap();
/// assert_eq!(mode, FanMode::Manual);
/// assert_eq!(mode.as_str(), "manual");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FanMode {
    /// Fixed speed selected by the user.
    Manual,
    /// Quiet night operation.
    Sleep,
    /// Speed chosen by the device from air quality readings.
    Auto,
}

impl FanMode {
    /// Returns the wire string representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Manual => "manual",
            Self::Sleep => "sleep",
            Self::Auto => "auto",
        }
    }
}

impl fmt::Display for FanMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for FanMode {
    type Err = ValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "manual" => Ok(Self::Manual),
            "sleep" => Ok(Self::Sleep),
            "auto" => Ok(Self::Auto),
            _ => Err(ValueError::InvalidMode(s.to_string())),
        }
    }
}
