// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Inbound fan commands.
//!
//! This module turns raw control messages into validated commands for
//! the device gateway:
//!
//! - [`FanCommand`] - a validated command a fan can execute
//! - [`CommandTranslator`] - parses topic + payload into at most one
//!   command, with a typed reason for every ignored message
//!
//! Malformed input is never an error condition here: it resolves to
//! [`Translation::Ignored`] and the gateway is not invoked.

mod translator;

use std::fmt;

use crate::types::FanSpeed;

pub use translator::{CommandTranslator, IgnoreReason, Translation};

/// A validated command for a single fan.
///
/// # Examples
///
/// ```
/// use fansync_lib::command::FanCommand;
/// use fansync_lib::types::FanSpeed;
///
/// let command = FanCommand::SetSpeed(FanSpeed::MEDIUM);
/// assert_eq!(command.to_string(), "set speed 2");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum FanCommand {
    /// Set the fan to a fixed speed level.
    SetSpeed(FanSpeed),
    /// Switch the fan into sleep mode.
    EnterSleep,
    /// Switch the fan into manual mode.
    EnterManual,
    /// Switch the fan into auto mode.
    EnterAuto,
}

impl fmt::Display for FanCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SetSpeed(speed) => write!(f, "set speed {speed}"),
            Self::EnterSleep => write!(f, "enter sleep mode"),
            Self::EnterManual => write!(f, "enter manual mode"),
            Self::EnterAuto => write!(f, "enter auto mode"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn command_display() {
        assert_eq!(FanCommand::SetSpeed(FanSpeed::HIGH).to_string(), "set speed 3");
        assert_eq!(FanCommand::EnterSleep.to_string(), "enter sleep mode");
        assert_eq!(FanCommand::EnterManual.to_string(), "enter manual mode");
        assert_eq!(FanCommand::EnterAuto.to_string(), "enter auto mode");
    }
}
