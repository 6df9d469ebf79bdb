// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Control message translation.
//!
//! Inbound control topics have the shape
//! `{control_root}/{device}/{command}/set` with a raw scalar payload.
//! The translator validates the topic segment by segment and the
//! payload against the selected command kind, producing either exactly
//! one [`FanCommand`] or a typed reason why the message was ignored.

use std::fmt;
use std::sync::Arc;

use crate::state::StateCache;
use crate::types::{FanMode, FanSpeed};

use super::FanCommand;

/// Outcome of translating one inbound message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Translation {
    /// The message resolved to a command for a known fan.
    Dispatch {
        /// The fan the command addresses.
        device: String,
        /// The validated command.
        command: FanCommand,
    },
    /// The message was ignored; the reason decides the report level.
    Ignored(IgnoreReason),
}

impl Translation {
    /// Returns `true` if the message resolved to a command.
    #[must_use]
    pub fn is_dispatch(&self) -> bool {
        matches!(self, Self::Dispatch { .. })
    }
}

/// Why an inbound message was ignored.
///
/// Reasons marked *silent* are expected traffic (messages for other
/// consumers of the namespace) and are only reported at trace level;
/// the rest are reported at debug level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IgnoreReason {
    /// The topic belongs to a different namespace. Silent.
    ForeignRoot,
    /// The topic has fewer than four segments.
    TooShort,
    /// The action segment is not `set`. Silent; the namespace is
    /// reserved for future actions.
    UnsupportedAction,
    /// The device name was never registered.
    UnknownDevice,
    /// The command segment is not `combined`, `mode` or `level`.
    UnknownControl,
    /// The `level` payload is not an integer in 1-3.
    InvalidLevel,
    /// The `combined` payload is not an integer in 0-3. Silent.
    SilentCombined,
    /// The `mode` payload is not a known mode.
    InvalidMode,
}

impl IgnoreReason {
    /// Returns `true` if the reason should only be reported at trace
    /// level.
    #[must_use]
    pub const fn is_silent(&self) -> bool {
        matches!(
            self,
            Self::ForeignRoot | Self::UnsupportedAction | Self::SilentCombined
        )
    }
}

impl fmt::Display for IgnoreReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Self::ForeignRoot => "topic outside control namespace",
            Self::TooShort => "topic too short",
            Self::UnsupportedAction => "unsupported action",
            Self::UnknownDevice => "device unknown",
            Self::UnknownControl => "invalid control command",
            Self::InvalidLevel => "invalid speed level",
            Self::SilentCombined => "combined value out of range",
            Self::InvalidMode => "invalid mode",
        };
        write!(f, "{text}")
    }
}

/// Parses inbound control messages into validated fan commands.
///
/// The translator shares the [`StateCache`] with the sync engine and
/// uses it only for device-membership lookups; it never mutates cached
/// state.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
///
/// use fansync_lib::command::{CommandTranslator, FanCommand, Translation};
/// use fansync_lib::state::StateCache;
///
/// let cache = Arc::new(StateCache::new(["fan1"]));
/// let translator = CommandTranslator::new("vesync", cache);
///
/// let outcome = translator.translate("vesync/fan1/level/set", "2");
/// assert!(matches!(
///     outcome,
///     Translation::Dispatch { command: FanCommand::SetSpeed(_), .. }
/// ));
/// ```
#[derive(Debug)]
pub struct CommandTranslator {
    control_root: String,
    cache: Arc<StateCache>,
}

impl CommandTranslator {
    /// Creates a translator for the given control root and device set.
    #[must_use]
    pub fn new(control_root: impl Into<String>, cache: Arc<StateCache>) -> Self {
        Self {
            control_root: control_root.into(),
            cache,
        }
    }

    /// Returns the configured control root.
    #[must_use]
    pub fn control_root(&self) -> &str {
        &self.control_root
    }

    /// Translates one inbound message into at most one command.
    ///
    /// Validation follows the topic left to right: control root,
    /// segment count, `set` action, device membership, command kind,
    /// then the payload against the selected kind.
    #[must_use]
    pub fn translate(&self, topic: &str, payload: &str) -> Translation {
        let segments: Vec<&str> = topic.split('/').collect();

        if segments[0] != self.control_root {
            return Translation::Ignored(IgnoreReason::ForeignRoot);
        }
        if segments.len() < 4 {
            return Translation::Ignored(IgnoreReason::TooShort);
        }
        if segments[3] != "set" {
            return Translation::Ignored(IgnoreReason::UnsupportedAction);
        }

        let device = segments[1];
        if !self.cache.contains(device) {
            return Translation::Ignored(IgnoreReason::UnknownDevice);
        }

        let outcome = match segments[2] {
            "combined" => translate_combined(payload),
            "mode" => translate_mode(payload),
            "level" => translate_level(payload),
            _ => return Translation::Ignored(IgnoreReason::UnknownControl),
        };

        match outcome {
            Ok(command) => Translation::Dispatch {
                device: device.to_string(),
                command,
            },
            Err(reason) => Translation::Ignored(reason),
        }
    }
}

/// Validates a `level` payload: integer speed in 1-3.
fn translate_level(payload: &str) -> Result<FanCommand, IgnoreReason> {
    payload
        .parse::<FanSpeed>()
        .map(FanCommand::SetSpeed)
        .map_err(|_| IgnoreReason::InvalidLevel)
}

/// Validates a `combined` payload: 1-3 sets the speed, 0 enters sleep.
fn translate_combined(payload: &str) -> Result<FanCommand, IgnoreReason> {
    let value: u8 = payload
        .trim()
        .parse()
        .map_err(|_| IgnoreReason::SilentCombined)?;
    if value == 0 {
        return Ok(FanCommand::EnterSleep);
    }
    FanSpeed::new(value)
        .map(FanCommand::SetSpeed)
        .map_err(|_| IgnoreReason::SilentCombined)
}

/// Validates a `mode` payload against the known mode set.
fn translate_mode(payload: &str) -> Result<FanCommand, IgnoreReason> {
    let mode: FanMode = payload.parse().map_err(|_| IgnoreReason::InvalidMode)?;
    Ok(match mode {
        FanMode::Sleep => FanCommand::EnterSleep,
        FanMode::Manual => FanCommand::EnterManual,
        FanMode::Auto => FanCommand::EnterAuto,
    })
}
