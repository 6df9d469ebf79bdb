// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Outbound state updates.
//!
//! Publish events are the output of change detection: one event per
//! fan field whose published value changed this cycle (plus the
//! unconditional combined republish on a level/mode trigger). Events
//! render to a retained topic `{control_root}/{device}/{field}` with
//! the raw scalar value as payload, so republishing the same event is
//! a harmless overwrite.

use crate::types::{FanMode, PowerStatus};

/// The new published value for a single fan field.
///
/// # Examples
///
/// ```
/// use fansync_lib::state::FieldDelta;
/// use fansync_lib::types::FanMode;
///
/// let delta = FieldDelta::Mode(FanMode::Manual);
/// assert_eq!(delta.field(), "mode");
/// assert_eq!(delta.payload(), "manual");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum FieldDelta {
    /// The speed level changed.
    Level(u8),
    /// The power status changed.
    Status(PowerStatus),
    /// The operating mode changed.
    Mode(FanMode),
    /// The derived combined value was recomputed.
    Combined(u8),
}

impl FieldDelta {
    /// Returns the topic segment for this field.
    #[must_use]
    pub const fn field(&self) -> &'static str {
        match self {
            Self::Level(_) => "level",
            Self::Status(_) => "status",
            Self::Mode(_) => "mode",
            Self::Combined(_) => "combined",
        }
    }

    /// Renders the raw scalar payload.
    #[must_use]
    pub fn payload(&self) -> String {
        match self {
            Self::Level(level) | Self::Combined(level) => level.to_string(),
            Self::Status(status) => status.as_str().to_string(),
            Self::Mode(mode) => mode.as_str().to_string(),
        }
    }
}

/// An outbound state update for one fan field.
///
/// # Examples
///
/// ```
/// use fansync_lib::state::{FieldDelta, PublishEvent};
///
/// let event = PublishEvent::new("fan1", FieldDelta::Level(2));
/// assert_eq!(event.topic("vesync"), "vesync/fan1/level");
/// assert_eq!(event.payload(), "2");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct PublishEvent {
    device: String,
    delta: FieldDelta,
}

impl PublishEvent {
    /// Creates a publish event for a fan field.
    #[must_use]
    pub fn new(device: impl Into<String>, delta: FieldDelta) -> Self {
        Self {
            device: device.into(),
            delta,
        }
    }

    /// Returns the fan this event belongs to.
    #[must_use]
    pub fn device(&self) -> &str {
        &self.device
    }

    /// Returns the field update carried by this event.
    #[must_use]
    pub fn delta(&self) -> &FieldDelta {
        &self.delta
    }

    /// Renders the full topic under the given control root.
    #[must_use]
    pub fn topic(&self, control_root: &str) -> String {
        format!("{control_root}/{}/{}", self.device, self.delta.field())
    }

    /// Renders the raw scalar payload.
    #[must_use]
    pub fn payload(&self) -> String {
        self.delta.payload()
    }
}
