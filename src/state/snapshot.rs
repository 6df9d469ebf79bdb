// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! A single fetched observation of a fan.

use crate::types::{FanMode, PowerStatus};

/// One observation of a fan's state, as returned by the device gateway.
///
/// Snapshots are plain values: they carry no behavior and no handle to
/// the device they were read from. The observed `level` stays a raw
/// integer (a powered-off fan may report 0); only outgoing speed
/// commands are range-validated.
///
/// # Examples
///
/// ```
/// use fansync_lib::state::FanSnapshot;
/// use fansync_lib::types::{FanMode, PowerStatus};
///
/// let snapshot = FanSnapshot::new(2, PowerStatus::On, FanMode::Manual);
/// assert_eq!(snapshot.level, 2);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct FanSnapshot {
    /// Observed fan speed level.
    pub level: u8,
    /// Observed power status.
    pub status: PowerStatus,
    /// Observed operating mode.
    pub mode: FanMode,
}

impl FanSnapshot {
    /// Creates a new snapshot.
    #[must_use]
    pub const fn new(level: u8, status: PowerStatus, mode: FanMode) -> Self {
        Self {
            level,
            status,
            mode,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snapshot_fields() {
        let snapshot = FanSnapshot::new(3, PowerStatus::On, FanMode::Auto);
        assert_eq!(snapshot.level, 3);
        assert_eq!(snapshot.status, PowerStatus::On);
        assert_eq!(snapshot.mode, FanMode::Auto);
    }

    #[test]
    fn snapshot_equality() {
        let a = FanSnapshot::new(1, PowerStatus::Off, FanMode::Sleep);
        let b = FanSnapshot::new(1, PowerStatus::Off, FanMode::Sleep);
        assert_eq!(a, b);
    }
}
