// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Per-fan cache of last-published values.

use std::collections::HashMap;

use parking_lot::RwLock;

use crate::error::Error;
use crate::types::{FanMode, PowerStatus};

/// The last values actually published for one fan.
///
/// All observed fields start out unknown (`None`), so the first poll
/// after startup publishes every field. The derived `combined` value
/// starts at 0 and is overwritten only when a level or mode change
/// triggers a recompute.
///
/// # Examples
///
/// ```
/// use fansync_lib::state::CachedFanState;
///
/// let state = CachedFanState::default();
/// assert!(state.level().is_none());
/// assert_eq!(state.combined(), 0);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct CachedFanState {
    /// Last published speed level.
    level: Option<u8>,
    /// Last published power status.
    status: Option<PowerStatus>,
    /// Last published operating mode.
    mode: Option<FanMode>,
    /// Last published combined value.
    combined: u8,
}

impl CachedFanState {
    /// Gets the last published speed level, if any.
    #[must_use]
    pub fn level(&self) -> Option<u8> {
        self.level
    }

    /// Gets the last published power status, if any.
    #[must_use]
    pub fn status(&self) -> Option<PowerStatus> {
        self.status
    }

    /// Gets the last published operating mode, if any.
    #[must_use]
    pub fn mode(&self) -> Option<FanMode> {
        self.mode
    }

    /// Gets the last published combined value.
    #[must_use]
    pub fn combined(&self) -> u8 {
        self.combined
    }
}

/// Cache of last-published state for a fixed set of fans.
///
/// The device set is established once at construction and never changes
/// afterwards; looking up a name that was never registered fails with
/// [`Error::UnknownDevice`]. Entries are never evicted.
///
/// The cache is written by the poll path (change detection) and read by
/// the command path (device membership lookups), so it carries its own
/// lock. Each setter overwrites a single field under the write lock,
/// keeping per-field updates atomic.
///
/// # Examples
///
/// ```
/// use fansync_lib::state::StateCache;
///
/// let cache = StateCache::new(["fan1", "fan2"]);
/// assert_eq!(cache.device_count(), 2);
/// assert!(cache.contains("fan1"));
/// assert!(cache.get("fan3").is_err());
/// ```
#[derive(Debug, Default)]
pub struct StateCache {
    entries: RwLock<HashMap<String, CachedFanState>>,
}

impl StateCache {
    /// Creates a cache with one default entry per device name.
    #[must_use]
    pub fn new<I, S>(devices: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let entries = devices
            .into_iter()
            .map(|name| (name.into(), CachedFanState::default()))
            .collect();
        Self {
            entries: RwLock::new(entries),
        }
    }

    /// Gets a copy of the cached state for a fan.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownDevice`] if the name was never
    /// registered.
    pub fn get(&self, device: &str) -> Result<CachedFanState, Error> {
        self.entries
            .read()
            .get(device)
            .cloned()
            .ok_or_else(|| Error::UnknownDevice(device.to_string()))
    }

    /// Returns whether a device name is registered.
    #[must_use]
    pub fn contains(&self, device: &str) -> bool {
        self.entries.read().contains_key(device)
    }

    /// Returns the number of registered fans.
    #[must_use]
    pub fn device_count(&self) -> usize {
        self.entries.read().len()
    }

    /// Overwrites the cached speed level for a fan.
    pub(crate) fn set_level(&self, device: &str, level: u8) -> Result<(), Error> {
        self.with_entry(device, |entry| entry.level = Some(level))
    }

    /// Overwrites the cached power status for a fan.
    pub(crate) fn set_status(&self, device: &str, status: PowerStatus) -> Result<(), Error> {
        self.with_entry(device, |entry| entry.status = Some(status))
    }

    /// Overwrites the cached operating mode for a fan.
    pub(crate) fn set_mode(&self, device: &str, mode: FanMode) -> Result<(), Error> {
        self.with_entry(device, |entry| entry.mode = Some(mode))
    }

    /// Overwrites the cached combined value for a fan.
    pub(crate) fn set_combined(&self, device: &str, combined: u8) -> Result<(), Error> {
        self.with_entry(device, |entry| entry.combined = combined)
    }

    fn with_entry(
        &self,
        device: &str,
        update: impl FnOnce(&mut CachedFanState),
    ) -> Result<(), Error> {
        let mut entries = self.entries.write();
        let entry = entries
            .get_mut(device)
            .ok_or_else(|| Error::UnknownDevice(device.to_string()))?;
        update(entry);
        Ok(())
    }
}
