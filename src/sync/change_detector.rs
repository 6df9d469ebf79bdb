// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Change detection against the state cache.

use std::sync::Arc;

use crate::error::Error;
use crate::state::{FanSnapshot, FieldDelta, PublishEvent, StateCache};
use crate::types::FanMode;

/// Compares fetched snapshots against the cache and emits publish
/// events for the fields whose published value changed.
///
/// The detector is the only writer of the cache: a field is overwritten
/// exactly when its new value is emitted for publishing, which keeps
/// the cache equal to the last published value at all times.
///
/// A level or mode change additionally triggers a recompute of the
/// derived combined value (`level` in manual mode, `0` in sleep mode,
/// unchanged otherwise), and the combined value is republished on every
/// such trigger even when it did not change numerically.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
///
/// use fansync_lib::state::{FanSnapshot, StateCache};
/// use fansync_lib::sync::ChangeDetector;
/// use fansync_lib::types::{FanMode, PowerStatus};
///
/// let cache = Arc::new(StateCache::new(["fan1"]));
/// let detector = ChangeDetector::new(Arc::clone(&cache));
///
/// let snapshot = FanSnapshot::new(2, PowerStatus::On, FanMode::Manual);
/// let events = detector.detect("fan1", &snapshot).unwrap();
/// assert_eq!(events.len(), 4); // level, status, mode, combined
///
/// // The same snapshot again produces nothing
/// assert!(detector.detect("fan1", &snapshot).unwrap().is_empty());
/// ```
#[derive(Debug)]
pub struct ChangeDetector {
    cache: Arc<StateCache>,
}

impl ChangeDetector {
    /// Creates a detector writing to the given cache.
    #[must_use]
    pub fn new(cache: Arc<StateCache>) -> Self {
        Self { cache }
    }

    /// Diffs one snapshot against the cache.
    ///
    /// Returns the publish events for this cycle in field order
    /// (level, status, mode, combined). The cache is updated alongside
    /// each emitted event; when fetching failed upstream this method is
    /// simply not called, leaving cache and published state untouched.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownDevice`] if the device was never
    /// registered; the cache is not touched in that case.
    pub fn detect(&self, device: &str, snapshot: &FanSnapshot) -> Result<Vec<PublishEvent>, Error> {
        let cached = self.cache.get(device)?;
        let mut events = Vec::new();
        let mut level_or_mode_changed = false;

        if cached.level() != Some(snapshot.level) {
            self.cache.set_level(device, snapshot.level)?;
            events.push(PublishEvent::new(device, FieldDelta::Level(snapshot.level)));
            level_or_mode_changed = true;
        }

        if cached.status() != Some(snapshot.status) {
            self.cache.set_status(device, snapshot.status)?;
            events.push(PublishEvent::new(
                device,
                FieldDelta::Status(snapshot.status),
            ));
        }

        if cached.mode() != Some(snapshot.mode) {
            self.cache.set_mode(device, snapshot.mode)?;
            events.push(PublishEvent::new(device, FieldDelta::Mode(snapshot.mode)));
            level_or_mode_changed = true;
        }

        if level_or_mode_changed {
            let combined = match snapshot.mode {
                FanMode::Manual => snapshot.level,
                FanMode::Sleep => 0,
                // Any other mode leaves the derived value as it was,
                // but it is still republished on the trigger.
                FanMode::Auto => cached.combined(),
            };
            self.cache.set_combined(device, combined)?;
            events.push(PublishEvent::new(device, FieldDelta::Combined(combined)));
            tracing::debug!(
                device = %device,
                combined = combined,
                "Recomputed combined value"
            );
        }

        Ok(events)
    }
}
