// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! State synchronization.
//!
//! This module contains the two halves of the bridge's core loop:
//!
//! - [`ChangeDetector`] - diffs fetched snapshots against the cache and
//!   emits publish events for changed fields
//! - [`SyncEngine`] - drives the paced poll cycle, forwards publish
//!   events to the messaging boundary and dispatches inbound control
//!   messages to the device gateway
//!
//! The engine never terminates on its own short of the inbound channel
//! closing; no error inside a cycle is fatal.

mod change_detector;
mod engine;

pub use change_detector::ChangeDetector;
pub use engine::{DEFAULT_POLL_INTERVAL, SyncEngine};
