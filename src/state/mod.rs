// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Fan state tracking.
//!
//! This module holds the data types the sync engine revolves around:
//!
//! - [`FanSnapshot`] - one fetched observation of a fan, a plain value
//!   with no behavior attached
//! - [`CachedFanState`] - the last values actually published for a fan
//! - [`StateCache`] - the per-fan cache over the fixed device set
//! - [`PublishEvent`] / [`FieldDelta`] - one outbound state update for
//!   one fan field
//!
//! The cache is the single source of truth for "what was last
//! externally observed": an entry is mutated exactly when a new value
//! is published for that fan and field, never otherwise.

mod cache;
mod delta;
mod snapshot;

pub use cache::{CachedFanState, StateCache};
pub use delta::{FieldDelta, PublishEvent};
pub use snapshot::FanSnapshot;
