// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Value types for fan state and control.
//!
//! This module provides type-safe representations of the values a fan
//! reports and accepts. Each type ensures values are within their valid
//! ranges at construction time, preventing runtime errors.
//!
//! # Types
//!
//! - [`FanSpeed`] - Validated speed level (1-3)
//! - [`FanMode`] - Operating mode (manual/sleep/auto)
//! - [`PowerStatus`] - On/off indicator

mod mode;
mod power;
mod speed;

pub use mode::FanMode;
pub use power::PowerStatus;
pub use speed::FanSpeed;
