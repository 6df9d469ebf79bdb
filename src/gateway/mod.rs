// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! External device gateway boundary.
//!
//! The gateway is the crate's view of the cloud session that owns the
//! actual devices. It hands out state snapshots and accepts validated
//! commands; everything else about the session (login, device
//! enumeration, transport) belongs to the collaborator implementing
//! the trait.
//!
//! Device membership is not part of this boundary: the session
//! collaborator establishes the device list once at startup and passes
//! it to [`SyncEngine::new`](crate::sync::SyncEngine::new).

use async_trait::async_trait;

use crate::command::FanCommand;
use crate::error::GatewayError;
use crate::state::FanSnapshot;
use crate::types::FanSpeed;

/// Gateway to the external fan fleet.
///
/// Implementations are expected to be cheap to share (`Arc`) between
/// the poll path and the command path. Each method addresses one fan by
/// its unique name.
#[async_trait]
pub trait FanGateway: Send + Sync {
    /// Fetches the current state of one fan.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::DeviceUnreachable`] if the device cannot
    /// be reached; the caller skips the device for the current cycle.
    async fn fetch_state(&self, device: &str) -> Result<FanSnapshot, GatewayError>;

    /// Sets the fan to a fixed speed level.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::CommandRejected`] if the device refuses.
    async fn set_speed(&self, device: &str, speed: FanSpeed) -> Result<(), GatewayError>;

    /// Switches the fan into sleep mode.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::CommandRejected`] if the device refuses.
    async fn enter_sleep_mode(&self, device: &str) -> Result<(), GatewayError>;

    /// Switches the fan into manual mode.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::CommandRejected`] if the device refuses.
    async fn enter_manual_mode(&self, device: &str) -> Result<(), GatewayError>;

    /// Switches the fan into auto mode.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::CommandRejected`] if the device refuses.
    async fn enter_auto_mode(&self, device: &str) -> Result<(), GatewayError>;

    /// Issues one validated command to one fan.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::CommandRejected`] if the device refuses.
    async fn send_command(&self, device: &str, command: FanCommand) -> Result<(), GatewayError> {
        match command {
            FanCommand::SetSpeed(speed) => self.set_speed(device, speed).await,
            FanCommand::EnterSleep => self.enter_sleep_mode(device).await,
            FanCommand::EnterManual => self.enter_manual_mode(device).await,
            FanCommand::EnterAuto => self.enter_auto_mode(device).await,
        }
    }
}
