// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types for the fansync library.
//!
//! This module provides the error hierarchy for failures across the
//! library: value validation, gateway communication, and messaging.
//! None of these errors is fatal to the sync loop; they are reported
//! and the affected device or message is skipped.

use thiserror::Error;

/// The main error type for this library.
#[derive(Debug, Error)]
pub enum Error {
    /// Error occurred during value validation.
    #[error("value error: {0}")]
    Value(#[from] ValueError),

    /// Error occurred while talking to the device gateway.
    #[error("gateway error: {0}")]
    Gateway(#[from] GatewayError),

    /// Error occurred on the messaging boundary.
    #[error("messaging error: {0}")]
    Messaging(#[from] MessagingError),

    /// A device name was never registered with the cache.
    #[error("unknown device: {0}")]
    UnknownDevice(String),
}

/// Errors related to value validation and constraints.
///
/// These errors occur when attempting to create constrained types
/// with invalid values.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValueError {
    /// A numeric value is outside the allowed range.
    #[error("value {actual} is out of range [{min}, {max}]")]
    OutOfRange {
        /// Minimum allowed value.
        min: u8,
        /// Maximum allowed value.
        max: u8,
        /// The actual value that was provided.
        actual: u8,
    },

    /// A value could not be parsed as a number.
    #[error("not a number: {0}")]
    NotANumber(String),

    /// An invalid fan mode string was provided.
    #[error("invalid fan mode: {0}")]
    InvalidMode(String),

    /// An invalid power status string was provided.
    #[error("invalid power status: {0}")]
    InvalidStatus(String),
}

/// Errors raised by the external device gateway.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// Fetching device state failed. The affected device is skipped
    /// for the current cycle; other devices are unaffected.
    #[error("device {device} unreachable: {reason}")]
    DeviceUnreachable {
        /// The device that could not be reached.
        device: String,
        /// Description of the underlying failure.
        reason: String,
    },

    /// The device refused a command. Reported, never retried.
    #[error("device {device} rejected command: {reason}")]
    CommandRejected {
        /// The device that refused the command.
        device: String,
        /// Description of the refusal.
        reason: String,
    },
}

impl GatewayError {
    /// Creates an unreachable-device error.
    #[must_use]
    pub fn unreachable(device: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::DeviceUnreachable {
            device: device.into(),
            reason: reason.into(),
        }
    }

    /// Creates a command-rejected error.
    #[must_use]
    pub fn rejected(device: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::CommandRejected {
            device: device.into(),
            reason: reason.into(),
        }
    }
}

/// Errors related to the messaging boundary (MQTT).
#[derive(Debug, Error)]
pub enum MessagingError {
    /// MQTT connection or communication failed.
    #[cfg(feature = "mqtt")]
    #[error("MQTT error: {0}")]
    Mqtt(#[from] rumqttc::ClientError),

    /// Connection to the broker failed.
    #[error("connection failed: {0}")]
    ConnectionFailed(String),

    /// Connecting timed out.
    #[error("connection timed out after {0} s")]
    Timeout(u64),

    /// Invalid broker address.
    #[error("invalid address: {0}")]
    InvalidAddress(String),

    /// Internal channel was closed.
    #[error("channel closed: {0}")]
    ChannelClosed(String),
}

/// A specialized Result type for this library.
pub type Result<T> = std::result::Result<T, Error>;
