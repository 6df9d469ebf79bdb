// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Bridge configuration.
//!
//! The configuration file is TOML, read once at startup and immutable
//! afterwards. The `[account]` section is consumed by the external
//! session collaborator that logs in and enumerates the fan fleet; the
//! `[mqtt]` and `[bridge]` sections configure the messaging link and
//! the sync engine.
//!
//! ```toml
//! [account]
//! username = "user@example.com"
//! password = "secret"
//! timezone = "Europe/Berlin"
//!
//! [mqtt]
//! host = "192.168.1.50"
//! port = 1883
//! username = "mqtt-user"
//! password = "mqtt-pass"
//! client_id = "fansync-bridge"
//!
//! [bridge]
//! control_root = "vesync"
//! poll_interval_secs = 10
//! ```

use std::path::Path;
use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;

/// Errors raised while loading the configuration.
///
/// Configuration failures happen before the sync loop exists; whether
/// they are fatal is the caller's decision.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("failed to read configuration file: {0}")]
    Io(#[from] std::io::Error),

    /// The configuration file could not be parsed.
    #[error("failed to parse configuration: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Complete bridge configuration.
///
/// # Examples
///
/// ```
/// use fansync_lib::config::BridgeConfig;
///
/// let config = BridgeConfig::from_toml_str(
///     r#"
///     [account]
///     username = "user@example.com"
///     password = "secret"
///     timezone = "Europe/Berlin"
///
///     [mqtt]
///     host = "192.168.1.50"
///     "#,
/// )
/// .unwrap();
///
/// assert_eq!(config.mqtt.port, 1883);
/// assert_eq!(config.bridge.control_root, "vesync");
/// ```
#[derive(Debug, Clone, Deserialize)]
pub struct BridgeConfig {
    /// Cloud account credentials for the session collaborator.
    pub account: AccountConfig,
    /// Messaging endpoint settings.
    pub mqtt: MqttConfig,
    /// Engine settings.
    #[serde(default)]
    pub bridge: BridgeOptions,
}

impl BridgeConfig {
    /// Parses a configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] if the TOML is malformed or a
    /// required key is missing.
    pub fn from_toml_str(input: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(input)?)
    }

    /// Loads a configuration file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read and
    /// [`ConfigError::Parse`] if its content is malformed.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let input = std::fs::read_to_string(path)?;
        Self::from_toml_str(&input)
    }
}

/// Cloud account credentials and timezone.
#[derive(Debug, Clone, Deserialize)]
pub struct AccountConfig {
    /// Account user name.
    pub username: String,
    /// Account password.
    pub password: String,
    /// IANA timezone name the account is registered in.
    pub timezone: String,
}

/// Messaging endpoint settings.
#[derive(Debug, Clone, Deserialize)]
pub struct MqttConfig {
    /// Broker host address.
    pub host: String,
    /// Broker port.
    #[serde(default = "default_port")]
    pub port: u16,
    /// Optional broker user name.
    #[serde(default)]
    pub username: Option<String>,
    /// Optional broker password.
    #[serde(default)]
    pub password: Option<String>,
    /// Optional client ID; a unique one is generated when absent.
    #[serde(default)]
    pub client_id: Option<String>,
}

/// Engine settings.
#[derive(Debug, Clone, Deserialize)]
pub struct BridgeOptions {
    /// Root segment of the state and control topic namespace.
    #[serde(default = "default_control_root")]
    pub control_root: String,
    /// Minimum delay between poll cycles, in seconds.
    #[serde(default = "default_poll_interval_secs")]
    pub poll_interval_secs: u64,
}

impl BridgeOptions {
    /// Returns the poll interval as a [`Duration`].
    #[must_use]
    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs)
    }
}

impl Default for BridgeOptions {
    fn default() -> Self {
        Self {
            control_root: default_control_root(),
            poll_interval_secs: default_poll_interval_secs(),
        }
    }
}

fn default_port() -> u16 {
    1883
}

fn default_control_root() -> String {
    "vesync".to_string()
}

fn default_poll_interval_secs() -> u64 {
    10
}
