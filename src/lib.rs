// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! `FanSync` Lib - mirror smart fan state to MQTT and control fans
//! from MQTT.
//!
//! This library bridges a cloud-controlled fan fleet (VeSync style) to
//! an MQTT broker. Fan telemetry - speed level, power status, operating
//! mode and a derived combined value - is published to retained topics
//! whenever it changes, and control messages arriving under the same
//! namespace are validated and forwarded to the fans.
//!
//! # Architecture
//!
//! ```text
//! FanGateway (cloud session)          MQTT broker
//!       │  fetch_state                     ▲
//!       ▼                                  │ retained publishes
//!  SyncEngine ── ChangeDetector ── StateCache
//!       ▲                                  │
//!       │  send_command                    │ {root}/{fan}/{cmd}/set
//!  CommandTranslator ◄── inbound channel ◄─┘
//! ```
//!
//! The engine polls every fan on a paced cycle, diffs each snapshot
//! against the per-fan cache and publishes only the fields whose value
//! changed. Inbound control messages are validated segment by segment
//! and resolve to at most one gateway command each; malformed traffic
//! is ignored, never fatal.
//!
//! The cloud session itself (login, device enumeration) is not part of
//! this crate: implement [`FanGateway`] on top of it and hand the
//! device names to [`SyncEngine::new`].
//!
//! # Quick Start
//!
//! ```no_run
//! use fansync_lib::config::BridgeConfig;
//! use fansync_lib::error::GatewayError;
//! use fansync_lib::gateway::FanGateway;
//! use fansync_lib::messaging::MqttLink;
//! use fansync_lib::state::FanSnapshot;
//! use fansync_lib::sync::SyncEngine;
//! use fansync_lib::types::{FanMode, FanSpeed, PowerStatus};
//!
//! /// Stands in for the cloud session owning the real devices.
//! struct CloudSession;
//!
//! #[async_trait::async_trait]
//! impl FanGateway for CloudSession {
//!     async fn fetch_state(&self, _device: &str) -> Result<FanSnapshot, GatewayError> {
//!         Ok(FanSnapshot::new(1, PowerStatus::On, FanMode::Manual))
//!     }
//!     async fn set_speed(&self, _device: &str, _speed: FanSpeed) -> Result<(), GatewayError> {
//!         Ok(())
//!     }
//!     async fn enter_sleep_mode(&self, _device: &str) -> Result<(), GatewayError> {
//!         Ok(())
//!     }
//!     async fn enter_manual_mode(&self, _device: &str) -> Result<(), GatewayError> {
//!         Ok(())
//!     }
//!     async fn enter_auto_mode(&self, _device: &str) -> Result<(), GatewayError> {
//!         Ok(())
//!     }
//! }
//!
//! #[tokio::main]
//! async fn main() -> fansync_lib::Result<()> {
//!     let config = BridgeConfig::load("fansync.toml").expect("readable configuration");
//!
//!     let mut builder = MqttLink::builder()
//!         .host(&config.mqtt.host)
//!         .port(config.mqtt.port)
//!         .control_root(&config.bridge.control_root);
//!     if let (Some(user), Some(pass)) = (&config.mqtt.username, &config.mqtt.password) {
//!         builder = builder.credentials(user, pass);
//!     }
//!     if let Some(client_id) = &config.mqtt.client_id {
//!         builder = builder.client_id(client_id);
//!     }
//!     let (link, inbound) = builder.build().await?;
//!
//!     // Device names come from the cloud session at startup
//!     let poll_interval = config.bridge.poll_interval();
//!     let engine = SyncEngine::new(
//!         ["bedroom_fan", "office_fan"],
//!         CloudSession,
//!         link,
//!         config.bridge.control_root,
//!     )
//!     .with_poll_interval(poll_interval);
//!
//!     engine.run(inbound).await;
//!     Ok(())
//! }
//! ```
//!
//! # Topic namespace
//!
//! Outbound state (retained): `{control_root}/{fan}/{field}` with
//! `field` one of `level`, `status`, `mode`, `combined`. Inbound
//! control: `{control_root}/{fan}/{command}/set` with `command` one of
//! `level`, `mode`, `combined`. The combined value folds mode and level
//! into one number: `0` means sleep, `1`-`3` a manual speed.

pub mod command;
pub mod config;
pub mod error;
pub mod gateway;
pub mod messaging;
pub mod state;
pub mod sync;
pub mod types;

pub use command::{CommandTranslator, FanCommand, IgnoreReason, Translation};
pub use config::{BridgeConfig, ConfigError};
pub use error::{Error, GatewayError, MessagingError, Result, ValueError};
pub use gateway::FanGateway;
pub use messaging::{InboundMessage, MessagingBoundary};
#[cfg(feature = "mqtt")]
pub use messaging::{MqttLink, MqttLinkBuilder, MqttLinkConfig};
pub use state::{CachedFanState, FanSnapshot, FieldDelta, PublishEvent, StateCache};
pub use sync::{ChangeDetector, SyncEngine};
pub use types::{FanMode, FanSpeed, PowerStatus};
