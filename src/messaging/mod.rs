// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Messaging boundary.
//!
//! The sync engine talks to the pub/sub bus through two narrow seams:
//! the [`MessagingBoundary`] trait for outbound state publishes, and an
//! [`InboundMessage`] channel for control messages. The boundary owns
//! the connection lifecycle (authentication, reconnects); the engine
//! only sees publishes succeed or fail.
//!
//! Inbound delivery is deliberately channel-based rather than
//! callback-based: the bus implementation pushes every message into an
//! `mpsc` sender, and the engine drains the receiver on its own task.
//!
//! [`MqttLink`] is the bundled MQTT implementation (feature `mqtt`,
//! enabled by default).

#[cfg(feature = "mqtt")]
mod mqtt_link;

use async_trait::async_trait;

use crate::error::MessagingError;

#[cfg(feature = "mqtt")]
pub use mqtt_link::{MqttLink, MqttLinkBuilder, MqttLinkConfig};

/// Outbound side of the pub/sub bus.
#[async_trait]
pub trait MessagingBoundary: Send + Sync {
    /// Publishes a raw scalar value to a topic.
    ///
    /// State publishes set `retain` so late subscribers see last-known
    /// state. Publishing is a value-set: repeating a publish with the
    /// same payload is a harmless overwrite.
    ///
    /// # Errors
    ///
    /// Returns [`MessagingError`] if the bus rejects the publish.
    async fn publish(
        &self,
        topic: &str,
        payload: &str,
        retain: bool,
    ) -> Result<(), MessagingError>;
}

/// One message delivered by the bus.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InboundMessage {
    /// The full topic the message arrived on.
    pub topic: String,
    /// The raw payload, decoded as UTF-8.
    pub payload: String,
}

impl InboundMessage {
    /// Creates an inbound message.
    #[must_use]
    pub fn new(topic: impl Into<String>, payload: impl Into<String>) -> Self {
        Self {
            topic: topic.into(),
            payload: payload.into(),
        }
    }
}
