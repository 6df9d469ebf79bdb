// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! MQTT implementation of the messaging boundary.
//!
//! The link maintains one persistent broker connection shared by both
//! directions: state publishes go out retained, and every message under
//! `{control_root}/#` is forwarded into the inbound channel handed out
//! by [`MqttLinkBuilder::build`]. That subscription also delivers the
//! bridge's own retained state publishes back; their three-segment
//! topics fall out of the command translator as too short, mirroring
//! how any other non-command traffic in the namespace is treated.
//!
//! # Examples
//!
//! ```no_run
//! use fansync_lib::messaging::MqttLink;
//!
//! # async fn example() -> fansync_lib::Result<()> {
//! let (link, inbound) = MqttLink::builder()
//!     .host("192.168.1.50")
//!     .port(1883)
//!     .credentials("user", "password")
//!     .control_root("vesync")
//!     .build()
//!     .await?;
//!
//! if link.is_connected() {
//!     println!("Connected to MQTT broker");
//! }
//! # Ok(())
//! # }
//! ```

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use rumqttc::{AsyncClient, EventLoop, MqttOptions, QoS};
use tokio::sync::{mpsc, oneshot};

use crate::error::MessagingError;

use super::{InboundMessage, MessagingBoundary};

/// Global counter for generating unique client IDs.
static LINK_CLIENT_ID_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Capacity of the inbound message channel.
const INBOUND_CHANNEL_CAPACITY: usize = 64;

/// Configuration for an MQTT link.
#[derive(Debug, Clone)]
pub struct MqttLinkConfig {
    host: String,
    port: u16,
    credentials: Option<(String, String)>,
    client_id: Option<String>,
    control_root: String,
    keep_alive: Duration,
    connection_timeout: Duration,
}

impl Default for MqttLinkConfig {
    fn default() -> Self {
        Self {
            host: String::new(),
            port: 1883,
            credentials: None,
            client_id: None,
            control_root: "vesync".to_string(),
            keep_alive: Duration::from_secs(30),
            connection_timeout: Duration::from_secs(10),
        }
    }
}

/// An MQTT connection implementing the messaging boundary.
///
/// `MqttLink` is cheaply cloneable (via `Arc`); the clone shares the
/// underlying connection.
#[derive(Clone)]
pub struct MqttLink {
    inner: Arc<MqttLinkInner>,
}

struct MqttLinkInner {
    /// The MQTT async client for publishing.
    client: AsyncClient,
    /// Configuration used for this connection.
    config: MqttLinkConfig,
    /// Connection status.
    connected: AtomicBool,
}

impl MqttLink {
    /// Creates a new builder for configuring an MQTT link.
    #[must_use]
    pub fn builder() -> MqttLinkBuilder {
        MqttLinkBuilder::default()
    }

    /// Returns whether the link is currently connected.
    #[must_use]
    pub fn is_connected(&self) -> bool {
        self.inner.connected.load(Ordering::Acquire)
    }

    /// Returns the host address of the broker.
    #[must_use]
    pub fn host(&self) -> &str {
        &self.inner.config.host
    }

    /// Returns the port of the broker.
    #[must_use]
    pub fn port(&self) -> u16 {
        self.inner.config.port
    }

    /// Returns the control root whose namespace this link watches.
    #[must_use]
    pub fn control_root(&self) -> &str {
        &self.inner.config.control_root
    }

    /// Disconnects from the broker.
    ///
    /// # Errors
    ///
    /// Returns error if the disconnect operation fails.
    pub async fn disconnect(&self) -> Result<(), MessagingError> {
        tracing::info!(
            host = %self.inner.config.host,
            port = %self.inner.config.port,
            "Disconnecting from MQTT broker"
        );
        self.inner
            .client
            .disconnect()
            .await
            .map_err(MessagingError::Mqtt)?;
        self.inner.connected.store(false, Ordering::Release);
        Ok(())
    }
}

#[async_trait]
impl MessagingBoundary for MqttLink {
    async fn publish(
        &self,
        topic: &str,
        payload: &str,
        retain: bool,
    ) -> Result<(), MessagingError> {
        self.inner
            .client
            .publish(topic, QoS::AtLeastOnce, retain, payload)
            .await
            .map_err(MessagingError::Mqtt)
    }
}

impl std::fmt::Debug for MqttLink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MqttLink")
            .field("host", &self.inner.config.host)
            .field("port", &self.inner.config.port)
            .field("control_root", &self.inner.config.control_root)
            .field("connected", &self.is_connected())
            .finish()
    }
}

/// Builder for creating an MQTT link.
///
/// # Examples
///
/// ```no_run
/// use std::time::Duration;
///
/// use fansync_lib::messaging::MqttLink;
///
/// # async fn example() -> fansync_lib::Result<()> {
/// let (link, inbound) = MqttLink::builder()
///     .host("192.168.1.50")
///     .credentials("user", "password")
///     .client_id("fansync-bridge")
///     .keep_alive(Duration::from_secs(60))
///     .build()
///     .await?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Default)]
pub struct MqttLinkBuilder {
    config: MqttLinkConfig,
}

impl MqttLinkBuilder {
    /// Sets the broker host address.
    #[must_use]
    pub fn host(mut self, host: impl Into<String>) -> Self {
        self.config.host = host.into();
        self
    }

    /// Sets the broker port (default: 1883).
    #[must_use]
    pub fn port(mut self, port: u16) -> Self {
        self.config.port = port;
        self
    }

    /// Sets authentication credentials.
    #[must_use]
    pub fn credentials(mut self, username: impl Into<String>, password: impl Into<String>) -> Self {
        self.config.credentials = Some((username.into(), password.into()));
        self
    }

    /// Sets the MQTT client ID.
    ///
    /// When not set, a unique ID is generated per connection.
    #[must_use]
    pub fn client_id(mut self, client_id: impl Into<String>) -> Self {
        self.config.client_id = Some(client_id.into());
        self
    }

    /// Sets the control root whose namespace is subscribed for inbound
    /// messages (default: `vesync`).
    #[must_use]
    pub fn control_root(mut self, control_root: impl Into<String>) -> Self {
        self.config.control_root = control_root.into();
        self
    }

    /// Sets the keep-alive interval (default: 30 seconds).
    #[must_use]
    pub fn keep_alive(mut self, duration: Duration) -> Self {
        self.config.keep_alive = duration;
        self
    }

    /// Sets the connection timeout (default: 10 seconds).
    #[must_use]
    pub fn connection_timeout(mut self, duration: Duration) -> Self {
        self.config.connection_timeout = duration;
        self
    }

    /// Builds the link: connects, subscribes to the control namespace
    /// and returns the link plus the inbound message channel.
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - Host is not set
    /// - Connection fails
    /// - Connection times out
    pub async fn build(
        self,
    ) -> Result<(MqttLink, mpsc::Receiver<InboundMessage>), MessagingError> {
        if self.config.host.is_empty() {
            return Err(MessagingError::InvalidAddress(
                "MQTT broker host is required".to_string(),
            ));
        }

        let client_id = self.config.client_id.clone().unwrap_or_else(|| {
            let counter = LINK_CLIENT_ID_COUNTER.fetch_add(1, Ordering::Relaxed);
            format!("fansync_{}_{}", std::process::id(), counter)
        });

        let mut mqtt_options = MqttOptions::new(&client_id, &self.config.host, self.config.port);
        mqtt_options.set_keep_alive(self.config.keep_alive);
        mqtt_options.set_clean_session(true);

        if let Some((ref username, ref password)) = self.config.credentials {
            mqtt_options.set_credentials(username, password);
        }

        let (client, event_loop) = AsyncClient::new(mqtt_options, 10);

        let inner = MqttLinkInner {
            client,
            config: self.config.clone(),
            connected: AtomicBool::new(false),
        };
        let link = MqttLink {
            inner: Arc::new(inner),
        };

        let (inbound_tx, inbound_rx) = mpsc::channel::<InboundMessage>(INBOUND_CHANNEL_CAPACITY);

        // Channel to signal when ConnAck is received
        let (connack_tx, connack_rx) = oneshot::channel();

        let link_clone = link.clone();
        tokio::spawn(async move {
            handle_link_events(event_loop, link_clone, Some(connack_tx), inbound_tx).await;
        });

        // Wait for ConnAck with timeout
        let timeout = self.config.connection_timeout;
        match tokio::time::timeout(timeout, connack_rx).await {
            Ok(Ok(())) => {
                link.inner.connected.store(true, Ordering::Release);
                tracing::info!(
                    host = %self.config.host,
                    port = %self.config.port,
                    client_id = %client_id,
                    "Connected to MQTT broker"
                );
            }
            Ok(Err(_)) => {
                return Err(MessagingError::ConnectionFailed(
                    "MQTT event loop terminated unexpectedly".to_string(),
                ));
            }
            Err(_) => {
                return Err(MessagingError::Timeout(timeout.as_secs()));
            }
        }

        // Watch the whole control namespace for inbound commands
        let control_topic = format!("{}/#", self.config.control_root);
        link.inner
            .client
            .subscribe(&control_topic, QoS::AtLeastOnce)
            .await
            .map_err(MessagingError::Mqtt)?;
        tracing::debug!(topic = %control_topic, "Subscribed to control namespace");

        Ok((link, inbound_rx))
    }
}

/// Handles MQTT events for the link connection.
async fn handle_link_events(
    mut event_loop: EventLoop,
    link: MqttLink,
    connack_tx: Option<oneshot::Sender<()>>,
    inbound_tx: mpsc::Sender<InboundMessage>,
) {
    use rumqttc::{Event, Packet};

    let mut connack_tx = connack_tx;

    loop {
        match event_loop.poll().await {
            Ok(Event::Incoming(Packet::ConnAck(connack))) => {
                tracing::debug!(?connack, "MQTT broker connected");
                link.inner.connected.store(true, Ordering::Release);
                if let Some(tx) = connack_tx.take() {
                    let _ = tx.send(());
                }
            }
            Ok(Event::Incoming(Packet::SubAck(suback))) => {
                tracing::debug!(?suback, "MQTT subscription acknowledged");
            }
            Ok(Event::Incoming(Packet::Publish(publish))) => {
                if let Ok(payload) = String::from_utf8(publish.payload.to_vec()) {
                    tracing::trace!(
                        topic = %publish.topic,
                        payload = %payload,
                        "MQTT message received"
                    );
                    // Ignore send errors - the consumer may have shut down
                    let _ = inbound_tx
                        .send(InboundMessage::new(publish.topic, payload))
                        .await;
                }
            }
            Ok(Event::Incoming(Packet::Disconnect)) => {
                tracing::info!("MQTT broker disconnected");
                link.inner.connected.store(false, Ordering::Release);
                break;
            }
            Ok(_) => {}
            Err(e) => {
                tracing::error!(error = %e, "MQTT link event loop error");
                link.inner.connected.store(false, Ordering::Release);
                break;
            }
        }
    }
}
