// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! The sync loop.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::time::MissedTickBehavior;

use crate::command::{CommandTranslator, Translation};
use crate::gateway::FanGateway;
use crate::messaging::{InboundMessage, MessagingBoundary};
use crate::state::StateCache;

use super::ChangeDetector;

/// Default minimum delay between poll cycles.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(10);

/// Orchestrates polling, change detection and command dispatch.
///
/// The engine owns the fixed device set and the shared [`StateCache`].
/// Each poll cycle scans every fan sequentially: fetch a snapshot
/// through the gateway, diff it against the cache, publish the
/// resulting events retained. A fan that cannot be reached is skipped
/// for the cycle without affecting the others.
///
/// Inbound control messages arrive on a channel, independent of the
/// poll cadence, and resolve to at most one gateway command each.
/// Nothing the engine encounters at runtime is fatal; failures are
/// logged and the loop continues.
///
/// # Examples
///
/// ```no_run
/// use fansync_lib::messaging::MqttLink;
/// use fansync_lib::sync::SyncEngine;
/// # use fansync_lib::gateway::FanGateway;
/// # async fn example(gateway: impl FanGateway) -> fansync_lib::Result<()> {
/// let (link, inbound) = MqttLink::builder()
///     .host("192.168.1.50")
///     .build()
///     .await?;
///
/// let engine = SyncEngine::new(["fan1", "fan2"], gateway, link, "vesync");
/// engine.run(inbound).await;
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct SyncEngine<G, M> {
    devices: Vec<String>,
    gateway: G,
    messaging: M,
    cache: Arc<StateCache>,
    detector: ChangeDetector,
    translator: CommandTranslator,
    control_root: String,
    poll_interval: Duration,
}

impl<G, M> SyncEngine<G, M>
where
    G: FanGateway,
    M: MessagingBoundary,
{
    /// Creates an engine for a fixed set of fans.
    ///
    /// The device list comes from the external session collaborator at
    /// startup; membership never changes afterwards.
    #[must_use]
    pub fn new<I, S>(devices: I, gateway: G, messaging: M, control_root: impl Into<String>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let devices: Vec<String> = devices.into_iter().map(Into::into).collect();
        let control_root = control_root.into();
        let cache = Arc::new(StateCache::new(devices.iter().cloned()));
        let detector = ChangeDetector::new(Arc::clone(&cache));
        let translator = CommandTranslator::new(control_root.clone(), Arc::clone(&cache));
        Self {
            devices,
            gateway,
            messaging,
            cache,
            detector,
            translator,
            control_root,
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }

    /// Sets the minimum delay between poll cycles
    /// (default: [`DEFAULT_POLL_INTERVAL`]).
    #[must_use]
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    /// Returns the registered device names.
    #[must_use]
    pub fn devices(&self) -> &[String] {
        &self.devices
    }

    /// Returns the shared state cache.
    #[must_use]
    pub fn cache(&self) -> &Arc<StateCache> {
        &self.cache
    }

    /// Runs one poll cycle over all fans.
    ///
    /// Returns the number of publish events issued. A fetch failure
    /// skips the affected fan only; a publish failure skips the
    /// affected event only.
    pub async fn poll_once(&self) -> usize {
        let mut published = 0;

        for device in &self.devices {
            let snapshot = match self.gateway.fetch_state(device).await {
                Ok(snapshot) => snapshot,
                Err(e) => {
                    tracing::warn!(device = %device, error = %e, "Skipping fan for this cycle");
                    continue;
                }
            };

            let events = match self.detector.detect(device, &snapshot) {
                Ok(events) => events,
                Err(e) => {
                    tracing::warn!(device = %device, error = %e, "Change detection failed");
                    continue;
                }
            };

            for event in events {
                let topic = event.topic(&self.control_root);
                let payload = event.payload();
                match self.messaging.publish(&topic, &payload, true).await {
                    Ok(()) => {
                        tracing::debug!(topic = %topic, payload = %payload, "Published state change");
                        published += 1;
                    }
                    Err(e) => {
                        tracing::warn!(topic = %topic, error = %e, "Failed to publish state change");
                    }
                }
            }
        }

        published
    }

    /// Handles one inbound control message.
    ///
    /// Issues at most one gateway command. A rejected command is logged
    /// and never retried; an ignored message is reported at the level
    /// its reason calls for.
    pub async fn handle_message(&self, message: &InboundMessage) {
        match self.translator.translate(&message.topic, &message.payload) {
            Translation::Dispatch { device, command } => {
                tracing::debug!(device = %device, command = %command, "Dispatching control command");
                if let Err(e) = self.gateway.send_command(&device, command).await {
                    tracing::warn!(device = %device, command = %command, error = %e, "Command failed");
                }
            }
            Translation::Ignored(reason) if reason.is_silent() => {
                tracing::trace!(topic = %message.topic, reason = %reason, "Ignoring message");
            }
            Translation::Ignored(reason) => {
                tracing::debug!(
                    topic = %message.topic,
                    payload = %message.payload,
                    reason = %reason,
                    "Ignoring message"
                );
            }
        }
    }

    /// Runs the sync loop until the inbound channel closes.
    ///
    /// Poll cycles are paced by the configured interval; inbound
    /// messages are handled as they arrive, independent of the poll
    /// phase.
    pub async fn run(self, mut inbound: mpsc::Receiver<InboundMessage>) {
        tracing::info!(
            devices = self.devices.len(),
            interval_secs = self.poll_interval.as_secs(),
            control_root = %self.control_root,
            "Sync loop started"
        );

        let mut ticker = tokio::time::interval(self.poll_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    let published = self.poll_once().await;
                    if published > 0 {
                        tracing::debug!(published, "Poll cycle complete");
                    }
                }
                message = inbound.recv() => {
                    match message {
                        Some(message) => self.handle_message(&message).await,
                        None => {
                            tracing::info!("Inbound channel closed, stopping sync loop");
                            break;
                        }
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    use async_trait::async_trait;
    use parking_lot::Mutex;

    use crate::command::FanCommand;
    use crate::error::{GatewayError, MessagingError};
    use crate::state::FanSnapshot;
    use crate::types::{FanMode, FanSpeed, PowerStatus};

    #[derive(Default)]
    struct FakeGateway {
        snapshots: Mutex<HashMap<String, FanSnapshot>>,
        unreachable: Mutex<Vec<String>>,
        commands: Mutex<Vec<(String, FanCommand)>>,
    }

    impl FakeGateway {
        fn with_snapshot(self, device: &str, snapshot: FanSnapshot) -> Self {
            self.snapshots.lock().insert(device.to_string(), snapshot);
            self
        }

        fn with_unreachable(self, device: &str) -> Self {
            self.unreachable.lock().push(device.to_string());
            self
        }
    }

    #[async_trait]
    impl FanGateway for FakeGateway {
        async fn fetch_state(&self, device: &str) -> Result<FanSnapshot, GatewayError> {
            if self.unreachable.lock().iter().any(|d| d == device) {
                return Err(GatewayError::unreachable(device, "connection reset"));
            }
            self.snapshots
                .lock()
                .get(device)
                .copied()
                .ok_or_else(|| GatewayError::unreachable(device, "no snapshot"))
        }

        async fn set_speed(&self, device: &str, speed: FanSpeed) -> Result<(), GatewayError> {
            self.commands
                .lock()
                .push((device.to_string(), FanCommand::SetSpeed(speed)));
            Ok(())
        }

        async fn enter_sleep_mode(&self, device: &str) -> Result<(), GatewayError> {
            self.commands
                .lock()
                .push((device.to_string(), FanCommand::EnterSleep));
            Ok(())
        }

        async fn enter_manual_mode(&self, device: &str) -> Result<(), GatewayError> {
            self.commands
                .lock()
                .push((device.to_string(), FanCommand::EnterManual));
            Ok(())
        }

        async fn enter_auto_mode(&self, device: &str) -> Result<(), GatewayError> {
            self.commands
                .lock()
                .push((device.to_string(), FanCommand::EnterAuto));
            Ok(())
        }
    }

    #[derive(Default)]
    struct RecordingBoundary {
        published: Mutex<Vec<(String, String, bool)>>,
    }

    #[async_trait]
    impl MessagingBoundary for RecordingBoundary {
        async fn publish(
            &self,
            topic: &str,
            payload: &str,
            retain: bool,
        ) -> Result<(), MessagingError> {
            self.published
                .lock()
                .push((topic.to_string(), payload.to_string(), retain));
            Ok(())
        }
    }

    #[tokio::test]
    async fn unreachable_fan_does_not_block_others() {
        let gateway = FakeGateway::default()
            .with_snapshot("fan1", FanSnapshot::new(2, PowerStatus::On, FanMode::Manual))
            .with_unreachable("fan2");
        let engine = SyncEngine::new(
            ["fan1", "fan2"],
            gateway,
            RecordingBoundary::default(),
            "vesync",
        );

        let published = engine.poll_once().await;

        // fan1's four fields made it out despite fan2 failing
        assert_eq!(published, 4);
        let topics: Vec<String> = engine
            .messaging
            .published
            .lock()
            .iter()
            .map(|(t, _, _)| t.clone())
            .collect();
        assert_eq!(
            topics,
            [
                "vesync/fan1/level",
                "vesync/fan1/status",
                "vesync/fan1/mode",
                "vesync/fan1/combined",
            ]
        );
    }

    #[tokio::test]
    async fn publishes_are_retained() {
        let gateway = FakeGateway::default()
            .with_snapshot("fan1", FanSnapshot::new(1, PowerStatus::On, FanMode::Sleep));
        let engine = SyncEngine::new(["fan1"], gateway, RecordingBoundary::default(), "vesync");

        engine.poll_once().await;

        assert!(
            engine
                .messaging
                .published
                .lock()
                .iter()
                .all(|(_, _, retain)| *retain)
        );
    }

    #[tokio::test]
    async fn second_cycle_with_same_state_publishes_nothing() {
        let gateway = FakeGateway::default()
            .with_snapshot("fan1", FanSnapshot::new(2, PowerStatus::On, FanMode::Manual));
        let engine = SyncEngine::new(["fan1"], gateway, RecordingBoundary::default(), "vesync");

        assert_eq!(engine.poll_once().await, 4);
        assert_eq!(engine.poll_once().await, 0);
    }

    #[tokio::test]
    async fn inbound_command_reaches_gateway_once() {
        let engine = SyncEngine::new(
            ["fan1"],
            FakeGateway::default(),
            RecordingBoundary::default(),
            "vesync",
        );

        engine
            .handle_message(&InboundMessage::new("vesync/fan1/combined/set", "0"))
            .await;

        let commands = engine.gateway.commands.lock();
        assert_eq!(
            commands.as_slice(),
            [("fan1".to_string(), FanCommand::EnterSleep)]
        );
    }

    #[tokio::test]
    async fn rejected_payload_never_reaches_gateway() {
        let engine = SyncEngine::new(
            ["fan1"],
            FakeGateway::default(),
            RecordingBoundary::default(),
            "vesync",
        );

        engine
            .handle_message(&InboundMessage::new("vesync/fan1/level/set", "4"))
            .await;
        engine
            .handle_message(&InboundMessage::new("other/fan1/level/set", "2"))
            .await;

        assert!(engine.gateway.commands.lock().is_empty());
    }
}
