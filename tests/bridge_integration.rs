// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Integration tests for the sync engine against mock collaborators.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;
use tokio::sync::mpsc;

use fansync_lib::command::FanCommand;
use fansync_lib::error::{GatewayError, MessagingError};
use fansync_lib::gateway::FanGateway;
use fansync_lib::messaging::{InboundMessage, MessagingBoundary};
use fansync_lib::state::FanSnapshot;
use fansync_lib::sync::SyncEngine;
use fansync_lib::types::{FanMode, FanSpeed, PowerStatus};

/// Gateway backed by in-memory snapshots, recording every command.
#[derive(Clone, Default)]
struct FakeGateway {
    inner: Arc<GatewayInner>,
}

#[derive(Default)]
struct GatewayInner {
    snapshots: Mutex<HashMap<String, FanSnapshot>>,
    unreachable: Mutex<HashSet<String>>,
    reject_commands: Mutex<bool>,
    commands: Mutex<Vec<(String, FanCommand)>>,
}

impl FakeGateway {
    fn set_snapshot(&self, device: &str, snapshot: FanSnapshot) {
        self.inner
            .snapshots
            .lock()
            .insert(device.to_string(), snapshot);
    }

    fn set_unreachable(&self, device: &str) {
        self.inner.unreachable.lock().insert(device.to_string());
    }

    fn reject_commands(&self) {
        *self.inner.reject_commands.lock() = true;
    }

    fn commands(&self) -> Vec<(String, FanCommand)> {
        self.inner.commands.lock().clone()
    }

    fn record(&self, device: &str, command: FanCommand) -> Result<(), GatewayError> {
        if *self.inner.reject_commands.lock() {
            return Err(GatewayError::rejected(device, "device offline"));
        }
        self.inner
            .commands
            .lock()
            .push((device.to_string(), command));
        Ok(())
    }
}

#[async_trait]
impl FanGateway for FakeGateway {
    async fn fetch_state(&self, device: &str) -> Result<FanSnapshot, GatewayError> {
        if self.inner.unreachable.lock().contains(device) {
            return Err(GatewayError::unreachable(device, "connection reset"));
        }
        self.inner
            .snapshots
            .lock()
            .get(device)
            .copied()
            .ok_or_else(|| GatewayError::unreachable(device, "no snapshot"))
    }

    async fn set_speed(&self, device: &str, speed: FanSpeed) -> Result<(), GatewayError> {
        self.record(device, FanCommand::SetSpeed(speed))
    }

    async fn enter_sleep_mode(&self, device: &str) -> Result<(), GatewayError> {
        self.record(device, FanCommand::EnterSleep)
    }

    async fn enter_manual_mode(&self, device: &str) -> Result<(), GatewayError> {
        self.record(device, FanCommand::EnterManual)
    }

    async fn enter_auto_mode(&self, device: &str) -> Result<(), GatewayError> {
        self.record(device, FanCommand::EnterAuto)
    }
}

/// Messaging boundary that records every publish.
#[derive(Clone, Default)]
struct RecordingBoundary {
    published: Arc<Mutex<Vec<(String, String, bool)>>>,
}

impl RecordingBoundary {
    fn published(&self) -> Vec<(String, String, bool)> {
        self.published.lock().clone()
    }

    fn clear(&self) {
        self.published.lock().clear();
    }
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

fn engine_with(
    devices: &[&str],
) -> (
    SyncEngine<FakeGateway, RecordingBoundary>,
    FakeGateway,
    RecordingBoundary,
) {
    let gateway = FakeGateway::default();
    let boundary = RecordingBoundary::default();
    let engine = SyncEngine::new(
        devices.iter().copied(),
        gateway.clone(),
        boundary.clone(),
        "vesync",
    );
    (engine, gateway, boundary)
}

#[tokio::test]
async fn startup_cycle_publishes_every_field() {
    let (engine, gateway, boundary) = engine_with(&["fan1"]);
    gateway.set_snapshot("fan1", FanSnapshot::new(2, PowerStatus::On, FanMode::Manual));

    let published = engine.poll_once().await;
    assert_eq!(published, 4);

    let expected = [
        ("vesync/fan1/level", "2"),
        ("vesync/fan1/status", "on"),
        ("vesync/fan1/mode", "manual"),
        ("vesync/fan1/combined", "2"),
    ];
    let actual = boundary.published();
    assert_eq!(actual.len(), expected.len());
    for ((topic, payload, retain), (want_topic, want_payload)) in actual.iter().zip(expected) {
        assert_eq!(topic, want_topic);
        assert_eq!(payload, want_payload);
        assert!(retain);
    }

    let cached = engine.cache().get("fan1").unwrap();
    assert_eq!(cached.level(), Some(2));
    assert_eq!(cached.status(), Some(PowerStatus::On));
    assert_eq!(cached.mode(), Some(FanMode::Manual));
    assert_eq!(cached.combined(), 2);
}

#[tokio::test]
async fn unchanged_state_publishes_nothing() {
    let (engine, gateway, boundary) = engine_with(&["fan1"]);
    gateway.set_snapshot("fan1", FanSnapshot::new(1, PowerStatus::On, FanMode::Sleep));

    engine.poll_once().await;
    boundary.clear();

    assert_eq!(engine.poll_once().await, 0);
    assert!(boundary.published().is_empty());
}

#[tokio::test]
async fn unreachable_fan_is_isolated() {
    let (engine, gateway, boundary) = engine_with(&["fan1", "fan2"]);
    gateway.set_snapshot("fan1", FanSnapshot::new(3, PowerStatus::On, FanMode::Manual));
    gateway.set_snapshot("fan2", FanSnapshot::new(1, PowerStatus::On, FanMode::Manual));
    gateway.set_unreachable("fan2");

    assert_eq!(engine.poll_once().await, 4);

    let published = boundary.published();
    assert_eq!(published.len(), 4);
    assert!(
        published
            .iter()
            .all(|(topic, _, _)| topic.starts_with("vesync/fan1/"))
    );

    // fan2 was never published and its cache entry is untouched
    let cached = engine.cache().get("fan2").unwrap();
    assert_eq!(cached.level(), None);
    assert_eq!(cached.combined(), 0);
}

#[tokio::test]
async fn mode_change_to_auto_republishes_stale_combined() {
    let (engine, gateway, boundary) = engine_with(&["fan1"]);
    gateway.set_snapshot("fan1", FanSnapshot::new(2, PowerStatus::On, FanMode::Manual));
    engine.poll_once().await;
    boundary.clear();

    gateway.set_snapshot("fan1", FanSnapshot::new(2, PowerStatus::On, FanMode::Auto));
    engine.poll_once().await;

    let published = boundary.published();
    assert_eq!(published.len(), 2);
    assert_eq!(published[0].0, "vesync/fan1/mode");
    assert_eq!(published[0].1, "auto");
    // combined did not change numerically but is republished anyway
    assert_eq!(published[1].0, "vesync/fan1/combined");
    assert_eq!(published[1].1, "2");
}

#[tokio::test]
async fn combined_zero_dispatches_exactly_one_sleep_command() {
    let (engine, gateway, _) = engine_with(&["fan1"]);

    engine
        .handle_message(&InboundMessage::new("vesync/fan1/combined/set", "0"))
        .await;

    assert_eq!(
        gateway.commands(),
        [("fan1".to_string(), FanCommand::EnterSleep)]
    );
}

#[tokio::test]
async fn level_bounds_gate_the_gateway() {
    let (engine, gateway, _) = engine_with(&["fan1"]);

    for payload in ["0", "4"] {
        engine
            .handle_message(&InboundMessage::new("vesync/fan1/level/set", payload))
            .await;
    }
    assert!(gateway.commands().is_empty());

    for payload in ["1", "2", "3"] {
        engine
            .handle_message(&InboundMessage::new("vesync/fan1/level/set", payload))
            .await;
    }
    let commands = gateway.commands();
    assert_eq!(commands.len(), 3);
    for (i, (device, command)) in commands.iter().enumerate() {
        assert_eq!(device, "fan1");
        let level = u8::try_from(i + 1).unwrap();
        assert_eq!(*command, FanCommand::SetSpeed(FanSpeed::new(level).unwrap()));
    }
}

#[tokio::test]
async fn unrelated_traffic_never_reaches_gateway() {
    let (engine, gateway, _) = engine_with(&["fan1"]);

    for (topic, payload) in [
        ("other/fan1/level/set", "2"),
        ("vesync/fan9/level/set", "2"),
        ("vesync/fan1/level", "2"),
        ("vesync/fan1/level/get", "2"),
        ("vesync/fan1/color/set", "red"),
    ] {
        engine
            .handle_message(&InboundMessage::new(topic, payload))
            .await;
    }

    assert!(gateway.commands().is_empty());
}

#[tokio::test]
async fn rejected_command_is_not_fatal() {
    let (engine, gateway, boundary) = engine_with(&["fan1"]);
    gateway.set_snapshot("fan1", FanSnapshot::new(1, PowerStatus::On, FanMode::Manual));
    gateway.reject_commands();

    engine
        .handle_message(&InboundMessage::new("vesync/fan1/mode/set", "auto"))
        .await;

    // The poll path keeps working after the rejection
    assert_eq!(engine.poll_once().await, 4);
    assert_eq!(boundary.published().len(), 4);
}

#[tokio::test(start_paused = true)]
async fn run_drains_inbound_and_stops_on_close() {
    let (engine, gateway, _) = engine_with(&["fan1"]);
    gateway.set_snapshot("fan1", FanSnapshot::new(1, PowerStatus::On, FanMode::Manual));
    let engine = engine.with_poll_interval(Duration::from_secs(10));

    let (tx, rx) = mpsc::channel(8);
    let handle = tokio::spawn(engine.run(rx));

    tx.send(InboundMessage::new("vesync/fan1/combined/set", "3"))
        .await
        .unwrap();
    drop(tx);

    tokio::time::timeout(Duration::from_secs(60), handle)
        .await
        .expect("sync loop should stop when the channel closes")
        .unwrap();

    assert_eq!(
        gateway.commands(),
        [("fan1".to_string(), FanCommand::SetSpeed(FanSpeed::HIGH))]
    );
}
