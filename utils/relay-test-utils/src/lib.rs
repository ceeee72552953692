/********************************************************************************
 * Copyright (c) 2026 Contributors to the Eclipse Foundation
 *
 * See the NOTICE file(s) distributed with this work for additional
 * information regarding copyright ownership.
 *
 * This program and the accompanying materials are made available under the
 * terms of the Apache License Version 2.0 which is available at
 * https://www.apache.org/licenses/LICENSE-2.0
 *
 * SPDX-License-Identifier: Apache-2.0
 ********************************************************************************/

//! Shared test collaborators for the `topic-relay` workspace: a recording,
//! scriptable gateway, an in-memory store, and inbound-message builders.

use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;
use topic_relay::{
    Attachment, ChatGateway, Endpoint, InboundMessage, LinkState, OutboundPayload, RelayStore,
    SendError, SenderId, StoreError,
};

/// One observed gateway send, failed attempts included.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SendRecord {
    pub target: Endpoint,
    pub payload: OutboundPayload,
}

/// Gateway double that records every send attempt and replays scripted
/// per-target outcomes in order; once a target's script is drained, sends
/// succeed.
#[derive(Default)]
pub struct RecordingGateway {
    sends: Mutex<Vec<SendRecord>>,
    scripts: Mutex<HashMap<Endpoint, VecDeque<Result<(), SendError>>>>,
    latency: Mutex<Duration>,
    in_flight: AtomicUsize,
    peak_in_flight: AtomicUsize,
}

impl RecordingGateway {
    /// Queues the outcome of the next unscripted send to `target`.
    pub fn script_outcome(&self, target: Endpoint, outcome: Result<(), SendError>) {
        self.scripts
            .lock()
            .expect("scripts lock")
            .entry(target)
            .or_default()
            .push_back(outcome);
    }

    /// Queues a failure for the next unscripted send to `target`.
    pub fn script_failure(&self, target: Endpoint, error: SendError) {
        self.script_outcome(target, Err(error));
    }

    /// Adds artificial latency to every send, for concurrency observation.
    pub fn set_latency(&self, latency: Duration) {
        *self.latency.lock().expect("latency lock") = latency;
    }

    /// Every attempt observed so far, in arrival order.
    pub fn sends(&self) -> Vec<SendRecord> {
        self.sends.lock().expect("sends lock").clone()
    }

    /// Every payload attempted against one target, in arrival order.
    pub fn sends_to(&self, target: Endpoint) -> Vec<OutboundPayload> {
        self.sends
            .lock()
            .expect("sends lock")
            .iter()
            .filter(|record| record.target == target)
            .map(|record| record.payload.clone())
            .collect()
    }

    pub fn send_count(&self) -> usize {
        self.sends.lock().expect("sends lock").len()
    }

    /// Highest number of sends observed in flight at once.
    pub fn peak_in_flight(&self) -> usize {
        self.peak_in_flight.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ChatGateway for RecordingGateway {
    async fn send(&self, target: Endpoint, payload: &OutboundPayload) -> Result<(), SendError> {
        let current = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak_in_flight.fetch_max(current, Ordering::SeqCst);

        self.sends.lock().expect("sends lock").push(SendRecord {
            target,
            payload: payload.clone(),
        });

        let latency = *self.latency.lock().expect("latency lock");
        if !latency.is_zero() {
            tokio::time::sleep(latency).await;
        }

        let scripted = self
            .scripts
            .lock()
            .expect("scripts lock")
            .get_mut(&target)
            .and_then(VecDeque::pop_front);

        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        scripted.unwrap_or(Ok(()))
    }
}

/// In-memory [`RelayStore`] with a save counter and a scriptable save failure.
#[derive(Default)]
pub struct MemoryRelayStore {
    state: Mutex<LinkState>,
    save_count: AtomicUsize,
    fail_next_save: AtomicBool,
}

impl MemoryRelayStore {
    /// Number of successful saves observed.
    pub fn save_count(&self) -> usize {
        self.save_count.load(Ordering::SeqCst)
    }

    /// Makes the next save fail with an I/O error.
    pub fn fail_next_save(&self) {
        self.fail_next_save.store(true, Ordering::SeqCst);
    }

    /// The last successfully saved document.
    pub fn stored(&self) -> LinkState {
        self.state.lock().expect("state lock").clone()
    }
}

#[async_trait]
impl RelayStore for MemoryRelayStore {
    async fn load(&self) -> Result<LinkState, StoreError> {
        Ok(self.state.lock().expect("state lock").clone())
    }

    async fn save(&self, state: &LinkState) -> Result<(), StoreError> {
        if self.fail_next_save.swap(false, Ordering::SeqCst) {
            return Err(StoreError::Io("scripted save failure".to_string()));
        }
        *self.state.lock().expect("state lock") = state.clone();
        self.save_count.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

/// Builds a plain text message with derived display and community names.
pub fn text_message(sender: u64, origin: Endpoint, body: &str) -> InboundMessage {
    message(
        sender,
        &format!("user-{sender}"),
        origin,
        &format!("community-{}", origin.community_id),
        body,
    )
}

/// Builds a text message with explicit identity labels.
pub fn message(
    sender: u64,
    display_name: &str,
    origin: Endpoint,
    community_name: &str,
    body: &str,
) -> InboundMessage {
    InboundMessage {
        sender: SenderId(sender),
        sender_display_name: display_name.to_string(),
        origin,
        origin_community_name: community_name.to_string(),
        body: body.to_string(),
        attachments: Vec::new(),
    }
}

/// Builds a message carrying attachments.
pub fn message_with_attachments(
    sender: u64,
    origin: Endpoint,
    body: &str,
    attachments: Vec<Attachment>,
) -> InboundMessage {
    InboundMessage {
        attachments,
        ..text_message(sender, origin, body)
    }
}

/// One-time tracing initialization for tests; safe to call repeatedly.
pub fn init_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}
