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

//! # topic-relay
//!
//! `topic-relay` links independent chat rooms, potentially hosted by different
//! communities, into shared topics: a message posted in any member room is
//! mirrored into every other room subscribed to the topic, with per-topic
//! muting, global banning, attachment forwarding, and resilience against
//! platform rate limiting.
//!
//! Typical usage is API-first and remains centered on [`Endpoint`] and
//! [`TopicRelay`]. The chat platform and the document store are collaborator
//! boundaries: the embedding process supplies a [`ChatGateway`] for outbound
//! sends and a [`RelayStore`] for the persisted link state, then feeds inbound
//! events to [`TopicRelay::handle_message`].
//!
//! ```
//! use relay_test_utils::{text_message, MemoryRelayStore, RecordingGateway};
//! use std::sync::Arc;
//! use topic_relay::{Endpoint, RelayConfig, TopicRelay};
//!
//! # tokio::runtime::Runtime::new().unwrap().block_on(async {
//! let store = Arc::new(MemoryRelayStore::default());
//! let gateway = Arc::new(RecordingGateway::default());
//!
//! let relay = TopicRelay::new(
//!     "quick-start",
//!     RelayConfig {
//!         send_pacing_ms: 0,
//!         ..RelayConfig::default()
//!     },
//!     store,
//!     gateway.clone(),
//! )
//! .await
//! .unwrap();
//!
//! let here = Endpoint::new(1, 10);
//! let there = Endpoint::new(2, 20);
//! relay.create_topic("general").await.unwrap();
//! relay.join("general", here).await.unwrap();
//! relay.join("general", there).await.unwrap();
//!
//! let report = relay.handle_message(text_message(77, here, "hi")).await;
//! assert_eq!(report.delivered_count(), 1);
//! assert_eq!(gateway.send_count(), 1);
//! # });
//! ```
//!
//! ## Relay contract
//!
//! Topics are created explicitly and never auto-created by a join; joins are
//! idempotent; a leave of a non-member is an error. The global ban suppresses
//! a sender everywhere in one decision, a mute only within its topic. Fan-out
//! is best-effort and per-target: a vanished or failing target never blocks
//! its siblings, and a rate-limited target blocks only its own delivery task.
//!
//! ## Internal architecture map
//!
//! - API facade: outward [`Endpoint`]/[`TopicRelay`] surface
//! - Control plane: link-state document and management-command semantics
//! - Routing: versioned state snapshots and fan-out resolution policy
//! - Data plane: per-target delivery workers and bounded-concurrency dispatch
//!
//! ## Observability model
//!
//! The workspace uses `tracing` for logs/events. Library code emits
//! events/spans and does not unconditionally initialize a global subscriber.
//! Binaries and tests are responsible for one-time `tracing_subscriber`
//! initialization at process boundaries.

mod config;
pub use config::{ConfigError, RelayConfig};

mod control_plane;
pub use control_plane::link_lifecycle::LinkCommandError;
pub use control_plane::link_table::LinkState;

mod data_plane;
pub use data_plane::delivery::DeliveryOutcome;
pub use data_plane::dispatch::{BroadcastReport, TargetReport};

mod endpoint;
pub use endpoint::{Endpoint, ParseEndpointError};

mod gateway;
pub use gateway::{ChatGateway, SendError};

mod message;
pub use message::{Attachment, InboundMessage, SenderId};

#[doc(hidden)]
pub mod observability;

mod persistence;
pub use persistence::{RelayStore, StoreError};

mod relay;
pub use relay::TopicRelay;

mod render;
pub use render::{
    render, OutboundPayload, RenderedBroadcast, RenderedMessage, ATTACHMENT_ONLY_BODY,
};

mod routing;
