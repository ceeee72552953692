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

//! API facade: the topic relay engine.

use crate::config::RelayConfig;
use crate::control_plane::link_lifecycle::{self, LinkCommandError};
use crate::control_plane::link_table::LinkState;
use crate::data_plane::delivery::DeliveryPolicy;
use crate::data_plane::dispatch::{BroadcastReport, FanoutDispatcher};
use crate::endpoint::Endpoint;
use crate::gateway::ChatGateway;
use crate::message::{InboundMessage, SenderId};
use crate::observability::{events, fields};
use crate::persistence::{RelayStore, StoreError};
use crate::render::render;
use crate::routing::fanout_resolution::resolve_fanout;
use crate::routing::link_directory::LinkDirectory;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

const COMPONENT: &str = "topic_relay";

/// The cross-community relay engine.
///
/// Owns the link-state document for the process lifetime: loaded from the
/// store at construction, mutated only through the management surface below
/// (each mutation persisted before it becomes visible), and read lock-free by
/// every in-flight broadcast. Management errors surface synchronously to the
/// caller; delivery errors are logged per target and never reach the sender.
pub struct TopicRelay {
    name: String,
    directory: LinkDirectory,
    write_guard: Mutex<()>,
    store: Arc<dyn RelayStore>,
    dispatcher: FanoutDispatcher,
}

impl TopicRelay {
    /// Loads the persisted link state and assembles the engine.
    pub async fn new(
        name: &str,
        config: RelayConfig,
        store: Arc<dyn RelayStore>,
        gateway: Arc<dyn ChatGateway>,
    ) -> Result<Self, StoreError> {
        let state = store.load().await?;
        info!(
            event = events::STATE_LOAD_OK,
            component = COMPONENT,
            name,
            topics = state.topic_count(),
            "loaded link state"
        );

        let policy = DeliveryPolicy {
            send_pacing: config.send_pacing(),
        };
        Ok(Self {
            name: name.to_string(),
            directory: LinkDirectory::new(state),
            write_guard: Mutex::new(()),
            store,
            dispatcher: FanoutDispatcher::new(gateway, config.effective_max_in_flight(), policy),
        })
    }

    /// Applies one management mutation: clone, mutate, persist, publish.
    ///
    /// The save is awaited before the commit so a failed store never leaves
    /// readers ahead of disk; the working copy is simply dropped on error.
    async fn run_command<F>(&self, apply: F) -> Result<(), LinkCommandError>
    where
        F: FnOnce(&mut LinkState) -> Result<(), LinkCommandError>,
    {
        let _guard = self.write_guard.lock().await;
        let mut next = self.directory.working_copy();
        apply(&mut next)?;
        if let Err(err) = self.store.save(&next).await {
            warn!(
                event = events::STATE_PERSIST_FAILED,
                component = COMPONENT,
                err = %err,
                "link-state save failed, mutation not published"
            );
            return Err(LinkCommandError::Persist(err));
        }
        self.directory.commit(next);
        Ok(())
    }

    /// Creates an empty topic. Fails with `AlreadyExists` on a taken name.
    pub async fn create_topic(&self, name: &str) -> Result<(), LinkCommandError> {
        let result = self
            .run_command(|state| link_lifecycle::apply_create_topic(state, name))
            .await;
        match &result {
            Ok(()) => debug!(
                event = events::TOPIC_CREATE_OK,
                component = COMPONENT,
                topic = name,
                "topic created"
            ),
            Err(err) => debug!(
                event = events::TOPIC_CREATE_FAILED,
                component = COMPONENT,
                topic = name,
                err = %err,
                "topic create rejected"
            ),
        }
        result
    }

    /// Links an endpoint into a topic. Re-joining is a no-op, not an error.
    pub async fn join(&self, name: &str, endpoint: Endpoint) -> Result<(), LinkCommandError> {
        let result = self
            .run_command(|state| link_lifecycle::apply_join(state, name, endpoint))
            .await;
        match &result {
            Ok(()) => debug!(
                event = events::TOPIC_JOIN_OK,
                component = COMPONENT,
                topic = name,
                target = %endpoint,
                "endpoint joined topic"
            ),
            Err(err) => debug!(
                event = events::TOPIC_JOIN_FAILED,
                component = COMPONENT,
                topic = name,
                target = %endpoint,
                err = %err,
                "join rejected"
            ),
        }
        result
    }

    /// Unlinks an endpoint from a topic it is currently a member of.
    pub async fn leave(&self, name: &str, endpoint: Endpoint) -> Result<(), LinkCommandError> {
        let result = self
            .run_command(|state| link_lifecycle::apply_leave(state, name, endpoint))
            .await;
        match &result {
            Ok(()) => debug!(
                event = events::TOPIC_LEAVE_OK,
                component = COMPONENT,
                topic = name,
                target = %endpoint,
                "endpoint left topic"
            ),
            Err(err) => debug!(
                event = events::TOPIC_LEAVE_FAILED,
                component = COMPONENT,
                topic = name,
                target = %endpoint,
                err = %err,
                "leave rejected"
            ),
        }
        result
    }

    /// Per-topic mute toggle; the topic need not exist or have members.
    pub async fn set_mute(
        &self,
        topic: &str,
        sender: SenderId,
        muted: bool,
    ) -> Result<(), LinkCommandError> {
        let result = self
            .run_command(|state| link_lifecycle::apply_set_mute(state, topic, sender, muted))
            .await;
        match &result {
            Ok(()) => debug!(
                event = events::MUTE_SET_OK,
                component = COMPONENT,
                topic,
                sender = %sender,
                muted,
                "mute updated"
            ),
            Err(err) => debug!(
                event = events::MUTE_SET_FAILED,
                component = COMPONENT,
                topic,
                sender = %sender,
                muted,
                err = %err,
                "mute update rejected"
            ),
        }
        result
    }

    /// Global ban toggle, suppressing relay across every topic.
    pub async fn set_ban(&self, sender: SenderId, banned: bool) -> Result<(), LinkCommandError> {
        let result = self
            .run_command(|state| link_lifecycle::apply_set_ban(state, sender, banned))
            .await;
        match &result {
            Ok(()) => debug!(
                event = events::BAN_SET_OK,
                component = COMPONENT,
                sender = %sender,
                banned,
                "ban updated"
            ),
            Err(err) => debug!(
                event = events::BAN_SET_FAILED,
                component = COMPONENT,
                sender = %sender,
                banned,
                err = %err,
                "ban update rejected"
            ),
        }
        result
    }

    /// Returns a topic's member set in insertion order.
    pub fn members_of(&self, name: &str) -> Result<Vec<Endpoint>, LinkCommandError> {
        self.directory
            .snapshot()
            .state
            .members_of(name)
            .map(|members| members.to_vec())
            .ok_or(LinkCommandError::NotFound)
    }

    /// Returns every topic the endpoint is linked into.
    pub fn topics_containing(&self, endpoint: Endpoint) -> Vec<String> {
        self.directory
            .snapshot()
            .state
            .topics_containing(endpoint)
            .into_iter()
            .map(str::to_string)
            .collect()
    }

    pub fn is_muted(&self, topic: &str, sender: SenderId) -> bool {
        self.directory.snapshot().state.is_muted(topic, sender)
    }

    pub fn is_banned(&self, sender: SenderId) -> bool {
        self.directory.snapshot().state.is_banned(sender)
    }

    /// Broadcasts one inbound message to every linked room.
    ///
    /// One call is one independent unit of work over one consistent snapshot;
    /// callers may spawn it per gateway event. The returned report is a
    /// logging/metrics artifact: nothing in it flows back to the sender.
    pub async fn handle_message(&self, message: InboundMessage) -> BroadcastReport {
        let snapshot = self.directory.snapshot();
        debug!(
            event = events::INBOUND_RECEIVE,
            component = COMPONENT,
            relay = self.name.as_str(),
            summary = %fields::format_message_summary(&message),
            snapshot_version = snapshot.version,
            "handling inbound message"
        );

        let plan = resolve_fanout(&snapshot.state, message.origin, message.sender);
        if plan.topics.is_empty() {
            return BroadcastReport {
                sender_banned: plan.sender_banned,
                muted_topics: plan.muted_topics,
                deliveries: Vec::new(),
            };
        }

        let broadcast = render(&message);
        self.dispatcher.dispatch(plan, &broadcast).await
    }
}

#[cfg(test)]
mod tests {
    use super::TopicRelay;
    use crate::config::RelayConfig;
    use crate::control_plane::link_lifecycle::LinkCommandError;
    use crate::control_plane::link_table::LinkState;
    use crate::endpoint::Endpoint;
    use crate::gateway::{ChatGateway, SendError};
    use crate::persistence::{RelayStore, StoreError};
    use crate::render::OutboundPayload;
    use async_trait::async_trait;
    use std::sync::Arc;

    struct NoopGateway;

    #[async_trait]
    impl ChatGateway for NoopGateway {
        async fn send(
            &self,
            _target: Endpoint,
            _payload: &OutboundPayload,
        ) -> Result<(), SendError> {
            Ok(())
        }
    }

    struct NoopStore;

    #[async_trait]
    impl RelayStore for NoopStore {
        async fn load(&self) -> Result<LinkState, StoreError> {
            Ok(LinkState::default())
        }

        async fn save(&self, _state: &LinkState) -> Result<(), StoreError> {
            Ok(())
        }
    }

    struct FailingSaveStore;

    #[async_trait]
    impl RelayStore for FailingSaveStore {
        async fn load(&self) -> Result<LinkState, StoreError> {
            Ok(LinkState::default())
        }

        async fn save(&self, _state: &LinkState) -> Result<(), StoreError> {
            Err(StoreError::Io("read-only volume".to_string()))
        }
    }

    async fn relay_with_store(store: Arc<dyn RelayStore>) -> TopicRelay {
        TopicRelay::new(
            "test-relay",
            RelayConfig {
                send_pacing_ms: 0,
                ..RelayConfig::default()
            },
            store,
            Arc::new(NoopGateway),
        )
        .await
        .expect("relay creation should succeed")
    }

    #[tokio::test]
    async fn management_surface_maps_document_errors() {
        let relay = relay_with_store(Arc::new(NoopStore)).await;
        let endpoint = Endpoint::new(1, 10);

        assert!(relay.create_topic("general").await.is_ok());
        assert!(matches!(
            relay.create_topic("general").await,
            Err(LinkCommandError::AlreadyExists)
        ));

        assert!(relay.join("general", endpoint).await.is_ok());
        assert!(relay.join("general", endpoint).await.is_ok());
        assert_eq!(relay.members_of("general").expect("members"), vec![endpoint]);

        assert!(matches!(
            relay.leave("general", Endpoint::new(9, 90)).await,
            Err(LinkCommandError::NotFound)
        ));
        assert!(matches!(
            relay.members_of("missing"),
            Err(LinkCommandError::NotFound)
        ));
    }

    #[tokio::test]
    async fn failed_save_leaves_the_readable_snapshot_unchanged() {
        let relay = relay_with_store(Arc::new(FailingSaveStore)).await;

        let result = relay.create_topic("general").await;

        assert!(matches!(result, Err(LinkCommandError::Persist(_))));
        assert!(matches!(
            relay.members_of("general"),
            Err(LinkCommandError::NotFound)
        ));
    }
}
