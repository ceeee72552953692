//! Fan-out planning policy over one link-state snapshot.

use crate::control_plane::link_table::LinkState;
use crate::endpoint::Endpoint;
use crate::message::SenderId;
use crate::observability::events;
use std::collections::HashSet;
use tracing::debug;

const COMPONENT: &str = "fanout_resolution";

/// Targets of one topic the message participates in.
#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) struct TopicFanout {
    pub(crate) topic: String,
    pub(crate) targets: Vec<Endpoint>,
}

/// The full fan-out derivation for one inbound message.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub(crate) struct FanoutPlan {
    /// Set when the global ban suppressed the whole broadcast.
    pub(crate) sender_banned: bool,
    /// Topics skipped because the sender is muted in them.
    pub(crate) muted_topics: Vec<String>,
    pub(crate) topics: Vec<TopicFanout>,
}

/// Derives the fan-out plan for a message from `origin` authored by `sender`.
///
/// Evaluation order: membership lookup, then the global ban (one decision for
/// every topic), then per-topic mutes. Origin is excluded from every target
/// set, and targets are deduplicated defensively even though the member-set
/// invariant forbids duplicates.
pub(crate) fn resolve_fanout(
    state: &LinkState,
    origin: Endpoint,
    sender: SenderId,
) -> FanoutPlan {
    let member_topics = state.topics_containing(origin);
    if member_topics.is_empty() {
        // The common case: an ordinary room that is not linked anywhere.
        debug!(
            event = events::FANOUT_RESOLVE_EMPTY,
            component = COMPONENT,
            origin = %origin,
            "origin endpoint is not linked into any topic"
        );
        return FanoutPlan::default();
    }

    if state.is_banned(sender) {
        debug!(
            event = events::FANOUT_SENDER_BANNED,
            component = COMPONENT,
            origin = %origin,
            sender = %sender,
            "suppressing broadcast from banned sender"
        );
        return FanoutPlan {
            sender_banned: true,
            ..FanoutPlan::default()
        };
    }

    let mut plan = FanoutPlan::default();
    for topic in member_topics {
        if state.is_muted(topic, sender) {
            debug!(
                event = events::FANOUT_TOPIC_MUTED,
                component = COMPONENT,
                topic,
                sender = %sender,
                "sender is muted in topic"
            );
            plan.muted_topics.push(topic.to_string());
            continue;
        }

        let mut seen = HashSet::new();
        let targets: Vec<Endpoint> = state
            .members_of(topic)
            .unwrap_or(&[])
            .iter()
            .copied()
            .filter(|&member| member != origin && seen.insert(member))
            .collect();

        if targets.is_empty() {
            continue;
        }
        plan.topics.push(TopicFanout {
            topic: topic.to_string(),
            targets,
        });
    }
    plan
}
