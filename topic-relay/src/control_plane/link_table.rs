//! Link-state document: topic membership and moderation sets.

use crate::endpoint::Endpoint;
use crate::message::SenderId;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// The one consistent configuration document behind the relay: topic
/// membership plus the moderation sets gating it.
///
/// Member vectors preserve insertion order for deterministic iteration and
/// hold no duplicates; `join` enforces the invariant. The whole document is
/// what the persistence adapter loads and overwrites.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct LinkState {
    pub(crate) topics: BTreeMap<String, Vec<Endpoint>>,
    pub(crate) mutes: BTreeMap<String, BTreeSet<SenderId>>,
    pub(crate) bans: BTreeSet<SenderId>,
}

impl LinkState {
    /// Inserts an empty topic. Returns `true` only when first inserted.
    pub(crate) fn insert_topic(&mut self, name: &str) -> bool {
        if self.topics.contains_key(name) {
            return false;
        }
        self.topics.insert(name.to_string(), Vec::new());
        true
    }

    /// Appends a member to a topic.
    ///
    /// `None` when the topic is absent; `Some(false)` when the endpoint was
    /// already a member (idempotent join); `Some(true)` when appended.
    pub(crate) fn join(&mut self, name: &str, endpoint: Endpoint) -> Option<bool> {
        let members = self.topics.get_mut(name)?;
        if members.contains(&endpoint) {
            return Some(false);
        }
        members.push(endpoint);
        Some(true)
    }

    /// Removes a member from a topic.
    ///
    /// `None` when the topic is absent; `Some(false)` when the endpoint was
    /// not a member; `Some(true)` when removed.
    pub(crate) fn leave(&mut self, name: &str, endpoint: Endpoint) -> Option<bool> {
        let members = self.topics.get_mut(name)?;
        match members.iter().position(|&member| member == endpoint) {
            Some(index) => {
                members.remove(index);
                Some(true)
            }
            None => Some(false),
        }
    }

    /// Returns a topic's member set in insertion order.
    pub fn members_of(&self, name: &str) -> Option<&[Endpoint]> {
        self.topics.get(name).map(|members| members.as_slice())
    }

    /// Returns every topic name whose member set includes `endpoint`.
    pub fn topics_containing(&self, endpoint: Endpoint) -> Vec<&str> {
        self.topics
            .iter()
            .filter(|(_, members)| members.contains(&endpoint))
            .map(|(name, _)| name.as_str())
            .collect()
    }

    /// Idempotent mute toggle. Returns `true` when the set changed.
    ///
    /// The topic need not exist or have members; a mute list may precede or
    /// outlive its topic.
    pub(crate) fn set_mute(&mut self, topic: &str, sender: SenderId, muted: bool) -> bool {
        if muted {
            return self.mutes.entry(topic.to_string()).or_default().insert(sender);
        }
        match self.mutes.get_mut(topic) {
            Some(muted_senders) => {
                let removed = muted_senders.remove(&sender);
                if muted_senders.is_empty() {
                    self.mutes.remove(topic);
                }
                removed
            }
            None => false,
        }
    }

    pub fn is_muted(&self, topic: &str, sender: SenderId) -> bool {
        self.mutes
            .get(topic)
            .is_some_and(|muted_senders| muted_senders.contains(&sender))
    }

    /// Idempotent global ban toggle. Returns `true` when the set changed.
    pub(crate) fn set_ban(&mut self, sender: SenderId, banned: bool) -> bool {
        if banned {
            self.bans.insert(sender)
        } else {
            self.bans.remove(&sender)
        }
    }

    pub fn is_banned(&self, sender: SenderId) -> bool {
        self.bans.contains(&sender)
    }

    pub fn topic_count(&self) -> usize {
        self.topics.len()
    }
}

#[cfg(test)]
mod tests {
    use super::LinkState;
    use crate::endpoint::Endpoint;
    use crate::message::SenderId;

    #[test]
    fn insert_topic_is_first_write_wins() {
        let mut state = LinkState::default();

        assert!(state.insert_topic("general"));
        assert!(!state.insert_topic("general"));
        assert_eq!(state.topic_count(), 1);
        assert_eq!(state.members_of("general"), Some(&[][..]));
    }

    #[test]
    fn join_is_idempotent_and_preserves_insertion_order() {
        let mut state = LinkState::default();
        state.insert_topic("general");
        let first = Endpoint::new(1, 10);
        let second = Endpoint::new(2, 20);

        assert_eq!(state.join("general", first), Some(true));
        assert_eq!(state.join("general", second), Some(true));
        assert_eq!(state.join("general", first), Some(false));

        assert_eq!(state.members_of("general"), Some(&[first, second][..]));
    }

    #[test]
    fn join_and_leave_require_an_existing_topic() {
        let mut state = LinkState::default();

        assert_eq!(state.join("missing", Endpoint::new(1, 10)), None);
        assert_eq!(state.leave("missing", Endpoint::new(1, 10)), None);
    }

    #[test]
    fn leave_of_a_non_member_does_not_mutate_the_set() {
        let mut state = LinkState::default();
        state.insert_topic("general");
        let member = Endpoint::new(1, 10);
        state.join("general", member);

        assert_eq!(state.leave("general", Endpoint::new(9, 90)), Some(false));
        assert_eq!(state.members_of("general"), Some(&[member][..]));

        assert_eq!(state.leave("general", member), Some(true));
        assert_eq!(state.members_of("general"), Some(&[][..]));
    }

    #[test]
    fn topics_containing_spans_every_membership() {
        let mut state = LinkState::default();
        state.insert_topic("alpha");
        state.insert_topic("beta");
        state.insert_topic("gamma");
        let endpoint = Endpoint::new(1, 10);
        state.join("alpha", endpoint);
        state.join("gamma", endpoint);

        assert_eq!(state.topics_containing(endpoint), vec!["alpha", "gamma"]);
        assert!(state.topics_containing(Endpoint::new(9, 90)).is_empty());
    }

    #[test]
    fn mute_toggles_are_idempotent_and_scoped_per_topic() {
        let mut state = LinkState::default();
        let sender = SenderId(7);

        assert!(state.set_mute("general", sender, true));
        assert!(!state.set_mute("general", sender, true));
        assert!(state.is_muted("general", sender));
        assert!(!state.is_muted("other", sender));

        assert!(state.set_mute("general", sender, false));
        assert!(!state.set_mute("general", sender, false));
        assert!(!state.is_muted("general", sender));
    }

    #[test]
    fn ban_toggles_are_idempotent_and_global() {
        let mut state = LinkState::default();
        let sender = SenderId(7);

        assert!(state.set_ban(sender, true));
        assert!(!state.set_ban(sender, true));
        assert!(state.is_banned(sender));

        assert!(state.set_ban(sender, false));
        assert!(!state.is_banned(sender));
    }

    #[test]
    fn document_round_trips_through_json() {
        let mut state = LinkState::default();
        state.insert_topic("general");
        state.join("general", Endpoint::new(1, 10));
        state.join("general", Endpoint::new(2, 20));
        state.set_mute("general", SenderId(5), true);
        state.set_ban(SenderId(9), true);

        let json = serde_json::to_string(&state).expect("serialize");
        assert!(json.contains("\"1:10\""));

        let back: LinkState = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back, state);
    }

    #[test]
    fn document_rejects_unknown_fields() {
        assert!(serde_json::from_str::<LinkState>("{\"topics\":{},\"extra\":1}").is_err());
    }

    #[test]
    fn missing_document_sections_default_to_empty() {
        let state: LinkState = serde_json::from_str("{}").expect("deserialize");

        assert_eq!(state, LinkState::default());
    }
}
