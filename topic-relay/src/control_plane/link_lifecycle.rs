//! Management-command semantics over the link-state document.

use crate::control_plane::link_table::LinkState;
use crate::endpoint::Endpoint;
use crate::message::SenderId;
use crate::persistence::StoreError;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Failures surfaced synchronously by the management surface.
#[derive(Debug)]
pub enum LinkCommandError {
    /// The topic name is already taken.
    AlreadyExists,
    /// The topic is absent, or the endpoint is not a member of it.
    NotFound,
    /// The mutation applied but could not be persisted; the readable
    /// snapshot was not advanced.
    Persist(StoreError),
}

impl Display for LinkCommandError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            LinkCommandError::AlreadyExists => write!(f, "topic already exists"),
            LinkCommandError::NotFound => write!(f, "topic or membership not found"),
            LinkCommandError::Persist(err) => {
                write!(f, "failed to persist link state: {err}")
            }
        }
    }
}

impl Error for LinkCommandError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            LinkCommandError::Persist(err) => Some(err),
            _ => None,
        }
    }
}

/// `CreateTopic`: first write wins, no authorization at this layer.
pub(crate) fn apply_create_topic(
    state: &mut LinkState,
    name: &str,
) -> Result<(), LinkCommandError> {
    if state.insert_topic(name) {
        Ok(())
    } else {
        Err(LinkCommandError::AlreadyExists)
    }
}

/// `Join`: requires the topic; re-joining an existing member is a no-op.
pub(crate) fn apply_join(
    state: &mut LinkState,
    name: &str,
    endpoint: Endpoint,
) -> Result<(), LinkCommandError> {
    match state.join(name, endpoint) {
        Some(_) => Ok(()),
        None => Err(LinkCommandError::NotFound),
    }
}

/// `Leave`: requires the topic and a current membership.
pub(crate) fn apply_leave(
    state: &mut LinkState,
    name: &str,
    endpoint: Endpoint,
) -> Result<(), LinkCommandError> {
    match state.leave(name, endpoint) {
        Some(true) => Ok(()),
        Some(false) | None => Err(LinkCommandError::NotFound),
    }
}

/// `SetMute`: idempotent, never fails at the document level.
pub(crate) fn apply_set_mute(
    state: &mut LinkState,
    topic: &str,
    sender: SenderId,
    muted: bool,
) -> Result<(), LinkCommandError> {
    state.set_mute(topic, sender, muted);
    Ok(())
}

/// `SetBan`: idempotent, global scope.
pub(crate) fn apply_set_ban(
    state: &mut LinkState,
    sender: SenderId,
    banned: bool,
) -> Result<(), LinkCommandError> {
    state.set_ban(sender, banned);
    Ok(())
}
