//! Chat-platform gateway boundary consumed by the delivery engine.

use crate::endpoint::Endpoint;
use crate::render::OutboundPayload;
use async_trait::async_trait;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::Duration;

/// Failure modes of the platform send primitive.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum SendError {
    /// The platform throttled the send and supplied a wait duration.
    RateLimited { retry_after: Duration },
    /// The target endpoint no longer exists (room deleted, access revoked).
    NotFound,
    /// Any other platform failure, carried as an opaque description.
    Other(String),
}

impl Display for SendError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            SendError::RateLimited { retry_after } => {
                write!(f, "rate limited by platform, retry after {retry_after:?}")
            }
            SendError::NotFound => write!(f, "target endpoint not found"),
            SendError::Other(detail) => write!(f, "platform send failure: {detail}"),
        }
    }
}

impl Error for SendError {}

/// Send primitive exposed by the chat platform client.
///
/// Inbound message events flow the other way: the embedding process feeds them
/// to [`TopicRelay::handle_message`](crate::TopicRelay::handle_message).
#[async_trait]
pub trait ChatGateway: Send + Sync {
    async fn send(&self, target: Endpoint, payload: &OutboundPayload) -> Result<(), SendError>;
}
