//! Inbound message model handed over by the platform gateway.

use crate::endpoint::Endpoint;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// Platform-level identity of a message author.
///
/// Sender identity is canonically numeric; mute and ban sets persist these
/// numbers directly.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
#[serde(transparent)]
pub struct SenderId(pub u64);

impl Display for SenderId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Opaque fetchable resource handle attached to an inbound message.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Attachment {
    pub url: String,
    pub content_type: Option<String>,
}

impl Attachment {
    pub fn new(url: impl Into<String>, content_type: Option<&str>) -> Self {
        Self {
            url: url.into(),
            content_type: content_type.map(str::to_string),
        }
    }

    /// Returns `true` when the platform reported an image content type.
    pub fn is_image(&self) -> bool {
        self.content_type
            .as_deref()
            .is_some_and(|content_type| content_type.starts_with("image"))
    }
}

/// One inbound chat message as observed at its origin endpoint.
///
/// Ephemeral: consumed once by the delivery engine and discarded, never
/// persisted.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct InboundMessage {
    pub sender: SenderId,
    pub sender_display_name: String,
    pub origin: Endpoint,
    pub origin_community_name: String,
    pub body: String,
    pub attachments: Vec<Attachment>,
}

#[cfg(test)]
mod tests {
    use super::Attachment;

    #[test]
    fn attachment_image_detection_uses_content_type() {
        assert!(Attachment::new("https://cdn.example/a.png", Some("image/png")).is_image());
        assert!(!Attachment::new("https://cdn.example/a.pdf", Some("application/pdf")).is_image());
        assert!(!Attachment::new("https://cdn.example/a.bin", None).is_image());
    }
}
