//! Pure rendering of inbound messages into platform-facing payloads.

use crate::message::{Attachment, InboundMessage};

/// Body text substituted when a message carries attachments but no text.
pub const ATTACHMENT_ONLY_BODY: &str = "(attachment only)";

/// The primary outbound representation of one relayed message.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RenderedMessage {
    /// Visible author label, `"<display name>@<origin community>"`.
    pub author_label: String,
    pub body: String,
    /// First image attachment, inlined for embed-style display.
    pub image_url: Option<String>,
}

/// Everything a single fan-out target receives: the primary message followed
/// by one forward per attachment, in order.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RenderedBroadcast {
    pub primary: RenderedMessage,
    pub follow_ups: Vec<Attachment>,
}

/// One unit handed to the gateway send primitive.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum OutboundPayload {
    Message(RenderedMessage),
    Attachment(Attachment),
}

/// Renders an inbound message into its outbound representation.
///
/// Pure: performs no I/O and leaves the message untouched.
pub fn render(message: &InboundMessage) -> RenderedBroadcast {
    let body = if message.body.is_empty() {
        ATTACHMENT_ONLY_BODY.to_string()
    } else {
        message.body.clone()
    };

    let image_url = message
        .attachments
        .iter()
        .find(|attachment| attachment.is_image())
        .map(|attachment| attachment.url.clone());

    RenderedBroadcast {
        primary: RenderedMessage {
            author_label: format!(
                "{}@{}",
                message.sender_display_name, message.origin_community_name
            ),
            body,
            image_url,
        },
        follow_ups: message.attachments.clone(),
    }
}
