//! Canonical structured event names used across `topic-relay`.

// Delivery and dispatch events.
pub const DELIVERY_SEND_ATTEMPT: &str = "delivery_send_attempt";
pub const DELIVERY_SEND_OK: &str = "delivery_send_ok";
pub const DELIVERY_SEND_FAILED: &str = "delivery_send_failed";
pub const DELIVERY_RATE_LIMITED: &str = "delivery_rate_limited";
pub const DELIVERY_TARGET_GONE: &str = "delivery_target_gone";
pub const ATTACHMENT_FORWARD_FAILED: &str = "attachment_forward_failed";
pub const ATTACHMENT_FORWARD_ABANDONED: &str = "attachment_forward_abandoned";
pub const FANOUT_DISPATCH_START: &str = "fanout_dispatch_start";
pub const FANOUT_DISPATCH_DONE: &str = "fanout_dispatch_done";

// Routing and resolution events.
pub const INBOUND_RECEIVE: &str = "inbound_receive";
pub const FANOUT_RESOLVE_EMPTY: &str = "fanout_resolve_empty";
pub const FANOUT_SENDER_BANNED: &str = "fanout_sender_banned";
pub const FANOUT_TOPIC_MUTED: &str = "fanout_topic_muted";

// Management-surface lifecycle events.
pub const TOPIC_CREATE_OK: &str = "topic_create_ok";
pub const TOPIC_CREATE_FAILED: &str = "topic_create_failed";
pub const TOPIC_JOIN_OK: &str = "topic_join_ok";
pub const TOPIC_JOIN_FAILED: &str = "topic_join_failed";
pub const TOPIC_LEAVE_OK: &str = "topic_leave_ok";
pub const TOPIC_LEAVE_FAILED: &str = "topic_leave_failed";
pub const MUTE_SET_OK: &str = "mute_set_ok";
pub const MUTE_SET_FAILED: &str = "mute_set_failed";
pub const BAN_SET_OK: &str = "ban_set_ok";
pub const BAN_SET_FAILED: &str = "ban_set_failed";

// Link-state document events.
pub const STATE_LOAD_OK: &str = "state_load_ok";
pub const STATE_PERSIST_FAILED: &str = "state_persist_failed";
