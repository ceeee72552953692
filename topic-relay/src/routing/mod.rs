//! Routing layer.
//!
//! Encapsulates the versioned link-state snapshot read by deliveries and the
//! pure fan-out resolution policy: ban short-circuit, per-topic mute skip,
//! self-exclusion, and defensive target dedupe. Nothing in this layer touches
//! the gateway; resolved plans are executed by the data plane.

pub(crate) mod fanout_resolution;
pub(crate) mod link_directory;
