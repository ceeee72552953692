//! Structured logging vocabulary shared by all layers.
//!
//! Library code emits `tracing` events tagged with these canonical names and
//! field keys and never installs a global subscriber; the embedding process
//! (or test harness) owns one-time subscriber initialization.

pub mod events;
pub mod fields;
