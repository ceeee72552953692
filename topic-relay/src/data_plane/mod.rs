//! Data-plane layer.
//!
//! Executes resolved fan-out plans: one delivery task per target applying the
//! send reliability policy (rate-limit retry, target-gone abandon, isolated
//! failure), dispatched concurrently under the process-wide send permit pool.
//! Nothing here mutates the link-state document; a vanished target is skipped,
//! never pruned.

pub(crate) mod delivery;
pub(crate) mod dispatch;
