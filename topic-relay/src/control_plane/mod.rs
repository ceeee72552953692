//! Control-plane layer.
//!
//! Owns the link-state document and the management-command semantics over it.
//! This layer is responsible for idempotent join behavior, duplicate-free
//! member sets, and mapping raw document transitions into the command errors
//! surfaced by the management API. Persist-then-commit orchestration lives in
//! the facade so a failed save never publishes a mutation.

pub(crate) mod link_lifecycle;
pub(crate) mod link_table;
