//! Persistence-adapter boundary for the link-state document.

use crate::control_plane::link_table::LinkState;
use async_trait::async_trait;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Failures of the backing document store.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum StoreError {
    /// The storage medium could not be read or written.
    Io(String),
    /// The stored document exists but could not be understood.
    Malformed(String),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            StoreError::Io(detail) => write!(f, "unable to access link-state document: {detail}"),
            StoreError::Malformed(detail) => {
                write!(f, "malformed link-state document: {detail}")
            }
        }
    }
}

impl Error for StoreError {}

/// Whole-document load/save of the link-state configuration.
///
/// Loaded once at construction and saved after every successful management
/// mutation; the adapter never mutates the document on its own. Overwrite
/// semantics are whole-document; no partial-write recovery is expected beyond
/// the adapter's own durability.
#[async_trait]
pub trait RelayStore: Send + Sync {
    async fn load(&self) -> Result<LinkState, StoreError>;
    async fn save(&self, state: &LinkState) -> Result<(), StoreError>;
}

#[cfg(test)]
mod tests {
    use super::StoreError;

    #[test]
    fn display_is_stable_for_each_variant() {
        assert_eq!(
            StoreError::Io("denied".to_string()).to_string(),
            "unable to access link-state document: denied"
        );
        assert_eq!(
            StoreError::Malformed("bad json".to_string()).to_string(),
            "malformed link-state document: bad json"
        );
    }
}
