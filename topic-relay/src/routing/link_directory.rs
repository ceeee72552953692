//! Versioned snapshot holder for the link-state document.

use crate::control_plane::link_table::LinkState;
use arc_swap::ArcSwap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// One immutable view of the document, tagged with the commit that produced it.
pub(crate) struct LinkSnapshot {
    pub(crate) version: u64,
    pub(crate) state: LinkState,
}

/// Lock-free read access to the link-state document for in-flight deliveries.
///
/// Readers load one snapshot per fan-out and never observe a partial
/// mutation; writers clone-modify-commit under the facade's write guard.
#[derive(Clone)]
pub(crate) struct LinkDirectory {
    snapshot: Arc<ArcSwap<LinkSnapshot>>,
    next_version: Arc<AtomicU64>,
}

impl LinkDirectory {
    /// Creates a directory over the loaded document at version zero.
    pub(crate) fn new(state: LinkState) -> Self {
        Self {
            snapshot: Arc::new(ArcSwap::from_pointee(LinkSnapshot { version: 0, state })),
            next_version: Arc::new(AtomicU64::new(1)),
        }
    }

    /// Returns the current snapshot for one consistent fan-out derivation.
    pub(crate) fn snapshot(&self) -> Arc<LinkSnapshot> {
        self.snapshot.load_full()
    }

    /// Returns a mutable working copy of the current document.
    pub(crate) fn working_copy(&self) -> LinkState {
        self.snapshot.load().state.clone()
    }

    /// Atomically publishes a mutated document. Returns the new version.
    pub(crate) fn commit(&self, state: LinkState) -> u64 {
        let version = self.next_version.fetch_add(1, Ordering::Relaxed);
        self.snapshot
            .store(Arc::new(LinkSnapshot { version, state }));
        version
    }
}

#[cfg(test)]
mod tests {
    use super::LinkDirectory;
    use crate::control_plane::link_table::LinkState;
    use crate::endpoint::Endpoint;

    #[test]
    fn commit_advances_version_and_publishes_to_all_handles() {
        let directory = LinkDirectory::new(LinkState::default());
        let reader = directory.clone();
        assert_eq!(directory.snapshot().version, 0);

        let mut next = directory.working_copy();
        next.insert_topic("general");
        next.join("general", Endpoint::new(1, 10));
        assert_eq!(directory.commit(next), 1);

        let observed = reader.snapshot();
        assert_eq!(observed.version, 1);
        assert_eq!(
            observed.state.members_of("general"),
            Some(&[Endpoint::new(1, 10)][..])
        );
    }

    #[test]
    fn held_snapshot_is_unaffected_by_later_commits() {
        let directory = LinkDirectory::new(LinkState::default());
        let before = directory.snapshot();

        let mut next = directory.working_copy();
        next.insert_topic("general");
        directory.commit(next);

        assert_eq!(before.version, 0);
        assert_eq!(before.state.topic_count(), 0);
        assert_eq!(directory.snapshot().state.topic_count(), 1);
    }
}
