//! Remote synchronization contracts.
//!
//! This module provides the traits and types the sync layer talks to:
//! the remote document store, the identity provider, and the retry queue
//! entry persisted after a failed push.

mod queue_entry;
mod remote;

pub use queue_entry::SyncQueueEntry;
pub use remote::{AuthProvider, AuthToken, RemoteDocumentStore, RemoteWriteError};

/// Outcome of a single push attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PushOutcome {
    /// The remote accepted the document.
    Synced,
    /// The push failed and the snapshot was queued for replay.
    Queued {
        queue_len: usize,
        evicted: usize,
        reason: RemoteWriteError,
    },
    /// The push failed and could not even be queued locally.
    Dropped { reason: RemoteWriteError },
}

impl PushOutcome {
    pub fn is_synced(&self) -> bool {
        matches!(self, Self::Synced)
    }
}

/// Result of one replay pass over the retry queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ReplayReport {
    /// Entries delivered and removed in this pass
    pub succeeded: usize,
    /// Entries still queued after the pass
    pub remaining: usize,
}
