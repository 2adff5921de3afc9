//! Application layer for Affirm.
//!
//! This crate owns the profile use cases: the local-first [`ProfileStore`],
//! the best-effort remote sync path, and the retry machinery behind it.

pub mod bootstrap;
pub mod profile_store;
pub mod retry_drain;
pub mod retry_queue;
pub mod sync_coordinator;
pub mod sync_worker;

pub use bootstrap::AffirmServices;
pub use profile_store::ProfileStore;
pub use retry_drain::RetryDrain;
pub use retry_queue::{EnqueueOutcome, RetryQueue};
pub use sync_coordinator::SyncCoordinator;
pub use sync_worker::{SyncHandle, SyncWorker};
