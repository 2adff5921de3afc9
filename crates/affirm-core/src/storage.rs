//! Local key-value storage contract.
//!
//! The profile store and the retry queue each own one reserved key and keep a
//! JSON payload under it.

use async_trait::async_trait;

use crate::error::Result;

/// Key holding the JSON-serialized [`UserProfile`](crate::profile::UserProfile).
pub const USER_PROFILE_KEY: &str = "user_profile";

/// Key holding the JSON array of [`SyncQueueEntry`](crate::sync::SyncQueueEntry),
/// oldest first.
pub const FAILED_SYNCS_KEY: &str = "failed_syncs";

/// On-device string key-value storage.
///
/// Implementations must not report success from `set` unless the value is
/// durable; callers rely on that for the local-first guarantee.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Returns the stored value, or `None` if the key was never written.
    async fn get(&self, key: &str) -> Result<Option<String>>;

    /// Stores `value` under `key`, replacing any previous value.
    async fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Removes `key`. Removing a missing key is not an error.
    async fn remove(&self, key: &str) -> Result<()>;
}
