//! Mirrors the profile to the remote document store.
//!
//! Sync is best effort and last-write-wins: every push sends the whole
//! document, and a failed push is parked in the [`RetryQueue`] instead of
//! being reported to the caller.

use std::sync::Arc;

use affirm_core::error::Result;
use affirm_core::profile::UserProfile;
use affirm_core::sync::{
    AuthProvider, AuthToken, PushOutcome, RemoteDocumentStore, RemoteWriteError, SyncQueueEntry,
};
use chrono::Utc;
use tokio::sync::Mutex;

use crate::retry_queue::{EnqueueOutcome, RetryQueue};

pub struct SyncCoordinator {
    remote: Arc<dyn RemoteDocumentStore>,
    auth: Arc<dyn AuthProvider>,
    queue: Arc<RetryQueue>,
    collection: String,
    /// Identity token, fetched on the first push and dropped when the remote
    /// refuses it.
    token: Mutex<Option<AuthToken>>,
}

impl SyncCoordinator {
    pub fn new(
        remote: Arc<dyn RemoteDocumentStore>,
        auth: Arc<dyn AuthProvider>,
        queue: Arc<RetryQueue>,
        collection: impl Into<String>,
    ) -> Self {
        Self {
            remote,
            auth,
            queue,
            collection: collection.into(),
            token: Mutex::new(None),
        }
    }

    /// Attempts one remote write of `profile`; queues a snapshot on failure.
    ///
    /// Never fails from the caller's point of view. The returned outcome is
    /// for logging and tests.
    pub async fn push(&self, profile: &UserProfile) -> PushOutcome {
        let reason = match self.write_remote(profile).await {
            Ok(()) => {
                tracing::debug!("[SyncCoordinator] Synced profile {}", profile.id);
                return PushOutcome::Synced;
            }
            Err(reason) => reason,
        };

        tracing::warn!(
            "[SyncCoordinator] Push for profile {} failed, queueing for retry: {}",
            profile.id,
            reason
        );

        match self.enqueue_failed(profile).await {
            Ok(outcome) => PushOutcome::Queued {
                queue_len: outcome.queue_len,
                evicted: outcome.evicted.len(),
                reason,
            },
            Err(e) => {
                tracing::error!(
                    "[SyncCoordinator] Could not record failed sync for profile {}: {}",
                    profile.id,
                    e
                );
                PushOutcome::Dropped { reason }
            }
        }
    }

    /// Appends a snapshot of `profile` to the retry queue.
    pub async fn enqueue_failed(&self, profile: &UserProfile) -> Result<EnqueueOutcome> {
        self.queue
            .append(SyncQueueEntry::new(profile, Utc::now()))
            .await
    }

    /// One remote write of the full document, keyed by `profile.id`.
    ///
    /// Shared with the retry drain so replays go through exactly the same
    /// path, including token handling.
    pub(crate) async fn write_remote(
        &self,
        profile: &UserProfile,
    ) -> std::result::Result<(), RemoteWriteError> {
        let token = self.token().await?;
        let payload = serde_json::to_value(profile)
            .map_err(|e| RemoteWriteError::Serialization(e.to_string()))?;

        let result = self
            .remote
            .write(&self.collection, &profile.id, &payload, &token)
            .await;

        if let Err(e) = &result {
            if e.is_auth() {
                tracing::info!("[SyncCoordinator] Remote refused identity token, will re-authenticate");
                *self.token.lock().await = None;
            }
        }

        result
    }

    async fn token(&self) -> std::result::Result<AuthToken, RemoteWriteError> {
        let mut cached = self.token.lock().await;
        if let Some(token) = cached.as_ref() {
            return Ok(token.clone());
        }

        let token = self.auth.identity_token().await?;
        tracing::debug!("[SyncCoordinator] Obtained identity token");
        *cached = Some(token.clone());
        Ok(token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use affirm_infrastructure::{MemoryKeyValueStore, OfflineDocumentStore, StaticTokenProvider};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

    /// Remote that records writes and can be told to refuse tokens.
    #[derive(Default)]
    struct RecordingRemote {
        reject_auth: AtomicBool,
        writes: AtomicUsize,
        last_collection: parking_lot::Mutex<Option<String>>,
    }

    #[async_trait]
    impl RemoteDocumentStore for RecordingRemote {
        async fn write(
            &self,
            collection: &str,
            _document_id: &str,
            _payload: &serde_json::Value,
            _token: &AuthToken,
        ) -> std::result::Result<(), RemoteWriteError> {
            self.writes.fetch_add(1, Ordering::SeqCst);
            *self.last_collection.lock() = Some(collection.to_string());
            if self.reject_auth.load(Ordering::SeqCst) {
                return Err(RemoteWriteError::unauthenticated("expired"));
            }
            Ok(())
        }
    }

    /// Auth provider counting how often a token is requested.
    #[derive(Default)]
    struct CountingAuth {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl AuthProvider for CountingAuth {
        async fn identity_token(&self) -> std::result::Result<AuthToken, RemoteWriteError> {
            let n = self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(AuthToken::new(format!("token-{}", n)))
        }
    }

    fn queue() -> Arc<RetryQueue> {
        Arc::new(RetryQueue::new(Arc::new(MemoryKeyValueStore::new()), 10))
    }

    #[tokio::test]
    async fn test_successful_push_does_not_queue() {
        let remote = Arc::new(RecordingRemote::default());
        let queue = queue();
        let coordinator = SyncCoordinator::new(
            remote.clone(),
            Arc::new(CountingAuth::default()),
            queue.clone(),
            "users",
        );

        let outcome = coordinator.push(&UserProfile::new(Utc::now())).await;

        assert!(outcome.is_synced());
        assert!(queue.is_empty().await.unwrap());
        assert_eq!(remote.last_collection.lock().as_deref(), Some("users"));
    }

    #[tokio::test]
    async fn test_failed_push_queues_snapshot() {
        let queue = queue();
        let coordinator = SyncCoordinator::new(
            Arc::new(OfflineDocumentStore),
            Arc::new(CountingAuth::default()),
            queue.clone(),
            "users",
        );
        let profile = UserProfile::new(Utc::now());

        let outcome = coordinator.push(&profile).await;

        assert_eq!(
            outcome,
            PushOutcome::Queued {
                queue_len: 1,
                evicted: 0,
                reason: RemoteWriteError::Offline
            }
        );
        let entries = queue.entries().await.unwrap();
        assert_eq!(entries[0].profile_snapshot, profile);
    }

    #[tokio::test]
    async fn test_missing_token_counts_as_failure() {
        let remote = Arc::new(RecordingRemote::default());
        let queue = queue();
        let coordinator = SyncCoordinator::new(
            remote.clone(),
            Arc::new(StaticTokenProvider::new(None)),
            queue.clone(),
            "users",
        );

        let outcome = coordinator.push(&UserProfile::new(Utc::now())).await;

        assert!(matches!(
            outcome,
            PushOutcome::Queued { reason: RemoteWriteError::Unauthenticated(_), .. }
        ));
        assert_eq!(remote.writes.load(Ordering::SeqCst), 0);
        assert_eq!(queue.len().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_token_is_cached_until_rejected() {
        let remote = Arc::new(RecordingRemote::default());
        let auth = Arc::new(CountingAuth::default());
        let coordinator =
            SyncCoordinator::new(remote.clone(), auth.clone(), queue(), "users");
        let profile = UserProfile::new(Utc::now());

        coordinator.push(&profile).await;
        coordinator.push(&profile).await;
        assert_eq!(auth.calls.load(Ordering::SeqCst), 1);

        remote.reject_auth.store(true, Ordering::SeqCst);
        coordinator.push(&profile).await;
        remote.reject_auth.store(false, Ordering::SeqCst);
        coordinator.push(&profile).await;

        assert_eq!(auth.calls.load(Ordering::SeqCst), 2);
    }
}
