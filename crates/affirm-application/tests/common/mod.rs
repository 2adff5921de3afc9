//! Test doubles for the profile store's collaborators.

#![allow(dead_code)]

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use affirm_application::AffirmServices;
use affirm_core::config::SyncSettings;
use affirm_core::error::{AffirmError, Result};
use affirm_core::storage::KeyValueStore;
use affirm_core::sync::{AuthProvider, AuthToken, RemoteDocumentStore, RemoteWriteError};
use affirm_infrastructure::MemoryKeyValueStore;
use async_trait::async_trait;
use parking_lot::Mutex;

/// Remote document store with an on/off switch that records every accepted
/// document.
#[derive(Default)]
pub struct SwitchableRemote {
    offline: AtomicBool,
    attempts: AtomicUsize,
    accepted: Mutex<Vec<(String, String, serde_json::Value)>>,
}

impl SwitchableRemote {
    pub fn offline() -> Arc<Self> {
        let remote = Self::default();
        remote.offline.store(true, Ordering::SeqCst);
        Arc::new(remote)
    }

    pub fn online() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    pub fn attempts(&self) -> usize {
        self.attempts.load(Ordering::SeqCst)
    }

    /// `(collection, document_id, payload)` for every successful write.
    pub fn accepted(&self) -> Vec<(String, String, serde_json::Value)> {
        self.accepted.lock().clone()
    }
}

#[async_trait]
impl RemoteDocumentStore for SwitchableRemote {
    async fn write(
        &self,
        collection: &str,
        document_id: &str,
        payload: &serde_json::Value,
        _token: &AuthToken,
    ) -> std::result::Result<(), RemoteWriteError> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        if self.offline.load(Ordering::SeqCst) {
            return Err(RemoteWriteError::network("connection refused"));
        }
        self.accepted.lock().push((
            collection.to_string(),
            document_id.to_string(),
            payload.clone(),
        ));
        Ok(())
    }
}

/// Hands out a fresh token per call and counts the calls.
#[derive(Default)]
pub struct CountingAuth {
    calls: AtomicUsize,
}

impl CountingAuth {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl AuthProvider for CountingAuth {
    async fn identity_token(&self) -> std::result::Result<AuthToken, RemoteWriteError> {
        let n = self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(AuthToken::new(format!("token-{}", n)))
    }
}

/// In-memory storage whose writes can be made to fail.
#[derive(Clone, Default)]
pub struct FlakyStorage {
    inner: MemoryKeyValueStore,
    fail_writes: Arc<AtomicBool>,
    writes: Arc<AtomicUsize>,
}

impl FlakyStorage {
    pub fn over(inner: MemoryKeyValueStore) -> Self {
        Self {
            inner,
            ..Default::default()
        }
    }

    pub fn set_failing(&self, failing: bool) {
        self.fail_writes.store(failing, Ordering::SeqCst);
    }

    pub fn writes(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    pub fn inner(&self) -> &MemoryKeyValueStore {
        &self.inner
    }
}

#[async_trait]
impl KeyValueStore for FlakyStorage {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        self.inner.get(key).await
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(AffirmError::io("disk full"));
        }
        self.writes.fetch_add(1, Ordering::SeqCst);
        self.inner.set(key, value).await
    }

    async fn remove(&self, key: &str) -> Result<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(AffirmError::io("disk full"));
        }
        self.inner.remove(key).await
    }
}

pub struct Harness {
    pub services: AffirmServices,
    pub storage: FlakyStorage,
    pub remote: Arc<SwitchableRemote>,
    pub auth: Arc<CountingAuth>,
}

impl Harness {
    pub fn new(remote: Arc<SwitchableRemote>) -> Self {
        Self::over(MemoryKeyValueStore::new(), remote)
    }

    /// Builds services over existing storage, e.g. to simulate a restart.
    pub fn over(storage: MemoryKeyValueStore, remote: Arc<SwitchableRemote>) -> Self {
        let storage = FlakyStorage::over(storage);
        let auth = Arc::new(CountingAuth::default());
        let services = AffirmServices::build(
            &SyncSettings::default(),
            Arc::new(storage.clone()),
            remote.clone(),
            auth.clone(),
        )
        .expect("valid default settings");

        Self {
            services,
            storage,
            remote,
            auth,
        }
    }
}
