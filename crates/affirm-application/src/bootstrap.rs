//! Composition root.
//!
//! Wires storage, remote and identity collaborators into one set of services.
//! Nothing here is global: callers own the returned [`AffirmServices`] and
//! pass references to whoever needs them.

use std::sync::Arc;
use std::time::Duration;

use affirm_core::config::SyncSettings;
use affirm_core::error::Result;
use affirm_core::storage::KeyValueStore;
use affirm_core::sync::{AuthProvider, RemoteDocumentStore};
use affirm_infrastructure::{
    AffirmPaths, FileKeyValueStore, HttpDocumentStore, OfflineDocumentStore, StaticTokenProvider,
};
use tokio::task::JoinHandle;

use crate::profile_store::ProfileStore;
use crate::retry_drain::RetryDrain;
use crate::retry_queue::RetryQueue;
use crate::sync_coordinator::SyncCoordinator;
use crate::sync_worker::{SyncHandle, SyncWorker};

pub struct AffirmServices {
    pub store: Arc<ProfileStore>,
    pub coordinator: Arc<SyncCoordinator>,
    pub drain: Arc<RetryDrain>,
    pub queue: Arc<RetryQueue>,
    pub sync: SyncHandle,
    worker: JoinHandle<()>,
    periodic: Option<JoinHandle<()>>,
}

impl AffirmServices {
    /// Builds the services over injected collaborators.
    ///
    /// Must be called inside a tokio runtime; the sync worker (and the
    /// periodic replay, when `retry_interval_secs` is set) are spawned here.
    pub fn build(
        settings: &SyncSettings,
        storage: Arc<dyn KeyValueStore>,
        remote: Arc<dyn RemoteDocumentStore>,
        auth: Arc<dyn AuthProvider>,
    ) -> Result<Self> {
        settings.validate()?;

        let queue = Arc::new(RetryQueue::new(storage.clone(), settings.max_queue_len));
        let coordinator = Arc::new(SyncCoordinator::new(
            remote,
            auth,
            queue.clone(),
            settings.collection.clone(),
        ));
        let (sync, worker) = SyncWorker::spawn(coordinator.clone());
        let store = Arc::new(ProfileStore::new(storage, queue.clone(), sync.clone()));
        let drain = Arc::new(RetryDrain::new(coordinator.clone(), queue.clone()));

        let periodic = settings.retry_interval_secs.map(|secs| {
            tracing::info!("[Bootstrap] Replaying failed syncs every {}s", secs);
            drain.clone().spawn_periodic(Duration::from_secs(secs))
        });

        Ok(Self {
            store,
            coordinator,
            drain,
            queue,
            sync,
            worker,
            periodic,
        })
    }

    /// Builds the services from settings: file storage under the configured
    /// (or platform) store directory, the HTTP remote when a URL is set and
    /// the offline stand-in otherwise.
    pub fn from_settings(settings: &SyncSettings, paths: &AffirmPaths) -> Result<Self> {
        let store_dir = match &settings.storage_dir {
            Some(dir) => dir.clone(),
            None => paths.store_dir()?,
        };
        tracing::debug!("[Bootstrap] Store directory: {}", store_dir.display());
        let storage: Arc<dyn KeyValueStore> = Arc::new(FileKeyValueStore::new(store_dir));

        let remote: Arc<dyn RemoteDocumentStore> = match &settings.remote_url {
            Some(url) => {
                tracing::info!("[Bootstrap] Remote document store: {}", url);
                Arc::new(HttpDocumentStore::new(
                    url,
                    Duration::from_secs(settings.request_timeout_secs),
                )?)
            }
            None => {
                tracing::info!("[Bootstrap] No remote configured, edits will be queued");
                Arc::new(OfflineDocumentStore)
            }
        };

        let tokens = StaticTokenProvider::new(settings.api_token.clone());
        if settings.remote_url.is_some() && !tokens.has_token() {
            tracing::warn!("[Bootstrap] Remote configured without an API token, pushes will be queued");
        }
        let auth: Arc<dyn AuthProvider> = Arc::new(tokens);

        Self::build(settings, storage, remote, auth)
    }

    /// Stops background tasks after letting scheduled pushes finish.
    pub async fn shutdown(self) {
        self.sync.flush().await;
        if let Some(periodic) = self.periodic {
            periodic.abort();
        }
        self.worker.abort();
        tracing::debug!("[Bootstrap] Services stopped");
    }
}
