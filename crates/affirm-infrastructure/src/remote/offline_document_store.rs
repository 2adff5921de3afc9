//! Remote stand-in used when no remote URL is configured.

use affirm_core::sync::{AuthToken, RemoteDocumentStore, RemoteWriteError};
use async_trait::async_trait;

/// A [`RemoteDocumentStore`] that refuses every write with
/// [`RemoteWriteError::Offline`], so all edits land in the retry queue until
/// a real remote is configured.
#[derive(Debug, Clone, Copy, Default)]
pub struct OfflineDocumentStore;

#[async_trait]
impl RemoteDocumentStore for OfflineDocumentStore {
    async fn write(
        &self,
        _collection: &str,
        _document_id: &str,
        _payload: &serde_json::Value,
        _token: &AuthToken,
    ) -> Result<(), RemoteWriteError> {
        Err(RemoteWriteError::Offline)
    }
}
