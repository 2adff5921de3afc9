//! In-process key-value store for tests and ephemeral runs.

use std::collections::HashMap;
use std::sync::Arc;

use affirm_core::error::Result;
use affirm_core::storage::KeyValueStore;
use async_trait::async_trait;
use tokio::sync::RwLock;

/// [`KeyValueStore`] backed by a shared map.
///
/// Clones share the same map, which lets a test "restart" the app by building
/// a new profile store over a clone of the same storage.
#[derive(Debug, Clone, Default)]
pub struct MemoryKeyValueStore {
    entries: Arc<RwLock<HashMap<String, String>>>,
}

impl MemoryKeyValueStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}

#[async_trait]
impl KeyValueStore for MemoryKeyValueStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.read().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        self.entries
            .write()
            .await
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<()> {
        self.entries.write().await.remove(key);
        Ok(())
    }
}
