//! File-backed key-value store.
//!
//! Each key maps to `{dir}/{key}.json`. Writes go through [`AtomicFile`], so a
//! crash mid-write leaves the previous value intact.

use std::path::PathBuf;

use affirm_core::error::{AffirmError, Result};
use affirm_core::storage::KeyValueStore;
use async_trait::async_trait;

use super::atomic_file::AtomicFile;

/// On-disk [`KeyValueStore`] rooted at a directory.
///
/// Blocking file I/O runs on tokio's blocking pool.
///
/// # Example
///
/// ```ignore
/// let store = FileKeyValueStore::new("/tmp/affirm/store");
/// store.set("user_profile", "{}").await?;
/// ```
#[derive(Debug, Clone)]
pub struct FileKeyValueStore {
    dir: PathBuf,
}

impl FileKeyValueStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn file_for(&self, key: &str) -> Result<AtomicFile> {
        validate_key(key)?;
        Ok(AtomicFile::new(self.dir.join(format!("{}.json", key))))
    }
}

/// Keys become file names, so only a conservative character set is allowed.
fn validate_key(key: &str) -> Result<()> {
    let valid = !key.is_empty()
        && !key.starts_with('.')
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.'));

    if valid {
        Ok(())
    } else {
        Err(AffirmError::config(format!("invalid storage key '{}'", key)))
    }
}

async fn run_blocking<T, F>(f: F) -> Result<T>
where
    T: Send + 'static,
    F: FnOnce() -> Result<T> + Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| AffirmError::internal(format!("Failed to join task: {}", e)))?
}

#[async_trait]
impl KeyValueStore for FileKeyValueStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        let file = self.file_for(key)?;
        run_blocking(move || {
            file.load()
                .map_err(|e| AffirmError::io(format!("Failed to read {}: {}", file.path().display(), e)))
        })
        .await
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        let file = self.file_for(key)?;
        let key = key.to_string();
        let value = value.to_string();
        run_blocking(move || {
            file.save(&value)
                .map_err(|e| AffirmError::persistence(key, e.to_string()))
        })
        .await?;

        tracing::debug!("[FileKeyValueStore] Wrote key under {}", self.dir.display());
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<()> {
        let file = self.file_for(key)?;
        let key = key.to_string();
        run_blocking(move || {
            file.remove()
                .map_err(|e| AffirmError::persistence(key, e.to_string()))
        })
        .await
    }
}
