//! Sync configuration.
//!
//! Loaded from `config.toml` by the infrastructure layer; every field has a
//! default so an empty or missing file is valid.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::{AffirmError, Result};

/// Default remote collection holding one document per user.
pub const DEFAULT_COLLECTION: &str = "users";

/// Default retry queue bound.
pub const DEFAULT_MAX_QUEUE_LEN: usize = 10;

/// Default per-request timeout for the HTTP remote.
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 15;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SyncSettings {
    /// Remote collection name
    pub collection: String,
    /// Maximum number of queued failed syncs; the oldest are evicted first
    pub max_queue_len: usize,
    /// Base URL of the remote document store. `None` means offline mode.
    pub remote_url: Option<String>,
    /// Static identity token for the remote
    pub api_token: Option<String>,
    pub request_timeout_secs: u64,
    /// When set, the retry queue is replayed in the background at this interval
    pub retry_interval_secs: Option<u64>,
    /// Directory for the on-disk key-value store. `None` uses the platform
    /// data directory.
    pub storage_dir: Option<PathBuf>,
}

impl Default for SyncSettings {
    fn default() -> Self {
        Self {
            collection: DEFAULT_COLLECTION.to_string(),
            max_queue_len: DEFAULT_MAX_QUEUE_LEN,
            remote_url: None,
            api_token: None,
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            retry_interval_secs: None,
            storage_dir: None,
        }
    }
}

impl SyncSettings {
    pub fn with_max_queue_len(mut self, max_queue_len: usize) -> Self {
        self.max_queue_len = max_queue_len;
        self
    }

    pub fn with_remote_url(mut self, url: impl Into<String>) -> Self {
        self.remote_url = Some(url.into());
        self
    }

    pub fn with_api_token(mut self, token: impl Into<String>) -> Self {
        self.api_token = Some(token.into());
        self
    }

    pub fn with_storage_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.storage_dir = Some(dir.into());
        self
    }

    pub fn with_retry_interval(mut self, secs: u64) -> Self {
        self.retry_interval_secs = Some(secs);
        self
    }

    /// Rejects settings the sync layer cannot run with.
    pub fn validate(&self) -> Result<()> {
        if self.max_queue_len == 0 {
            return Err(AffirmError::config("max_queue_len must be at least 1"));
        }
        if self.collection.trim().is_empty() {
            return Err(AffirmError::config("collection must not be empty"));
        }
        if self.retry_interval_secs == Some(0) {
            return Err(AffirmError::config("retry_interval_secs must be positive"));
        }
        Ok(())
    }
}
