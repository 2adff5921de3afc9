//! Bounded, persisted queue of failed remote writes.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use affirm_core::error::Result;
use affirm_core::storage::{FAILED_SYNCS_KEY, KeyValueStore};
use affirm_core::sync::SyncQueueEntry;
use tokio::sync::Mutex;

/// What happened when an entry was appended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnqueueOutcome {
    /// Queue length after the append
    pub queue_len: usize,
    /// Oldest entries dropped to respect the bound. Each one is a failed sync
    /// that will never be replayed.
    pub evicted: Vec<SyncQueueEntry>,
}

/// The `failed_syncs` key, oldest entry first.
///
/// Every read-modify-write runs under one async mutex, so an enqueue landing
/// in the middle of a replay pass is never lost.
pub struct RetryQueue {
    storage: Arc<dyn KeyValueStore>,
    max_len: usize,
    lock: Mutex<()>,
    /// Length seen by the last successful load or save.
    known_len: AtomicUsize,
}

impl RetryQueue {
    /// Creates a queue over `storage`. A bound of zero is treated as one.
    pub fn new(storage: Arc<dyn KeyValueStore>, max_len: usize) -> Self {
        Self {
            storage,
            max_len: max_len.max(1),
            lock: Mutex::new(()),
            known_len: AtomicUsize::new(0),
        }
    }

    pub fn max_len(&self) -> usize {
        self.max_len
    }

    /// Returns a snapshot of the queued entries, oldest first.
    pub async fn entries(&self) -> Result<Vec<SyncQueueEntry>> {
        let _guard = self.lock.lock().await;
        self.load().await
    }

    /// Length as of the last successful read or write, for reporting when
    /// storage is unreadable.
    pub fn last_known_len(&self) -> usize {
        self.known_len.load(Ordering::SeqCst)
    }

    pub async fn len(&self) -> Result<usize> {
        Ok(self.entries().await?.len())
    }

    pub async fn is_empty(&self) -> Result<bool> {
        Ok(self.len().await? == 0)
    }

    /// Appends `entry`, evicting the oldest entries beyond the bound, and
    /// persists the result.
    pub async fn append(&self, entry: SyncQueueEntry) -> Result<EnqueueOutcome> {
        let _guard = self.lock.lock().await;
        let mut entries = self.load().await?;

        entries.push(entry);
        let overflow = entries.len().saturating_sub(self.max_len);
        let evicted: Vec<SyncQueueEntry> = entries.drain(..overflow).collect();

        self.save(&entries).await?;

        for dropped in &evicted {
            tracing::warn!(
                "[RetryQueue] Queue full ({}), dropped failed sync for profile {} queued at {}",
                self.max_len,
                dropped.profile_snapshot.id,
                dropped.queued_at.to_rfc3339()
            );
        }

        Ok(EnqueueOutcome {
            queue_len: entries.len(),
            evicted,
        })
    }

    /// Removes `delivered` entries (matched by value, first match each) and
    /// persists once. Entries added since `delivered` was read are kept.
    ///
    /// Returns the number of entries left in the queue.
    pub async fn remove_delivered(&self, delivered: &[SyncQueueEntry]) -> Result<usize> {
        let _guard = self.lock.lock().await;
        let mut entries = self.load().await?;
        if delivered.is_empty() {
            return Ok(entries.len());
        }

        for done in delivered {
            if let Some(pos) = entries.iter().position(|e| e == done) {
                entries.remove(pos);
            }
        }

        self.save(&entries).await?;
        Ok(entries.len())
    }

    /// Drops every queued entry.
    pub async fn clear(&self) -> Result<()> {
        let _guard = self.lock.lock().await;
        self.storage.remove(FAILED_SYNCS_KEY).await?;
        self.known_len.store(0, Ordering::SeqCst);
        Ok(())
    }

    async fn load(&self) -> Result<Vec<SyncQueueEntry>> {
        let Some(raw) = self.storage.get(FAILED_SYNCS_KEY).await? else {
            self.known_len.store(0, Ordering::SeqCst);
            return Ok(Vec::new());
        };

        let entries: Vec<SyncQueueEntry> = match serde_json::from_str(&raw) {
            Ok(entries) => entries,
            Err(e) => {
                // The live profile is authoritative; a corrupt queue only
                // loses pending retries.
                tracing::warn!("[RetryQueue] Discarding unreadable queue payload: {}", e);
                Vec::new()
            }
        };
        self.known_len.store(entries.len(), Ordering::SeqCst);
        Ok(entries)
    }

    async fn save(&self, entries: &[SyncQueueEntry]) -> Result<()> {
        let raw = serde_json::to_string(entries)?;
        self.storage.set(FAILED_SYNCS_KEY, &raw).await?;
        self.known_len.store(entries.len(), Ordering::SeqCst);
        Ok(())
    }
}
