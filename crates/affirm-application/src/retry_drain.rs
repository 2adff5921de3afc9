//! Replays queued failed writes against the remote.

use std::sync::Arc;
use std::time::Duration;

use affirm_core::sync::ReplayReport;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;

use crate::retry_queue::RetryQueue;
use crate::sync_coordinator::SyncCoordinator;

pub struct RetryDrain {
    coordinator: Arc<SyncCoordinator>,
    queue: Arc<RetryQueue>,
    /// One pass at a time; a second caller waits for the first to finish.
    replay_lock: Mutex<()>,
}

impl RetryDrain {
    pub fn new(coordinator: Arc<SyncCoordinator>, queue: Arc<RetryQueue>) -> Self {
        Self {
            coordinator,
            queue,
            replay_lock: Mutex::new(()),
        }
    }

    /// Retries every queued entry, oldest first.
    ///
    /// All entries are attempted even after a failure. Delivered entries are
    /// removed in a single write; failed ones stay in place without being
    /// re-enqueued. Never returns an error: if the queue cannot be read or
    /// rewritten the pass reports zero successes, and `remaining` is the last
    /// length the queue was known to have.
    pub async fn replay(&self) -> ReplayReport {
        let _pass = self.replay_lock.lock().await;

        let entries = match self.queue.entries().await {
            Ok(entries) => entries,
            Err(e) => {
                let remaining = self.queue.last_known_len();
                tracing::error!(
                    "[RetryDrain] Could not read retry queue, {} entries as of last read: {}",
                    remaining,
                    e
                );
                return ReplayReport {
                    succeeded: 0,
                    remaining,
                };
            }
        };

        if entries.is_empty() {
            return ReplayReport::default();
        }

        tracing::info!("[RetryDrain] Replaying {} queued sync(s)", entries.len());

        let mut delivered = Vec::new();
        for entry in &entries {
            match self.coordinator.write_remote(&entry.profile_snapshot).await {
                Ok(()) => delivered.push(entry.clone()),
                Err(e) => tracing::debug!(
                    "[RetryDrain] Entry queued at {} still failing: {}",
                    entry.queued_at.to_rfc3339(),
                    e
                ),
            }
        }

        match self.queue.remove_delivered(&delivered).await {
            Ok(remaining) => {
                tracing::info!(
                    "[RetryDrain] Replay finished: {} delivered, {} remaining",
                    delivered.len(),
                    remaining
                );
                ReplayReport {
                    succeeded: delivered.len(),
                    remaining,
                }
            }
            Err(e) => {
                // Delivered entries stay queued and will be sent again;
                // last-write-wins makes that harmless.
                tracing::error!("[RetryDrain] Could not rewrite retry queue: {}", e);
                ReplayReport {
                    succeeded: 0,
                    remaining: entries.len(),
                }
            }
        }
    }

    /// Runs [`RetryDrain::replay`] every `period` until the task is aborted.
    ///
    /// The first pass runs immediately.
    pub fn spawn_periodic(self: Arc<Self>, period: Duration) -> JoinHandle<()> {
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                let report = self.replay().await;
                if report.succeeded > 0 || report.remaining > 0 {
                    tracing::debug!(
                        "[RetryDrain] Periodic pass: {} delivered, {} remaining",
                        report.succeeded,
                        report.remaining
                    );
                }
            }
        })
    }
}
