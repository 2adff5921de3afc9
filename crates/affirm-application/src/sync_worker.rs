//! Background task that performs pushes off the caller's path.
//!
//! The profile store hands each persisted snapshot to a [`SyncHandle`] and
//! returns immediately. A single worker drains the channel in order, so the
//! remote sees writes in the same order they were persisted.

use std::sync::Arc;

use affirm_core::profile::UserProfile;
use affirm_core::sync::PushOutcome;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;

use crate::sync_coordinator::SyncCoordinator;

enum SyncCommand {
    Push(Box<UserProfile>),
    /// Acknowledged once every command sent before it has been handled.
    Flush(oneshot::Sender<()>),
}

/// Cheap, cloneable sender side of the sync worker.
#[derive(Clone)]
pub struct SyncHandle {
    tx: mpsc::UnboundedSender<SyncCommand>,
}

impl SyncHandle {
    /// Schedules a push of `profile`.
    ///
    /// Returns `false` when the worker is gone; the snapshot is then lost to
    /// sync, but the local write has already happened.
    pub fn push(&self, profile: UserProfile) -> bool {
        let sent = self.tx.send(SyncCommand::Push(Box::new(profile))).is_ok();
        if !sent {
            tracing::warn!("[SyncWorker] Worker stopped, push not scheduled");
        }
        sent
    }

    /// Waits until every push scheduled before this call has completed
    /// (synced or queued).
    pub async fn flush(&self) {
        let (ack_tx, ack_rx) = oneshot::channel();
        if self.tx.send(SyncCommand::Flush(ack_tx)).is_err() {
            return;
        }
        // A dropped ack means the worker stopped; nothing left to wait for.
        let _ = ack_rx.await;
    }
}

pub struct SyncWorker;

impl SyncWorker {
    /// Spawns the worker on the current runtime.
    pub fn spawn(coordinator: Arc<SyncCoordinator>) -> (SyncHandle, JoinHandle<()>) {
        Self::spawn_inner(coordinator, None)
    }

    /// Like [`SyncWorker::spawn`], additionally reporting every push outcome
    /// on `events`.
    pub fn spawn_with_events(
        coordinator: Arc<SyncCoordinator>,
        events: mpsc::UnboundedSender<PushOutcome>,
    ) -> (SyncHandle, JoinHandle<()>) {
        Self::spawn_inner(coordinator, Some(events))
    }

    fn spawn_inner(
        coordinator: Arc<SyncCoordinator>,
        events: Option<mpsc::UnboundedSender<PushOutcome>>,
    ) -> (SyncHandle, JoinHandle<()>) {
        let (tx, mut rx) = mpsc::unbounded_channel();

        let task = tokio::spawn(async move {
            tracing::debug!("[SyncWorker] Started");
            while let Some(command) = rx.recv().await {
                match command {
                    SyncCommand::Push(profile) => {
                        let outcome = coordinator.push(&profile).await;
                        if let Some(events) = &events {
                            // Receiver may have been dropped; outcomes are advisory.
                            let _ = events.send(outcome);
                        }
                    }
                    SyncCommand::Flush(ack) => {
                        let _ = ack.send(());
                    }
                }
            }
            tracing::debug!("[SyncWorker] All handles dropped, stopping");
        });

        (SyncHandle { tx }, task)
    }
}
