//! The canonical user profile.
//!
//! Local storage is the source of truth: every mutation is persisted before
//! it becomes visible in memory, and only then handed to the sync worker.
//! A failed local write fails the call; a failed remote write never does.

use std::sync::Arc;

use affirm_core::error::{AffirmError, Result};
use affirm_core::profile::{
    ManifestationGoal, NewGoal, Preferences, ProfilePatch, StatsDelta, UserProfile,
};
use affirm_core::storage::{KeyValueStore, USER_PROFILE_KEY};
use affirm_core::sync::SyncQueueEntry;
use chrono::Utc;
use parking_lot::RwLock;
use tokio::sync::Mutex;

use crate::retry_queue::RetryQueue;
use crate::sync_worker::SyncHandle;

pub struct ProfileStore {
    storage: Arc<dyn KeyValueStore>,
    queue: Arc<RetryQueue>,
    sync: SyncHandle,
    /// Last successfully persisted profile. `None` until `initialize`.
    current: RwLock<Option<UserProfile>>,
    /// Held across merge and persist so that persist order equals merge
    /// order, and so pushes reach the worker in that same order.
    write_lock: Mutex<()>,
}

impl ProfileStore {
    pub fn new(storage: Arc<dyn KeyValueStore>, queue: Arc<RetryQueue>, sync: SyncHandle) -> Self {
        Self {
            storage,
            queue,
            sync,
            current: RwLock::new(None),
            write_lock: Mutex::new(()),
        }
    }

    /// Loads the stored profile, or creates and persists a default one.
    ///
    /// Calling it again after success returns the in-memory profile without
    /// touching storage.
    pub async fn initialize(&self) -> Result<UserProfile> {
        let _guard = self.write_lock.lock().await;

        let existing = self.current.read().clone();
        if let Some(profile) = existing {
            return Ok(profile);
        }

        let profile = match self.storage.get(USER_PROFILE_KEY).await? {
            Some(raw) => {
                let profile: UserProfile = serde_json::from_str(&raw)?;
                tracing::info!("[ProfileStore] Loaded profile {}", profile.id);
                profile
            }
            None => {
                let profile = UserProfile::new(Utc::now());
                self.persist(&profile).await?;
                tracing::info!("[ProfileStore] Created profile {}", profile.id);
                profile
            }
        };

        *self.current.write() = Some(profile.clone());
        Ok(profile)
    }

    /// In-memory snapshot. No I/O.
    pub fn get(&self) -> Option<UserProfile> {
        self.current.read().clone()
    }

    pub fn is_initialized(&self) -> bool {
        self.current.read().is_some()
    }

    /// Shallow-merges `patch` into the profile, persists it and schedules a
    /// remote push.
    pub async fn update(&self, patch: ProfilePatch) -> Result<()> {
        self.mutate(|current| Ok((current.merged(patch), ()))).await
    }

    /// Appends a new goal and returns it.
    pub async fn add_goal(&self, new_goal: NewGoal) -> Result<ManifestationGoal> {
        if new_goal.title.trim().is_empty() {
            return Err(AffirmError::validation("goal title must not be empty"));
        }

        let goal = ManifestationGoal::create(new_goal, Utc::now());
        self.mutate(|current| {
            let mut goals = current.goals.clone();
            goals.push(goal.clone());
            Ok((current.merged(ProfilePatch::new().goals(goals)), goal))
        })
        .await
    }

    /// Edits a copy of the current preferences and writes the whole struct
    /// back, so untouched fields keep their values.
    pub async fn update_preferences<F>(&self, edit: F) -> Result<Preferences>
    where
        F: FnOnce(&mut Preferences),
    {
        self.mutate(|current| {
            let mut preferences = current.preferences.clone();
            edit(&mut preferences);
            let next = current.merged(ProfilePatch::new().preferences(preferences.clone()));
            Ok((next, preferences))
        })
        .await
    }

    /// Adds `delta` to the usage counters.
    pub async fn record_activity(&self, delta: StatsDelta) -> Result<()> {
        self.mutate(|current| {
            let stats = current.stats.with_delta(delta);
            Ok((current.merged(ProfilePatch::new().stats(stats)), ()))
        })
        .await
    }

    /// Marks a goal achieved. An already-achieved goal keeps its original
    /// `achieved_at`; the profile is still re-saved and pushed.
    pub async fn mark_goal_achieved(&self, goal_id: &str) -> Result<ManifestationGoal> {
        let now = Utc::now();
        self.mutate(|current| {
            let mut goals = current.goals.clone();
            let goal = goals
                .iter_mut()
                .find(|g| g.id == goal_id)
                .ok_or_else(|| AffirmError::not_found("ManifestationGoal", goal_id))?;
            goal.mark_achieved(now);
            let achieved = goal.clone();
            Ok((current.merged(ProfilePatch::new().goals(goals)), achieved))
        })
        .await
    }

    pub async fn upgrade_to_premium(&self) -> Result<()> {
        self.update(ProfilePatch::new().is_premium(true)).await
    }

    /// Signs out: forgets the profile, removes it from storage and drops any
    /// pending retries.
    ///
    /// Pushes already scheduled are allowed to finish first, so none of them
    /// can re-populate the retry queue afterwards.
    pub async fn reset(&self) -> Result<()> {
        let _guard = self.write_lock.lock().await;

        self.storage
            .remove(USER_PROFILE_KEY)
            .await
            .map_err(|e| into_persistence(USER_PROFILE_KEY, e))?;
        let forgotten = self.current.write().take();

        self.sync.flush().await;
        self.queue.clear().await?;

        if let Some(profile) = forgotten {
            tracing::info!("[ProfileStore] Reset profile {}", profile.id);
        }
        Ok(())
    }

    /// Runs one merge/persist/publish cycle.
    ///
    /// `change` computes the next profile from the current one. The in-memory
    /// profile is replaced only after the persist succeeds, so a failed write
    /// leaves the store exactly as it was. Every successful call is pushed,
    /// even when the profile did not change, so re-saving forces a sync.
    async fn mutate<T, F>(&self, change: F) -> Result<T>
    where
        F: FnOnce(&UserProfile) -> Result<(UserProfile, T)>,
    {
        let _guard = self.write_lock.lock().await;

        let current = self.current.read().clone().ok_or(AffirmError::NotInitialized)?;
        let (next, output) = change(&current)?;

        self.persist(&next).await?;
        *self.current.write() = Some(next.clone());

        if !self.sync.push(next.clone()) {
            self.queue_unsent(&next).await;
        }

        Ok(output)
    }

    /// The sync worker is gone; park the snapshot for the next replay.
    async fn queue_unsent(&self, profile: &UserProfile) {
        let entry = SyncQueueEntry::new(profile, Utc::now());
        if let Err(e) = self.queue.append(entry).await {
            tracing::error!(
                "[ProfileStore] Could not queue unsent sync for profile {}: {}",
                profile.id,
                e
            );
        }
    }

    async fn persist(&self, profile: &UserProfile) -> Result<()> {
        let raw = serde_json::to_string(profile)?;
        self.storage
            .set(USER_PROFILE_KEY, &raw)
            .await
            .map_err(|e| {
                tracing::error!("[ProfileStore] Failed to persist profile {}: {}", profile.id, e);
                into_persistence(USER_PROFILE_KEY, e)
            })
    }
}

fn into_persistence(key: &str, err: AffirmError) -> AffirmError {
    if err.is_persistence() {
        err
    } else {
        AffirmError::persistence(key, err.to_string())
    }
}
