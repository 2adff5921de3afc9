//! Retry queue entry.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::profile::UserProfile;

/// One failed remote write, waiting for replay.
///
/// Holds an owned copy of the profile taken at failure time, so later edits
/// to the live profile never alter a queued entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncQueueEntry {
    pub profile_snapshot: UserProfile,
    pub queued_at: DateTime<Utc>,
}

impl SyncQueueEntry {
    pub fn new(profile: &UserProfile, queued_at: DateTime<Utc>) -> Self {
        Self {
            profile_snapshot: profile.clone(),
            queued_at,
        }
    }
}
