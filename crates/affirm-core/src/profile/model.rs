//! UserProfile domain model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::goal::ManifestationGoal;
use super::patch::ProfilePatch;
use super::preferences::{Preferences, UserStats};

/// The canonical per-user aggregate.
///
/// `id` and `joined_at` are assigned once by [`UserProfile::new`] and have no
/// setter anywhere in the update path. Everything else is replaceable through
/// a [`ProfilePatch`].
///
/// Serialized as camelCase JSON (`avatarRef`, `joinedAt`, `isPremium`, ...),
/// which is both the local storage payload and the remote document body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub avatar_ref: Option<String>,
    /// Oldest first; new goals are appended.
    #[serde(default)]
    pub goals: Vec<ManifestationGoal>,
    pub joined_at: DateTime<Utc>,
    #[serde(default)]
    pub is_premium: bool,
    #[serde(default)]
    pub preferences: Preferences,
    #[serde(default)]
    pub stats: UserStats,
}

impl UserProfile {
    /// Creates a brand-new profile with a fresh id, default preferences and
    /// zeroed stats.
    pub fn new(joined_at: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name: String::new(),
            email: None,
            avatar_ref: None,
            goals: Vec::new(),
            joined_at,
            is_premium: false,
            preferences: Preferences::default(),
            stats: UserStats::default(),
        }
    }

    /// Returns a copy of `self` with `patch` shallow-merged on top.
    ///
    /// Nested structs (`preferences`, `stats`) and the goal list are replaced
    /// wholesale when present in the patch. `is_premium` never goes back to
    /// false once set.
    pub fn merged(&self, patch: ProfilePatch) -> Self {
        let mut next = self.clone();

        if let Some(name) = patch.name {
            next.name = name;
        }
        if let Some(email) = patch.email {
            next.email = email;
        }
        if let Some(avatar_ref) = patch.avatar_ref {
            next.avatar_ref = avatar_ref;
        }
        if let Some(goals) = patch.goals {
            next.goals = goals;
        }
        if let Some(is_premium) = patch.is_premium {
            next.is_premium = self.is_premium || is_premium;
        }
        if let Some(preferences) = patch.preferences {
            next.preferences = preferences;
        }
        if let Some(stats) = patch.stats {
            next.stats = stats;
        }

        next
    }

    pub fn goal(&self, goal_id: &str) -> Option<&ManifestationGoal> {
        self.goals.iter().find(|g| g.id == goal_id)
    }
}
