//! Typed partial update for [`UserProfile`](super::UserProfile).

use super::goal::ManifestationGoal;
use super::preferences::{Preferences, UserStats};

/// A shallow partial update.
///
/// Every `Some` field replaces the corresponding top-level profile field.
/// `email` and `avatar_ref` are doubly optional so a patch can clear them.
/// There is intentionally no way to express a change to `id` or `joined_at`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfilePatch {
    pub name: Option<String>,
    pub email: Option<Option<String>>,
    pub avatar_ref: Option<Option<String>>,
    pub goals: Option<Vec<ManifestationGoal>>,
    pub is_premium: Option<bool>,
    pub preferences: Option<Preferences>,
    pub stats: Option<UserStats>,
}

impl ProfilePatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn email(mut self, email: Option<String>) -> Self {
        self.email = Some(email);
        self
    }

    pub fn avatar_ref(mut self, avatar_ref: Option<String>) -> Self {
        self.avatar_ref = Some(avatar_ref);
        self
    }

    pub fn goals(mut self, goals: Vec<ManifestationGoal>) -> Self {
        self.goals = Some(goals);
        self
    }

    pub fn is_premium(mut self, is_premium: bool) -> Self {
        self.is_premium = Some(is_premium);
        self
    }

    /// Replaces the whole preferences struct.
    pub fn preferences(mut self, preferences: Preferences) -> Self {
        self.preferences = Some(preferences);
        self
    }

    /// Replaces the whole stats struct.
    pub fn stats(mut self, stats: UserStats) -> Self {
        self.stats = Some(stats);
        self
    }
}
