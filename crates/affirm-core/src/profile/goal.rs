//! Manifestation goals.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A goal owned by exactly one profile.
///
/// `is_achieved` only ever flips from false to true.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ManifestationGoal {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub target_date: Option<NaiveDate>,
    pub is_achieved: bool,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub achieved_at: Option<DateTime<Utc>>,
}

/// Caller-supplied fields for a new goal.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewGoal {
    pub title: String,
    pub description: Option<String>,
    pub category: Option<String>,
    pub target_date: Option<NaiveDate>,
}

impl NewGoal {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Default::default()
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn with_target_date(mut self, date: NaiveDate) -> Self {
        self.target_date = Some(date);
        self
    }
}

impl ManifestationGoal {
    /// Materializes a goal with a fresh id, created at `now`.
    pub fn create(new_goal: NewGoal, now: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            title: new_goal.title,
            description: new_goal.description,
            category: new_goal.category,
            target_date: new_goal.target_date,
            is_achieved: false,
            created_at: now,
            achieved_at: None,
        }
    }

    /// Marks the goal achieved. Already-achieved goals keep their original
    /// `achieved_at`.
    pub fn mark_achieved(&mut self, now: DateTime<Utc>) {
        if !self.is_achieved {
            self.is_achieved = true;
            self.achieved_at = Some(now);
        }
    }
}
