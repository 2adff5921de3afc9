//! Nested profile structs: preferences and usage stats.
//!
//! Both are replaced wholesale by a [`ProfilePatch`](super::ProfilePatch);
//! callers that want to change a single toggle read the current value,
//! modify it and supply the whole struct.

use chrono::NaiveTime;
use serde::{Deserialize, Serialize};

/// Colour theme selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Light,
    Dark,
    #[default]
    System,
}

/// Reminder toggles and the time of day they fire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationPreferences {
    pub daily_reminder: bool,
    /// Local time of day for the daily reminder
    pub reminder_time: NaiveTime,
    pub affirmation_reminders: bool,
    pub journal_reminders: bool,
}

impl Default for NotificationPreferences {
    fn default() -> Self {
        Self {
            daily_reminder: true,
            reminder_time: NaiveTime::from_hms_opt(9, 0, 0).unwrap_or(NaiveTime::MIN),
            affirmation_reminders: true,
            journal_reminders: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrivacyPreferences {
    pub analytics_enabled: bool,
    pub share_progress: bool,
}

impl Default for PrivacyPreferences {
    fn default() -> Self {
        Self {
            analytics_enabled: true,
            share_progress: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DisplayPreferences {
    pub show_streak: bool,
    pub haptics_enabled: bool,
    pub reduced_motion: bool,
}

impl Default for DisplayPreferences {
    fn default() -> Self {
        Self {
            show_streak: true,
            haptics_enabled: true,
            reduced_motion: false,
        }
    }
}

/// User-facing configuration stored on the profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct Preferences {
    pub theme: Theme,
    pub notifications: NotificationPreferences,
    pub privacy: PrivacyPreferences,
    pub display: DisplayPreferences,
}

/// Usage counters. Only ever grow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct UserStats {
    pub total_sessions: u32,
    pub streak_days: u32,
    pub journal_entries: u32,
    pub visualization_minutes: u32,
}

/// Additive increments for [`UserStats`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StatsDelta {
    pub sessions: u32,
    pub streak_days: u32,
    pub journal_entries: u32,
    pub visualization_minutes: u32,
}

impl UserStats {
    /// Returns a copy with `delta` added. Counters saturate instead of wrapping.
    pub fn with_delta(self, delta: StatsDelta) -> Self {
        Self {
            total_sessions: self.total_sessions.saturating_add(delta.sessions),
            streak_days: self.streak_days.saturating_add(delta.streak_days),
            journal_entries: self.journal_entries.saturating_add(delta.journal_entries),
            visualization_minutes: self
                .visualization_minutes
                .saturating_add(delta.visualization_minutes),
        }
    }

    pub fn is_zero(&self) -> bool {
        *self == Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_reminder_time() {
        let prefs = NotificationPreferences::default();
        assert_eq!(prefs.reminder_time, NaiveTime::from_hms_opt(9, 0, 0).unwrap());
    }

    #[test]
    fn test_stats_with_delta_saturates() {
        let stats = UserStats {
            total_sessions: u32::MAX,
            ..Default::default()
        };
        let next = stats.with_delta(StatsDelta {
            sessions: 1,
            journal_entries: 2,
            ..Default::default()
        });
        assert_eq!(next.total_sessions, u32::MAX);
        assert_eq!(next.journal_entries, 2);
        assert!(!next.is_zero());
    }

    #[test]
    fn test_preferences_json_is_camel_case() {
        let json = serde_json::to_value(Preferences::default()).unwrap();
        assert_eq!(json["theme"], "system");
        assert_eq!(json["notifications"]["dailyReminder"], true);
        assert_eq!(json["notifications"]["reminderTime"], "09:00:00");
        assert_eq!(json["display"]["showStreak"], true);
    }
}
