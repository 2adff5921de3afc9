//! User profile domain module.
//!
//! # Module Structure
//!
//! - `model`: the `UserProfile` aggregate
//! - `goal`: manifestation goals owned by a profile
//! - `preferences`: nested preference and stats structs
//! - `patch`: typed partial updates (shallow merge)
//!
//! # Usage
//!
//! ```ignore
//! use affirm_core::profile::{UserProfile, ProfilePatch};
//! ```

mod goal;
mod model;
mod patch;
mod preferences;

pub use goal::{ManifestationGoal, NewGoal};
pub use model::UserProfile;
pub use patch::ProfilePatch;
pub use preferences::{
    DisplayPreferences, NotificationPreferences, Preferences, PrivacyPreferences, StatsDelta,
    Theme, UserStats,
};
