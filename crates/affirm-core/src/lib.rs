//! Domain layer for Affirm's local-first profile store.
//!
//! - [`profile`]: the `UserProfile` aggregate, goals, preferences and patches
//! - [`storage`]: on-device key-value storage contract and reserved keys
//! - [`sync`]: remote document store, auth and retry queue types
//! - [`config`]: sync settings
//! - [`error`]: shared error type

pub mod config;
pub mod error;
pub mod profile;
pub mod storage;
pub mod sync;

pub use error::{AffirmError, Result};
