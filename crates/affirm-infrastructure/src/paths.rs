//! Unified path management for affirm configuration and data files.
//!
//! # Directory Structure
//!
//! ```text
//! ~/.config/affirm/            # Config directory
//! └── config.toml              # Sync settings
//!
//! ~/.local/share/affirm/       # Data directory
//! ├── store/                   # FileKeyValueStore (user_profile.json, failed_syncs.json)
//! └── logs/                    # CLI logs
//!     └── affirm.log.YYYY-MM-DD
//! ```
//!
//! Passing a base directory (tests, portable installs) places both trees
//! under it instead.

use std::path::{Path, PathBuf};

use affirm_core::error::{AffirmError, Result};

const APP_DIR_NAME: &str = "affirm";

/// Path resolver for affirm.
#[derive(Debug, Clone, Default)]
pub struct AffirmPaths {
    base: Option<PathBuf>,
}

impl AffirmPaths {
    /// Creates a resolver. `None` uses the platform directories.
    pub fn new(base: Option<&Path>) -> Self {
        Self {
            base: base.map(Path::to_path_buf),
        }
    }

    /// Returns the configuration directory (e.g. `~/.config/affirm/`).
    pub fn config_dir(&self) -> Result<PathBuf> {
        match &self.base {
            Some(base) => Ok(base.join("config")),
            None => dirs::config_dir()
                .map(|dir| dir.join(APP_DIR_NAME))
                .ok_or_else(|| AffirmError::config("Cannot find config directory")),
        }
    }

    /// Returns the data directory (e.g. `~/.local/share/affirm/`).
    pub fn data_dir(&self) -> Result<PathBuf> {
        match &self.base {
            Some(base) => Ok(base.join("data")),
            None => dirs::data_local_dir()
                .map(|dir| dir.join(APP_DIR_NAME))
                .ok_or_else(|| AffirmError::config("Cannot find data directory")),
        }
    }

    pub fn config_file(&self) -> Result<PathBuf> {
        Ok(self.config_dir()?.join("config.toml"))
    }

    /// Directory holding the on-disk key-value store.
    pub fn store_dir(&self) -> Result<PathBuf> {
        Ok(self.data_dir()?.join("store"))
    }

    pub fn log_dir(&self) -> Result<PathBuf> {
        Ok(self.data_dir()?.join("logs"))
    }
}
