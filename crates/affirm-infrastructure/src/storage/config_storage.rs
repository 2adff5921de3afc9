//! Sync settings file storage (config.toml).

use std::path::PathBuf;

use affirm_core::config::SyncSettings;
use affirm_core::error::{AffirmError, Result};

use super::atomic_file::AtomicFile;

/// Environment variable overriding `remote_url`.
pub const ENV_REMOTE_URL: &str = "AFFIRM_REMOTE_URL";

/// Environment variable overriding `api_token`.
pub const ENV_API_TOKEN: &str = "AFFIRM_API_TOKEN";

/// Loads and saves [`SyncSettings`] as TOML.
///
/// Responsibilities:
/// - Missing or empty file → default settings
/// - Environment overrides for the remote URL and token
/// - Validation before handing settings to the application layer
///
/// Does NOT:
/// - Watch the file for changes
pub struct ConfigStorage {
    file: AtomicFile,
}

impl ConfigStorage {
    pub fn new(path: PathBuf) -> Self {
        Self {
            file: AtomicFile::new(path),
        }
    }

    pub fn path(&self) -> PathBuf {
        self.file.path().to_path_buf()
    }

    /// Loads settings from the file only.
    pub fn load(&self) -> Result<SyncSettings> {
        let content = self
            .file
            .load()
            .map_err(|e| AffirmError::io(format!("Failed to read config: {}", e)))?;

        let settings = match content {
            Some(content) if !content.trim().is_empty() => toml::from_str(&content)?,
            _ => SyncSettings::default(),
        };

        settings.validate()?;
        Ok(settings)
    }

    /// Loads settings and applies `AFFIRM_*` environment overrides.
    pub fn load_with_env(&self) -> Result<SyncSettings> {
        let settings = self.load()?;
        Ok(apply_overrides(settings, |name| std::env::var(name).ok()))
    }

    pub fn save(&self, settings: &SyncSettings) -> Result<()> {
        settings.validate()?;
        let content = toml::to_string_pretty(settings)?;
        self.file
            .save(&content)
            .map_err(|e| AffirmError::io(format!("Failed to write config: {}", e)))
    }
}

/// Applies overrides from `lookup` (normally the process environment).
///
/// Empty values are ignored.
pub fn apply_overrides<F>(mut settings: SyncSettings, lookup: F) -> SyncSettings
where
    F: Fn(&str) -> Option<String>,
{
    let non_empty = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

    if let Some(url) = non_empty(ENV_REMOTE_URL) {
        tracing::debug!("[ConfigStorage] Using remote URL from {}", ENV_REMOTE_URL);
        settings.remote_url = Some(url);
    }
    if let Some(token) = non_empty(ENV_API_TOKEN) {
        tracing::debug!("[ConfigStorage] Using API token from {}", ENV_API_TOKEN);
        settings.api_token = Some(token);
    }

    settings
}
