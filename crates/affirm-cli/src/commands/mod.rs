pub mod profile;
pub mod sync;

use affirm_application::AffirmServices;
use affirm_infrastructure::{AffirmPaths, ConfigStorage};
use anyhow::{Context, Result};

/// Loads settings (file, then environment overrides) and wires the services.
pub fn open(paths: &AffirmPaths) -> Result<AffirmServices> {
    let config = ConfigStorage::new(paths.config_file()?);
    let settings = config
        .load_with_env()
        .with_context(|| format!("Failed to load {}", config.path().display()))?;
    tracing::debug!("[CLI] Settings loaded from {}", config.path().display());

    let services = AffirmServices::from_settings(&settings, paths)?;
    Ok(services)
}
