//! Application service: console settings use-cases.

use anyhow::Result;

use crate::application::ports::ConfigStore;
use crate::domain::ConsoleConfig;

/// Load settings.
pub fn load_settings(store: &impl ConfigStore) -> Result<ConsoleConfig> {
    store.load()
}

/// Save settings.
pub fn save_settings(store: &impl ConfigStore, config: &ConsoleConfig) -> Result<()> {
    store.save(config)
}

/// Validate and persist one setting, returning the updated settings.
///
/// # Errors
///
/// Returns an error if the key or value is invalid (nothing is written), or
/// if the store cannot be read or written.
pub fn set_setting(store: &impl ConfigStore, key: &str, value: &str) -> Result<ConsoleConfig> {
    let mut config = store.load()?;
    config.set(key, value)?;
    save_settings(store, &config)?;
    tracing::info!(key, value, "setting saved");
    Ok(config)
}
