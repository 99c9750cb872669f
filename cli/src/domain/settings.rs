//! Console settings stored in `~/.fleet/config.yaml`.
//!
//! Pure functions only. No I/O, no async, no filesystem access.

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::domain::error::SettingsError;

// ── Constants ────────────────────────────────────────────────────────────────

pub const VALID_SETTING_KEYS: &[&str] = &[
    "server.address",
    "server.api_prefix",
    "server.service",
    "server.timeout_secs",
];

const MAX_TIMEOUT_SECS: u64 = 600;

// ── Settings schema ──────────────────────────────────────────────────────────

/// Top-level console settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ConsoleConfig {
    /// Where the config server lives and how actions are routed.
    #[serde(default)]
    pub server: ServerConfig,
}

/// Config server endpoint settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Base address, e.g. `http://127.0.0.1:8899`.
    pub address: String,
    /// Path prefix in front of the service, `api/v1` by default.
    pub api_prefix: String,
    /// Service segment every action is routed under.
    pub service: String,
    /// Per-request timeout.
    pub timeout_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            address: "http://127.0.0.1:8899".to_string(),
            api_prefix: "api/v1".to_string(),
            service: "User".to_string(),
            timeout_secs: 30,
        }
    }
}

impl ConsoleConfig {
    /// Current value of a setting, rendered as text.
    pub fn get(&self, key: &str) -> Result<String> {
        validate_setting_key(key)?;
        Ok(match key {
            "server.address" => self.server.address.clone(),
            "server.api_prefix" => self.server.api_prefix.clone(),
            "server.service" => self.server.service.clone(),
            _ => self.server.timeout_secs.to_string(),
        })
    }

    /// Validate and assign one setting.
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        validate_setting_key(key)?;
        validate_setting_value(key, value)?;
        match key {
            "server.address" => self.server.address = value.trim_end_matches('/').to_string(),
            "server.api_prefix" => self.server.api_prefix = value.trim_matches('/').to_string(),
            "server.service" => self.server.service = value.to_string(),
            _ => self.server.timeout_secs = value.parse()?,
        }
        Ok(())
    }
}

// ── Validators ───────────────────────────────────────────────────────────────

/// Validates a setting key against the whitelist.
///
/// # Errors
///
/// Returns an error if the key is not in the allowed list.
pub fn validate_setting_key(key: &str) -> Result<()> {
    if !VALID_SETTING_KEYS.contains(&key) {
        return Err(SettingsError::UnknownKey {
            key: key.to_string(),
            valid: VALID_SETTING_KEYS.join(", "),
        }
        .into());
    }
    Ok(())
}

/// Validates a setting value for the given key.
///
/// # Errors
///
/// Returns an error if the value is not valid for the key.
pub fn validate_setting_value(key: &str, value: &str) -> Result<()> {
    let hint = match key {
        "server.address" if !(value.starts_with("http://") || value.starts_with("https://")) => {
            Some("Expected an http:// or https:// URL".to_string())
        }
        "server.service" if value.is_empty() || value.contains('/') => {
            Some("Expected a single path segment".to_string())
        }
        "server.timeout_secs" => match value.parse::<u64>() {
            Ok(secs) if (1..=MAX_TIMEOUT_SECS).contains(&secs) => None,
            _ => Some(format!("Expected a whole number of seconds between 1 and {MAX_TIMEOUT_SECS}")),
        },
        _ => None,
    };
    match hint {
        Some(hint) => Err(SettingsError::InvalidValue {
            key: key.to_string(),
            value: value.to_string(),
            hint,
        }
        .into()),
        None => Ok(()),
    }
}

// ── Unit tests ───────────────────────────────────────────────────────────────
