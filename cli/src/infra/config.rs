//! YAML settings file behind the `ConfigStore` port.

use std::io::Write as _;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};
use tempfile::NamedTempFile;

use crate::application::ports::ConfigStore;
use crate::domain::ConsoleConfig;

/// Environment variable overriding the settings file location.
pub const CONFIG_ENV: &str = "FLEET_CONFIG";

/// Settings at `$FLEET_CONFIG`, or `~/.fleet/config.yaml`.
pub struct YamlConfigStore;

impl ConfigStore for YamlConfigStore {
    fn load(&self) -> Result<ConsoleConfig> {
        let path = self.path()?;
        let content = match std::fs::read_to_string(&path) {
            Ok(content) => content,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "no settings file, using defaults");
                return Ok(ConsoleConfig::default());
            }
            Err(err) => return Err(err).with_context(|| format!("cannot read {}", path.display())),
        };
        serde_yaml::from_str(&content).with_context(|| format!("cannot parse {}", path.display()))
    }

    fn save(&self, config: &ConsoleConfig) -> Result<()> {
        let path = self.path()?;
        let parent = match path.parent().filter(|p| !p.as_os_str().is_empty()) {
            Some(parent) => parent.to_path_buf(),
            None => PathBuf::from("."),
        };
        std::fs::create_dir_all(&parent)
            .with_context(|| format!("cannot create {}", parent.display()))?;
        let content = serde_yaml::to_string(config).context("cannot serialize settings")?;

        // Staged under a unique name next to the target and renamed over it,
        // so readers never see a half-written file and concurrent saves do
        // not share a staging path.
        let staged = stage_private(&parent, content.as_bytes())
            .with_context(|| format!("cannot write settings in {}", parent.display()))?;
        staged
            .persist(&path)
            .map_err(|err| err.error)
            .with_context(|| format!("cannot replace {}", path.display()))?;
        Ok(())
    }

    fn path(&self) -> Result<PathBuf> {
        if let Some(path) = std::env::var_os(CONFIG_ENV).filter(|v| !v.is_empty()) {
            return Ok(PathBuf::from(path));
        }
        let home = dirs::home_dir().ok_or_else(|| anyhow!("cannot determine home directory"))?;
        Ok(home.join(".fleet").join("config.yaml"))
    }
}

/// Owner-only temporary file in `dir` holding `bytes`, flushed to disk.
fn stage_private(dir: &Path, bytes: &[u8]) -> std::io::Result<NamedTempFile> {
    let mut staged = NamedTempFile::new_in(dir)?;
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        staged
            .as_file()
            .set_permissions(std::fs::Permissions::from_mode(0o600))?;
    }
    staged.write_all(bytes)?;
    staged.as_file().sync_all()?;
    Ok(staged)
}
