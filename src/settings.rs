//! Persisted user settings
//!
//! Remembers the frpc executable and config paths plus the two startup
//! flags, as TOML under the platform config directory. The supervisor never
//! reads these itself; the CLI resolves them and passes plain arguments.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Remembered path to the frpc executable.
    pub executable_path: Option<String>,
    /// Remembered path to the frpc config file.
    pub config_path: Option<String>,
    /// Register the app as a login item.
    pub start_on_login: bool,
    /// Start frpc as soon as the app launches.
    pub start_on_launch: bool,
}

impl Settings {
    /// Default settings file location, e.g. `~/.config/frpbar/settings.toml`.
    pub fn default_path() -> anyhow::Result<PathBuf> {
        let base = dirs::config_dir().context("could not determine config directory")?;
        Ok(base.join("frpbar").join("settings.toml"))
    }

    /// Loads from the default location; a missing file yields defaults.
    pub fn load() -> anyhow::Result<Self> {
        Self::load_from(&Self::default_path()?)
    }

    pub fn load_from(path: &Path) -> anyhow::Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let text = fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        toml::from_str(&text).with_context(|| format!("invalid settings in {}", path.display()))
    }

    /// Saves to the default location, creating parent directories.
    pub fn save(&self) -> anyhow::Result<()> {
        self.save_to(&Self::default_path()?)
    }

    pub fn save_to(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("failed to create {}", parent.display()))?;
        }
        let text = toml::to_string_pretty(self).context("failed to serialize settings")?;
        fs::write(path, text).with_context(|| format!("failed to write {}", path.display()))?;
        tracing::debug!(path = %path.display(), "settings saved");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_yields_defaults() {
        let tmp = tempfile::tempdir().unwrap();
        let loaded = Settings::load_from(&tmp.path().join("nope.toml")).unwrap();
        assert_eq!(loaded, Settings::default());
        assert!(!loaded.start_on_login);
    }

    #[test]
    fn round_trips_through_disk() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("nested").join("settings.toml");

        let settings = Settings {
            executable_path: Some("/opt/frp/frpc".into()),
            config_path: Some("/etc/frp/frpc.yaml".into()),
            start_on_login: true,
            start_on_launch: false,
        };
        settings.save_to(&path).unwrap();

        let loaded = Settings::load_from(&path).unwrap();
        assert_eq!(loaded, settings);
    }

    #[test]
    fn tolerates_partial_files() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("settings.toml");
        fs::write(&path, "start_on_launch = true\n").unwrap();

        let loaded = Settings::load_from(&path).unwrap();
        assert!(loaded.start_on_launch);
        assert_eq!(loaded.executable_path, None);
    }
}
