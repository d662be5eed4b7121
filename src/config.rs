//! Configuration management for the application.
//!
//! This module handles loading and saving application configuration in TOML
//! format with platform-specific directory resolution, and exposes the
//! persisted forced-mobile flag behind the [`FlagStore`] trait so the layout
//! machinery can be tested without touching the filesystem.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::cell::Cell;
use std::fs;
use std::path::PathBuf;
use tracing::warn;

use crate::constants::FORCE_MOBILE_KEY;

/// Environment variable overriding the config directory (used for test
/// isolation and portable installs).
pub const CONFIG_DIR_ENV: &str = "PRINTDESK_CONFIG_DIR";

/// UI preferences.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct UiConfig {
    /// Force the mobile-optimized layout regardless of detected device class
    #[serde(default)]
    pub force_mobile_layout: bool,
}

/// Application configuration.
///
/// # File Location
///
/// - Linux: `~/.config/PrintDesk/config.toml`
/// - macOS: `~/Library/Application Support/PrintDesk/config.toml`
/// - Windows: `%APPDATA%\PrintDesk\config.toml`
///
/// `PRINTDESK_CONFIG_DIR` overrides the directory when set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Config {
    /// UI preferences
    #[serde(default)]
    pub ui: UiConfig,
}

impl Config {
    /// Creates a new Config with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Gets the platform-specific config directory path.
    ///
    /// Honors the `PRINTDESK_CONFIG_DIR` environment variable first.
    pub fn config_dir() -> Result<PathBuf> {
        if let Ok(dir) = std::env::var(CONFIG_DIR_ENV) {
            return Ok(PathBuf::from(dir));
        }

        let config_dir = dirs::config_dir()
            .context("Failed to determine config directory")?
            .join("PrintDesk");

        Ok(config_dir)
    }

    /// Gets the full path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join("config.toml"))
    }

    /// Checks if the config file exists on disk.
    #[must_use]
    pub fn exists() -> bool {
        Self::config_file_path()
            .map(|path| path.exists())
            .unwrap_or(false)
    }

    /// Loads configuration from the config file.
    ///
    /// If the file doesn't exist, returns default configuration.
    pub fn load() -> Result<Self> {
        let config_path = Self::config_file_path()?;

        if !config_path.exists() {
            return Ok(Self::new());
        }

        let content = fs::read_to_string(&config_path).context(format!(
            "Failed to read config file: {}",
            config_path.display()
        ))?;

        let config: Self = toml::from_str(&content).context(format!(
            "Failed to parse config file: {}",
            config_path.display()
        ))?;

        Ok(config)
    }

    /// Saves configuration to the config file using atomic write.
    ///
    /// Uses temp file + rename pattern for atomic writes.
    pub fn save(&self) -> Result<()> {
        // Ensure config directory exists
        let config_dir = Self::config_dir()?;
        fs::create_dir_all(&config_dir).context(format!(
            "Failed to create config directory: {}",
            config_dir.display()
        ))?;

        // Serialize to TOML
        let content = toml::to_string_pretty(self).context("Failed to serialize configuration")?;

        let config_path = Self::config_file_path()?;
        let temp_path = config_path.with_extension("toml.tmp");

        // Write to temp file
        fs::write(&temp_path, content).context(format!(
            "Failed to write temp config file: {}",
            temp_path.display()
        ))?;

        // Atomic rename
        fs::rename(&temp_path, &config_path).context(format!(
            "Failed to rename temp config file to: {}",
            config_path.display()
        ))?;

        Ok(())
    }
}

/// Synchronous access to the persisted forced-mobile flag.
///
/// The flag lives in a shared store that any app instance may write; readers
/// must tolerate externally-driven updates. Writers are responsible for
/// emitting [`crate::env::EnvironmentEvent::FlagStoreChanged`] on the
/// environment hub — the store itself performs no notification.
pub trait FlagStore {
    /// Reads the current flag value. Must not block.
    fn forced_mobile(&self) -> bool;

    /// Persists a new flag value.
    fn set_forced_mobile(&self, value: bool) -> Result<()>;
}

/// In-process flag store for tests and the demo shell.
#[derive(Debug, Default)]
pub struct MemoryFlagStore {
    value: Cell<bool>,
}

impl MemoryFlagStore {
    /// Creates a store holding the given initial value.
    #[must_use]
    pub const fn new(value: bool) -> Self {
        Self {
            value: Cell::new(value),
        }
    }
}

impl FlagStore for MemoryFlagStore {
    fn forced_mobile(&self) -> bool {
        self.value.get()
    }

    fn set_forced_mobile(&self, value: bool) -> Result<()> {
        self.value.set(value);
        Ok(())
    }
}

/// Flag store backed by the shared config file.
///
/// Every read loads the file, so writes made by any other app instance are
/// visible immediately after their change notification arrives. A failed
/// read degrades to `false` with a warning rather than surfacing an error,
/// since layout selection must never block on configuration problems.
#[derive(Debug, Default)]
pub struct SettingsFlagStore;

impl SettingsFlagStore {
    /// Creates a file-backed flag store.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl FlagStore for SettingsFlagStore {
    fn forced_mobile(&self) -> bool {
        match Config::load() {
            Ok(config) => config.ui.force_mobile_layout,
            Err(err) => {
                warn!(key = FORCE_MOBILE_KEY, "failed to read settings: {err:#}");
                false
            }
        }
    }

    fn set_forced_mobile(&self, value: bool) -> Result<()> {
        let mut config = Config::load().unwrap_or_default();
        config.ui.force_mobile_layout = value;
        config.save()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_has_flag_unset() {
        let config = Config::new();
        assert!(!config.ui.force_mobile_layout);
    }

    #[test]
    fn test_config_toml_round_trip() {
        let config = Config {
            ui: UiConfig {
                force_mobile_layout: true,
            },
        };

        let toml_str = toml::to_string_pretty(&config).unwrap();
        let parsed: Config = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_config_parses_missing_sections_as_defaults() {
        let parsed: Config = toml::from_str("").unwrap();
        assert_eq!(parsed, Config::default());
    }

    #[test]
    fn test_memory_flag_store() {
        let store = MemoryFlagStore::new(false);
        assert!(!store.forced_mobile());

        store.set_forced_mobile(true).unwrap();
        assert!(store.forced_mobile());
    }
}
