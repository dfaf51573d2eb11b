use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf, time::Duration};

use crate::debounce::DEFAULT_SEARCH_DEBOUNCE;

/// A place the user picked as their fallback location.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavedPlace {
    pub name: String,
    pub country: String,
    pub latitude: f64,
    pub longitude: f64,
}

/// Top-level configuration stored on disk.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Used by the resolver's terminal strategy instead of the built-in
    /// default city.
    ///
    /// Example TOML:
    /// [default_place]
    /// name = "Madrid"
    /// country = "Spain"
    /// latitude = 40.4168
    /// longitude = -3.7038
    pub default_place: Option<SavedPlace>,

    /// API key for the secondary IP geolocation provider; the provider's
    /// demo key is used when unset.
    pub ip_geolocation_api_key: Option<String>,

    /// Override for the live-search debounce, in milliseconds.
    pub search_debounce_ms: Option<u64>,
}

impl Config {
    /// The live-search debounce delay, defaulting when not configured.
    pub fn search_debounce(&self) -> Duration {
        self.search_debounce_ms.map(Duration::from_millis).unwrap_or(DEFAULT_SEARCH_DEBOUNCE)
    }

    pub fn set_default_place(&mut self, place: SavedPlace) {
        self.default_place = Some(place);
    }

    /// Load config from disk, or return an empty default if it doesn't exist yet.
    pub fn load() -> Result<Self> {
        let path = Self::config_file_path()?;
        if !path.exists() {
            // First run: no config file, return empty.
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let cfg: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(cfg)
    }

    /// Save config to disk, creating parent directories as needed.
    pub fn save(&self) -> Result<()> {
        let path = Self::config_file_path()?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml =
            toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")?;

        fs::write(&path, toml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "skycast", "skycast")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }
}
