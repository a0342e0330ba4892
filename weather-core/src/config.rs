use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use reqwest::Url;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
    time::Duration,
};

use crate::{
    credentials::CredentialStore, favorites::FavoritesStore,
    provider::weatherapi::DEFAULT_FORECAST_DAYS,
};

pub const DEFAULT_WEATHER_BASE_URL: &str = "https://api.weatherapi.com/v1";
pub const DEFAULT_GEOLOCATION_BASE_URL: &str = "http://ip-api.com";
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Top-level configuration stored on disk.
///
/// Example TOML:
/// ```toml
/// weather_base_url = "https://api.weatherapi.com/v1"
/// timeout_secs = 15
/// favorites_file = "/home/me/locations.txt"
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub weather_base_url: String,
    pub geolocation_base_url: String,
    pub timeout_secs: u64,
    pub forecast_days: u32,

    /// Overrides `<data dir>/locations.txt`.
    pub favorites_file: Option<PathBuf>,

    /// Overrides `<config dir>/.env`.
    pub credentials_file: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            weather_base_url: DEFAULT_WEATHER_BASE_URL.to_string(),
            geolocation_base_url: DEFAULT_GEOLOCATION_BASE_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            forecast_days: DEFAULT_FORECAST_DAYS,
            favorites_file: None,
            credentials_file: None,
        }
    }
}

impl Config {
    /// Load config from disk, or return defaults if it doesn't exist yet.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_file_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let cfg: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(cfg)
    }

    /// Save config to disk, creating parent directories as needed.
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_file_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml =
            toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")?;

        fs::write(path, toml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    fn project_dirs() -> Result<ProjectDirs> {
        ProjectDirs::from("dev", "weather-app", "weather")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        Ok(Self::project_dirs()?.config_dir().join("config.toml"))
    }

    pub fn favorites_path(&self) -> Result<PathBuf> {
        match &self.favorites_file {
            Some(path) => Ok(path.clone()),
            None => Ok(Self::project_dirs()?.data_dir().join("locations.txt")),
        }
    }

    pub fn credentials_path(&self) -> Result<PathBuf> {
        match &self.credentials_file {
            Some(path) => Ok(path.clone()),
            None => Ok(Self::project_dirs()?.config_dir().join(".env")),
        }
    }

    pub fn favorites_store(&self) -> Result<FavoritesStore> {
        Ok(FavoritesStore::new(self.favorites_path()?))
    }

    pub fn credential_store(&self) -> Result<CredentialStore> {
        Ok(CredentialStore::new(self.credentials_path()?))
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn weather_base_url(&self) -> Result<Url> {
        parse_base(&self.weather_base_url, "weather_base_url")
    }

    pub fn geolocation_base_url(&self) -> Result<Url> {
        parse_base(&self.geolocation_base_url, "geolocation_base_url")
    }
}

/// Parse a base URL, ensuring a trailing slash so `join` appends instead of
/// replacing the last path segment.
fn parse_base(raw: &str, field: &str) -> Result<Url> {
    let with_slash =
        if raw.ends_with('/') { raw.to_string() } else { format!("{raw}/") };
    Url::parse(&with_slash).with_context(|| format!("Invalid {field} in config: '{raw}'"))
}
