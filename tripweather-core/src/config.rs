use anyhow::{Context, Result, anyhow};
use chrono::Duration;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::{
    cache::{CacheConfig, ResponseCache},
    present::{ReportOptions, ReportVariant},
    retry::RetryConfig,
};

/// Default itinerary file name, looked up in the working directory first.
pub const ITINERARY_FILE_NAME: &str = "itinerary.toml";

/// Unit the provider reports temperatures in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TemperatureUnit {
    #[default]
    Fahrenheit,
    Celsius,
}

impl TemperatureUnit {
    pub fn as_str(&self) -> &'static str {
        match self {
            TemperatureUnit::Fahrenheit => "fahrenheit",
            TemperatureUnit::Celsius => "celsius",
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            TemperatureUnit::Fahrenheit => "°F",
            TemperatureUnit::Celsius => "°C",
        }
    }
}

/// Forecast request settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastConfig {
    /// Open-Meteo API base URL (default: <https://api.open-meteo.com/v1>)
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Forecast horizon in days, 1-16 (default: 16)
    #[serde(default = "default_forecast_days")]
    pub forecast_days: u8,

    #[serde(default)]
    pub temperature_unit: TemperatureUnit,

    /// Default: "mph"
    #[serde(default = "default_wind_speed_unit")]
    pub wind_speed_unit: String,

    /// Default: "inch"
    #[serde(default = "default_precipitation_unit")]
    pub precipitation_unit: String,

    /// Reporting timezone; decides where one day ends and the next begins (default: "GMT")
    #[serde(default = "default_timezone")]
    pub timezone: String,

    /// Request timeout in seconds (default: 30)
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

fn default_base_url() -> String {
    "https://api.open-meteo.com/v1".to_string()
}

const fn default_forecast_days() -> u8 {
    16
}

fn default_wind_speed_unit() -> String {
    "mph".to_string()
}

fn default_precipitation_unit() -> String {
    "inch".to_string()
}

fn default_timezone() -> String {
    "GMT".to_string()
}

const fn default_timeout() -> u64 {
    30
}

impl Default for ForecastConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            forecast_days: default_forecast_days(),
            temperature_unit: TemperatureUnit::default(),
            wind_speed_unit: default_wind_speed_unit(),
            precipitation_unit: default_precipitation_unit(),
            timezone: default_timezone(),
            timeout_secs: default_timeout(),
        }
    }
}

/// Where to find the itinerary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct ItineraryConfig {
    /// Primary path; `itinerary.toml` in the working directory when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,

    /// Used when the primary path does not exist; `itinerary.toml` in the
    /// config directory when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fallback_path: Option<PathBuf>,
}

/// Listen address for `serve`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

const fn default_port() -> u16 {
    8080
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { host: default_host(), port: default_port() }
    }
}

/// Top-level configuration stored on disk.
///
/// Example TOML:
/// ```toml
/// variant = "baseline"
///
/// [retry]
/// retries = 3
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub variant: ReportVariant,

    /// Decimal places for temperatures, at most 15; the variant decides when absent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub precision: Option<u32>,

    pub forecast: ForecastConfig,
    pub retry: RetryConfig,
    pub cache: CacheConfig,
    pub itinerary: ItineraryConfig,
    pub server: ServerConfig,
}

impl Config {
    /// Load config from the default location, or return defaults if it doesn't exist yet.
    pub fn load() -> Result<Self> {
        let path = Self::config_file_path()?;
        if !path.exists() {
            return Ok(Self::default());
        }

        Self::load_from(&path)
    }

    /// Load config from an explicit path. A missing file is an error here.
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let cfg: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(cfg)
    }

    /// Save config to `path`, creating parent directories as needed.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        fs::write(path, self.to_toml()?)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")
    }

    fn project_dirs() -> Result<ProjectDirs> {
        ProjectDirs::from("dev", "tripweather", "tripweather")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        Ok(Self::project_dirs()?.config_dir().join("config.toml"))
    }

    /// Primary and fallback itinerary locations.
    pub fn itinerary_paths(&self) -> (PathBuf, Option<PathBuf>) {
        let primary = self
            .itinerary
            .path
            .clone()
            .unwrap_or_else(|| PathBuf::from(ITINERARY_FILE_NAME));

        let fallback = self.itinerary.fallback_path.clone().or_else(|| {
            Self::project_dirs()
                .ok()
                .map(|dirs| dirs.config_dir().join(ITINERARY_FILE_NAME))
        });

        (primary, fallback)
    }

    /// Directory for cached responses.
    pub fn cache_dir(&self) -> Result<PathBuf> {
        match &self.cache.dir {
            Some(dir) => Ok(dir.clone()),
            None => Ok(Self::project_dirs()?.cache_dir().join("responses")),
        }
    }

    /// Response cache, or `None` when caching is disabled.
    pub fn response_cache(&self) -> Result<Option<ResponseCache>> {
        if !self.cache.enabled {
            return Ok(None);
        }

        let ttl = i64::try_from(self.cache.expire_after_secs)
            .ok()
            .and_then(Duration::try_seconds)
            .unwrap_or(Duration::MAX);
        Ok(Some(ResponseCache::new(self.cache_dir()?, ttl)))
    }

    pub fn report_options(&self) -> ReportOptions {
        let options = ReportOptions::new(self.variant).with_unit(self.forecast.temperature_unit);
        match self.precision {
            Some(p) => options.with_precision(p),
            None => options,
        }
    }
}
