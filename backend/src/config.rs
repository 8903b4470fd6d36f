//! Run configuration.
//!
//! Settings come from an optional TOML file (`airshed.toml`) with every field
//! defaulted, then from environment variables. With no file and no
//! variables the tool computes the Chiang Mai–Lamphun basin against
//! Open-Meteo.
//!
//! ```toml
//! [basin]
//! target_concentration_ug_m3 = 37.5
//! area_km2 = 1500.0
//! length_km = 80.0
//!
//! [location]
//! latitude = 18.7883
//! longitude = 98.9853
//! timezone = "Asia/Bangkok"
//!
//! [provider]
//! api_url = "https://api.open-meteo.com/v1/forecast"
//! forecast_days = 1
//! timeout_secs = 30
//!
//! [output]
//! snapshot_path = "emission_cap_result.json"
//! history_path = "data/historical_data.json"
//! ```

use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use qtty::Kilometers;
use serde::{Deserialize, Serialize};

use crate::models::{Coordinates, GeographicConstants};
use crate::weather::open_meteo::{DEFAULT_API_URL, DEFAULT_TIMEOUT};

/// Environment variable naming an explicit configuration file.
pub const CONFIG_PATH_ENV: &str = "AIRSHED_CONFIG";

/// Result type for configuration loading
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Error type for configuration loading
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {message}")]
    Read { path: String, message: String },

    #[error("Failed to parse config file: {0}")]
    Parse(String),

    #[error("Invalid value for {key}: {message}")]
    InvalidValue { key: String, message: String },
}

/// Complete run configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub basin: BasinSettings,
    #[serde(default)]
    pub location: LocationSettings,
    #[serde(default)]
    pub provider: ProviderSettings,
    #[serde(default)]
    pub output: OutputSettings,
}

/// Geometry and target of the modelled basin.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BasinSettings {
    #[serde(default = "default_target_concentration")]
    pub target_concentration_ug_m3: f64,
    #[serde(default = "default_area_km2")]
    pub area_km2: f64,
    #[serde(default = "default_length_km")]
    pub length_km: Kilometers,
}

/// Sampling point and the zone of its hourly window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationSettings {
    #[serde(default = "default_latitude")]
    pub latitude: f64,
    #[serde(default = "default_longitude")]
    pub longitude: f64,
    #[serde(default = "default_timezone")]
    pub timezone: String,
}

/// Weather provider endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProviderSettings {
    #[serde(default = "default_api_url")]
    pub api_url: String,
    #[serde(default = "default_forecast_days")]
    pub forecast_days: u32,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

/// Output file locations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputSettings {
    #[serde(default = "default_snapshot_path")]
    pub snapshot_path: PathBuf,
    #[serde(default = "default_history_path")]
    pub history_path: PathBuf,
}

fn default_target_concentration() -> f64 {
    GeographicConstants::default().target_concentration_ug_m3
}

fn default_area_km2() -> f64 {
    GeographicConstants::default().basin_area_km2
}

fn default_length_km() -> Kilometers {
    GeographicConstants::default().basin_length
}

fn default_latitude() -> f64 {
    GeographicConstants::default().coordinates.latitude
}

fn default_longitude() -> f64 {
    GeographicConstants::default().coordinates.longitude
}

fn default_timezone() -> String {
    GeographicConstants::default().timezone
}

fn default_api_url() -> String {
    DEFAULT_API_URL.to_string()
}

fn default_forecast_days() -> u32 {
    1
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT.as_secs()
}

fn default_snapshot_path() -> PathBuf {
    PathBuf::from("emission_cap_result.json")
}

fn default_history_path() -> PathBuf {
    PathBuf::from("data/historical_data.json")
}

impl Default for BasinSettings {
    fn default() -> Self {
        Self {
            target_concentration_ug_m3: default_target_concentration(),
            area_km2: default_area_km2(),
            length_km: default_length_km(),
        }
    }
}

impl Default for LocationSettings {
    fn default() -> Self {
        Self {
            latitude: default_latitude(),
            longitude: default_longitude(),
            timezone: default_timezone(),
        }
    }
}

impl Default for ProviderSettings {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            forecast_days: default_forecast_days(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl Default for OutputSettings {
    fn default() -> Self {
        Self {
            snapshot_path: default_snapshot_path(),
            history_path: default_history_path(),
        }
    }
}

impl AppConfig {
    /// Load configuration from a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> ConfigResult<Self> {
        let content = fs::read_to_string(path.as_ref()).map_err(|e| ConfigError::Read {
            path: path.as_ref().display().to_string(),
            message: e.to_string(),
        })?;
        Self::from_toml_str(&content)
    }

    /// Parse configuration from TOML text.
    pub fn from_toml_str(content: &str) -> ConfigResult<Self> {
        let config: AppConfig =
            toml::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from the default location.
    ///
    /// Searches for `airshed.toml` in:
    /// 1. Current directory
    /// 2. `backend/` directory
    /// 3. Parent directory
    ///
    /// Falls back to built-in defaults when no file is found.
    pub fn from_default_location() -> ConfigResult<Self> {
        let search_paths = [
            PathBuf::from("airshed.toml"),
            PathBuf::from("backend/airshed.toml"),
            PathBuf::from("../airshed.toml"),
        ];

        for path in search_paths {
            if path.exists() {
                log::info!("Loading configuration from {}", path.display());
                return Self::from_file(&path);
            }
        }

        log::info!("No airshed.toml found, using built-in defaults");
        Ok(Self::default())
    }

    /// Load the configuration for a run: the file named by `AIRSHED_CONFIG`
    /// (or the default location), then environment overrides.
    ///
    /// # Environment Variables
    /// - `AIRSHED_CONFIG` (optional): Path to a TOML configuration file
    /// - `AIRSHED_API_URL` (optional): Forecast endpoint
    /// - `AIRSHED_HTTP_TIMEOUT_SECS` (optional): Request timeout in seconds
    /// - `AIRSHED_SNAPSHOT_PATH` (optional): Snapshot output file
    /// - `AIRSHED_HISTORY_PATH` (optional): Historical series file
    pub fn load() -> ConfigResult<Self> {
        let config = match env::var(CONFIG_PATH_ENV) {
            Ok(path) if !path.is_empty() => Self::from_file(path)?,
            _ => Self::from_default_location()?,
        };
        config.with_overrides(|key| env::var(key).ok())
    }

    /// Apply overrides looked up by environment variable name.
    pub fn with_overrides<F>(mut self, lookup: F) -> ConfigResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup("AIRSHED_API_URL") {
            self.provider.api_url = url;
        }
        if let Some(raw) = lookup("AIRSHED_HTTP_TIMEOUT_SECS") {
            self.provider.timeout_secs =
                raw.trim().parse().map_err(|_| ConfigError::InvalidValue {
                    key: "AIRSHED_HTTP_TIMEOUT_SECS".to_string(),
                    message: format!("'{}' is not a whole number of seconds", raw),
                })?;
        }
        if let Some(path) = lookup("AIRSHED_SNAPSHOT_PATH") {
            self.output.snapshot_path = PathBuf::from(path);
        }
        if let Some(path) = lookup("AIRSHED_HISTORY_PATH") {
            self.output.history_path = PathBuf::from(path);
        }

        self.validate()?;
        Ok(self)
    }

    fn validate(&self) -> ConfigResult<()> {
        let positive = [
            ("basin.target_concentration_ug_m3", self.basin.target_concentration_ug_m3),
            ("basin.area_km2", self.basin.area_km2),
            ("basin.length_km", self.basin.length_km.value()),
        ];
        for (key, value) in positive {
            if !value.is_finite() || value <= 0.0 {
                return Err(ConfigError::InvalidValue {
                    key: key.to_string(),
                    message: format!("must be a positive number, got {}", value),
                });
            }
        }

        if !(-90.0..=90.0).contains(&self.location.latitude) {
            return Err(ConfigError::InvalidValue {
                key: "location.latitude".to_string(),
                message: format!("{} is outside [-90, 90]", self.location.latitude),
            });
        }
        if !(-180.0..=180.0).contains(&self.location.longitude) {
            return Err(ConfigError::InvalidValue {
                key: "location.longitude".to_string(),
                message: format!("{} is outside [-180, 180]", self.location.longitude),
            });
        }
        if self.provider.forecast_days == 0 {
            return Err(ConfigError::InvalidValue {
                key: "provider.forecast_days".to_string(),
                message: "must be at least 1".to_string(),
            });
        }
        if self.provider.timeout_secs == 0 {
            return Err(ConfigError::InvalidValue {
                key: "provider.timeout_secs".to_string(),
                message: "must be at least 1; requests never wait indefinitely".to_string(),
            });
        }
        Ok(())
    }

    /// Basin constants for the run.
    pub fn geographic_constants(&self) -> GeographicConstants {
        GeographicConstants {
            target_concentration_ug_m3: self.basin.target_concentration_ug_m3,
            basin_area_km2: self.basin.area_km2,
            basin_length: self.basin.length_km,
            coordinates: Coordinates::new(self.location.latitude, self.location.longitude),
            timezone: self.location.timezone.clone(),
        }
    }

    /// Request timeout for the weather provider.
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.provider.timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_empty_document_gives_defaults() {
        let config = AppConfig::from_toml_str("").unwrap();
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.geographic_constants(), GeographicConstants::default());
        assert_eq!(config.timeout(), Duration::from_secs(30));
        assert_eq!(config.output.history_path, PathBuf::from("data/historical_data.json"));
    }

    #[test]
    fn test_partial_sections_override_named_fields_only() {
        let toml = r#"
[basin]
length_km = 65.5

[provider]
timeout_secs = 10
"#;

        let config = AppConfig::from_toml_str(toml).unwrap();
        assert_eq!(config.basin.length_km.value(), 65.5);
        assert_eq!(config.basin.area_km2, 1500.0);
        assert_eq!(config.provider.timeout_secs, 10);
        assert_eq!(config.provider.api_url, DEFAULT_API_URL);
        assert_eq!(config.location.timezone, "Asia/Bangkok");
    }

    #[test]
    fn test_geographic_constants_from_settings() {
        let toml = r#"
[basin]
target_concentration_ug_m3 = 25.0
area_km2 = 600.0

[location]
latitude = 13.75
longitude = 100.5
timezone = "Asia/Bangkok"
"#;

        let constants = AppConfig::from_toml_str(toml).unwrap().geographic_constants();
        assert_eq!(constants.target_concentration_ug_m3, 25.0);
        assert_eq!(constants.basin_area_m2(), 6.0e8);
        assert_eq!(constants.coordinates, Coordinates::new(13.75, 100.5));
    }

    #[test]
    fn test_rejects_non_positive_basin_values() {
        let err = AppConfig::from_toml_str("[basin]\narea_km2 = 0.0\n").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { ref key, .. } if key == "basin.area_km2"));
    }

    #[test]
    fn test_rejects_zero_timeout() {
        assert!(AppConfig::from_toml_str("[provider]\ntimeout_secs = 0\n").is_err());
    }

    #[test]
    fn test_rejects_out_of_range_latitude() {
        assert!(AppConfig::from_toml_str("[location]\nlatitude = 91.0\n").is_err());
    }

    #[test]
    fn test_malformed_toml_is_parse_error() {
        assert!(matches!(
            AppConfig::from_toml_str("[basin\n"),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_environment_overrides() {
        let vars: HashMap<&str, &str> = [
            ("AIRSHED_API_URL", "http://localhost:8080/v1/forecast"),
            ("AIRSHED_HTTP_TIMEOUT_SECS", "5"),
            ("AIRSHED_HISTORY_PATH", "/var/lib/airshed/history.json"),
        ]
        .into_iter()
        .collect();

        let config = AppConfig::default()
            .with_overrides(|key| vars.get(key).map(|v| v.to_string()))
            .unwrap();
        assert_eq!(config.provider.api_url, "http://localhost:8080/v1/forecast");
        assert_eq!(config.timeout(), Duration::from_secs(5));
        assert_eq!(config.output.history_path, PathBuf::from("/var/lib/airshed/history.json"));
        assert_eq!(config.output.snapshot_path, PathBuf::from("emission_cap_result.json"));
    }

    #[test]
    fn test_invalid_timeout_override() {
        let err = AppConfig::default()
            .with_overrides(|key| (key == "AIRSHED_HTTP_TIMEOUT_SECS").then(|| "soon".to_string()))
            .unwrap_err();
        assert!(err.to_string().contains("AIRSHED_HTTP_TIMEOUT_SECS"));
    }

    #[test]
    fn test_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("airshed.toml");
        fs::write(&path, "[output]\nsnapshot_path = \"out/snapshot.json\"\n").unwrap();

        let config = AppConfig::from_file(&path).unwrap();
        assert_eq!(config.output.snapshot_path, PathBuf::from("out/snapshot.json"));
        assert!(AppConfig::from_file(dir.path().join("missing.toml")).is_err());
    }
}
