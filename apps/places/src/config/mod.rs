use crate::constants::{
    DEFAULT_GEOCODER_TIMEOUT_SECONDS, DEFAULT_GEOCODER_URL, DEFAULT_LANGUAGE,
    DEFAULT_RATE_LIMIT_SECONDS, DEFAULT_USER_AGENT, UNKNOWN_DATE_LABEL, UNKNOWN_LOCATION_LABEL,
};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8000
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReverseGeocodingConfig {
    #[serde(default = "default_geo_enabled")]
    pub enabled: bool,
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    #[serde(default = "default_language")]
    pub language: String,
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
    #[serde(default = "default_rate_limit_seconds")]
    pub rate_limit_seconds: f64,
}

fn default_geo_enabled() -> bool {
    true
}

fn default_base_url() -> String {
    DEFAULT_GEOCODER_URL.to_string()
}

fn default_user_agent() -> String {
    DEFAULT_USER_AGENT.to_string()
}

fn default_language() -> String {
    DEFAULT_LANGUAGE.to_string()
}

fn default_timeout_seconds() -> u64 {
    DEFAULT_GEOCODER_TIMEOUT_SECONDS
}

fn default_rate_limit_seconds() -> f64 {
    DEFAULT_RATE_LIMIT_SECONDS
}

impl ReverseGeocodingConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }

    /// Minimum spacing between outbound lookups. Zero disables spacing; negative,
    /// non-finite or overflowing values fall back to the default interval.
    pub fn min_interval(&self) -> Duration {
        match Duration::try_from_secs_f64(self.rate_limit_seconds) {
            Ok(interval) => interval,
            Err(_) => {
                tracing::warn!(
                    "Invalid rate_limit_seconds {}, using {}s",
                    self.rate_limit_seconds,
                    DEFAULT_RATE_LIMIT_SECONDS
                );
                Duration::from_secs_f64(DEFAULT_RATE_LIMIT_SECONDS)
            }
        }
    }
}

impl Default for ReverseGeocodingConfig {
    fn default() -> Self {
        Self {
            enabled: default_geo_enabled(),
            base_url: default_base_url(),
            user_agent: default_user_agent(),
            language: default_language(),
            timeout_seconds: default_timeout_seconds(),
            rate_limit_seconds: default_rate_limit_seconds(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroupingConfig {
    #[serde(default = "default_unknown_location_label")]
    pub unknown_location_label: String,
    #[serde(default = "default_unknown_date_label")]
    pub unknown_date_label: String,
}

fn default_unknown_location_label() -> String {
    UNKNOWN_LOCATION_LABEL.to_string()
}

fn default_unknown_date_label() -> String {
    UNKNOWN_DATE_LABEL.to_string()
}

impl Default for GroupingConfig {
    fn default() -> Self {
        Self {
            unknown_location_label: default_unknown_location_label(),
            unknown_date_label: default_unknown_date_label(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub reverse_geocoding: ReverseGeocodingConfig,
    #[serde(default)]
    pub grouping: GroupingConfig,
}

pub fn load_config(config_path: &Path) -> Config {
    if !config_path.exists() {
        return Config::default();
    }

    match fs::read_to_string(config_path) {
        Ok(content) => match serde_yaml::from_str(&content) {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!("Ignoring malformed config {:?}: {}", config_path, e);
                Config::default()
            }
        },
        Err(e) => {
            tracing::warn!("Unable to read config {:?}: {}", config_path, e);
            Config::default()
        }
    }
}

pub fn save_default_config(config_path: &Path) -> std::io::Result<()> {
    if let Some(parent) = config_path.parent() {
        fs::create_dir_all(parent)?;
    }

    let config = Config::default();
    let yaml = serde_yaml::to_string(&config).map_err(|e| std::io::Error::other(e.to_string()))?;
    fs::write(config_path, yaml)
}
