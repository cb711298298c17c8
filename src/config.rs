use serde::{Deserialize, Deserializer};
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("invalid value for {key}: {reason}")]
    Invalid { key: &'static str, reason: String },
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub catalog: CatalogConfig,
    pub visibility: VisibilityConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "0.0.0.0".to_string(),
            port: 3000,
        }
    }
}

impl ServerConfig {
    pub fn address(&self) -> String {
        format!("{}:{}", self.bind, self.port)
    }
}

/// Where the TLE feed comes from. A local `file` wins over `url`.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    pub url: Option<String>,
    pub file: Option<PathBuf>,
    #[serde(deserialize_with = "deserialize_duration")]
    pub fetch_timeout: Duration,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            url: Some("http://www.celestrak.com/NORAD/elements/visual.txt".to_string()),
            file: None,
            fetch_timeout: Duration::from_secs(30),
        }
    }
}

/// Upper bound for `visibility.scan_timeout`; `0s` disables the budget instead.
pub const MAX_SCAN_TIMEOUT: Duration = Duration::from_secs(24 * 60 * 60);

/// What happens to a window that is still open when a pass scan reaches its horizon.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrailingWindow {
    #[default]
    Drop,
    Close,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct VisibilityConfig {
    pub visual_range_km: f64,
    pub next_visible_window_hrs: u32,
    pub next_visible_check_interval_min: u32,
    pub observer_height_km: f64,
    pub trailing_windows: TrailingWindow,
    #[serde(deserialize_with = "deserialize_duration")]
    pub scan_timeout: Duration,
}

impl Default for VisibilityConfig {
    fn default() -> Self {
        Self {
            visual_range_km: 2000.0,
            next_visible_window_hrs: 24,
            next_visible_check_interval_min: 5,
            observer_height_km: 0.1,
            trailing_windows: TrailingWindow::Drop,
            scan_timeout: Duration::from_secs(30),
        }
    }
}

impl VisibilityConfig {
    pub fn horizon_minutes(&self) -> i64 {
        i64::from(self.next_visible_window_hrs) * 60
    }
}

impl Config {
    pub fn from_file(path: &str) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigError> {
        // An empty document deserializes to unit, not to an empty mapping.
        if yaml.trim().is_empty() {
            return Ok(Config::default());
        }
        let config: Config = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        let v = &self.visibility;
        if !(v.visual_range_km.is_finite() && v.visual_range_km > 0.0) {
            return Err(ConfigError::Invalid {
                key: "visibility.visual_range_km",
                reason: format!("must be a positive number, got {}", v.visual_range_km),
            });
        }
        if v.next_visible_window_hrs == 0 {
            return Err(ConfigError::Invalid {
                key: "visibility.next_visible_window_hrs",
                reason: "must be at least 1".into(),
            });
        }
        if v.next_visible_check_interval_min == 0 {
            return Err(ConfigError::Invalid {
                key: "visibility.next_visible_check_interval_min",
                reason: "must be at least 1".into(),
            });
        }
        if v.scan_timeout > MAX_SCAN_TIMEOUT {
            return Err(ConfigError::Invalid {
                key: "visibility.scan_timeout",
                reason: format!(
                    "must be at most {}, got {}",
                    humantime::format_duration(MAX_SCAN_TIMEOUT),
                    humantime::format_duration(v.scan_timeout)
                ),
            });
        }
        if !v.observer_height_km.is_finite() {
            return Err(ConfigError::Invalid {
                key: "visibility.observer_height_km",
                reason: "must be finite".into(),
            });
        }
        Ok(())
    }
}

fn deserialize_duration<'de, D>(deserializer: D) -> Result<Duration, D::Error>
where
    D: Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    humantime::parse_duration(s.trim()).map_err(serde::de::Error::custom)
}
