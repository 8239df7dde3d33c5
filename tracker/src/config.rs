//! Configuration management (TOML)

use crate::error::{Result, TrackerError};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{info, warn};

pub const DEFAULT_BASE_URL: &str = "http://localhost:5000/";
pub const DEFAULT_SUCCESS_MARKER: &str = "ADDED DATUM";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub publisher: PublisherConfig,
    pub collector: CollectorConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PublisherConfig {
    pub base_url: String,
    pub success_marker: String,
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CollectorConfig {
    pub program: String,
    pub timeout_secs: u64,
}

impl Default for PublisherConfig {
    fn default() -> Self {
        PublisherConfig {
            base_url: DEFAULT_BASE_URL.to_string(),
            success_marker: DEFAULT_SUCCESS_MARKER.to_string(),
            timeout_secs: 5,
        }
    }
}

impl Default for CollectorConfig {
    fn default() -> Self {
        CollectorConfig {
            program: "ps".to_string(),
            timeout_secs: 5,
        }
    }
}

impl PublisherConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl CollectorConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Config {
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .map_err(|e| TrackerError::config(format!("reading {}: {}", path.display(), e)))?;
        let config: Config = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self)?;
        let io_err = |e: std::io::Error| TrackerError::config(format!("writing {}: {}", path.display(), e));
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(io_err)?;
        }
        fs::write(path, content).map_err(io_err)?;
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if !self.publisher.base_url.ends_with('/') {
            return Err(TrackerError::config(format!(
                "publisher.base_url must end with '/': {}",
                self.publisher.base_url
            )));
        }
        if self.publisher.success_marker.is_empty() {
            return Err(TrackerError::config("publisher.success_marker must not be empty"));
        }
        if self.publisher.timeout_secs == 0 || self.collector.timeout_secs == 0 {
            return Err(TrackerError::config("timeouts must be at least one second"));
        }
        if self.collector.program.is_empty() {
            return Err(TrackerError::config("collector.program must not be empty"));
        }
        Ok(())
    }

    pub fn config_path() -> PathBuf {
        directories::ProjectDirs::from("", "", "exp-tracker")
            .map(|dirs| dirs.config_dir().join("config.toml"))
            .unwrap_or_else(|| PathBuf::from("config.toml"))
    }

    /// Load the configuration a binary should run with. An explicit path
    /// must load; the default location falls back to defaults.
    pub fn resolve(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Config::load(path);
        }
        let path = Config::config_path();
        if !path.exists() {
            info!("No config file found, using defaults");
            return Ok(Config::default());
        }
        Ok(Config::load(&path).unwrap_or_else(|e| {
            warn!("Failed to load config: {}, using defaults", e);
            Config::default()
        }))
    }
}
