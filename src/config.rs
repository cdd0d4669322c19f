use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::catalog::Catalog;
use crate::error::ConfigError;
use crate::slots::SlotStrategy;
use crate::ticket::DEFAULT_TICKET_PREFIX;

/// Environment variable overriding the settings file location
pub const CONFIG_PATH_ENV: &str = "SPA_BOOKING_CONFIG";

const APP_DIR: &str = "SpaBooking";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AdvisorConfig {
    /// Recommendation endpoint; the keyword advisor is used when unset
    pub endpoint: Option<String>,

    /// Name of the environment variable holding the API key
    pub api_key_env: String,

    pub timeout_secs: u64,
}

impl Default for AdvisorConfig {
    fn default() -> Self {
        Self {
            endpoint: None,
            api_key_env: "SPA_BOOKING_ADVISOR_KEY".to_string(),
            timeout_secs: 10,
        }
    }
}

/// Runtime settings for a booking session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// How time slots are marked available before staff selection
    pub slot_strategy: SlotStrategy,

    /// Simulated network latency for "submit booking"
    pub submit_delay_ms: u64,

    /// Ticket code prefix, e.g. "SS"
    pub ticket_prefix: String,

    /// Number of days offered on the date screen, starting today
    pub booking_window_days: u32,

    /// Alternate catalog file; the embedded catalog is used when unset
    pub catalog_path: Option<PathBuf>,

    pub advisor: AdvisorConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            slot_strategy: SlotStrategy::Fixed,
            submit_delay_ms: 1500,
            ticket_prefix: DEFAULT_TICKET_PREFIX.to_string(),
            booking_window_days: 14,
            catalog_path: None,
            advisor: AdvisorConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load settings from the user config directory, creating the default
    /// file on first run
    pub fn load() -> Result<Self, ConfigError> {
        let path = Self::config_path()?;
        Self::load_or_create(&path)
    }

    pub fn load_or_create(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            let config = AppConfig::default();
            config.save_to(path)?;
            tracing::info!("[config] Created default config at: {}", path.display());
            return Ok(config);
        }

        let content = fs::read_to_string(path).map_err(|e| ConfigError::LoadFailed {
            path: path.display().to_string(),
            source: Box::new(e),
        })?;
        let config: AppConfig = serde_json::from_str(&content).map_err(|e| ConfigError::LoadFailed {
            path: path.display().to_string(),
            source: Box::new(e),
        })?;
        config.validate()?;

        tracing::info!("[config] Loaded config from: {}", path.display());
        Ok(config)
    }

    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| ConfigError::DirectoryCreationFailed {
                path: parent.display().to_string(),
                source: e,
            })?;
        }

        let json = serde_json::to_string_pretty(self).map_err(|e| ConfigError::SaveFailed {
            path: path.display().to_string(),
            source: Box::new(e),
        })?;
        fs::write(path, json).map_err(|e| ConfigError::SaveFailed {
            path: path.display().to_string(),
            source: Box::new(e),
        })?;

        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.ticket_prefix.trim().is_empty() || self.ticket_prefix.contains('-') {
            return Err(ConfigError::Invalid(format!(
                "ticket_prefix must be non-empty and contain no '-': {:?}",
                self.ticket_prefix
            )));
        }
        if self.booking_window_days == 0 {
            return Err(ConfigError::Invalid("booking_window_days must be positive".to_string()));
        }
        if let SlotStrategy::Randomized { availability } = self.slot_strategy {
            if !(0.0..=1.0).contains(&availability) {
                return Err(ConfigError::Invalid(format!(
                    "randomized availability must be 0.0-1.0, got {}",
                    availability
                )));
            }
        }
        Ok(())
    }

    /// Catalog named by `catalog_path`, or the embedded one
    pub fn load_catalog(&self) -> Result<Catalog, ConfigError> {
        match &self.catalog_path {
            Some(path) => Catalog::load_from(path),
            None => Catalog::embedded(),
        }
    }

    pub fn submit_delay(&self) -> Duration {
        Duration::from_millis(self.submit_delay_ms)
    }

    /// Settings file path: `$SPA_BOOKING_CONFIG`, else the platform config dir
    pub fn config_path() -> Result<PathBuf, ConfigError> {
        if let Ok(path) = env::var(CONFIG_PATH_ENV) {
            if !path.trim().is_empty() {
                return Ok(PathBuf::from(path));
            }
        }
        Ok(app_dir()?.join("config.json"))
    }
}

/// `<config_dir>/SpaBooking`
pub fn app_dir() -> Result<PathBuf, ConfigError> {
    dirs::config_dir()
        .map(|dir| dir.join(APP_DIR))
        .ok_or(ConfigError::NoConfigDir)
}
