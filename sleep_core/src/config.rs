//! Configuration file support for sleepq.
//!
//! Configuration is loaded from `$XDG_CONFIG_HOME/sleepq/config.toml`.
//! Every section is optional.

use crate::estimator::EstimatorVersion;
use crate::suggest::SuggestionThresholds;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Application configuration
#[derive(Clone, Debug, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub data: DataConfig,

    #[serde(default)]
    pub estimator: EstimatorConfig,

    #[serde(default)]
    pub suggestions: SuggestionThresholds,
}

/// Data storage configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DataConfig {
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
        }
    }
}

/// Which weight table new entries are scored with
#[derive(Clone, Debug, Serialize, Deserialize, Default)]
pub struct EstimatorConfig {
    #[serde(default)]
    pub version: EstimatorVersion,
}

fn default_data_dir() -> PathBuf {
    dirs::data_local_dir()
        .or_else(|| dirs::home_dir().map(|home| home.join(".local/share")))
        .unwrap_or_else(|| PathBuf::from("."))
        .join("sleepq")
}

impl Config {
    /// Load configuration from the standard config path
    pub fn load() -> Result<Self> {
        let config_path = Self::default_config_path()?;
        if config_path.exists() {
            Self::load_from(&config_path)
        } else {
            tracing::info!(
                "No config file found at {:?}, using defaults",
                config_path
            );
            Ok(Self::default())
        }
    }

    /// Load configuration from a specific path
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        config.validate()?;
        tracing::info!("Loaded config from {:?}", path);
        Ok(config)
    }

    /// Get the default config file path
    pub fn default_config_path() -> Result<PathBuf> {
        let base = dirs::config_dir()
            .or_else(|| dirs::home_dir().map(|home| home.join(".config")))
            .ok_or_else(|| Error::Config("cannot determine a config directory".into()))?;
        Ok(base.join("sleepq").join("config.toml"))
    }

    fn validate(&self) -> Result<()> {
        let s = &self.suggestions;
        if s.short_sleep_hours >= s.long_sleep_hours {
            return Err(Error::Config(format!(
                "short_sleep_hours ({}) must be below long_sleep_hours ({})",
                s.short_sleep_hours, s.long_sleep_hours
            )));
        }
        Ok(())
    }
}
