//! CLI configuration
//!
//! Resolution order, later wins:
//! 1. built-in defaults
//! 2. TOML file (`--config`, or `lunch.toml` in the working directory if present)
//! 3. environment: `LUNCH_DB`, `LUNCH_LOG` (a `.env` file is loaded first)
//! 4. the `--db` flag

use std::fs;
use std::path::{Path, PathBuf};

use lunch_core::logging_facility::Profile;
use serde::Deserialize;
use thiserror::Error;

pub const DEFAULT_CONFIG_FILE: &str = "lunch.toml";
pub const DEFAULT_DB_PATH: &str = "school_lunch.db";

pub const ENV_DB: &str = "LUNCH_DB";
pub const ENV_LOG: &str = "LUNCH_LOG";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config file {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid config file {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("invalid log profile: {0}")]
    LogProfile(String),
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LunchConfig {
    pub db_path: PathBuf,
    /// `dev`, `prod`, `quiet` or `test`
    pub log_profile: String,
    /// Install the starter menu on `init` even without `--sample-data`
    pub sample_data: bool,
}

impl Default for LunchConfig {
    fn default() -> Self {
        Self {
            db_path: PathBuf::from(DEFAULT_DB_PATH),
            log_profile: "quiet".to_string(),
            sample_data: false,
        }
    }
}

impl LunchConfig {
    pub fn from_toml(content: &str, path: &Path) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Apply environment overrides through `lookup` (normally `std::env::var`)
    pub fn with_env<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(db) = lookup(ENV_DB).filter(|v| !v.trim().is_empty()) {
            self.db_path = PathBuf::from(db);
        }
        if let Some(log) = lookup(ENV_LOG).filter(|v| !v.trim().is_empty()) {
            self.log_profile = log;
        }
        self
    }

    pub fn with_db_override(mut self, db: Option<PathBuf>) -> Self {
        if let Some(db) = db {
            self.db_path = db;
        }
        self
    }

    pub fn profile(&self) -> Result<Profile, ConfigError> {
        self.log_profile.parse().map_err(ConfigError::LogProfile)
    }
}

/// Load the effective configuration.
///
/// An explicit `config_path` must exist; the default `lunch.toml` is
/// optional.
pub fn load(config_path: Option<&Path>, db_override: Option<PathBuf>) -> Result<LunchConfig, ConfigError> {
    let file_config = match config_path {
        Some(path) => Some(read_file(path)?),
        None => {
            let default_path = Path::new(DEFAULT_CONFIG_FILE);
            if default_path.is_file() {
                Some(read_file(default_path)?)
            } else {
                None
            }
        }
    };

    Ok(file_config
        .unwrap_or_default()
        .with_env(|key| std::env::var(key).ok())
        .with_db_override(db_override))
}

fn read_file(path: &Path) -> Result<LunchConfig, ConfigError> {
    let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    LunchConfig::from_toml(&content, path)
}
