//! Configuration loading and management
//!
//! Handles the per-user `config.toml`, which names the storage root and the
//! year being tracked. The file lives at `~/.config/tenthousand/config.toml`
//! unless another path is given on the command line.

use std::path::{Path, PathBuf};

use chrono::{Datelike, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{Error, Result};
use crate::lock;

/// Application name used for the default config and state directories
pub const APP_NAME: &str = "tenthousand";

/// Repetitions a task aims for over one year
pub const DEFAULT_GOAL: u64 = 10_000;

/// Main configuration structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Root directory holding one subdirectory per tracked year
    #[serde(default = "default_root")]
    pub root: PathBuf,

    /// Year whose task files are read and written
    #[serde(default = "default_year")]
    pub year: i32,

    /// Target count per task for the year
    #[serde(default = "default_goal")]
    pub goal: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            root: default_root(),
            year: default_year(),
            goal: default_goal(),
        }
    }
}

fn home_dir() -> PathBuf {
    directories::BaseDirs::new()
        .map(|dirs| dirs.home_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from("."))
}

fn default_root() -> PathBuf {
    home_dir().join(".local").join("state").join(APP_NAME)
}

fn default_year() -> i32 {
    Utc::now().year()
}

fn default_goal() -> u64 {
    DEFAULT_GOAL
}

/// Location of the config file when none is given explicitly
pub fn default_config_path() -> PathBuf {
    home_dir().join(".config").join(APP_NAME).join("config.toml")
}

/// A config together with where it came from
#[derive(Debug, Clone)]
pub struct LoadedConfig {
    pub config: Config,
    pub path: PathBuf,
    /// True when the file did not exist and was written with defaults
    pub created: bool,
}

impl Config {
    /// Load configuration from a TOML file
    ///
    /// A missing file is reported as `ConfigNotFound`.
    pub fn load(path: &Path) -> Result<Self> {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                return Err(Error::ConfigNotFound(path.to_path_buf()));
            }
            Err(err) => return Err(err.into()),
        };
        let config: Config = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Resolve the config for this invocation
    ///
    /// `None` means the default per-user location.
    pub fn resolve(path: Option<&Path>) -> Result<LoadedConfig> {
        let default_path = default_config_path();
        let path = path.unwrap_or(default_path.as_path());
        Self::load_or_bootstrap(path, &default_path)
    }

    /// Load `path`, writing a default config first if `path` is the default
    /// location and nothing is there yet
    pub fn load_or_bootstrap(path: &Path, default_path: &Path) -> Result<LoadedConfig> {
        if path == default_path && !path.exists() {
            let config = Config::default();
            config.save(path)?;
            info!(path = %path.display(), "created default config");
            return Ok(LoadedConfig {
                config,
                path: path.to_path_buf(),
                created: true,
            });
        }

        Ok(LoadedConfig {
            config: Self::load(path)?,
            path: path.to_path_buf(),
            created: false,
        })
    }

    /// Save configuration to a file
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self)?;
        lock::write_atomic(path, content.as_bytes())
    }

    /// Directory holding the task files for the configured year
    pub fn store_dir(&self) -> PathBuf {
        self.root.join(self.year.to_string())
    }

    fn validate(&self) -> Result<()> {
        if self.root.as_os_str().is_empty() {
            return Err(Error::InvalidConfig("root cannot be empty".to_string()));
        }
        if !(1..=9999).contains(&self.year) {
            return Err(Error::InvalidConfig(format!(
                "year must be between 1 and 9999, got {}",
                self.year
            )));
        }
        if self.goal == 0 {
            return Err(Error::InvalidConfig("goal must be > 0".to_string()));
        }
        Ok(())
    }
}
