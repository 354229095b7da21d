//! Configuration loading
//!
//! The config lives at `<config dir>/hackatime-doctor/config.toml`. A missing
//! file means defaults; missing keys fall back to their defaults individually.

pub mod defaults;
pub mod types;

pub use types::{Config, ConfigError};

use std::path::{Path, PathBuf};
use std::time::Duration;

impl Config {
    pub fn default_path() -> Result<PathBuf, ConfigError> {
        let dir = dirs::config_dir().ok_or(ConfigError::NoConfigDir)?;
        Ok(dir.join("hackatime-doctor").join("config.toml"))
    }

    /// Load from the default location
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&Self::default_path()?)
    }

    /// Load from `path`; a nonexistent file yields the defaults
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Ok(toml::from_str(&content)?)
    }

    /// Write the default config to the default location unless one exists
    pub fn init() -> Result<PathBuf, ConfigError> {
        let path = Self::default_path()?;
        Self::init_at(&path)?;
        Ok(path)
    }

    /// Returns false when a file was already present
    pub fn init_at(path: &Path) -> Result<bool, ConfigError> {
        if path.exists() {
            return Ok(false);
        }
        let io_err = |source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        };
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(io_err)?;
        }
        std::fs::write(path, Self::default().to_toml()?).map_err(io_err)?;
        Ok(true)
    }

    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    pub fn print(&self) -> Result<(), ConfigError> {
        println!("{}", self.to_toml()?);
        Ok(())
    }

    pub fn check(&self) -> Result<(), ConfigError> {
        if self.timeout_secs == 0 {
            return Err(ConfigError::Invalid("timeout_secs must be greater than 0".into()));
        }
        if !self.heartbeat_path.starts_with('/') {
            return Err(ConfigError::Invalid(format!(
                "heartbeat_path must start with '/', got {:?}",
                self.heartbeat_path
            )));
        }
        if self.required_files.iter().any(|name| name.trim().is_empty()) {
            return Err(ConfigError::Invalid("required_files contains an empty name".into()));
        }
        Ok(())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}
