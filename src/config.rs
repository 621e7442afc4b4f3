use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Root configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub discovery: DiscoveryConfig,
    pub removal: RemovalConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DiscoveryConfig {
    /// Seconds to wait for `<runtime> --version` before giving up
    pub version_timeout_secs: u64,
    /// Maximum depth of the virtual environment walk (None = unlimited)
    pub walk_max_depth: Option<usize>,
    /// Roots of the virtual environment walk (empty = home, C:\, D:\)
    pub walk_roots: Vec<PathBuf>,
    /// Directory names the walk never descends into
    pub walk_exclude: Vec<String>,
    /// Extra path patterns checked alongside the built-in table
    pub extra_paths: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RemovalConfig {
    /// Seconds the bulk OS uninstall may run
    pub bulk_uninstall_timeout_secs: u64,
    /// Seconds a bundled uninstaller may run
    pub uninstaller_timeout_secs: u64,
    /// Invoke vendor uninstallers before deleting directories
    pub run_uninstallers: bool,
    /// Notify running applications after the environment changed
    pub broadcast_environment_change: bool,
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self {
            version_timeout_secs: 5,
            walk_max_depth: None,
            walk_roots: vec![],
            walk_exclude: vec![],
            extra_paths: vec![],
        }
    }
}

impl Default for RemovalConfig {
    fn default() -> Self {
        Self {
            bulk_uninstall_timeout_secs: 30,
            uninstaller_timeout_secs: 120,
            run_uninstallers: true,
            broadcast_environment_change: true,
        }
    }
}

impl DiscoveryConfig {
    pub fn version_timeout(&self) -> Duration {
        Duration::from_secs(self.version_timeout_secs)
    }
}

impl RemovalConfig {
    pub fn bulk_uninstall_timeout(&self) -> Duration {
        Duration::from_secs(self.bulk_uninstall_timeout_secs)
    }

    pub fn uninstaller_timeout(&self) -> Duration {
        Duration::from_secs(self.uninstaller_timeout_secs)
    }
}

impl Config {
    /// Load configuration from `path`, or from the default location.
    ///
    /// An explicit path must exist. A missing file at the default location
    /// yields the built-in defaults.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let config = match path {
            Some(path) => Self::from_file(path)?,
            None => match Self::default_path() {
                Some(path) if path.is_file() => Self::from_file(&path)?,
                _ => Self::default(),
            },
        };
        config.validate()?;
        Ok(config)
    }

    /// `%APPDATA%\runtime-purge\config.toml` on Windows.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("runtime-purge").join("config.toml"))
    }

    fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::ReadError {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&content).map_err(|source| ConfigError::ParseError {
            path: path.to_path_buf(),
            source,
        })
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.discovery.version_timeout_secs == 0 {
            return Err(ConfigError::Invalid(
                "discovery.version_timeout_secs must be greater than 0".into(),
            ));
        }
        if self.removal.bulk_uninstall_timeout_secs == 0
            || self.removal.uninstaller_timeout_secs == 0
        {
            return Err(ConfigError::Invalid(
                "removal timeouts must be greater than 0".into(),
            ));
        }
        Ok(())
    }
}
