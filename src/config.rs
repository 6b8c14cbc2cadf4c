//! Client configuration
//!
//! Loaded from YAML; every field has a default so running without a config
//! file talks to the built-in API root.

use directories::ProjectDirs;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

use crate::api::CacheKeyPolicy;
use crate::cache::DEFAULT_TTL_MINUTES;

/// API root used when nothing else is configured
pub const DEFAULT_API_ROOT: &str = "https://localhost:7215/api/v1";

/// Overrides `api_root`
pub const API_ROOT_ENV: &str = "ROIHR_API_ROOT";

/// Overrides `cache.dir`
pub const CACHE_DIR_ENV: &str = "ROIHR_CACHE_DIR";

/// Errors that can occur while loading configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    /// An explicitly requested config file does not exist
    #[error("Config file not found: {0}")]
    NotFound(PathBuf),

    #[error("Failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_yaml::Error,
    },
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Base URL every resource path is appended to
    pub api_root: String,
    pub request_timeout_secs: u64,
    pub cache: CacheConfig,
    pub connectivity: ConnectivityConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_root: DEFAULT_API_ROOT.to_string(),
            request_timeout_secs: 30,
            cache: CacheConfig::default(),
            connectivity: ConnectivityConfig::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Minutes before a cached response is treated as absent
    pub ttl_minutes: u32,
    /// Directory for cache files (default: XDG cache dir)
    pub dir: Option<PathBuf>,
    pub key_policy: CacheKeyPolicy,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl_minutes: DEFAULT_TTL_MINUTES,
            dir: None,
            key_policy: CacheKeyPolicy::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ConnectivityConfig {
    /// How long the reachability probe waits for a TCP connection
    pub probe_timeout_ms: u64,
}

impl Default for ConnectivityConfig {
    fn default() -> Self {
        Self {
            probe_timeout_ms: 1500,
        }
    }
}

impl Config {
    /// Load configuration.
    ///
    /// Search order:
    /// 1. Explicit path if provided (must exist)
    /// 2. ./roihr.yaml (current directory)
    /// 3. $XDG_CONFIG_HOME/roihr/config.yaml
    ///
    /// Falls back to defaults when no file is found. Environment overrides
    /// are applied last.
    pub fn load(explicit_path: Option<&Path>) -> Result<Self, ConfigError> {
        let path = match explicit_path {
            Some(p) if p.exists() => Some(p.to_path_buf()),
            Some(p) => return Err(ConfigError::NotFound(p.to_path_buf())),
            None => Self::find_config_file(),
        };

        let config = match path {
            Some(p) => Self::load_from_path(&p)?,
            None => Config::default(),
        };

        Ok(config.with_env_overrides(|key| std::env::var(key).ok()))
    }

    fn find_config_file() -> Option<PathBuf> {
        let local = PathBuf::from("roihr.yaml");
        if local.exists() {
            return Some(local);
        }

        let xdg_path = ProjectDirs::from("", "", "roihr")?
            .config_dir()
            .join("config.yaml");
        xdg_path.exists().then_some(xdg_path)
    }

    pub fn load_from_path(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        Self::from_yaml(&contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn from_yaml(contents: &str) -> Result<Self, serde_yaml::Error> {
        // An empty document deserializes as null, not as an empty mapping
        if contents.trim().is_empty() {
            return Ok(Config::default());
        }
        let mut config: Config = serde_yaml::from_str(contents)?;
        config.api_root = config.api_root.trim_end_matches('/').to_string();
        Ok(config)
    }

    /// Applies `ROIHR_API_ROOT` / `ROIHR_CACHE_DIR` as looked up by `lookup`
    pub fn with_env_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(root) = lookup(API_ROOT_ENV).filter(|v| !v.is_empty()) {
            self.api_root = root.trim_end_matches('/').to_string();
        }
        if let Some(dir) = lookup(CACHE_DIR_ENV).filter(|v| !v.is_empty()) {
            self.cache.dir = Some(PathBuf::from(dir));
        }
        self
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn probe_timeout(&self) -> Duration {
        Duration::from_millis(self.connectivity.probe_timeout_ms)
    }
}
