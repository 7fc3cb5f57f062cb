//! Configuration management for MovieTUI
//!
//! Handles config file loading/saving and API key resolution.
//! Config is stored at ~/.config/movietui/config.toml unless `--config`
//! points elsewhere.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::api::tmdb::{DEFAULT_BASE_URL, DEFAULT_TIMEOUT_SECS};
use crate::api::TmdbClient;

/// Environment variable that overrides the configured API key
pub const API_KEY_ENV: &str = "TMDB_API_KEY";

/// Application configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// TMDB v3 API key
    pub tmdb_api_key: Option<String>,
    /// TMDB base URL (defaults to the public v3 API)
    pub base_url: Option<String>,
    /// Key-value storage file (favorites, theme, last search)
    pub storage_path: Option<PathBuf>,
    /// Directory for TUI log files
    pub log_dir: Option<PathBuf>,
    /// HTTP request timeout in seconds
    pub request_timeout_secs: Option<u64>,
}

impl Config {
    /// Get config file path (~/.config/movietui/config.toml)
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("movietui").join("config.toml"))
    }

    /// Load from `path`, or the default location. A missing file is an
    /// empty config; a malformed one is an error.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path.map(Path::to_path_buf).or_else(Self::default_path) {
            Some(path) => Self::load_from(&path),
            None => Ok(Self::default()),
        }
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = match std::fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(e) => {
                return Err(e).with_context(|| format!("Failed to read {}", path.display()))
            }
        };
        toml::from_str(&contents).with_context(|| format!("Invalid config file {}", path.display()))
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let toml = toml::to_string_pretty(self)?;
        std::fs::write(path, toml)?;
        Ok(())
    }

    /// Resolve the API key: environment variable first, then the config file
    pub fn api_key(&self) -> Result<String> {
        pick_api_key(std::env::var(API_KEY_ENV).ok(), self.tmdb_api_key.as_deref()).ok_or_else(
            || {
                anyhow::anyhow!(
                    "No TMDB API key configured. Set {} or tmdb_api_key in the config file",
                    API_KEY_ENV
                )
            },
        )
    }

    pub fn base_url(&self) -> &str {
        self.base_url.as_deref().unwrap_or(DEFAULT_BASE_URL)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS))
    }

    /// Storage file, defaulting to <data_dir>/movietui/storage.json
    pub fn storage_path(&self) -> PathBuf {
        self.storage_path
            .clone()
            .unwrap_or_else(|| data_dir().join("storage.json"))
    }

    /// Log directory, defaulting to <data_dir>/movietui/logs
    pub fn log_dir(&self) -> PathBuf {
        self.log_dir
            .clone()
            .unwrap_or_else(|| data_dir().join("logs"))
    }

    /// Build the TMDB client described by this config
    pub fn client(&self) -> Result<TmdbClient> {
        Ok(TmdbClient::with_options(
            self.api_key()?,
            self.base_url(),
            self.timeout(),
        ))
    }
}

fn data_dir() -> PathBuf {
    dirs::data_dir()
        .map(|p| p.join("movietui"))
        .unwrap_or_else(|| PathBuf::from(".movietui"))
}

/// First non-blank key from the environment value, then the configured one
fn pick_api_key(env: Option<String>, configured: Option<&str>) -> Option<String> {
    env.filter(|k| !k.trim().is_empty())
        .or_else(|| configured.filter(|k| !k.trim().is_empty()).map(str::to_string))
}
