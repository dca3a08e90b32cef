//! Configuration management for Bat-Q.
//!
//! Handles loading configuration from TOML files and environment variables:
//! the analysis engine endpoint, the query catalog location, the session
//! store location and logging preferences.

use crate::error::{BatqError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use url::Url;

/// Environment variable selecting the analysis engine host.
pub const SERVER_ENV: &str = "BATFISH_SERVER";

/// Host used when neither the config file nor the environment names one.
pub const DEFAULT_HOST: &str = "127.0.0.1";

/// Main configuration structure for Bat-Q.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Analysis engine settings.
    #[serde(default)]
    pub server: ServerConfig,

    /// Query catalog settings.
    #[serde(default)]
    pub catalog: CatalogConfig,

    /// Session store settings.
    #[serde(default)]
    pub session: SessionConfig,

    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Analysis engine connection configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Engine host. Falls back to `BATFISH_SERVER`, then to the loopback address.
    pub host: Option<String>,

    /// Port of the engine's HTTP API.
    #[serde(default = "default_port")]
    pub port: u16,

    /// Port used by the reachability probe.
    #[serde(default = "default_port")]
    pub probe_port: u16,

    /// Network that holds all snapshots.
    #[serde(default = "default_network")]
    pub network: String,

    /// Timeout for engine requests, in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Timeout for the reachability probe, in seconds.
    #[serde(default = "default_probe_timeout_secs")]
    pub probe_timeout_secs: u64,
}

fn default_port() -> u16 {
    9996
}

fn default_network() -> String {
    "NETWORK".to_string()
}

fn default_timeout_secs() -> u64 {
    120
}

fn default_probe_timeout_secs() -> u64 {
    5
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: None,
            port: default_port(),
            probe_port: default_port(),
            network: default_network(),
            timeout_secs: default_timeout_secs(),
            probe_timeout_secs: default_probe_timeout_secs(),
        }
    }
}

impl ServerConfig {
    /// Applies `BATFISH_SERVER` when no host was configured.
    pub fn apply_env_defaults(&mut self) {
        if self.host.is_none() {
            self.host = std::env::var(SERVER_ENV)
                .ok()
                .filter(|h| !h.trim().is_empty());
        }
    }

    /// Returns the configured host or the loopback default.
    pub fn host(&self) -> &str {
        self.host.as_deref().unwrap_or(DEFAULT_HOST)
    }

    /// Builds the base URL of the engine API.
    pub fn base_url(&self) -> Result<Url> {
        let host = self.host();
        // IPv6 literals are bracketed in URLs.
        let raw = if host.contains(':') && !host.starts_with('[') {
            format!("http://[{}]:{}/", host, self.port)
        } else {
            format!("http://{}:{}/", host, self.port)
        };
        Url::parse(&raw).map_err(|e| {
            BatqError::config(format!("Invalid engine address '{}': {e}", self.host()))
        })
    }

    /// Request timeout for engine calls.
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Timeout for the reachability probe.
    pub fn probe_timeout(&self) -> Duration {
        Duration::from_secs(self.probe_timeout_secs)
    }

    /// Returns a display string for UI purposes.
    pub fn display_string(&self) -> String {
        format!("{}:{} (network {})", self.host(), self.port, self.network)
    }
}

/// Query catalog configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogConfig {
    /// Path to the YAML catalog of questions.
    #[serde(default = "default_catalog_path")]
    pub path: PathBuf,
}

fn default_catalog_path() -> PathBuf {
    PathBuf::from("questions.yaml")
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            path: default_catalog_path(),
        }
    }
}

/// Session store configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct SessionConfig {
    /// Path of the session file. Defaults to the platform state directory.
    pub path: Option<PathBuf>,
}

impl SessionConfig {
    /// Returns the session file path to use.
    pub fn path(&self) -> PathBuf {
        self.path.clone().unwrap_or_else(default_session_path)
    }
}

fn default_session_path() -> PathBuf {
    dirs::state_dir()
        .or_else(dirs::data_local_dir)
        .unwrap_or_else(std::env::temp_dir)
        .join("batq")
        .join("session.json")
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Default filter directive when `RUST_LOG` is not set.
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Write logs to a file in the state directory instead of stderr.
    #[serde(default)]
    pub file: bool,
}

fn default_log_level() -> String {
    "warn".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file: false,
        }
    }
}

impl Config {
    /// Returns the default config file path for the current platform.
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("batq")
            .join("config.toml")
    }

    /// Loads configuration from a TOML file.
    pub fn load_from_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)
            .map_err(|e| BatqError::config(format!("Failed to read config file: {e}")))?;

        Self::parse_toml(&content, path)
    }

    /// Parses configuration from a TOML string.
    fn parse_toml(content: &str, path: &Path) -> Result<Self> {
        toml::from_str(content).map_err(|e| {
            BatqError::config(format!(
                "Configuration error in {}:\n  {}",
                path.display(),
                e
            ))
        })
    }
}
