//! Configuration management
//!
//! This module handles loading and managing configuration from:
//! - Command-line arguments
//! - Environment variables
//! - Configuration files (TOML)
//! - Defaults

use crate::error::{Error, Result};
use crate::graph::{ThemeVars, ViewMode};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Environment variable consulted when no API base URL is configured
pub const API_URL_ENV: &str = "NEO_TRANSFER_API_URL";

/// Top-level configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub default: DefaultConfig,

    #[serde(default)]
    pub api: ApiConfig,

    #[serde(default)]
    pub cache: CacheConfig,

    #[serde(default)]
    pub theme: ThemeConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Default settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DefaultConfig {
    #[serde(default = "default_source")]
    pub source: String,

    /// View shown first by the visualizer
    #[serde(default)]
    pub mode: ViewMode,
}

/// Query API configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Base URL of the query API, e.g. `http://localhost:8080`
    pub base_url: Option<String>,

    /// Request timeout in milliseconds
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    /// Maximum number of retries for API requests
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    /// Delay between retries in milliseconds
    #[serde(default = "default_retry_delay_ms")]
    pub retry_delay_ms: u64,
}

/// Cache configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Enable caching
    #[serde(default)]
    pub enabled: bool,

    /// Cache directory
    pub directory: Option<PathBuf>,

    /// Cache TTL in seconds
    #[serde(default = "default_cache_ttl_secs")]
    pub ttl_secs: u64,
}

/// Theme colours, hex literals or `hsl(H, S%, L%)`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ThemeConfig {
    #[serde(default = "default_primary")]
    pub primary: String,

    #[serde(default = "default_secondary")]
    pub secondary: String,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log file path
    pub file: Option<PathBuf>,
}

// Default value functions

fn default_source() -> String {
    "http".to_string()
}

fn default_timeout_ms() -> u64 {
    30_000
}

fn default_max_retries() -> u32 {
    3
}

fn default_retry_delay_ms() -> u64 {
    1000
}

fn default_cache_ttl_secs() -> u64 {
    3600
}

fn default_primary() -> String {
    "hsl(195, 85%, 41%)".to_string()
}

fn default_secondary() -> String {
    "hsl(205, 15%, 41%)".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

// Default implementations

impl Default for DefaultConfig {
    fn default() -> Self {
        Self {
            source: default_source(),
            mode: ViewMode::default(),
        }
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            timeout_ms: default_timeout_ms(),
            max_retries: default_max_retries(),
            retry_delay_ms: default_retry_delay_ms(),
        }
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            directory: None,
            ttl_secs: default_cache_ttl_secs(),
        }
    }
}

impl Default for ThemeConfig {
    fn default() -> Self {
        Self {
            primary: default_primary(),
            secondary: default_secondary(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file: None,
        }
    }
}

impl Config {
    /// Load configuration from file
    pub fn from_file(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let contents = std::fs::read_to_string(&path)
            .map_err(|e| Error::Config(format!("Failed to read config file {:?}: {}", path, e)))?;

        let config: Config = toml::from_str(&contents).map_err(|e| Error::ConfigParse {
            file: path.clone(),
            message: e.to_string(),
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Reject settings that cannot work at runtime
    pub fn validate(&self) -> Result<()> {
        crate::ensure!(self.api.timeout_ms > 0, "[api] timeout_ms must be positive");
        if let Some(url) = &self.api.base_url {
            crate::ensure!(
                url.starts_with("http://") || url.starts_with("https://"),
                "[api] base_url must be an http(s) URL, got {:?}",
                url
            );
        }
        Ok(())
    }

    /// Load configuration from default locations
    ///
    /// Searches in order:
    /// 1. ./config.toml
    /// 2. ~/.neo-transfer-viz/config.toml
    /// 3. /etc/neo-transfer-viz/config.toml
    pub fn load() -> Result<Self> {
        let mut paths = vec![PathBuf::from("config.toml")];
        if let Some(home) = dirs::home_dir() {
            paths.push(home.join(".neo-transfer-viz").join("config.toml"));
        }
        paths.push(PathBuf::from("/etc/neo-transfer-viz/config.toml"));

        for path in paths {
            if path.exists() {
                tracing::info!("Loading config from {:?}", path);
                return Self::from_file(path);
            }
        }

        tracing::info!("No config file found, using defaults");
        Ok(Config::default())
    }

    /// Get the API base URL from config or environment
    pub fn api_base_url(&self) -> Result<String> {
        if let Some(url) = &self.api.base_url {
            return Ok(url.trim_end_matches('/').to_string());
        }

        std::env::var(API_URL_ENV)
            .map(|url| url.trim_end_matches('/').to_string())
            .map_err(|_| {
                Error::MissingConfig(format!(
                    "API base URL not found. Set {} environment variable or configure [api] base_url",
                    API_URL_ENV
                ))
            })
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.api.timeout_ms)
    }

    pub fn retry_delay(&self) -> Duration {
        Duration::from_millis(self.api.retry_delay_ms)
    }

    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache.ttl_secs)
    }

    /// Get cache directory with fallback to default
    pub fn cache_directory(&self) -> PathBuf {
        self.cache.directory.clone().unwrap_or_else(|| {
            dirs::cache_dir()
                .map(|c| c.join("neo-transfer-viz"))
                .unwrap_or_else(|| PathBuf::from("/tmp/neo-transfer-viz-cache"))
        })
    }

    /// Theme custom properties for the renderer
    pub fn theme_vars(&self) -> ThemeVars {
        ThemeVars::new(&self.theme.primary, &self.theme.secondary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.default.source, "http");
        assert_eq!(config.default.mode, ViewMode::Sender);
        assert_eq!(config.api.max_retries, 3);
        assert_eq!(config.request_timeout(), Duration::from_secs(30));
        assert_eq!(config.logging.level, "info");
        assert!(config.theme.primary.starts_with("hsl("));
    }

    #[test]
    fn test_parse_toml_config() {
        let toml = r##"
[default]
source = "mock"
mode = "participant"

[api]
base_url = "http://localhost:8080/"
max_retries = 5

[theme]
primary = "#336699"

[logging]
level = "debug"
        "##;

        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.default.source, "mock");
        assert_eq!(config.default.mode, ViewMode::Participant);
        assert_eq!(config.api_base_url().unwrap(), "http://localhost:8080");
        assert_eq!(config.api.max_retries, 5);
        assert_eq!(config.api.retry_delay_ms, 1000);
        assert_eq!(config.theme.primary, "#336699");
        assert_eq!(config.theme.secondary, "hsl(205, 15%, 41%)");
        assert_eq!(config.logging.level, "debug");
    }

    #[test]
    fn test_validate() {
        assert!(Config::default().validate().is_ok());

        let mut config = Config::default();
        config.api.timeout_ms = 0;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.api.base_url = Some("localhost:8080".to_string());
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("http(s) URL"));
    }

    #[test]
    fn test_theme_vars_resolve() {
        let config = Config::default();
        let sheet = crate::graph::style(&config.theme_vars()).unwrap();
        assert_eq!(sheet.node_fill, "#1095c1");
    }
}
