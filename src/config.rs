use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::models::SyncEndpoint;

/// Source of a configuration value
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ConfigSource {
    Default,
    File,
    Environment,
}

impl std::fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigSource::Default => write!(f, "default"),
            ConfigSource::File => write!(f, "file"),
            ConfigSource::Environment => write!(f, "environment"),
        }
    }
}

/// A configuration value with its source
#[derive(Debug, Clone, Serialize)]
pub struct ConfigValue<T> {
    pub value: T,
    pub source: ConfigSource,
}

impl<T> ConfigValue<T> {
    pub fn new(value: T, source: ConfigSource) -> Self {
        Self { value, source }
    }
}

const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;

/// Application configuration with source tracking
#[derive(Debug, Clone, Serialize)]
pub struct Config {
    /// Path to the SQLite message database
    pub database_path: ConfigValue<PathBuf>,
    /// Path to the human-readable status log
    pub log_path: ConfigValue<PathBuf>,
    /// Timeout for each web service request
    pub http_timeout_secs: ConfigValue<u64>,
    /// Config file path used (if any)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub config_file: Option<PathBuf>,
    /// Web service endpoints to sync with
    pub endpoints: Vec<SyncEndpoint>,
}

/// Internal struct for deserializing config file
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct ConfigFile {
    database_path: Option<PathBuf>,
    log_path: Option<PathBuf>,
    http_timeout_secs: Option<u64>,
    endpoints: Vec<SyncEndpoint>,
}

impl Config {
    /// Load configuration with priority: env vars > config file > defaults
    pub fn load(config_path: Option<PathBuf>) -> Result<Self, ConfigError> {
        let data_dir = Self::default_data_dir();

        // Start with defaults
        let mut database_path =
            ConfigValue::new(data_dir.join("messages.db"), ConfigSource::Default);
        let mut log_path = ConfigValue::new(data_dir.join("smssync.log"), ConfigSource::Default);
        let mut http_timeout_secs =
            ConfigValue::new(DEFAULT_HTTP_TIMEOUT_SECS, ConfigSource::Default);
        let mut config_file = None;
        let mut endpoints = Vec::new();

        // Try to load from config file
        let path = config_path.unwrap_or_else(Self::default_config_path);
        if path.exists() {
            let contents = std::fs::read_to_string(&path)
                .map_err(|e| ConfigError::ReadError(path.clone(), e))?;
            let file_config: ConfigFile = serde_yaml::from_str(&contents)
                .map_err(|e| ConfigError::ParseError(path.clone(), e))?;

            config_file = Some(path.clone());

            if let Some(db_path) = file_config.database_path {
                database_path = ConfigValue::new(resolve(&path, db_path), ConfigSource::File);
            }
            if let Some(log) = file_config.log_path {
                log_path = ConfigValue::new(resolve(&path, log), ConfigSource::File);
            }
            if let Some(timeout) = file_config.http_timeout_secs {
                http_timeout_secs = ConfigValue::new(timeout, ConfigSource::File);
            }
            endpoints = file_config.endpoints;
        }

        // Apply environment variable overrides
        if let Ok(db_path) = std::env::var("SMSSYNC_DATABASE_PATH") {
            database_path = ConfigValue::new(PathBuf::from(db_path), ConfigSource::Environment);
        }
        if let Ok(log) = std::env::var("SMSSYNC_LOG_PATH") {
            log_path = ConfigValue::new(PathBuf::from(log), ConfigSource::Environment);
        }
        if let Ok(timeout) = std::env::var("SMSSYNC_HTTP_TIMEOUT") {
            let secs = timeout.trim().parse().map_err(|_| {
                ConfigError::InvalidValue("SMSSYNC_HTTP_TIMEOUT".to_string(), timeout.clone())
            })?;
            http_timeout_secs = ConfigValue::new(secs, ConfigSource::Environment);
        }

        Ok(Self {
            database_path,
            log_path,
            http_timeout_secs,
            config_file,
            endpoints,
        })
    }

    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout_secs.value)
    }

    pub fn enabled_endpoints(&self) -> impl Iterator<Item = &SyncEndpoint> {
        self.endpoints.iter().filter(|e| e.is_enabled())
    }

    /// Copy of this configuration with endpoint secrets masked, for display.
    pub fn redacted(&self) -> Self {
        let mut config = self.clone();
        for endpoint in &mut config.endpoints {
            endpoint.secret = endpoint.masked_secret();
        }
        config
    }

    /// Default config directory (platform-specific):
    /// - Linux: ~/.config/smssync/
    /// - macOS: ~/Library/Application Support/smssync/
    /// - Windows: %APPDATA%/smssync/
    pub fn default_config_dir() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("smssync")
    }

    /// Default data directory (platform-specific):
    /// - Linux: ~/.local/share/smssync/
    /// - macOS: ~/Library/Application Support/smssync/
    /// - Windows: %APPDATA%/smssync/
    pub fn default_data_dir() -> PathBuf {
        dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("smssync")
    }

    /// Default config file path (platform-specific config dir + config.yaml)
    pub fn default_config_path() -> PathBuf {
        Self::default_config_dir().join("config.yaml")
    }
}

/// Resolve relative paths against the config file's directory
fn resolve(config_path: &Path, path: PathBuf) -> PathBuf {
    if path.is_relative() {
        config_path
            .parent()
            .map(|p| p.join(&path))
            .unwrap_or(path)
    } else {
        path
    }
}

#[derive(Debug)]
pub enum ConfigError {
    ReadError(PathBuf, std::io::Error),
    ParseError(PathBuf, serde_yaml::Error),
    InvalidValue(String, String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::ReadError(path, e) => {
                write!(f, "Failed to read config file '{}': {}", path.display(), e)
            }
            ConfigError::ParseError(path, e) => {
                write!(f, "Failed to parse config file '{}': {}", path.display(), e)
            }
            ConfigError::InvalidValue(name, value) => {
                write!(f, "Invalid value '{}' for {}", value, name)
            }
        }
    }
}

impl std::error::Error for ConfigError {}
