//! Configuration loading and validation.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

/// Core stats API (upstream) configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpstreamConfig {
    /// Base URL of the core stats API
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,

    /// User agent string
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// How long cached upstream responses stay fresh, in seconds
    #[serde(default = "default_cache_ttl")]
    pub cache_ttl_seconds: u64,
}

fn default_base_url() -> String {
    "http://localhost:9000".to_string()
}

fn default_timeout() -> u64 {
    30
}

fn default_user_agent() -> String {
    format!("bfhub/{}", env!("CARGO_PKG_VERSION"))
}

fn default_cache_ttl() -> u64 {
    300
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_seconds: default_timeout(),
            user_agent: default_user_agent(),
            cache_ttl_seconds: default_cache_ttl(),
        }
    }
}

/// HTTP server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_cors_origin")]
    pub cors_origin: String,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_cors_origin() -> String {
    "*".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cors_origin: default_cors_origin(),
        }
    }
}

/// Background refresh configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PollConfig {
    /// Interval between live server state refreshes (e.g. "30s")
    #[serde(default = "default_live_interval")]
    pub live_interval: String,

    /// How long non-live snapshots (leaderboards, challenges, reports)
    /// stay fresh, in seconds
    #[serde(default = "default_snapshot_ttl")]
    pub snapshot_ttl_seconds: u64,
}

fn default_live_interval() -> String {
    "30s".to_string()
}

fn default_snapshot_ttl() -> u64 {
    120
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            live_interval: default_live_interval(),
            snapshot_ttl_seconds: default_snapshot_ttl(),
        }
    }
}

/// Main application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Directory for the upstream response cache
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Shared secret for moderation routes. Unset disables them.
    #[serde(default)]
    pub admin_token: Option<String>,

    #[serde(default)]
    pub upstream: UpstreamConfig,

    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub poll: PollConfig,
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("./data")
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            log_level: default_log_level(),
            admin_token: None,
            upstream: UpstreamConfig::default(),
            server: ServerConfig::default(),
            poll: PollConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration from a TOML file.
    pub fn from_file(path: &PathBuf) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        let config: AppConfig = toml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from a TOML file if it exists, otherwise fall back to defaults.
    pub fn from_file_or_default(path: &PathBuf) -> Result<Self, ConfigError> {
        if path.exists() {
            Self::from_file(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.upstream.timeout_seconds == 0 {
            return Err(ConfigError::ValidationError(
                "Upstream timeout must be greater than 0".to_string(),
            ));
        }

        if self.server.port == 0 {
            return Err(ConfigError::ValidationError(
                "Server port must be greater than 0".to_string(),
            ));
        }

        if url::Url::parse(&self.upstream.base_url).is_err() {
            return Err(ConfigError::ValidationError(format!(
                "Upstream base_url is not a valid URL: {}",
                self.upstream.base_url
            )));
        }

        if crate::parse_duration(&self.poll.live_interval).is_none() {
            return Err(ConfigError::ValidationError(format!(
                "Invalid poll.live_interval: {}",
                self.poll.live_interval
            )));
        }

        if let Some(token) = &self.admin_token {
            if token.trim().is_empty() {
                return Err(ConfigError::ValidationError(
                    "admin_token must not be blank (omit it to disable moderation)".to_string(),
                ));
            }
        }

        Ok(())
    }

    /// Parsed live poll interval.
    pub fn live_interval(&self) -> std::time::Duration {
        crate::parse_duration(&self.poll.live_interval)
            .unwrap_or(std::time::Duration::from_secs(30))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();

        assert_eq!(config.data_dir, PathBuf::from("./data"));
        assert_eq!(config.log_level, "info");
        assert_eq!(config.upstream.base_url, "http://localhost:9000");
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.poll.live_interval, "30s");
        assert!(config.admin_token.is_none());
    }

    #[test]
    fn test_config_validation_ok() {
        let config = AppConfig::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_validation_bad_timeout() {
        let mut config = AppConfig::default();
        config.upstream.timeout_seconds = 0;

        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_validation_bad_port() {
        let mut config = AppConfig::default();
        config.server.port = 0;

        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_validation_bad_base_url() {
        let mut config = AppConfig::default();
        config.upstream.base_url = "not a url".to_string();

        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_validation_bad_interval() {
        let mut config = AppConfig::default();
        config.poll.live_interval = "soon".to_string();

        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_validation_blank_admin_token() {
        let mut config = AppConfig::default();
        config.admin_token = Some("   ".to_string());

        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_serialization() {
        let config = AppConfig::default();
        let toml_str = toml::to_string(&config).unwrap();

        let parsed: AppConfig = toml::from_str(&toml_str).unwrap();
        assert_eq!(config.data_dir, parsed.data_dir);
        assert_eq!(config.upstream.base_url, parsed.upstream.base_url);
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let parsed: AppConfig = toml::from_str(
            r#"
            [upstream]
            base_url = "http://stats.example.net:9000"
            "#,
        )
        .unwrap();

        assert_eq!(parsed.upstream.base_url, "http://stats.example.net:9000");
        assert_eq!(parsed.upstream.timeout_seconds, 30);
        assert_eq!(parsed.server.port, 8080);
    }

    #[test]
    fn test_live_interval_parsed() {
        let mut config = AppConfig::default();
        config.poll.live_interval = "2m".to_string();
        assert_eq!(config.live_interval(), std::time::Duration::from_secs(120));
    }
}
