//! Configuration management for kafka-connect-exporter
//!
//! Handles loading and validating configuration from YAML files.

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use thiserror::Error;
use url::Url;

use crate::collector::FailurePolicy;

/// URL schemes Kafka Connect can be scraped over
const SUPPORTED_SCHEMES: &[&str] = &["http", "https"];

/// Paths served by the exporter itself
const RESERVED_PATHS: &[&str] = &["/", "/health"];

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Error reading the configuration file
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    /// Error parsing the configuration file
    #[error("Failed to parse config file: {0}")]
    ParseError(#[from] serde_yaml::Error),

    /// Scrape URI is not a URL
    #[error("Invalid scrape URI '{uri}': {source}")]
    InvalidUrl {
        uri: String,
        #[source]
        source: url::ParseError,
    },

    /// Scrape URI uses something other than http/https
    #[error("Scheme '{0}' not supported, use http or https")]
    UnsupportedScheme(String),

    /// Configuration validation error
    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Kafka Connect endpoint configuration
    #[serde(default)]
    pub connect: ConnectConfig,

    /// HTTP server configuration
    #[serde(default)]
    pub server: ServerConfig,
}

/// Kafka Connect endpoint configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConnectConfig {
    /// Kafka Connect REST URL
    #[serde(default = "default_connect_url")]
    pub url: String,

    /// Per-request timeout in milliseconds
    #[serde(default = "default_timeout")]
    pub timeout_ms: u64,

    /// Behaviour when a single connector's status cannot be fetched
    #[serde(default)]
    pub failure_policy: FailurePolicy,

    /// Deadline for a whole scrape cycle in milliseconds, if any.
    /// A Prometheus scrape timeout header takes precedence.
    #[serde(default)]
    pub scrape_timeout_ms: Option<u64>,

    /// Subtracted from the Prometheus scrape timeout header so the response
    /// still reaches Prometheus before it gives up
    #[serde(default = "default_timeout_offset")]
    pub timeout_offset_ms: u64,
}

/// HTTP server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Metrics endpoint path
    #[serde(default = "default_metrics_path")]
    pub path: String,

    /// Server bind address
    #[serde(default = "default_bind_address")]
    pub bind_address: String,
}

// Default value functions
fn default_connect_url() -> String {
    "http://127.0.0.1:8080".to_string()
}

fn default_timeout() -> u64 {
    3000
}

fn default_timeout_offset() -> u64 {
    500
}

fn default_port() -> u16 {
    8080
}

fn default_metrics_path() -> String {
    "/metrics".to_string()
}

fn default_bind_address() -> String {
    "0.0.0.0".to_string()
}

impl Default for ConnectConfig {
    fn default() -> Self {
        Self {
            url: default_connect_url(),
            timeout_ms: default_timeout(),
            failure_policy: FailurePolicy::default(),
            scrape_timeout_ms: None,
            timeout_offset_ms: default_timeout_offset(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
            path: default_metrics_path(),
            bind_address: default_bind_address(),
        }
    }
}

impl ConnectConfig {
    /// Parse the scrape URI, rejecting anything but http/https
    pub fn parsed_url(&self) -> Result<Url, ConfigError> {
        let url = Url::parse(&self.url).map_err(|source| ConfigError::InvalidUrl {
            uri: self.url.clone(),
            source,
        })?;

        if !SUPPORTED_SCHEMES.contains(&url.scheme()) {
            return Err(ConfigError::UnsupportedScheme(url.scheme().to_string()));
        }

        Ok(url)
    }

    /// Per-request timeout
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Whole-cycle deadline, if configured
    pub fn scrape_timeout(&self) -> Option<Duration> {
        self.scrape_timeout_ms.map(Duration::from_millis)
    }

    /// Margin taken off a scraper-provided timeout
    pub fn timeout_offset(&self) -> Duration {
        Duration::from_millis(self.timeout_offset_ms)
    }
}

impl Config {
    /// Load configuration from a YAML file
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or parsed.
    /// Validation is left to the caller so that CLI overrides can be
    /// applied first.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path.as_ref())?;
        Self::from_yaml(&contents)
    }

    /// Parse configuration from a YAML string
    pub fn from_yaml(contents: &str) -> Result<Self, ConfigError> {
        Ok(serde_yaml::from_str(contents)?)
    }

    /// Load configuration from a YAML file, falling back to defaults if not found
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();

        if !path.exists() {
            tracing::warn!(
                path = %path.display(),
                "Config file not found, using defaults"
            );
            return Ok(Self::default());
        }

        Self::load(path)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.connect.parsed_url()?;

        if self.connect.timeout_ms == 0 {
            return Err(ConfigError::ValidationError(
                "Request timeout must be greater than 0".to_string(),
            ));
        }

        if self.connect.scrape_timeout_ms == Some(0) {
            return Err(ConfigError::ValidationError(
                "Scrape timeout must be greater than 0".to_string(),
            ));
        }

        if self.server.port == 0 {
            return Err(ConfigError::ValidationError(
                "Server port must be greater than 0".to_string(),
            ));
        }

        if !self.server.path.starts_with('/') {
            return Err(ConfigError::ValidationError(
                "Metrics path must start with '/'".to_string(),
            ));
        }

        if RESERVED_PATHS.contains(&self.server.path.as_str()) {
            return Err(ConfigError::ValidationError(format!(
                "Metrics path '{}' conflicts with a built-in route",
                self.server.path
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.path, "/metrics");
        assert_eq!(config.connect.url, "http://127.0.0.1:8080");
        assert_eq!(config.connect.timeout(), Duration::from_secs(3));
        assert_eq!(config.connect.failure_policy, FailurePolicy::Skip);
        assert_eq!(config.connect.timeout_offset(), Duration::from_millis(500));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_from_yaml() {
        let config = Config::from_yaml(
            r#"
connect:
  url: "https://connect.internal:8083"
  failure_policy: abort
  scrape_timeout_ms: 9000
  timeout_offset_ms: 250
server:
  port: 9308
"#,
        )
        .unwrap();

        assert_eq!(config.connect.url, "https://connect.internal:8083");
        assert_eq!(config.connect.timeout_ms, 3000);
        assert_eq!(config.connect.failure_policy, FailurePolicy::Abort);
        assert_eq!(config.connect.scrape_timeout(), Some(Duration::from_secs(9)));
        assert_eq!(config.connect.timeout_offset_ms, 250);
        assert_eq!(config.server.port, 9308);
        assert_eq!(config.server.path, "/metrics");
    }

    #[test]
    fn test_unsupported_scheme_rejected() {
        let mut config = Config::default();
        config.connect.url = "ftp://127.0.0.1:8083".to_string();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::UnsupportedScheme(scheme)) if scheme == "ftp"
        ));
    }

    #[test]
    fn test_invalid_url_rejected() {
        let mut config = Config::default();
        config.connect.url = "not a url".to_string();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidUrl { .. })
        ));
    }

    #[test]
    fn test_config_validation() {
        let mut config = Config::default();
        config.server.port = 0;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.connect.timeout_ms = 0;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.server.path = "metrics".to_string();
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.server.path = "/health".to_string();
        assert!(config.validate().is_err());
    }
}
