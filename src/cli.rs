//! CLI argument parsing for kafka-connect-exporter
//!
//! # Options
//!
//! - `--config` / `-c`: Configuration file path (default: config.yaml, env: KCE_CONFIG)
//! - `--scrape-uri`: Kafka Connect REST URL (env: KCE_SCRAPE_URI)
//! - `--timeout-ms`: Per-request timeout in milliseconds (env: KCE_TIMEOUT_MS)
//! - `--failure-policy`: skip or abort on a failed connector (env: KCE_FAILURE_POLICY)
//! - `--scrape-timeout-ms`: Deadline for a whole scrape (env: KCE_SCRAPE_TIMEOUT_MS)
//! - `--timeout-offset-ms`: Margin subtracted from Prometheus' scrape timeout (env: KCE_TIMEOUT_OFFSET_MS)
//! - `--port` / `-p`: Server port (env: KCE_PORT)
//! - `--bind-address`: Server bind address (env: KCE_BIND_ADDRESS)
//! - `--telemetry-path`: Metrics endpoint path (env: KCE_TELEMETRY_PATH)
//! - `--validate`: Validate configuration without starting server
//! - `--log-level` / `-l`: Log level (env: KCE_LOG_LEVEL)
//! - `--log-format`: text or json (env: KCE_LOG_FORMAT)
//!
//! # Precedence
//!
//! 1. CLI arguments
//! 2. Environment variables
//! 3. Configuration file
//! 4. Default values

use clap::{Parser, ValueEnum};
use std::path::PathBuf;

use crate::collector::FailurePolicy;
use crate::config::Config;

/// kafka-connect-exporter - Prometheus exporter for Kafka Connect
///
/// Polls the Kafka Connect REST API and exports connector and task
/// states in Prometheus format.
#[derive(Parser, Debug)]
#[command(name = "kafka-connect-exporter")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to configuration file
    #[arg(
        short,
        long,
        value_name = "FILE",
        default_value = "config.yaml",
        env = "KCE_CONFIG"
    )]
    pub config: PathBuf,

    /// URI on which to scrape Kafka Connect (overrides config file)
    #[arg(long, value_name = "URL", env = "KCE_SCRAPE_URI")]
    pub scrape_uri: Option<String>,

    /// Per-request timeout in milliseconds (overrides config file)
    #[arg(long, value_name = "MS", env = "KCE_TIMEOUT_MS")]
    pub timeout_ms: Option<u64>,

    /// What to do when one connector's status cannot be fetched (overrides config file)
    #[arg(long, value_enum, env = "KCE_FAILURE_POLICY")]
    pub failure_policy: Option<FailurePolicyArg>,

    /// Deadline for a whole scrape in milliseconds (overrides config file)
    #[arg(long, value_name = "MS", env = "KCE_SCRAPE_TIMEOUT_MS")]
    pub scrape_timeout_ms: Option<u64>,

    /// Milliseconds taken off the timeout Prometheus announces (overrides config file)
    #[arg(long, value_name = "MS", env = "KCE_TIMEOUT_OFFSET_MS")]
    pub timeout_offset_ms: Option<u64>,

    /// Server port (overrides config file)
    #[arg(short, long, value_name = "PORT", env = "KCE_PORT")]
    pub port: Option<u16>,

    /// Server bind address (overrides config file)
    /// Supported values: IP addresses (0.0.0.0, 127.0.0.1, ::1) or "localhost"
    #[arg(long, value_name = "ADDRESS", env = "KCE_BIND_ADDRESS")]
    pub bind_address: Option<String>,

    /// Path under which to expose metrics (overrides config file)
    #[arg(long, value_name = "PATH", env = "KCE_TELEMETRY_PATH")]
    pub telemetry_path: Option<String>,

    /// Validate configuration without starting server
    #[arg(long)]
    pub validate: bool,

    /// Log level
    #[arg(
        short,
        long,
        value_enum,
        default_value = "info",
        env = "KCE_LOG_LEVEL"
    )]
    pub log_level: LogLevel,

    /// Log output format
    #[arg(long, value_enum, default_value = "text", env = "KCE_LOG_FORMAT")]
    pub log_format: LogFormat,
}

impl Cli {
    /// Apply command line / environment overrides on top of a loaded config
    pub fn apply_overrides(&self, config: &mut Config) {
        if let Some(ref uri) = self.scrape_uri {
            config.connect.url = uri.clone();
        }
        if let Some(timeout_ms) = self.timeout_ms {
            config.connect.timeout_ms = timeout_ms;
        }
        if let Some(policy) = self.failure_policy {
            config.connect.failure_policy = policy.into();
        }
        if let Some(scrape_timeout_ms) = self.scrape_timeout_ms {
            config.connect.scrape_timeout_ms = Some(scrape_timeout_ms);
        }
        if let Some(offset_ms) = self.timeout_offset_ms {
            config.connect.timeout_offset_ms = offset_ms;
        }
        if let Some(port) = self.port {
            config.server.port = port;
        }
        if let Some(ref bind_address) = self.bind_address {
            config.server.bind_address = bind_address.clone();
        }
        if let Some(ref path) = self.telemetry_path {
            config.server.path = path.clone();
        }
    }
}

/// Failure policy as accepted on the command line
#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum FailurePolicyArg {
    /// Skip the failed connector, keep the scrape up
    Skip,
    /// Report the whole scrape as down
    Abort,
}

impl From<FailurePolicyArg> for FailurePolicy {
    fn from(arg: FailurePolicyArg) -> Self {
        match arg {
            FailurePolicyArg::Skip => FailurePolicy::Skip,
            FailurePolicyArg::Abort => FailurePolicy::Abort,
        }
    }
}

/// Log level options
#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    /// Trace level - most verbose
    Trace,
    /// Debug level
    Debug,
    /// Info level - default
    Info,
    /// Warn level
    Warn,
    /// Error level - least verbose
    Error,
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LogLevel::Trace => write!(f, "trace"),
            LogLevel::Debug => write!(f, "debug"),
            LogLevel::Info => write!(f, "info"),
            LogLevel::Warn => write!(f, "warn"),
            LogLevel::Error => write!(f, "error"),
        }
    }
}

/// Log output format
#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    /// Human-readable text
    Text,
    /// One JSON object per line
    Json,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_level_display() {
        assert_eq!(LogLevel::Trace.to_string(), "trace");
        assert_eq!(LogLevel::Debug.to_string(), "debug");
        assert_eq!(LogLevel::Info.to_string(), "info");
        assert_eq!(LogLevel::Warn.to_string(), "warn");
        assert_eq!(LogLevel::Error.to_string(), "error");
    }

    #[test]
    fn test_cli_default_values() {
        let cli = Cli::parse_from(["kafka-connect-exporter"]);
        assert_eq!(cli.config, PathBuf::from("config.yaml"));
        assert_eq!(cli.scrape_uri, None);
        assert_eq!(cli.timeout_ms, None);
        assert_eq!(cli.failure_policy, None);
        assert_eq!(cli.scrape_timeout_ms, None);
        assert_eq!(cli.timeout_offset_ms, None);
        assert_eq!(cli.port, None);
        assert_eq!(cli.bind_address, None);
        assert_eq!(cli.telemetry_path, None);
        assert!(!cli.validate);
        assert_eq!(cli.log_level, LogLevel::Info);
        assert_eq!(cli.log_format, LogFormat::Text);
    }

    #[test]
    fn test_cli_with_options() {
        let cli = Cli::parse_from([
            "kafka-connect-exporter",
            "-c",
            "custom.yaml",
            "-p",
            "9308",
            "--scrape-uri",
            "https://connect:8083",
            "--failure-policy",
            "abort",
            "--log-level",
            "debug",
            "--log-format",
            "json",
            "--validate",
        ]);
        assert_eq!(cli.config, PathBuf::from("custom.yaml"));
        assert_eq!(cli.port, Some(9308));
        assert_eq!(cli.scrape_uri, Some("https://connect:8083".to_string()));
        assert_eq!(cli.failure_policy, Some(FailurePolicyArg::Abort));
        assert_eq!(cli.log_level, LogLevel::Debug);
        assert_eq!(cli.log_format, LogFormat::Json);
        assert!(cli.validate);
    }

    #[test]
    fn test_apply_overrides() {
        let cli = Cli::parse_from([
            "kafka-connect-exporter",
            "--scrape-uri",
            "http://connect:8083",
            "--timeout-ms",
            "1500",
            "--failure-policy",
            "abort",
            "--scrape-timeout-ms",
            "10000",
            "--timeout-offset-ms",
            "750",
            "--bind-address",
            "127.0.0.1",
            "--telemetry-path",
            "/kc-metrics",
        ]);

        let mut config = Config::default();
        cli.apply_overrides(&mut config);

        assert_eq!(config.connect.url, "http://connect:8083");
        assert_eq!(config.connect.timeout_ms, 1500);
        assert_eq!(config.connect.failure_policy, FailurePolicy::Abort);
        assert_eq!(config.connect.scrape_timeout_ms, Some(10000));
        assert_eq!(config.connect.timeout_offset_ms, 750);
        assert_eq!(config.server.bind_address, "127.0.0.1");
        assert_eq!(config.server.path, "/kc-metrics");
        assert_eq!(config.server.port, 8080);
    }
}
