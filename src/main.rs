//! kafka-connect-exporter - Prometheus exporter for Kafka Connect
//!
//! This binary serves a Prometheus-compatible metrics endpoint reporting
//! the state of every connector and task of a Kafka Connect cluster.

use anyhow::Result;
use clap::Parser;
use tracing::info;

use kafka_connect_exporter::{cli::Cli, config::Config, server};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    kafka_connect_exporter::init_logging(&cli.log_level.to_string(), cli.log_format)?;

    // Load configuration, then let flags and env vars win
    let mut config = Config::load_or_default(&cli.config)?;
    cli.apply_overrides(&mut config);
    config.validate()?;

    if cli.validate {
        println!("Configuration is valid");
        return Ok(());
    }

    info!(
        version = env!("CARGO_PKG_VERSION"),
        "Starting kafka-connect-exporter"
    );

    server::run(config).await?;

    Ok(())
}
