//! Home sensor sync CLI
//!
//! Polls the dashboard API and device health endpoints from the command line.

use std::path::PathBuf;

use clap::Parser;
use sensor_sync::{load_config, Config};
use tokio_util::sync::CancellationToken;
use tracing::Level;

#[derive(Parser)]
#[command(name = "home-sensor-sync")]
#[command(about = "Home sensor dashboard data synchronization")]
#[command(version)]
struct Args {
    /// Path to configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Dashboard API base URL (overrides config file)
    #[arg(long)]
    api_base_url: Option<String>,

    /// Run a single sync round, print the result as JSON and exit
    #[arg(long)]
    once: bool,

    /// Log level
    #[arg(short, long, default_value = "info")]
    log_level: Level,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_max_level(args.log_level)
        .init();

    tracing::debug!(
        "Parsed command line arguments: config={:?}, api_base_url={:?}, once={}, log_level={:?}",
        args.config,
        args.api_base_url,
        args.once,
        args.log_level
    );

    let mut config = if let Some(config_path) = &args.config {
        tracing::debug!("Loading configuration from {:?}", config_path);
        load_config(config_path)?
    } else {
        tracing::debug!("Using default configuration");
        Config::default()
    };

    if let Some(api_base_url) = args.api_base_url {
        config.api_base_url = api_base_url;
    }

    if args.once {
        let snapshot = sensor_sync::sync_once(&config).await?;
        println!("{}", serde_json::to_string_pretty(&snapshot)?);
        return Ok(());
    }

    let cancel = CancellationToken::new();
    let cancel_for_signal = cancel.clone();
    tokio::spawn(async move {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for ctrl-c: {}", e);
            return;
        }
        tracing::info!("Shutdown signal received");
        cancel_for_signal.cancel();
    });

    let snapshot = sensor_sync::run(&config, cancel).await?;
    tracing::debug!("Final snapshot: {:?}", snapshot);

    Ok(())
}
