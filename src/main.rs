use anyhow::Result;
use clap::Parser;
use std::fs::OpenOptions;
use tracing::info;

use jobscout::cli::{handle_command, Cli};
use jobscout::config::AppConfig;

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = AppConfig::load(cli.config.as_deref())?;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("jobscout=info,rocket::server=warn"));

    match &config.log_file {
        Some(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .map_err(|e| anyhow::anyhow!("Failed to open log file {}: {}", path.display(), e))?;

            tracing_subscriber::registry()
                .with(
                    fmt::layer()
                        .json()
                        .with_writer(file)
                        .with_current_span(false)
                        .with_span_list(false),
                )
                .with(filter)
                .init();
        }
        None => {
            tracing_subscriber::registry()
                .with(fmt::layer().with_writer(std::io::stderr))
                .with(filter)
                .init();
        }
    }

    info!("Loading configuration for environment: {}", AppConfig::environment());
    let config_path = AppConfig::config_path(cli.config.as_deref());
    if config_path.exists() {
        info!("Configuration file: {}", config_path.display());
    } else {
        info!("No {} found, using defaults", config_path.display());
    }
    info!("Database: {}", config.database_path.display());
    handle_command(cli.command, config).await
}
