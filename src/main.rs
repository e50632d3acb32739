//! Candlestick pattern and technical signal reporting CLI.

mod cli;

use anyhow::{Context, Result};
use candlescan_config::{load_config, AppConfig, ConfigError};
use candlescan_report::setup_logging;
use clap::Parser;
use cli::{Cli, Commands};
use std::path::Path;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Logging follows the config file unless overridden on the command line.
    let loaded = load_config(&cli.config);
    let logging = loaded
        .as_ref()
        .map(|config| config.logging.clone())
        .unwrap_or_default();

    let log_level = cli
        .log_level
        .map(|level| level.as_str().to_string())
        .unwrap_or(logging.level);
    let json_logs = cli.json_logs || logging.format == "json";
    let _guard = setup_logging(&log_level, json_logs, logging.file.as_deref())
        .context("Failed to set up logging")?;

    // Execute command
    match cli.command {
        Commands::Signals(args) => {
            let config = required(loaded, &cli.config)?;
            cli::commands::signals::run(args, &config).await
        }
        Commands::Scan(args) => {
            let config = required(loaded, &cli.config)?;
            cli::commands::scan::run(args, &config).await
        }
        Commands::Interactive(args) => {
            let config = required(loaded, &cli.config)?;
            cli::commands::interactive::run(args, &config).await
        }
        Commands::Patterns => cli::commands::patterns::run().await,
        Commands::Variants => cli::commands::variants::run().await,
        Commands::ValidateConfig(args) => {
            cli::commands::validate::run(args, &cli.config, loaded).await
        }
    }
}

fn required(loaded: Result<AppConfig, ConfigError>, path: &Path) -> Result<AppConfig> {
    loaded.with_context(|| format!("Invalid configuration {}", path.display()))
}
