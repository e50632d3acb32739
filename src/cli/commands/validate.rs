//! Validate configuration command.

use anyhow::Result;
use candlescan_config::{to_toml, AppConfig, ConfigError};
use std::path::Path;

use crate::cli::ValidateArgs;

pub async fn run(
    args: ValidateArgs,
    config_path: &Path,
    loaded: Result<AppConfig, ConfigError>,
) -> Result<()> {
    if args.print_default {
        print!("{}", to_toml(&AppConfig::default())?);
        return Ok(());
    }

    println!("Validating configuration: {:?}", config_path);
    if !config_path.exists() {
        println!("File not found, using defaults and environment overrides.");
    }

    match loaded {
        Ok(config) => {
            println!("Configuration is valid!");
            println!();
            println!("App: {}", config.app.name);
            println!("Environment: {}", config.app.environment);
            println!("Log level: {}", config.logging.level);
            println!("Default variant: {}", config.signals.default_variant);
            println!("Default timeframe: {}", config.defaults.timeframe);
            println!(
                "RSI oversold/overbought: {}/{}",
                config.signals.combined.oversold, config.signals.combined.overbought
            );
            println!("Volume spike: {}x", config.signals.combined.volume_spike);
            println!("Patterns scanned: {}", config.signals.scan.patterns.len());
            if config.export.enabled {
                println!("Export directory: {}", config.export.directory);
            } else {
                println!("Export: disabled");
            }
            println!();
            print!("{}", to_toml(&config)?);
        }
        Err(e) => {
            println!("Configuration error: {}", e);
            return Err(e.into());
        }
    }

    Ok(())
}
