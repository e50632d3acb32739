//! CLI definitions.

pub mod commands;

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "candlescan")]
#[command(author, version, about = "Candlestick pattern and technical signal reports")]
pub struct Cli {
    /// Configuration file path
    #[arg(short, long, default_value = "config/default.toml")]
    pub config: PathBuf,

    /// Log level (defaults to the configured level)
    #[arg(short, long)]
    pub log_level: Option<LogLevel>,

    /// Enable JSON log format
    #[arg(long)]
    pub json_logs: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum VariantArg {
    Combined,
    Scan,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Combined technical signals (pattern + RSI + volume spike)
    Signals(SignalsArgs),
    /// Scan every candlestick pattern
    Scan(ScanArgs),
    /// Prompt for symbols and dates until `exit`
    Interactive(InteractiveArgs),
    /// List the candlestick patterns
    Patterns,
    /// List signal variants and their default configuration
    Variants,
    /// Validate configuration
    ValidateConfig(ValidateArgs),
}

/// Where bars come from and where results go.
#[derive(clap::Args, Clone, Debug, Default)]
pub struct OutputArgs {
    /// Data file (CSV) instead of the market data provider
    #[arg(long)]
    pub data: Option<PathBuf>,

    /// Directory for the spreadsheet (defaults to the configured one)
    #[arg(long)]
    pub export: Option<PathBuf>,

    /// Skip the spreadsheet
    #[arg(long, conflicts_with = "export")]
    pub no_export: bool,

    /// Open the terminal chart after the table
    #[arg(long)]
    pub chart: bool,

    /// Output format
    #[arg(long, value_enum, default_value = "text")]
    pub output: OutputFormat,
}

#[derive(clap::Args)]
pub struct SignalsArgs {
    /// Ticker symbol
    #[arg(short = 'S', long)]
    pub symbol: String,

    /// Timeframe (1d, 1h, 15m)
    #[arg(short, long)]
    pub timeframe: Option<String>,

    /// Start date (YYYY-MM-DD)
    #[arg(long, requires = "end")]
    pub start: Option<String>,

    /// End date (YYYY-MM-DD)
    #[arg(long, requires = "start")]
    pub end: Option<String>,

    #[command(flatten)]
    pub output: OutputArgs,
}

#[derive(clap::Args)]
pub struct ScanArgs {
    /// Ticker symbol
    #[arg(short = 'S', long)]
    pub symbol: String,

    /// Company name for the report (defaults to the provider's name)
    #[arg(long)]
    pub company: Option<String>,

    /// Timeframe (1d, 1h, 15m)
    #[arg(short, long)]
    pub timeframe: Option<String>,

    /// Start date (YYYY-MM-DD)
    #[arg(long, requires = "end")]
    pub start: Option<String>,

    /// End date (YYYY-MM-DD)
    #[arg(long, requires = "start")]
    pub end: Option<String>,

    #[command(flatten)]
    pub output: OutputArgs,
}

#[derive(clap::Args)]
pub struct InteractiveArgs {
    /// Signal variant (defaults to the configured one)
    #[arg(long, value_enum)]
    pub variant: Option<VariantArg>,

    /// Timeframe (1d, 1h, 15m)
    #[arg(short, long)]
    pub timeframe: Option<String>,

    #[command(flatten)]
    pub output: OutputArgs,
}

#[derive(clap::Args)]
pub struct ValidateArgs {
    /// Print the built-in default configuration as TOML and exit
    #[arg(long)]
    pub print_default: bool,
}
