//! Configuration structures.

use candlescan_core::types::Timeframe;
use candlescan_data::YahooConfig;
use candlescan_indicators::FrameSettings;
use candlescan_signals::{CombinedConfig, ScanConfig, Variant};
use serde::{Deserialize, Serialize};

/// Main application configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub app: AppSettings,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub data: DataSettings,
    #[serde(default)]
    pub indicators: FrameSettings,
    #[serde(default)]
    pub signals: SignalSettings,
    #[serde(default)]
    pub export: ExportSettings,
    #[serde(default)]
    pub defaults: DefaultSettings,
}

/// General app settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppSettings {
    pub name: String,
    pub environment: String,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            name: "candlescan".to_string(),
            environment: "development".to_string(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    /// `pretty` or `json`
    pub format: String,
    /// Also append logs to this file
    pub file: Option<String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
            file: None,
        }
    }
}

/// Market data settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DataSettings {
    /// Reuse fetched tables within one interactive session
    pub cache: bool,
    pub yahoo: YahooConfig,
}

impl Default for DataSettings {
    fn default() -> Self {
        Self {
            cache: true,
            yahoo: YahooConfig::default(),
        }
    }
}

/// Signal variant settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct SignalSettings {
    /// Variant used by `interactive` unless overridden
    pub default_variant: Variant,
    pub combined: CombinedConfig,
    pub scan: ScanConfig,
}

/// Spreadsheet export settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportSettings {
    /// Write a spreadsheet after each run
    pub enabled: bool,
    /// Directory spreadsheets are written to
    pub directory: String,
    /// File name prefix for pattern scan workbooks
    pub scan_prefix: String,
}

impl Default for ExportSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            directory: ".".to_string(),
            scan_prefix: "Candlestick_Patterns".to_string(),
        }
    }
}

/// Defaults for prompts and omitted flags.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DefaultSettings {
    pub timeframe: Timeframe,
    /// Start date fallback, in days before today
    pub lookback_days: u32,
}

impl Default for DefaultSettings {
    fn default() -> Self {
        Self {
            timeframe: Timeframe::Daily,
            lookback_days: 365,
        }
    }
}
