//! Configuration management.

mod settings;

pub use settings::{
    AppConfig, AppSettings, DataSettings, DefaultSettings, ExportSettings, LoggingConfig,
    SignalSettings,
};

pub use config::ConfigError;

use candlescan_signals::VariantConfig;
use config::{Config, Environment, File};
use std::path::Path;

/// Environment variable prefix, e.g. `CANDLESCAN__LOGGING__LEVEL=debug`.
pub const ENV_PREFIX: &str = "CANDLESCAN";

/// Load configuration from file and environment.
///
/// The file is optional; every setting has a default.
pub fn load_config(path: &Path) -> Result<AppConfig, ConfigError> {
    let config = Config::builder()
        .add_source(File::from(path).required(false))
        .add_source(
            Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    let app: AppConfig = config.try_deserialize()?;
    validate(&app)?;
    Ok(app)
}

/// Check cross-field constraints serde cannot express.
pub fn validate(app: &AppConfig) -> Result<(), ConfigError> {
    if !matches!(app.logging.format.as_str(), "pretty" | "json") {
        return Err(ConfigError::Message(format!(
            "logging.format must be 'pretty' or 'json', got '{}'",
            app.logging.format
        )));
    }

    let ind = &app.indicators;
    let periods = [
        ind.rsi_period,
        ind.macd_fast,
        ind.macd_signal,
        ind.adx_period,
        ind.volume_window,
        ind.envelope_window,
        ind.patterns.average_period,
    ];
    if periods.contains(&0) || ind.bollinger_period < 2 {
        return Err(ConfigError::Message(
            "indicator periods must be positive (bollinger_period at least 2)".into(),
        ));
    }
    if ind.macd_fast >= ind.macd_slow {
        return Err(ConfigError::Message(
            "indicators.macd_fast must be below indicators.macd_slow".into(),
        ));
    }
    if ind.bollinger_deviations <= 0.0 {
        return Err(ConfigError::Message(
            "indicators.bollinger_deviations must be positive".into(),
        ));
    }

    app.signals
        .combined
        .validate()
        .map_err(|e| ConfigError::Message(format!("signals.combined: {}", e)))?;
    app.signals
        .scan
        .validate()
        .map_err(|e| ConfigError::Message(format!("signals.scan: {}", e)))?;

    Ok(())
}

/// Render a configuration as TOML.
pub fn to_toml(app: &AppConfig) -> Result<String, toml::ser::Error> {
    toml::to_string_pretty(app)
}

#[cfg(test)]
mod tests {
    use super::*;
    use candlescan_core::types::Timeframe;
    use candlescan_indicators::CandlePattern;
    use candlescan_signals::Variant;
    use std::io::Write;

    fn write_config(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let config = load_config(Path::new("/no/such/candlescan.toml")).unwrap();
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.signals.combined.oversold, 30.0);
        assert_eq!(config.export.scan_prefix, "Candlestick_Patterns");
    }

    #[test]
    fn test_partial_file_overrides() {
        let file = write_config(
            r#"
            [logging]
            level = "debug"

            [signals]
            default_variant = "combined"

            [signals.combined]
            overbought = 80.0
            bullish_patterns = ["Engulfing", "Hammer"]

            [defaults]
            timeframe = "1h"
            "#,
        );
        let config = load_config(file.path()).unwrap();

        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.logging.format, "pretty");
        assert_eq!(config.signals.default_variant, Variant::Combined);
        assert_eq!(config.signals.combined.overbought, 80.0);
        assert_eq!(config.signals.combined.oversold, 30.0);
        assert_eq!(
            config.signals.combined.bullish_patterns,
            vec![CandlePattern::Engulfing, CandlePattern::Hammer]
        );
        assert_eq!(config.defaults.timeframe, Timeframe::Hourly);
    }

    #[test]
    fn test_invalid_thresholds_rejected() {
        let file = write_config(
            r#"
            [signals.combined]
            oversold = 80.0
            overbought = 20.0
            "#,
        );
        assert!(load_config(file.path()).is_err());
    }

    #[test]
    fn test_invalid_log_format_rejected() {
        let mut config = AppConfig::default();
        config.logging.format = "xml".to_string();
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_default_round_trips_through_toml() {
        let rendered = to_toml(&AppConfig::default()).unwrap();
        let parsed: AppConfig = toml::from_str(&rendered).unwrap();
        assert_eq!(parsed, AppConfig::default());
    }
}
