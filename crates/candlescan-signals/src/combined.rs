//! Combined technical signal.
//!
//! A bar is a Buy when a bullish reversal pattern prints while RSI is
//! oversold and volume spikes above its rolling average. It is a Sell when
//! RSI is overbought. The two flags are independent; bars with neither are
//! dropped.

use candlescan_indicators::{CandlePattern, FrameRow, IndicatorFrame};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::deriver::{SignalDeriver, VariantConfig, VariantError};

/// Configuration for the combined signal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CombinedConfig {
    /// RSI below this counts as oversold
    pub oversold: f64,
    /// RSI above this counts as overbought
    pub overbought: f64,
    /// Volume must exceed this multiple of its rolling average
    pub volume_spike: f64,
    /// Patterns whose positive code confirms a Buy
    pub bullish_patterns: Vec<CandlePattern>,
}

impl Default for CombinedConfig {
    fn default() -> Self {
        Self {
            oversold: 30.0,
            overbought: 70.0,
            volume_spike: 1.5,
            bullish_patterns: vec![
                CandlePattern::Engulfing,
                CandlePattern::MorningStar,
                CandlePattern::ThreeWhiteSoldiers,
            ],
        }
    }
}

impl VariantConfig for CombinedConfig {
    fn validate(&self) -> Result<(), VariantError> {
        if !(0.0..=100.0).contains(&self.oversold) || !(0.0..=100.0).contains(&self.overbought) {
            return Err(VariantError::InvalidConfig(
                "RSI thresholds must be between 0 and 100".into(),
            ));
        }
        if self.oversold >= self.overbought {
            return Err(VariantError::InvalidConfig(
                "Oversold must be below overbought".into(),
            ));
        }
        if self.volume_spike <= 0.0 {
            return Err(VariantError::InvalidConfig(
                "Volume spike multiplier must be positive".into(),
            ));
        }
        if self.bullish_patterns.is_empty() {
            return Err(VariantError::InvalidConfig(
                "At least one confirming pattern required".into(),
            ));
        }
        Ok(())
    }
}

/// One bar that met the Buy and/or Sell rule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CombinedSignal {
    /// Unix timestamp in milliseconds
    pub timestamp: i64,
    pub buy: bool,
    pub sell: bool,
    pub close: f64,
    pub rsi: Option<f64>,
    /// MACD line value
    pub macd: Option<f64>,
    pub adx: Option<f64>,
    /// Confirming patterns present on the bar
    pub patterns: Vec<CandlePattern>,
}

impl CombinedSignal {
    /// "Buy" when the Buy flag is set, "Sell" otherwise.
    pub fn label(&self) -> &'static str {
        if self.buy {
            "Buy"
        } else {
            "Sell"
        }
    }
}

/// Combined signal deriver.
#[derive(Debug, Clone, Default)]
pub struct CombinedDeriver {
    config: CombinedConfig,
}

impl CombinedDeriver {
    pub fn new(config: CombinedConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &CombinedConfig {
        &self.config
    }

    fn confirming_patterns(&self, row: &FrameRow) -> Vec<CandlePattern> {
        self.config
            .bullish_patterns
            .iter()
            .copied()
            .filter(|p| row.patterns.get(*p) > 0)
            .collect()
    }

    fn volume_spike(&self, row: &FrameRow) -> bool {
        match (row.bar.volume, row.volume_avg) {
            (Some(volume), Some(avg)) => volume > self.config.volume_spike * avg,
            _ => false,
        }
    }

    /// Evaluate one row.
    pub fn evaluate(&self, row: &FrameRow) -> Option<CombinedSignal> {
        let patterns = self.confirming_patterns(row);
        let oversold = row.rsi.is_some_and(|rsi| rsi < self.config.oversold);
        let overbought = row.rsi.is_some_and(|rsi| rsi > self.config.overbought);

        let buy = !patterns.is_empty() && oversold && self.volume_spike(row);
        let sell = overbought;

        if !buy && !sell {
            return None;
        }

        Some(CombinedSignal {
            timestamp: row.timestamp(),
            buy,
            sell,
            close: row.bar.close,
            rsi: row.rsi,
            macd: row.macd.map(|m| m.macd),
            adx: row.adx,
            patterns,
        })
    }
}

impl SignalDeriver for CombinedDeriver {
    type Event = CombinedSignal;

    fn name(&self) -> &str {
        "Combined Signal"
    }

    fn description(&self) -> &str {
        "Bullish pattern with oversold RSI and a volume spike buys; overbought RSI sells"
    }

    fn derive(&self, frame: &IndicatorFrame) -> Vec<CombinedSignal> {
        let signals: Vec<CombinedSignal> = frame.iter().filter_map(|row| self.evaluate(row)).collect();

        debug!(
            symbol = frame.symbol(),
            rows = frame.len(),
            buys = signals.iter().filter(|s| s.buy).count(),
            sells = signals.iter().filter(|s| s.sell).count(),
            "Derived combined signals"
        );

        signals
    }
}
