//! Exhaustive candlestick pattern scan.
//!
//! Every nonzero pattern code becomes one event with a direction and a
//! plain-language recommendation.

use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use candlescan_indicators::{CandlePattern, IndicatorFrame};
use chrono::{DateTime, Utc};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::deriver::{SignalDeriver, VariantConfig, VariantError};

/// Direction of a detected pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PatternType {
    Bullish,
    Bearish,
    Neutral,
}

impl PatternType {
    /// Direction implied by a pattern code.
    pub fn from_code(code: i32) -> Self {
        if code > 0 {
            PatternType::Bullish
        } else {
            PatternType::Bearish
        }
    }

    pub fn recommendation(&self) -> Recommendation {
        match self {
            PatternType::Bullish => Recommendation::ConsiderBuy,
            PatternType::Bearish => Recommendation::ConsiderSell,
            PatternType::Neutral => Recommendation::Neutral,
        }
    }
}

impl fmt::Display for PatternType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            PatternType::Bullish => "Bullish",
            PatternType::Bearish => "Bearish",
            PatternType::Neutral => "Neutral",
        };
        f.write_str(s)
    }
}

/// What a reader should consider doing about a pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Recommendation {
    #[serde(rename = "Consider Buy")]
    ConsiderBuy,
    #[serde(rename = "Consider Sell")]
    ConsiderSell,
    Neutral,
}

impl fmt::Display for Recommendation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Recommendation::ConsiderBuy => "Consider Buy",
            Recommendation::ConsiderSell => "Consider Sell",
            Recommendation::Neutral => "Neutral",
        };
        f.write_str(s)
    }
}

/// Round a price to cents, half away from zero.
///
/// Works on the shortest decimal form of the float, so `150.005` rounds to
/// `150.01` even though its binary value sits just below the midpoint.
pub fn round_price(value: f64) -> f64 {
    if !value.is_finite() {
        return value;
    }
    Decimal::from_str(&value.to_string())
        .ok()
        .map(|d| d.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero))
        .and_then(|d| d.to_f64())
        .unwrap_or(value)
}

/// One pattern occurrence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatternEvent {
    /// Unix timestamp in milliseconds
    pub timestamp: i64,
    pub pattern: CandlePattern,
    #[serde(rename = "type")]
    pub pattern_type: PatternType,
    /// Close of the bar, rounded to two decimals
    pub closing_price: f64,
    pub recommendation: Recommendation,
    /// Raw pattern code
    pub value: i32,
}

impl PatternEvent {
    pub fn new(timestamp: i64, pattern: CandlePattern, code: i32, close: f64) -> Self {
        let pattern_type = PatternType::from_code(code);
        Self {
            timestamp,
            pattern,
            pattern_type,
            closing_price: round_price(close),
            recommendation: pattern_type.recommendation(),
            value: code,
        }
    }

    pub fn datetime(&self) -> DateTime<Utc> {
        DateTime::from_timestamp_millis(self.timestamp).unwrap_or_default()
    }
}

/// Configuration for the pattern scan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanConfig {
    /// Patterns to scan, in reporting order
    pub patterns: Vec<CandlePattern>,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            patterns: CandlePattern::ALL.to_vec(),
        }
    }
}

impl VariantConfig for ScanConfig {
    fn validate(&self) -> Result<(), VariantError> {
        if self.patterns.is_empty() {
            return Err(VariantError::InvalidConfig(
                "At least one pattern required".into(),
            ));
        }
        Ok(())
    }
}

/// Pattern scan deriver.
#[derive(Debug, Clone, Default)]
pub struct ScanDeriver {
    config: ScanConfig,
}

impl ScanDeriver {
    pub fn new(config: ScanConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ScanConfig {
        &self.config
    }

    fn scan_pattern(&self, frame: &IndicatorFrame, pattern: CandlePattern) -> Vec<PatternEvent> {
        frame
            .iter()
            .filter_map(|row| {
                let code = row.patterns.get(pattern);
                (code != 0).then(|| PatternEvent::new(row.timestamp(), pattern, code, row.bar.close))
            })
            .collect()
    }
}

impl SignalDeriver for ScanDeriver {
    type Event = PatternEvent;

    fn name(&self) -> &str {
        "Pattern Scan"
    }

    fn description(&self) -> &str {
        "Reports every candlestick pattern occurrence with a buy/sell consideration"
    }

    fn derive(&self, frame: &IndicatorFrame) -> Vec<PatternEvent> {
        let mut events: Vec<PatternEvent> = self
            .config
            .patterns
            .iter()
            .flat_map(|pattern| self.scan_pattern(frame, *pattern))
            .collect();

        // Stable: patterns keep their configured order within a bar.
        events.sort_by_key(|e| e.timestamp);

        let mut seen = HashSet::new();
        events.retain(|e| seen.insert((e.timestamp, e.pattern)));

        debug!(
            symbol = frame.symbol(),
            rows = frame.len(),
            events = events.len(),
            "Scanned candlestick patterns"
        );

        events
    }
}
