//! Bar-aligned indicator table.

use candlescan_core::error::IndicatorError;
use candlescan_core::traits::{Indicator, MultiOutputIndicator, OhlcvIndicator};
use candlescan_core::types::{Bar, BarSeries};
use serde::{Deserialize, Serialize};

use crate::momentum::{Macd, MacdOutput, Rsi};
use crate::patterns::{CandlePattern, PatternCodes, PatternSettings};
use crate::rolling::{RollingMax, RollingMean, RollingMin};
use crate::trend::Adx;
use crate::volatility::{BollingerBands, BollingerOutput};

/// Fewest bars an analysis can run on.
pub const MIN_BARS: usize = 2;

/// Indicator parameters used to build a frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FrameSettings {
    pub rsi_period: usize,
    pub macd_fast: usize,
    pub macd_slow: usize,
    pub macd_signal: usize,
    pub adx_period: usize,
    pub bollinger_period: usize,
    pub bollinger_deviations: f64,
    /// Window of the rolling volume average
    pub volume_window: usize,
    /// Window of the rolling support/resistance envelope
    pub envelope_window: usize,
    pub patterns: PatternSettings,
}

impl Default for FrameSettings {
    fn default() -> Self {
        Self {
            rsi_period: 14,
            macd_fast: 12,
            macd_slow: 26,
            macd_signal: 9,
            adx_period: 14,
            bollinger_period: 20,
            bollinger_deviations: 2.0,
            volume_window: 20,
            envelope_window: 20,
            patterns: PatternSettings::default(),
        }
    }
}

/// One bar plus everything computed for it.
///
/// Values are `None` until their lookback window is full.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrameRow {
    pub bar: Bar,
    pub rsi: Option<f64>,
    pub macd: Option<MacdOutput>,
    pub adx: Option<f64>,
    pub bands: Option<BollingerOutput>,
    pub volume_avg: Option<f64>,
    pub support: Option<f64>,
    pub resistance: Option<f64>,
    pub patterns: PatternCodes,
}

impl FrameRow {
    /// A row with no indicator values.
    pub fn new(bar: Bar) -> Self {
        Self {
            bar,
            rsi: None,
            macd: None,
            adx: None,
            bands: None,
            volume_avg: None,
            support: None,
            resistance: None,
            patterns: PatternCodes::default(),
        }
    }

    pub fn timestamp(&self) -> i64 {
        self.bar.timestamp
    }
}

/// Indicator values for a whole series, one row per bar.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IndicatorFrame {
    symbol: String,
    rows: Vec<FrameRow>,
}

impl IndicatorFrame {
    /// Compute every indicator and pattern for `series`.
    pub fn compute(series: &BarSeries, settings: &FrameSettings) -> Result<Self, IndicatorError> {
        if settings.macd_fast >= settings.macd_slow {
            return Err(IndicatorError::InvalidParameter(format!(
                "MACD fast period {} must be below slow period {}",
                settings.macd_fast, settings.macd_slow
            )));
        }
        if series.len() < MIN_BARS {
            return Err(IndicatorError::InsufficientData {
                required: MIN_BARS,
                available: series.len(),
            });
        }

        let bars = series.bars();
        let closes = series.closes();

        let rsi = Rsi::new(settings.rsi_period).aligned(&closes);
        let macd = Macd::with_periods(settings.macd_fast, settings.macd_slow, settings.macd_signal)
            .aligned(&closes);
        let adx = Adx::new(settings.adx_period).aligned_bars(bars);
        let bands = BollingerBands::with_params(settings.bollinger_period, settings.bollinger_deviations)
            .aligned(&closes);
        let volume_avg = RollingMean::new(settings.volume_window).calculate(&series.volumes());
        let support = RollingMin::new(settings.envelope_window).aligned_bars(bars);
        let resistance = RollingMax::new(settings.envelope_window).aligned_bars(bars);
        let patterns = CandlePattern::detect_all(bars, &settings.patterns);

        let rows = bars
            .iter()
            .enumerate()
            .map(|(i, bar)| FrameRow {
                bar: *bar,
                rsi: rsi[i],
                macd: macd[i],
                adx: adx[i],
                bands: bands[i],
                volume_avg: volume_avg[i],
                support: support[i],
                resistance: resistance[i],
                patterns: patterns[i],
            })
            .collect();

        Ok(Self {
            symbol: series.symbol.clone(),
            rows,
        })
    }

    /// Build a frame from precomputed rows.
    pub fn from_rows(symbol: impl Into<String>, rows: Vec<FrameRow>) -> Self {
        Self {
            symbol: symbol.into(),
            rows,
        }
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn rows(&self) -> &[FrameRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &FrameRow> {
        self.rows.iter()
    }

    pub fn last(&self) -> Option<&FrameRow> {
        self.rows.last()
    }
}
