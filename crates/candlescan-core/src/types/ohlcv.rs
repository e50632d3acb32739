//! Cleaned candles and the per-symbol series the analysis runs over.

use serde::{Deserialize, Serialize};

/// One candle after normalization.
///
/// All four prices are present. Volume is `None` when the provider had
/// nothing numeric for the row.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    /// Bar open, Unix milliseconds
    pub timestamp: i64,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: Option<f64>,
}

impl Bar {
    pub fn new(timestamp: i64, open: f64, high: f64, low: f64, close: f64, volume: f64) -> Self {
        Self::without_volume(timestamp, open, high, low, close).with_volume(Some(volume))
    }

    pub fn without_volume(timestamp: i64, open: f64, high: f64, low: f64, close: f64) -> Self {
        Self {
            timestamp,
            open,
            high,
            low,
            close,
            volume: None,
        }
    }

    pub fn with_volume(mut self, volume: Option<f64>) -> Self {
        self.volume = volume;
        self
    }

    /// High minus low.
    #[inline]
    pub fn range(&self) -> f64 {
        self.high - self.low
    }

    /// Size of the real body, ignoring colour.
    #[inline]
    pub fn body(&self) -> f64 {
        (self.close - self.open).abs()
    }

    #[inline]
    pub fn body_top(&self) -> f64 {
        self.open.max(self.close)
    }

    #[inline]
    pub fn body_bottom(&self) -> f64 {
        self.open.min(self.close)
    }

    #[inline]
    pub fn upper_shadow(&self) -> f64 {
        self.high - self.body_top()
    }

    #[inline]
    pub fn lower_shadow(&self) -> f64 {
        self.body_bottom() - self.low
    }

    /// Wilder's true range. The first bar of a series has no previous close
    /// and falls back to its own range.
    pub fn true_range(&self, prev_close: Option<f64>) -> f64 {
        prev_close.map_or(self.range(), |prev| {
            self.range()
                .max((self.high - prev).abs())
                .max((self.low - prev).abs())
        })
    }
}

/// Time-ordered bars for one symbol with unique timestamps.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BarSeries {
    pub symbol: String,
    bars: Vec<Bar>,
}

impl BarSeries {
    pub fn new(symbol: impl Into<String>) -> Self {
        Self::from_bars(symbol, Vec::new())
    }

    /// Wrap bars that the caller has already sorted and deduplicated.
    pub fn from_bars(symbol: impl Into<String>, bars: Vec<Bar>) -> Self {
        Self {
            symbol: symbol.into(),
            bars,
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.bars.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    pub fn bars(&self) -> &[Bar] {
        &self.bars
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Bar> {
        self.bars.iter()
    }

    /// Close column, the input of every single-series indicator.
    pub fn closes(&self) -> Vec<f64> {
        self.iter().map(|b| b.close).collect()
    }

    pub fn volumes(&self) -> Vec<Option<f64>> {
        self.iter().map(|b| b.volume).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_candle_geometry() {
        let hammer = Bar::new(0, 100.0, 101.0, 90.0, 100.5, 10.0);

        assert_eq!(hammer.range(), 11.0);
        assert_eq!(hammer.body(), 0.5);
        assert_eq!(hammer.body_top(), 100.5);
        assert_eq!(hammer.upper_shadow(), 0.5);
        assert_eq!(hammer.lower_shadow(), 10.0);
    }

    #[test]
    fn test_true_range_uses_gap_to_previous_close() {
        let bar = Bar::new(0, 100.0, 110.0, 95.0, 105.0, 1.0);

        assert_eq!(bar.true_range(None), 15.0);
        assert_eq!(bar.true_range(Some(90.0)), 20.0);
        assert_eq!(bar.true_range(Some(120.0)), 25.0);
    }

    #[test]
    fn test_series_columns_keep_missing_volume() {
        let series = BarSeries::from_bars(
            "AAPL",
            vec![
                Bar::new(1, 100.0, 101.0, 99.0, 100.5, 1000.0),
                Bar::without_volume(2, 100.5, 102.0, 100.0, 101.5),
            ],
        );

        assert_eq!(series.len(), 2);
        assert_eq!(series.closes(), vec![100.5, 101.5]);
        assert_eq!(series.volumes(), vec![Some(1000.0), None]);
    }
}
