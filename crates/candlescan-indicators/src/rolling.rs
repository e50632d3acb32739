//! Rolling window statistics.
//!
//! These follow the usual dataframe convention: a window yields a value only
//! when it is full and every value in it is present.

use candlescan_core::traits::OhlcvIndicator;
use candlescan_core::types::Bar;

/// Rolling mean over values that may be missing (e.g. volume).
#[derive(Debug, Clone)]
pub struct RollingMean {
    period: usize,
}

impl RollingMean {
    /// Create a rolling mean with the given window.
    pub fn new(period: usize) -> Self {
        assert!(period > 0, "Period must be greater than 0");
        Self { period }
    }

    /// Aligned rolling mean; `None` until the window is full or while it holds a gap.
    pub fn calculate(&self, data: &[Option<f64>]) -> Vec<Option<f64>> {
        let mut result = vec![None; data.len()];
        if data.len() < self.period {
            return result;
        }

        for (i, window) in data.windows(self.period).enumerate() {
            let sum: Option<f64> = window.iter().copied().sum();
            result[i + self.period - 1] = sum.map(|s| s / self.period as f64);
        }

        result
    }

    /// Window length.
    pub fn period(&self) -> usize {
        self.period
    }
}

/// Rolling minimum of lows, used as a support envelope.
#[derive(Debug, Clone)]
pub struct RollingMin {
    period: usize,
}

impl RollingMin {
    pub fn new(period: usize) -> Self {
        assert!(period > 0, "Period must be greater than 0");
        Self { period }
    }
}

impl OhlcvIndicator for RollingMin {
    type Output = f64;

    fn calculate_bars(&self, bars: &[Bar]) -> Vec<f64> {
        bars.windows(self.period)
            .map(|w| w.iter().map(|b| b.low).fold(f64::INFINITY, f64::min))
            .collect()
    }

    fn period(&self) -> usize {
        self.period
    }

    fn name(&self) -> &str {
        "Support"
    }
}

/// Rolling maximum of highs, used as a resistance envelope.
#[derive(Debug, Clone)]
pub struct RollingMax {
    period: usize,
}

impl RollingMax {
    pub fn new(period: usize) -> Self {
        assert!(period > 0, "Period must be greater than 0");
        Self { period }
    }
}

impl OhlcvIndicator for RollingMax {
    type Output = f64;

    fn calculate_bars(&self, bars: &[Bar]) -> Vec<f64> {
        bars.windows(self.period)
            .map(|w| w.iter().map(|b| b.high).fold(f64::NEG_INFINITY, f64::max))
            .collect()
    }

    fn period(&self) -> usize {
        self.period
    }

    fn name(&self) -> &str {
        "Resistance"
    }
}
