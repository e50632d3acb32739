//! Moving averages.
//!
//! [`Ema`] and [`Wilder`] are the same recursion with different weights:
//! both seed with the mean of the first `period` values and then move
//! `alpha` of the way toward each new value.

use candlescan_core::traits::Indicator;

fn seeded_smoothing(data: &[f64], period: usize, alpha: f64) -> Vec<f64> {
    if period == 0 || data.len() < period {
        return vec![];
    }

    let seed = data[..period].iter().sum::<f64>() / period as f64;
    std::iter::once(seed)
        .chain(data[period..].iter().scan(seed, |avg, &x| {
            *avg += alpha * (x - *avg);
            Some(*avg)
        }))
        .collect()
}

/// Simple moving average over a sliding window.
#[derive(Debug, Clone)]
pub struct Sma {
    period: usize,
}

impl Sma {
    pub fn new(period: usize) -> Self {
        assert!(period > 0, "Period must be greater than 0");
        Self { period }
    }
}

impl Indicator for Sma {
    type Output = f64;

    fn calculate(&self, data: &[f64]) -> Vec<f64> {
        if data.len() < self.period {
            return vec![];
        }

        let n = self.period as f64;
        let first = data[..self.period].iter().sum::<f64>();
        std::iter::once(first / n)
            .chain(
                data[self.period..]
                    .iter()
                    .zip(data)
                    .scan(first, |sum, (incoming, outgoing)| {
                        *sum += incoming - outgoing;
                        Some(*sum / n)
                    }),
            )
            .collect()
    }

    fn period(&self) -> usize {
        self.period
    }

    fn name(&self) -> &str {
        "SMA"
    }
}

/// Exponential moving average, `alpha = 2 / (period + 1)`.
#[derive(Debug, Clone)]
pub struct Ema {
    period: usize,
}

impl Ema {
    pub fn new(period: usize) -> Self {
        assert!(period > 0, "Period must be greater than 0");
        Self { period }
    }

    pub fn alpha(&self) -> f64 {
        2.0 / (self.period as f64 + 1.0)
    }
}

impl Indicator for Ema {
    type Output = f64;

    fn calculate(&self, data: &[f64]) -> Vec<f64> {
        seeded_smoothing(data, self.period, self.alpha())
    }

    fn period(&self) -> usize {
        self.period
    }

    fn name(&self) -> &str {
        "EMA"
    }
}

/// Wilder's running average, `alpha = 1 / period`.
///
/// Used for RSI gains/losses and for the final ADX average.
#[derive(Debug, Clone)]
pub struct Wilder {
    period: usize,
}

impl Wilder {
    pub fn new(period: usize) -> Self {
        assert!(period > 0, "Period must be greater than 0");
        Self { period }
    }
}

impl Indicator for Wilder {
    type Output = f64;

    fn calculate(&self, data: &[f64]) -> Vec<f64> {
        seeded_smoothing(data, self.period, 1.0 / self.period as f64)
    }

    fn period(&self) -> usize {
        self.period
    }

    fn name(&self) -> &str {
        "RMA"
    }
}
