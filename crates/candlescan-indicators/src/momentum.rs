//! Momentum indicators.

use candlescan_core::traits::{Indicator, MultiOutputIndicator};
use serde::{Deserialize, Serialize};

use crate::moving_average::{Ema, Wilder};

/// Relative Strength Index.
///
/// Up and down moves are Wilder-averaged separately; the first value
/// needs `period + 1` closes and lands at index `period`. A window with
/// no down moves reads 100 and a window with no moves at all reads 0,
/// as TA-Lib does.
#[derive(Debug, Clone)]
pub struct Rsi {
    period: usize,
}

impl Rsi {
    pub fn new(period: usize) -> Self {
        assert!(period > 0, "Period must be greater than 0");
        Self { period }
    }
}

impl Default for Rsi {
    fn default() -> Self {
        Self::new(14)
    }
}

impl Indicator for Rsi {
    type Output = f64;

    fn calculate(&self, data: &[f64]) -> Vec<f64> {
        if data.len() < self.period() {
            return vec![];
        }

        let (ups, downs): (Vec<f64>, Vec<f64>) = data
            .windows(2)
            .map(|w| {
                let change = w[1] - w[0];
                (change.max(0.0), (-change).max(0.0))
            })
            .unzip();

        let smoother = Wilder::new(self.period);
        let avg_up = smoother.calculate(&ups);
        let avg_down = smoother.calculate(&downs);

        avg_up
            .into_iter()
            .zip(avg_down)
            .map(|(up, down)| {
                let total = up + down;
                if total == 0.0 {
                    0.0
                } else {
                    100.0 * up / total
                }
            })
            .collect()
    }

    fn period(&self) -> usize {
        self.period + 1
    }

    fn name(&self) -> &str {
        "RSI"
    }
}

/// One MACD reading.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MacdOutput {
    /// Fast EMA minus slow EMA
    pub macd: f64,
    /// EMA of the MACD line
    pub signal: f64,
    pub histogram: f64,
}

/// Moving Average Convergence Divergence.
///
/// The first reading needs the slow EMA plus a full signal window, so with
/// 12/26/9 it lands at index 33.
#[derive(Debug, Clone)]
pub struct Macd {
    fast: usize,
    slow: usize,
    signal: usize,
}

impl Macd {
    /// MACD 12/26/9.
    pub fn new() -> Self {
        Self::with_periods(12, 26, 9)
    }

    pub fn with_periods(fast: usize, slow: usize, signal: usize) -> Self {
        assert!(fast > 0 && signal > 0, "Periods must be greater than 0");
        assert!(fast < slow, "Fast period must be less than slow period");
        Self { fast, slow, signal }
    }
}

impl Default for Macd {
    fn default() -> Self {
        Self::new()
    }
}

impl MultiOutputIndicator for Macd {
    type Outputs = MacdOutput;

    fn calculate(&self, data: &[f64]) -> Vec<MacdOutput> {
        if data.len() < self.period() {
            return vec![];
        }

        // The fast EMA starts `slow - fast` bars earlier than the slow one.
        let fast = Ema::new(self.fast).calculate(data);
        let slow = Ema::new(self.slow).calculate(data);
        let line: Vec<f64> = fast[self.slow - self.fast..]
            .iter()
            .zip(&slow)
            .map(|(f, s)| f - s)
            .collect();

        let signal = Ema::new(self.signal).calculate(&line);
        line[self.signal - 1..]
            .iter()
            .zip(signal)
            .map(|(&macd, signal)| MacdOutput {
                macd,
                signal,
                histogram: macd - signal,
            })
            .collect()
    }

    fn period(&self) -> usize {
        self.slow + self.signal - 1
    }

    fn name(&self) -> &str {
        "MACD"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn wave(n: usize) -> Vec<f64> {
        (0..n).map(|i| 100.0 + (i as f64 * 0.5).sin() * 5.0).collect()
    }

    #[test]
    fn test_rsi_bounded() {
        let result = Rsi::new(14).calculate(&wave(30));

        assert_eq!(result.len(), 16);
        assert!(result.iter().all(|v| (0.0..=100.0).contains(v)));
    }

    #[test]
    fn test_rsi_first_value_at_period_index() {
        let data: Vec<f64> = (0..20).map(|i| 100.0 + i as f64).collect();
        let aligned = Rsi::default().aligned(&data);

        assert!(aligned[13].is_none());
        assert!(aligned[14].is_some());
    }

    #[test]
    fn test_rsi_one_way_moves() {
        let rising = Rsi::new(5).calculate(&[1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0]);
        let falling = Rsi::new(5).calculate(&[7.0, 6.0, 5.0, 4.0, 3.0, 2.0, 1.0]);

        assert!((rising[0] - 100.0).abs() < 1e-10);
        assert!(falling[0].abs() < 1e-10);
    }

    #[test]
    fn test_rsi_flat_prices_read_zero() {
        let result = Rsi::new(14).calculate(&[100.0; 40]);

        assert_eq!(result.len(), 26);
        assert!(result.iter().all(|v| *v == 0.0));
    }

    #[test]
    fn test_rsi_flat_then_rise_reads_hundred() {
        let mut data = vec![100.0; 10];
        data.push(101.0);
        let result = Rsi::new(3).calculate(&data);

        assert_eq!(result.first().copied(), Some(0.0));
        assert_eq!(result.last().copied(), Some(100.0));
    }

    #[test]
    fn test_rsi_known_value() {
        // Gains 1, 1 and loss 1 over period 3: avg up 2/3, avg down 1/3 -> RS 2
        let result = Rsi::new(3).calculate(&[10.0, 11.0, 12.0, 11.0]);
        assert!((result[0] - 100.0 * 2.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_macd_uptrend_positive() {
        let data: Vec<f64> = (0..50).map(|i| 100.0 + i as f64).collect();
        let result = Macd::new().calculate(&data);

        assert_eq!(result.len(), 50 - 33);
        assert!(result.iter().all(|m| m.macd > 0.0));
        let last = result.last().unwrap();
        assert!((last.histogram - (last.macd - last.signal)).abs() < 1e-12);
    }

    #[test]
    fn test_macd_first_value_index() {
        let aligned = Macd::new().aligned(&wave(40));

        assert_eq!(aligned.len(), 40);
        assert!(aligned[32].is_none());
        assert!(aligned[33].is_some());
    }

    #[test]
    fn test_macd_short_input() {
        assert!(Macd::with_periods(5, 10, 3).calculate(&[1.0, 2.0, 3.0]).is_empty());
    }
}
