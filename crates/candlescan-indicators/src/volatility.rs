//! Bollinger Bands.

use candlescan_core::traits::{Indicator, MultiOutputIndicator};
use serde::{Deserialize, Serialize};

/// Mean and population standard deviation of a window.
fn mean_and_sd(window: &[f64]) -> (f64, f64) {
    let n = window.len() as f64;
    let mean = window.iter().sum::<f64>() / n;
    let variance = window.iter().map(|x| (x - mean) * (x - mean)).sum::<f64>() / n;
    (mean, variance.max(0.0).sqrt())
}

/// Population standard deviation over a sliding window.
#[derive(Debug, Clone)]
pub struct StdDev {
    period: usize,
}

impl StdDev {
    pub fn new(period: usize) -> Self {
        assert!(period > 1, "StdDev period must be at least 2");
        Self { period }
    }
}

impl Indicator for StdDev {
    type Output = f64;

    fn calculate(&self, data: &[f64]) -> Vec<f64> {
        data.windows(self.period).map(|w| mean_and_sd(w).1).collect()
    }

    fn period(&self) -> usize {
        self.period
    }

    fn name(&self) -> &str {
        "STDDEV"
    }
}

/// Bands around the close for one bar.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BollingerOutput {
    pub upper: f64,
    pub middle: f64,
    pub lower: f64,
}

/// SMA middle band with outer bands `deviations` population standard
/// deviations away. Matches TA-Lib `BBANDS` with its 20 / 2.0 defaults.
#[derive(Debug, Clone)]
pub struct BollingerBands {
    period: usize,
    deviations: f64,
}

impl BollingerBands {
    pub fn new() -> Self {
        Self::with_params(20, 2.0)
    }

    pub fn with_params(period: usize, deviations: f64) -> Self {
        assert!(period > 1, "Bollinger period must be at least 2");
        assert!(deviations > 0.0, "Bollinger width must be positive");
        Self { period, deviations }
    }
}

impl Default for BollingerBands {
    fn default() -> Self {
        Self::new()
    }
}

impl MultiOutputIndicator for BollingerBands {
    type Outputs = BollingerOutput;

    fn calculate(&self, data: &[f64]) -> Vec<BollingerOutput> {
        data.windows(self.period)
            .map(mean_and_sd)
            .map(|(middle, sd)| {
                let offset = self.deviations * sd;
                BollingerOutput {
                    upper: middle + offset,
                    middle,
                    lower: middle - offset,
                }
            })
            .collect()
    }

    fn period(&self) -> usize {
        self.period
    }

    fn name(&self) -> &str {
        "BBANDS"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_std_dev_is_population() {
        let result = StdDev::new(3).calculate(&[2.0, 4.0, 6.0, 8.0, 10.0]);

        assert_eq!(result.len(), 3);
        // mean 4, squared deviations 4 + 0 + 4 over 3
        assert!((result[0] - (8.0f64 / 3.0).sqrt()).abs() < 1e-10);
        assert!((result[2] - result[0]).abs() < 1e-10);
    }

    #[test]
    fn test_bands_bracket_the_middle() {
        let data: Vec<f64> = (0..30).map(|i| 100.0 + (i as f64 * 0.1).sin() * 5.0).collect();
        let result = BollingerBands::new().calculate(&data);

        assert_eq!(result.len(), 11);
        for bands in &result {
            assert!(bands.upper > bands.middle && bands.middle > bands.lower);
            assert!(((bands.upper - bands.middle) - (bands.middle - bands.lower)).abs() < 1e-9);
        }
    }

    #[test]
    fn test_flat_prices_collapse_the_bands() {
        let result = BollingerBands::with_params(5, 2.0).calculate(&[100.0; 5]);

        assert_eq!(
            result,
            vec![BollingerOutput {
                upper: 100.0,
                middle: 100.0,
                lower: 100.0
            }]
        );
    }

    #[test]
    fn test_bands_start_after_warmup() {
        let data: Vec<f64> = (0..25).map(f64::from).collect();
        let aligned = BollingerBands::new().aligned(&data);

        assert!(aligned[18].is_none());
        assert_eq!(aligned[19].map(|b| b.middle), Some(9.5));
    }
}
