//! Trend strength indicators.

use candlescan_core::traits::{Indicator, OhlcvIndicator};
use candlescan_core::types::Bar;

use crate::moving_average::Wilder;

/// Average Directional Index (ADX).
///
/// Wilder's directional movement system. True range and the two
/// directional movements are Wilder-smoothed (running sum, then
/// `s - s / n + v`), the directional index DX is computed from the
/// smoothed +DI/-DI, and ADX is the Wilder average of DX. With period
/// `n` the first value lands at index `2n - 1`.
#[derive(Debug, Clone)]
pub struct Adx {
    period: usize,
}

impl Adx {
    /// Create a new ADX indicator.
    pub fn new(period: usize) -> Self {
        assert!(period > 0, "Period must be greater than 0");
        Self { period }
    }

    fn directional_index(plus: f64, minus: f64, tr: f64) -> f64 {
        if tr == 0.0 {
            return 0.0;
        }
        let plus_di = 100.0 * plus / tr;
        let minus_di = 100.0 * minus / tr;
        let sum = plus_di + minus_di;
        if sum == 0.0 {
            0.0
        } else {
            100.0 * (plus_di - minus_di).abs() / sum
        }
    }
}

impl Default for Adx {
    fn default() -> Self {
        Self::new(14)
    }
}

impl OhlcvIndicator for Adx {
    type Output = f64;

    fn calculate_bars(&self, bars: &[Bar]) -> Vec<f64> {
        let n = self.period;
        if bars.len() < self.period() {
            return vec![];
        }

        // Per-step movements start at bar 1.
        let steps: Vec<(f64, f64, f64)> = bars
            .windows(2)
            .map(|pair| {
                let (prev, cur) = (&pair[0], &pair[1]);
                let up = cur.high - prev.high;
                let down = prev.low - cur.low;
                let plus_dm = if up > down && up > 0.0 { up } else { 0.0 };
                let minus_dm = if down > up && down > 0.0 { down } else { 0.0 };
                (cur.true_range(Some(prev.close)), plus_dm, minus_dm)
            })
            .collect();

        let nf = n as f64;
        let (mut tr, mut plus, mut minus) = steps[..n]
            .iter()
            .fold((0.0, 0.0, 0.0), |acc, s| (acc.0 + s.0, acc.1 + s.1, acc.2 + s.2));

        let mut dx = Vec::with_capacity(steps.len() - n + 1);
        dx.push(Self::directional_index(plus, minus, tr));

        for &(step_tr, step_plus, step_minus) in &steps[n..] {
            tr = tr - tr / nf + step_tr;
            plus = plus - plus / nf + step_plus;
            minus = minus - minus / nf + step_minus;
            dx.push(Self::directional_index(plus, minus, tr));
        }

        Wilder::new(n).calculate(&dx)
    }

    fn period(&self) -> usize {
        2 * self.period
    }

    fn name(&self) -> &str {
        "ADX"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn trending_bars(count: usize) -> Vec<Bar> {
        (0..count)
            .map(|i| {
                let base = 100.0 + i as f64;
                Bar::new(i as i64, base, base + 1.5, base - 0.5, base + 1.0, 1000.0)
            })
            .collect()
    }

    #[test]
    fn test_adx_first_value_index() {
        let adx = Adx::new(14);
        let bars = trending_bars(40);
        let aligned = adx.aligned_bars(&bars);

        assert_eq!(aligned.len(), 40);
        assert!(aligned[26].is_none());
        assert!(aligned[27].is_some());
    }

    #[test]
    fn test_adx_strong_trend() {
        let adx = Adx::new(5);
        let result = adx.calculate_bars(&trending_bars(30));

        // Only up moves: +DI dominates and DX pins at 100.
        assert!((result.last().copied().unwrap() - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_adx_bounded() {
        let adx = Adx::new(3);
        let bars: Vec<Bar> = (0..20)
            .map(|i| {
                let base = 50.0 + ((i as f64) * 0.9).sin() * 4.0;
                Bar::new(i, base, base + 1.0, base - 1.0, base + 0.2, 10.0)
            })
            .collect();

        for value in adx.calculate_bars(&bars) {
            assert!((0.0..=100.0).contains(&value));
        }
    }

    #[test]
    fn test_adx_short_input() {
        let adx = Adx::new(14);
        assert!(adx.calculate_bars(&trending_bars(10)).is_empty());
    }
}
