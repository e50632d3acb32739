//! Trailing candle statistics shared by the pattern detectors.

use candlescan_core::types::Bar;

/// Per-bar reference sizes computed from the bars *before* each index.
///
/// A candle's body is "long" or "short" relative to the average body of the
/// preceding `period` candles, and shadow or doji tests are relative to the
/// average high-low range. Averages are unavailable (`None`) until `period`
/// earlier candles exist.
pub(crate) struct CandleContext<'a> {
    bars: &'a [Bar],
    period: usize,
    body_sums: Vec<f64>,
    range_sums: Vec<f64>,
}

/// Fraction of the average range below which a body counts as a doji.
pub(crate) const DOJI_FACTOR: f64 = 0.1;
/// Fraction of the average range below which a shadow is "very short".
pub(crate) const SHADOW_VERY_SHORT_FACTOR: f64 = 0.1;
/// Fraction of the average range used for "near" price comparisons.
pub(crate) const NEAR_FACTOR: f64 = 0.2;

impl<'a> CandleContext<'a> {
    pub(crate) fn new(bars: &'a [Bar], period: usize) -> Self {
        let mut body_sums = Vec::with_capacity(bars.len() + 1);
        let mut range_sums = Vec::with_capacity(bars.len() + 1);
        body_sums.push(0.0);
        range_sums.push(0.0);

        for bar in bars {
            body_sums.push(body_sums[body_sums.len() - 1] + bar.body());
            range_sums.push(range_sums[range_sums.len() - 1] + bar.range());
        }

        Self {
            bars,
            period: period.max(1),
            body_sums,
            range_sums,
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.bars.len()
    }

    pub(crate) fn bar(&self, index: usize) -> &Bar {
        &self.bars[index]
    }

    fn trailing(&self, sums: &[f64], index: usize) -> Option<f64> {
        if index < self.period || index >= self.bars.len() {
            return None;
        }
        Some((sums[index] - sums[index - self.period]) / self.period as f64)
    }

    /// Average body of the `period` candles preceding `index`.
    pub(crate) fn avg_body(&self, index: usize) -> Option<f64> {
        self.trailing(&self.body_sums, index)
    }

    /// Average high-low range of the `period` candles preceding `index`.
    pub(crate) fn avg_range(&self, index: usize) -> Option<f64> {
        self.trailing(&self.range_sums, index)
    }

    pub(crate) fn body_long(&self, index: usize) -> Option<bool> {
        Some(self.bars[index].body() > self.avg_body(index)?)
    }

    pub(crate) fn body_short(&self, index: usize) -> Option<bool> {
        Some(self.bars[index].body() < self.avg_body(index)?)
    }

    pub(crate) fn is_doji(&self, index: usize) -> Option<bool> {
        Some(self.bars[index].body() <= DOJI_FACTOR * self.avg_range(index)?)
    }

    pub(crate) fn very_short(&self, shadow: f64, index: usize) -> Option<bool> {
        Some(shadow < SHADOW_VERY_SHORT_FACTOR * self.avg_range(index)?)
    }

    pub(crate) fn near(&self, index: usize) -> Option<f64> {
        Some(NEAR_FACTOR * self.avg_range(index)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trailing_averages_exclude_current_bar() {
        let mut bars: Vec<Bar> = (0..3)
            .map(|i| Bar::new(i, 10.0, 12.0, 9.0, 11.0, 1.0))
            .collect();
        bars.push(Bar::new(3, 10.0, 20.0, 5.0, 15.0, 1.0));

        let ctx = CandleContext::new(&bars, 3);
        assert_eq!(ctx.avg_body(2), None);
        assert_eq!(ctx.avg_body(3), Some(1.0));
        assert_eq!(ctx.avg_range(3), Some(3.0));
        assert_eq!(ctx.body_long(3), Some(true));
    }
}
