//! Indicator traits.
//!
//! Every indicator returns values only where its lookback is full. The
//! `aligned*` helpers put them back on the bar index so warm-up bars read
//! as `None` in the frame.

use crate::types::Bar;

/// Left-pad `values` with `None` up to `len` entries.
pub fn pad_front<T>(values: Vec<T>, len: usize) -> Vec<Option<T>> {
    let offset = len.saturating_sub(values.len());
    std::iter::repeat_with(|| None)
        .take(offset)
        .chain(values.into_iter().map(Some))
        .take(len)
        .collect()
}

/// Indicator over a single price column.
pub trait Indicator: Send + Sync {
    type Output;

    /// Values for each full window, oldest first.
    fn calculate(&self, data: &[f64]) -> Vec<Self::Output>;

    /// Lookback length.
    fn period(&self) -> usize;

    /// TA-Lib style name (`RSI`, `EMA`, ...).
    fn name(&self) -> &str;

    fn aligned(&self, data: &[f64]) -> Vec<Option<Self::Output>> {
        pad_front(self.calculate(data), data.len())
    }
}

/// Single-column indicator with several lines per bar (MACD, Bollinger Bands).
pub trait MultiOutputIndicator: Send + Sync {
    type Outputs;

    fn calculate(&self, data: &[f64]) -> Vec<Self::Outputs>;

    fn period(&self) -> usize;

    fn name(&self) -> &str;

    fn aligned(&self, data: &[f64]) -> Vec<Option<Self::Outputs>> {
        pad_front(self.calculate(data), data.len())
    }
}

/// Indicator reading high, low and close together (ADX, rolling extremes).
pub trait OhlcvIndicator: Send + Sync {
    type Output;

    fn calculate_bars(&self, bars: &[Bar]) -> Vec<Self::Output>;

    fn period(&self) -> usize;

    fn name(&self) -> &str;

    fn aligned_bars(&self, bars: &[Bar]) -> Vec<Option<Self::Output>> {
        pad_front(self.calculate_bars(bars), bars.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct WindowSum(usize);

    impl Indicator for WindowSum {
        type Output = f64;

        fn calculate(&self, data: &[f64]) -> Vec<f64> {
            data.windows(self.0).map(|w| w.iter().sum()).collect()
        }

        fn period(&self) -> usize {
            self.0
        }

        fn name(&self) -> &str {
            "SUM"
        }
    }

    #[test]
    fn test_aligned_pads_warmup() {
        let result = WindowSum(3).aligned(&[1.0, 2.0, 3.0, 4.0, 5.0]);
        assert_eq!(result, vec![None, None, Some(6.0), Some(9.0), Some(12.0)]);
    }

    #[test]
    fn test_aligned_short_input_is_all_none() {
        assert_eq!(WindowSum(3).aligned(&[1.0, 2.0]), vec![None, None]);
    }

    #[test]
    fn test_pad_front_never_exceeds_len() {
        let padded: Vec<Option<f64>> = pad_front(vec![], 0);
        assert!(padded.is_empty());
        assert_eq!(pad_front(vec![1, 2, 3], 2), vec![Some(1), Some(2)]);
    }
}
