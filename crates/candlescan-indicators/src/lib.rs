//! Technical indicators and candlestick pattern recognition.
//!
//! This crate provides the indicator engine behind every report:
//! - Moving averages (SMA, EMA) and rolling window statistics
//! - Momentum indicators (RSI, MACD)
//! - Trend strength (ADX) and volatility bands (Bollinger Bands)
//! - Seventeen candlestick pattern detectors using TA-Lib style codes
//! - [`IndicatorFrame`], which lines all of the above up bar by bar

pub mod frame;
pub mod momentum;
pub mod moving_average;
pub mod patterns;
pub mod rolling;
pub mod trend;
pub mod volatility;

pub use frame::{FrameRow, FrameSettings, IndicatorFrame, MIN_BARS};
pub use momentum::{Macd, MacdOutput, Rsi};
pub use moving_average::{Ema, Sma, Wilder};
pub use patterns::{CandlePattern, PatternCodes, PatternSettings};
pub use rolling::{RollingMax, RollingMean, RollingMin};
pub use trend::Adx;
pub use volatility::{BollingerBands, BollingerOutput, StdDev};
