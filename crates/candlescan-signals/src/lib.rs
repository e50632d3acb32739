//! Signal derivation over indicator frames.
//!
//! Two named variants turn an [`IndicatorFrame`](candlescan_indicators::IndicatorFrame)
//! into events:
//! - `combined`: bullish pattern + oversold RSI + volume spike buys, overbought RSI sells
//! - `scan`: every candlestick pattern occurrence with a recommendation

mod combined;
mod deriver;
mod pipeline;
mod registry;
mod report;
mod scan;

pub use combined::{CombinedConfig, CombinedDeriver, CombinedSignal};
pub use deriver::{SignalDeriver, VariantConfig, VariantError};
pub use pipeline::{analyze, Analysis};
pub use registry::{Deriver, Variant, VariantInfo, VariantRegistry};
pub use report::{ReportEvents, ReportSummary, SignalReport};
pub use scan::{round_price, PatternEvent, PatternType, Recommendation, ScanConfig, ScanDeriver};
