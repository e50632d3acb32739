//! Core data types for candlescan.

mod ohlcv;
mod raw;
mod run;
mod timeframe;

pub use ohlcv::{Bar, BarSeries};
pub use raw::{RawRow, RawTable, RawValue};
pub use run::RunConfig;
pub use timeframe::{parse_date, Timeframe, Window};
