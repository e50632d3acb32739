//! Core traits for candlescan.

mod data_source;
mod indicator;

pub use data_source::DataSource;
pub use indicator::{pad_front, Indicator, MultiOutputIndicator, OhlcvIndicator};
