//! Core types and traits for candlescan.
//!
//! This crate provides the foundational building blocks including:
//! - Market data types (Bar, BarSeries, RawTable)
//! - Timeframes, analysis windows and the per-run configuration
//! - The error taxonomy shared by every stage of the pipeline
//! - Core traits for indicators and data sources

pub mod types;
pub mod traits;
pub mod error;

pub use error::{AnalysisError, DataError, IndicatorError};
pub use types::*;
pub use traits::*;
