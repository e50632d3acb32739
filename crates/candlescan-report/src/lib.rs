//! Report output for candlescan.
//!
//! - Logging setup shared by the binary
//! - Terminal tables and JSON rendering
//! - Single-sheet xlsx export with deterministic file names
//! - Interactive ratatui chart

mod chart;
mod filename;
mod format;
mod logging;
mod table;
mod xlsx;

pub use chart::{y_bounds, ChartData, ChartView, ADX_THRESHOLD};
pub use filename::{
    patterns_file_name, report_file_name, sanitize, signals_file_name, DEFAULT_SCAN_PREFIX,
};
pub use format::{format_timestamp, format_value, render_json, time_header};
pub use logging::{setup_logging, LoggingError};
pub use table::{events_table, print_report, render_report, summary_table};
pub use xlsx::{export_report, report_sheet, write_sheet, ExportError, Sheet, SheetCell};
