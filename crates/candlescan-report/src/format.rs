//! Cell formatting shared by the table and spreadsheet writers.

use candlescan_core::types::Timeframe;
use candlescan_signals::SignalReport;
use chrono::DateTime;

/// Header of the time column: `Datetime` for intraday bars, `Date` otherwise.
pub fn time_header(timeframe: Timeframe) -> &'static str {
    if timeframe.is_intraday() {
        "Datetime"
    } else {
        "Date"
    }
}

/// Render a bar timestamp (Unix ms, UTC) for display.
pub fn format_timestamp(timestamp_ms: i64, timeframe: Timeframe) -> String {
    let dt = DateTime::from_timestamp_millis(timestamp_ms).unwrap_or_default();
    if timeframe.is_intraday() {
        dt.format("%Y-%m-%d %H:%M").to_string()
    } else {
        dt.format("%Y-%m-%d").to_string()
    }
}

/// Two decimals, or an empty cell while the indicator is warming up.
pub fn format_value(value: Option<f64>) -> String {
    value.map(|v| format!("{:.2}", v)).unwrap_or_default()
}

/// Pretty-printed JSON document for a report.
pub fn render_json(report: &SignalReport) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(report)
}
