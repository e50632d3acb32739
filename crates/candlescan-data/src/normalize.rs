//! Raw table cleaning.
//!
//! Providers deliver column names in any case and sometimes flattened from
//! a two-level header (`Close_TATAMOTORS.NS`, `('Close', 'AAPL')`). This
//! module resolves the five canonical columns, coerces cells to numbers and
//! drops rows that cannot form a complete candle.

use candlescan_core::error::DataError;
use candlescan_core::types::{Bar, BarSeries, RawRow, RawTable};
use tracing::{debug, warn};

/// Fewest clean rows an analysis can use.
pub const MIN_ROWS: usize = 2;

/// Positions of the canonical columns in a raw table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnMap {
    pub open: usize,
    pub high: usize,
    pub low: usize,
    pub close: usize,
    pub volume: Option<usize>,
}

/// Reduce a delivered column name to its field, lower-cased.
///
/// `"('Close', 'AAPL')"` and `"Close_AAPL"` both become `"close"`.
pub fn canonical_name(column: &str) -> String {
    let trimmed = column.trim();

    let field = if trimmed.starts_with('(') {
        trimmed
            .trim_start_matches('(')
            .split(',')
            .next()
            .unwrap_or_default()
            .trim()
            .trim_matches(|c| c == '\'' || c == '"')
    } else {
        trimmed.split('_').next().unwrap_or_default()
    };

    field.trim().to_lowercase()
}

/// Locate the canonical columns.
///
/// `Close` wins over `Adj Close` when both are present.
pub fn resolve_columns(columns: &[String]) -> Result<ColumnMap, DataError> {
    let names: Vec<String> = columns.iter().map(|c| canonical_name(c)).collect();
    let find = |wanted: &str| names.iter().position(|n| n == wanted);

    let close = find("close").or_else(|| find("adj close"));
    let (open, high, low) = (find("open"), find("high"), find("low"));

    match (open, high, low, close) {
        (Some(open), Some(high), Some(low), Some(close)) => Ok(ColumnMap {
            open,
            high,
            low,
            close,
            volume: find("volume"),
        }),
        _ => {
            let missing: Vec<&str> = [("Open", open), ("High", high), ("Low", low), ("Close", close)]
                .iter()
                .filter(|(_, idx)| idx.is_none())
                .map(|(name, _)| *name)
                .collect();
            Err(DataError::Schema(format!(
                "missing {} (have: {})",
                missing.join(", "),
                columns.join(", ")
            )))
        }
    }
}

/// Clean a raw table into an ordered bar series.
///
/// Rows with any missing or non-numeric price are dropped, volume may stay
/// absent. Rows are sorted by time and repeated timestamps keep their first
/// occurrence.
pub fn normalize(table: &RawTable) -> Result<BarSeries, DataError> {
    if table.is_empty() {
        return Err(DataError::NoData {
            symbol: table.symbol.clone(),
        });
    }

    let map = resolve_columns(&table.columns)?;
    let cell = |row: &RawRow, idx: usize| row.cells.get(idx).and_then(|v| v.as_f64());

    let mut bars: Vec<Bar> = table
        .rows
        .iter()
        .filter_map(|row| {
            let open = cell(row, map.open)?;
            let high = cell(row, map.high)?;
            let low = cell(row, map.low)?;
            let close = cell(row, map.close)?;
            Some(Bar {
                timestamp: row.timestamp,
                open,
                high,
                low,
                close,
                volume: map.volume.and_then(|idx| cell(row, idx)),
            })
        })
        .collect();

    let dropped = table.len() - bars.len();
    if dropped > 0 {
        warn!(symbol = %table.symbol, dropped, "Dropped rows with incomplete prices");
    }

    bars.sort_by_key(|b| b.timestamp);
    bars.dedup_by_key(|b| b.timestamp);

    if bars.len() < MIN_ROWS {
        return Err(DataError::InsufficientData {
            required: MIN_ROWS,
            available: bars.len(),
        });
    }

    debug!(symbol = %table.symbol, bars = bars.len(), "Normalized price table");
    Ok(BarSeries::from_bars(table.symbol.clone(), bars))
}
