//! Provider tables before cleaning.

use serde::{Deserialize, Serialize};

/// A single cell as delivered by a data provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum RawValue {
    Number(f64),
    Text(String),
    Missing,
}

impl RawValue {
    /// Coerce the cell to a finite number, if possible.
    ///
    /// Text cells are trimmed and may carry thousands separators.
    pub fn as_f64(&self) -> Option<f64> {
        let value = match self {
            RawValue::Number(v) => *v,
            RawValue::Text(s) => s.trim().replace(',', "").parse::<f64>().ok()?,
            RawValue::Missing => return None,
        };
        value.is_finite().then_some(value)
    }
}

impl From<Option<f64>> for RawValue {
    fn from(value: Option<f64>) -> Self {
        value.map_or(RawValue::Missing, RawValue::Number)
    }
}

/// One provider row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawRow {
    /// Unix timestamp in milliseconds
    pub timestamp: i64,
    /// Cells in column order
    pub cells: Vec<RawValue>,
}

/// Price table exactly as a provider returned it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawTable {
    /// Requested symbol
    pub symbol: String,
    /// Company or instrument name reported by the provider
    pub company: Option<String>,
    /// Column names as delivered
    pub columns: Vec<String>,
    /// Data rows
    pub rows: Vec<RawRow>,
}

impl RawTable {
    /// Create an empty table with the given column names.
    pub fn new(symbol: impl Into<String>, columns: Vec<String>) -> Self {
        Self {
            symbol: symbol.into(),
            company: None,
            columns,
            rows: Vec::new(),
        }
    }

    /// Append a row. Short rows are padded with missing cells.
    pub fn push_row(&mut self, timestamp: i64, mut cells: Vec<RawValue>) {
        if cells.len() < self.columns.len() {
            cells.resize(self.columns.len(), RawValue::Missing);
        }
        self.rows.push(RawRow { timestamp, cells });
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Check if the table has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raw_value_coercion() {
        assert_eq!(RawValue::Number(1.5).as_f64(), Some(1.5));
        assert_eq!(RawValue::Text(" 1,234.5 ".into()).as_f64(), Some(1234.5));
        assert_eq!(RawValue::Text("n/a".into()).as_f64(), None);
        assert_eq!(RawValue::Number(f64::NAN).as_f64(), None);
        assert_eq!(RawValue::Missing.as_f64(), None);
    }

    #[test]
    fn test_push_row_pads_short_rows() {
        let mut table = RawTable::new("AAPL", vec!["Open".into(), "Close".into()]);
        table.push_row(1, vec![RawValue::Number(1.0)]);

        assert_eq!(table.len(), 1);
        assert_eq!(table.rows[0].cells[1], RawValue::Missing);
    }
}
