//! CSV data source.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use candlescan_core::error::DataError;
use candlescan_core::traits::DataSource;
use candlescan_core::types::{RawTable, RawValue, RunConfig};
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use csv::ReaderBuilder;
use tracing::{debug, warn};

const DATE_HEADERS: [&str; 4] = ["date", "datetime", "timestamp", "time"];

/// Price history exported to a CSV file, e.g. a saved provider download.
///
/// The first column named like a date (or the first column, failing that)
/// supplies timestamps; every other column is passed through untouched for
/// [`normalize`](crate::normalize) to resolve. Rows whose timestamp does not
/// parse, such as the `Ticker` and `Date` lines under a multi-level header,
/// are skipped.
pub struct CsvDataSource {
    path: PathBuf,
}

impl CsvDataSource {
    /// Create a new CSV data source.
    pub fn new(path: impl AsRef<Path>) -> Result<Self, DataError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(DataError::ExternalCall(format!(
                "CSV file not found: {}",
                path.display()
            )));
        }
        Ok(Self {
            path: path.to_path_buf(),
        })
    }

    /// Read the whole file into a raw table.
    pub fn load(&self, symbol: &str) -> Result<RawTable, DataError> {
        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .trim(csv::Trim::All)
            .from_path(&self.path)
            .map_err(|e| DataError::Parse(e.to_string()))?;

        let headers: Vec<String> = reader
            .headers()
            .map_err(|e| DataError::Parse(e.to_string()))?
            .iter()
            .map(str::to_string)
            .collect();

        let date_col = headers
            .iter()
            .position(|h| DATE_HEADERS.contains(&h.to_lowercase().as_str()))
            .unwrap_or(0);

        let columns: Vec<String> = headers
            .iter()
            .enumerate()
            .filter(|(i, _)| *i != date_col)
            .map(|(_, h)| h.clone())
            .collect();

        let mut table = RawTable::new(symbol, columns);
        let mut skipped = 0usize;
        let mut last_bad = String::new();

        for record in reader.records() {
            let record = record.map_err(|e| DataError::Parse(e.to_string()))?;
            let date = record.get(date_col).unwrap_or_default();
            let Ok(timestamp) = parse_timestamp(date) else {
                skipped += 1;
                last_bad = date.to_string();
                continue;
            };

            let cells = record
                .iter()
                .enumerate()
                .filter(|(i, _)| *i != date_col)
                .map(|(_, cell)| {
                    if cell.is_empty() {
                        RawValue::Missing
                    } else {
                        RawValue::Text(cell.to_string())
                    }
                })
                .collect();
            table.push_row(timestamp, cells);
        }

        if skipped > 0 {
            warn!(path = %self.path.display(), skipped, "Skipped rows without a parseable date");
            if table.is_empty() {
                return Err(DataError::Parse(format!("Could not parse date: {}", last_bad)));
            }
        }

        debug!(path = %self.path.display(), rows = table.len(), "Loaded CSV");
        Ok(table)
    }
}

#[async_trait]
impl DataSource for CsvDataSource {
    async fn fetch(&self, run: &RunConfig) -> Result<RawTable, DataError> {
        let mut table = self.load(&run.symbol)?;
        table.rows.retain(|row| run.window.contains(row.timestamp));

        if table.is_empty() {
            return Err(DataError::NoData {
                symbol: run.symbol.clone(),
            });
        }
        Ok(table)
    }

    fn name(&self) -> &str {
        "csv"
    }
}

/// Parse the date formats commonly found in exported price files.
pub(crate) fn parse_timestamp(date_str: &str) -> Result<i64, DataError> {
    let date_str = date_str.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(date_str) {
        return Ok(dt.timestamp_millis());
    }
    if let Ok(dt) = DateTime::parse_from_str(date_str, "%Y-%m-%d %H:%M:%S%:z") {
        return Ok(dt.timestamp_millis());
    }

    let datetime_formats = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M"];
    for format in datetime_formats {
        if let Ok(dt) = NaiveDateTime::parse_from_str(date_str, format) {
            return Ok(dt.and_utc().timestamp_millis());
        }
    }

    let date_formats = ["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y", "%d-%m-%Y"];
    for format in date_formats {
        if let Ok(d) = NaiveDate::parse_from_str(date_str, format) {
            return Ok(d.and_time(chrono::NaiveTime::MIN).and_utc().timestamp_millis());
        }
    }

    if let Ok(ts) = date_str.parse::<i64>() {
        // More than 10 digits means milliseconds already.
        return Ok(if ts > 10_000_000_000 { ts } else { ts * 1000 });
    }

    Err(DataError::Parse(format!("Could not parse date: {}", date_str)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use candlescan_core::types::{Timeframe, Window};
    use std::io::Write;

    fn write_csv(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_parse_timestamp() {
        assert_eq!(parse_timestamp("2024-01-15").unwrap(), 1_705_276_800_000);
        assert!(parse_timestamp("2024-01-15 10:30:00").is_ok());
        assert_eq!(
            parse_timestamp("2024-01-15 09:15:00+05:30").unwrap(),
            parse_timestamp("2024-01-15 03:45:00").unwrap()
        );
        assert_eq!(parse_timestamp("1705312800000").unwrap(), 1_705_312_800_000);
        assert_eq!(parse_timestamp("1705312800").unwrap(), 1_705_312_800_000);
        assert!(parse_timestamp("yesterday").is_err());
    }

    #[test]
    fn test_load_keeps_columns() {
        let file = write_csv(
            "Date,Open,High,Low,Close,Volume\n\
             2024-01-02,10,11,9,10.5,1000\n\
             2024-01-03,10.5,12,10,,\n",
        );
        let table = CsvDataSource::new(file.path()).unwrap().load("TEST").unwrap();

        assert_eq!(table.columns, vec!["Open", "High", "Low", "Close", "Volume"]);
        assert_eq!(table.len(), 2);
        assert_eq!(table.rows[0].cells[3], RawValue::Text("10.5".to_string()));
        assert_eq!(table.rows[1].cells[3], RawValue::Missing);
    }

    #[tokio::test]
    async fn test_fetch_filters_window() {
        let file = write_csv(
            "Datetime,Close_AAPL,High_AAPL,Low_AAPL,Open_AAPL\n\
             2024-01-02,1,1,1,1\n\
             2024-02-02,2,2,2,2\n",
        );
        let source = CsvDataSource::new(file.path()).unwrap();
        let window = Window::parse_range("2024-02-01", "2024-02-29", Timeframe::Daily).unwrap();

        let table = source.fetch(&RunConfig::new("aapl", window)).await.unwrap();
        assert_eq!(table.len(), 1);
        assert_eq!(table.symbol, "AAPL");

        let window = Window::parse_range("2023-01-01", "2023-01-31", Timeframe::Daily).unwrap();
        let result = source.fetch(&RunConfig::new("aapl", window)).await;
        assert!(matches!(result, Err(DataError::NoData { .. })));
    }

    #[test]
    fn test_load_skips_multi_level_header_rows() {
        let file = write_csv(
            "Price,Close,High,Low,Open,Volume\n\
             Ticker,AAPL,AAPL,AAPL,AAPL,AAPL\n\
             Date,,,,,\n\
             2024-01-02,10,11,9,10,100\n\
             2024-01-03,10.5,11.5,9.5,10,120\n\
             2024-01-04,11,12,10,10.5,90\n",
        );
        let table = CsvDataSource::new(file.path()).unwrap().load("AAPL").unwrap();

        assert_eq!(table.columns, vec!["Close", "High", "Low", "Open", "Volume"]);
        assert_eq!(table.len(), 3);
        assert_eq!(table.rows[0].timestamp, parse_timestamp("2024-01-02").unwrap());

        let series = crate::normalize(&table).unwrap();
        assert_eq!(series.len(), 3);
        assert_eq!(series.bars()[2].close, 11.0);
    }

    #[test]
    fn test_load_without_any_dates_fails() {
        let file = write_csv("Date,Open,High,Low,Close\nsoon,1,1,1,1\nlater,2,2,2,2\n");
        let result = CsvDataSource::new(file.path()).unwrap().load("TEST");

        assert!(matches!(result, Err(DataError::Parse(msg)) if msg.contains("later")));
    }

    #[test]
    fn test_missing_file() {
        assert!(CsvDataSource::new("/definitely/not/here.csv").is_err());
    }
}
