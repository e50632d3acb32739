//! Spreadsheet export.
//!
//! Each report becomes a single-sheet workbook. Combined signals go to a
//! `Signals` sheet; pattern scans go to a `Patterns` sheet with the company
//! prepended as the first column and the raw pattern code left out.

use std::path::{Path, PathBuf};

use candlescan_core::types::Timeframe;
use candlescan_signals::{CombinedSignal, PatternEvent, ReportEvents, SignalReport};
use rust_xlsxwriter::{Format, Workbook, XlsxError};
use thiserror::Error;
use tracing::info;

use crate::filename::report_file_name;
use crate::format::{format_timestamp, time_header};

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("Spreadsheet error: {0}")]
    Xlsx(#[from] XlsxError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// One spreadsheet cell.
#[derive(Debug, Clone, PartialEq)]
pub enum SheetCell {
    Text(String),
    Number(f64),
    Bool(bool),
    Empty,
}

impl From<Option<f64>> for SheetCell {
    fn from(value: Option<f64>) -> Self {
        value.map(SheetCell::Number).unwrap_or(SheetCell::Empty)
    }
}

/// Sheet contents before they are written.
#[derive(Debug, Clone, PartialEq)]
pub struct Sheet {
    pub name: &'static str,
    pub headers: Vec<String>,
    pub rows: Vec<Vec<SheetCell>>,
}

fn signals_sheet(signals: &[CombinedSignal], timeframe: Timeframe) -> Sheet {
    let headers = [time_header(timeframe), "Signal", "Close", "RSI", "MACD", "ADX", "Buy", "Sell"];
    let rows = signals
        .iter()
        .map(|s| {
            vec![
                SheetCell::Text(format_timestamp(s.timestamp, timeframe)),
                SheetCell::Text(s.label().to_string()),
                SheetCell::Number(s.close),
                s.rsi.into(),
                s.macd.into(),
                s.adx.into(),
                SheetCell::Bool(s.buy),
                SheetCell::Bool(s.sell),
            ]
        })
        .collect();

    Sheet {
        name: "Signals",
        headers: headers.iter().map(|h| h.to_string()).collect(),
        rows,
    }
}

fn patterns_sheet(events: &[PatternEvent], company: &str, timeframe: Timeframe) -> Sheet {
    let headers = ["Company", time_header(timeframe), "Pattern", "Type", "Closing Price", "Recommendation"];
    let rows = events
        .iter()
        .map(|e| {
            vec![
                SheetCell::Text(company.to_string()),
                SheetCell::Text(format_timestamp(e.timestamp, timeframe)),
                SheetCell::Text(e.pattern.name().to_string()),
                SheetCell::Text(e.pattern_type.to_string()),
                SheetCell::Number(e.closing_price),
                SheetCell::Text(e.recommendation.to_string()),
            ]
        })
        .collect();

    Sheet {
        name: "Patterns",
        headers: headers.iter().map(|h| h.to_string()).collect(),
        rows,
    }
}

/// Lay out a report as a sheet.
pub fn report_sheet(report: &SignalReport) -> Sheet {
    let timeframe = report.window.timeframe();
    match &report.events {
        ReportEvents::Combined(signals) => signals_sheet(signals, timeframe),
        ReportEvents::Scan(events) => patterns_sheet(events, &report.company, timeframe),
    }
}

/// Write a sheet to a new workbook at `path`.
pub fn write_sheet(sheet: &Sheet, path: &Path) -> Result<(), ExportError> {
    let mut workbook = Workbook::new();
    let header = Format::new().set_bold();
    let number = Format::new().set_num_format("0.00");

    let worksheet = workbook.add_worksheet();
    worksheet.set_name(sheet.name)?;

    for (col, title) in sheet.headers.iter().enumerate() {
        worksheet.write_string_with_format(0, col as u16, title, &header)?;
        worksheet.set_column_width(col as u16, (title.len() + 4).max(12) as f64)?;
    }

    for (i, row) in sheet.rows.iter().enumerate() {
        let r = (i + 1) as u32;
        for (col, cell) in row.iter().enumerate() {
            let c = col as u16;
            match cell {
                SheetCell::Text(text) => {
                    worksheet.write_string(r, c, text)?;
                }
                SheetCell::Number(value) => {
                    worksheet.write_number_with_format(r, c, *value, &number)?;
                }
                SheetCell::Bool(value) => {
                    worksheet.write_boolean(r, c, *value)?;
                }
                SheetCell::Empty => {}
            }
        }
    }
    worksheet.set_freeze_panes(1, 0)?;

    workbook.save(path)?;
    Ok(())
}

/// Export a report into `dir`, returning the written file's path.
pub fn export_report(
    report: &SignalReport,
    dir: &Path,
    scan_prefix: &str,
) -> Result<PathBuf, ExportError> {
    std::fs::create_dir_all(dir)?;
    let path = dir.join(report_file_name(report, scan_prefix));
    let sheet = report_sheet(report);

    write_sheet(&sheet, &path)?;
    info!(path = %path.display(), rows = sheet.rows.len(), sheet = sheet.name, "Exported report");
    Ok(path)
}
