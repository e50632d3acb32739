//! Terminal tables.

use candlescan_core::types::Timeframe;
use candlescan_signals::{CombinedSignal, PatternEvent, ReportEvents, SignalReport};
use prettytable::{Cell, Row, Table};

use crate::format::{format_timestamp, format_value, time_header};

fn header_row(columns: &[&str]) -> Row {
    Row::new(columns.iter().map(|c| Cell::new(c).style_spec("bc")).collect())
}

fn flag(value: bool) -> Cell {
    if value {
        Cell::new("true").style_spec("Fg")
    } else {
        Cell::new("false")
    }
}

fn combined_table(signals: &[CombinedSignal], timeframe: Timeframe) -> Table {
    let mut table = Table::new();
    table.set_format(*prettytable::format::consts::FORMAT_BOX_CHARS);
    table.set_titles(header_row(&[
        time_header(timeframe),
        "Signal",
        "Close",
        "RSI",
        "MACD",
        "ADX",
        "Buy",
        "Sell",
    ]));

    for signal in signals {
        let style = if signal.buy { "Fg" } else { "Fr" };
        table.add_row(Row::new(vec![
            Cell::new(&format_timestamp(signal.timestamp, timeframe)),
            Cell::new(signal.label()).style_spec(style),
            Cell::new(&format!("{:.2}", signal.close)).style_spec("r"),
            Cell::new(&format_value(signal.rsi)).style_spec("r"),
            Cell::new(&format_value(signal.macd)).style_spec("r"),
            Cell::new(&format_value(signal.adx)).style_spec("r"),
            flag(signal.buy),
            flag(signal.sell),
        ]));
    }

    table
}

fn scan_table(events: &[PatternEvent], timeframe: Timeframe) -> Table {
    let mut table = Table::new();
    table.set_format(*prettytable::format::consts::FORMAT_BOX_CHARS);
    table.set_titles(header_row(&[
        time_header(timeframe),
        "Pattern",
        "Type",
        "Closing Price",
        "Recommendation",
        "Value",
    ]));

    for event in events {
        let style = match event.value.signum() {
            1 => "Fg",
            -1 => "Fr",
            _ => "",
        };
        table.add_row(Row::new(vec![
            Cell::new(&format_timestamp(event.timestamp, timeframe)),
            Cell::new(event.pattern.name()),
            Cell::new(&event.pattern_type.to_string()).style_spec(style),
            Cell::new(&format!("{:.2}", event.closing_price)).style_spec("r"),
            Cell::new(&event.recommendation.to_string()),
            Cell::new(&event.value.to_string()).style_spec("r"),
        ]));
    }

    table
}

/// Event table for a report.
pub fn events_table(report: &SignalReport) -> Table {
    let timeframe = report.window.timeframe();
    match &report.events {
        ReportEvents::Combined(signals) => combined_table(signals, timeframe),
        ReportEvents::Scan(events) => scan_table(events, timeframe),
    }
}

/// Headline block: symbol, window and event counts.
pub fn summary_table(report: &SignalReport) -> Table {
    let summary = report.summary();
    let (bullish, bearish) = match report.events {
        ReportEvents::Combined(_) => ("Buy signals", "Sell signals"),
        ReportEvents::Scan(_) => ("Bullish patterns", "Bearish patterns"),
    };

    let mut table = Table::new();
    table.set_format(*prettytable::format::consts::FORMAT_CLEAN);

    let mut title = Cell::new(&format!("{} ({})", report.company, report.symbol)).style_spec("bB");
    title.set_hspan(2);
    table.add_row(Row::new(vec![title]));

    let rows = [
        ("Variant", report.variant().to_string()),
        ("Window", report.window.label()),
        ("Bars analysed", summary.bars.to_string()),
        ("Events", summary.events.to_string()),
        (bullish, summary.bullish.to_string()),
        (bearish, summary.bearish.to_string()),
    ];
    for (label, value) in rows {
        table.add_row(Row::new(vec![
            Cell::new(label).style_spec("b"),
            Cell::new(&value).style_spec("r"),
        ]));
    }

    table
}

/// Full text rendering: summary then events, or a notice when there are none.
pub fn render_report(report: &SignalReport) -> String {
    let mut out = summary_table(report).to_string();
    out.push('\n');
    if report.is_empty() {
        let what = match report.events {
            ReportEvents::Combined(_) => "No buy/sell signals",
            ReportEvents::Scan(_) => "No candlestick patterns",
        };
        out.push_str(&format!("{} found for {}.\n", what, report.symbol));
    } else {
        out.push_str(&events_table(report).to_string());
    }
    out
}

/// Print a report to stdout.
pub fn print_report(report: &SignalReport) {
    println!();
    print!("{}", render_report(report));
}

#[cfg(test)]
mod tests {
    use super::*;
    use candlescan_core::types::{RunConfig, Window};
    use candlescan_indicators::CandlePattern;

    fn scan_report() -> SignalReport {
        let run = RunConfig::new("AAPL", Window::default()).with_company("Apple Inc.");
        SignalReport::new(
            &run,
            120,
            ReportEvents::Scan(vec![
                PatternEvent::new(1_709_596_800_000, CandlePattern::Hammer, 100, 150.005),
                PatternEvent::new(1_709_683_200_000, CandlePattern::Engulfing, -100, 149.2),
            ]),
        )
    }

    #[test]
    fn test_scan_table_contents() {
        let rendered = events_table(&scan_report()).to_string();

        assert!(rendered.contains("Closing Price"));
        assert!(rendered.contains("2024-03-05"));
        assert!(rendered.contains("Hammer"));
        assert!(rendered.contains("150.01"));
        assert!(rendered.contains("Consider Sell"));
        assert_eq!(events_table(&scan_report()).len(), 2);
    }

    #[test]
    fn test_combined_table_keeps_both_flags() {
        let run = RunConfig::new("MSFT", Window::Preset(Timeframe::Hourly));
        let signal = CombinedSignal {
            timestamp: 1_709_647_200_000,
            buy: true,
            sell: true,
            close: 410.5,
            rsi: Some(25.0),
            macd: Some(-1.234),
            adx: None,
            patterns: vec![CandlePattern::Engulfing],
        };
        let report = SignalReport::new(&run, 50, ReportEvents::Combined(vec![signal]));
        let rendered = events_table(&report).to_string();

        assert!(rendered.contains("Datetime"));
        assert!(rendered.contains("2024-03-05 14:00"));
        assert!(rendered.contains("Buy"));
        assert!(rendered.contains("-1.23"));
        assert_eq!(rendered.matches("true").count(), 2);
    }

    #[test]
    fn test_render_empty_report() {
        let run = RunConfig::new("XYZ", Window::default());
        let report = SignalReport::new(&run, 2, ReportEvents::Scan(vec![]));
        let rendered = render_report(&report);

        assert!(rendered.contains("No candlestick patterns found for XYZ."));
        assert!(!rendered.contains("Closing Price"));
    }

    #[test]
    fn test_summary_counts() {
        let rendered = summary_table(&scan_report()).to_string();
        assert!(rendered.contains("Apple Inc. (AAPL)"));
        assert!(rendered.contains("Bullish patterns"));
    }
}
