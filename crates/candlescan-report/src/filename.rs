//! Export file naming.

use candlescan_signals::{ReportEvents, SignalReport};

/// Default prefix for pattern scan workbooks.
pub const DEFAULT_SCAN_PREFIX: &str = "Candlestick_Patterns";

/// Keep only ASCII letters, digits and spaces, trimmed.
pub fn sanitize(name: &str) -> String {
    name.chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == ' ')
        .collect::<String>()
        .trim()
        .to_string()
}

/// Name part used when nothing survives sanitizing.
pub const UNKNOWN_NAME: &str = "UNKNOWN";

fn ticker_part(ticker: &str) -> String {
    match sanitize(ticker) {
        part if part.is_empty() => UNKNOWN_NAME.to_string(),
        part => part,
    }
}

/// `<ticker>_<timeframe>_signals.xlsx`
pub fn signals_file_name(ticker: &str, timeframe: &str) -> String {
    format!("{}_{}_signals.xlsx", ticker_part(ticker), timeframe)
}

/// `<prefix>_<company>_<ticker>.xlsx`
///
/// A company name with no usable characters is replaced by the ticker.
pub fn patterns_file_name(prefix: &str, company: &str, ticker: &str) -> String {
    let ticker = ticker_part(ticker);
    let company = match sanitize(company) {
        part if part.is_empty() => ticker.clone(),
        part => part,
    };
    format!("{}_{}_{}.xlsx", prefix, company, ticker)
}

/// File name for a report's workbook.
pub fn report_file_name(report: &SignalReport, scan_prefix: &str) -> String {
    match report.events {
        ReportEvents::Combined(_) => signals_file_name(&report.symbol, &report.window.label()),
        ReportEvents::Scan(_) => patterns_file_name(scan_prefix, &report.company, &report.symbol),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use candlescan_core::types::{RunConfig, Timeframe, Window};

    #[test]
    fn test_sanitize() {
        assert_eq!(sanitize("Tata Motors Ltd."), "Tata Motors Ltd");
        assert_eq!(sanitize("TATAMOTORS.NS"), "TATAMOTORSNS");
        assert_eq!(sanitize("AT&T Inc."), "ATT Inc");
        assert_eq!(sanitize("  Société Générale "), "Socit Gnrale");
        assert_eq!(sanitize("../../etc/passwd"), "etcpasswd");
    }

    #[test]
    fn test_file_names() {
        assert_eq!(signals_file_name("AAPL", "1d"), "AAPL_1d_signals.xlsx");
        assert_eq!(
            patterns_file_name(DEFAULT_SCAN_PREFIX, "Apple Inc.", "AAPL"),
            "Candlestick_Patterns_Apple Inc_AAPL.xlsx"
        );
    }

    #[test]
    fn test_unusable_names_fall_back() {
        assert_eq!(signals_file_name("^", "1d"), "UNKNOWN_1d_signals.xlsx");
        assert_eq!(signals_file_name("^NSEI", "15m"), "NSEI_15m_signals.xlsx");
        assert_eq!(
            patterns_file_name(DEFAULT_SCAN_PREFIX, "日本電信電話", "9432.T"),
            "Candlestick_Patterns_9432T_9432T.xlsx"
        );
        assert_eq!(
            patterns_file_name(DEFAULT_SCAN_PREFIX, "...", "--"),
            "Candlestick_Patterns_UNKNOWN_UNKNOWN.xlsx"
        );
    }

    #[test]
    fn test_report_file_name_per_variant() {
        let run = RunConfig::new("BRK.B", Window::Preset(Timeframe::Hourly))
            .with_company("Berkshire Hathaway Inc.");

        let combined = SignalReport::new(&run, 10, ReportEvents::Combined(vec![]));
        assert_eq!(report_file_name(&combined, DEFAULT_SCAN_PREFIX), "BRKB_1h_signals.xlsx");

        let scan = SignalReport::new(&run, 10, ReportEvents::Scan(vec![]));
        assert_eq!(
            report_file_name(&scan, "Patterns"),
            "Patterns_Berkshire Hathaway Inc_BRKB.xlsx"
        );
    }
}
