//! Yahoo Finance chart API source.

use std::time::Duration;

use async_trait::async_trait;
use candlescan_core::error::DataError;
use candlescan_core::traits::DataSource;
use candlescan_core::types::{RawTable, RawValue, RunConfig, Window};
use reqwest::{header, Client, Url};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

/// Connection settings for the chart API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct YahooConfig {
    pub base_url: String,
    pub timeout_secs: u64,
    pub user_agent: String,
}

impl Default for YahooConfig {
    fn default() -> Self {
        Self {
            base_url: "https://query1.finance.yahoo.com".to_string(),
            timeout_secs: 30,
            user_agent: concat!("candlescan/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct ChartResponse {
    chart: Chart,
}

#[derive(Debug, Deserialize)]
struct Chart {
    #[serde(default)]
    result: Option<Vec<ChartResult>>,
    #[serde(default)]
    error: Option<ChartError>,
}

#[derive(Debug, Deserialize)]
struct ChartError {
    #[serde(default)]
    code: String,
    #[serde(default)]
    description: String,
}

#[derive(Debug, Deserialize)]
struct ChartResult {
    #[serde(default)]
    meta: ChartMeta,
    #[serde(default)]
    timestamp: Vec<i64>,
    indicators: ChartIndicators,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ChartMeta {
    long_name: Option<String>,
    short_name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChartIndicators {
    #[serde(default)]
    quote: Vec<ChartQuote>,
}

#[derive(Debug, Default, Deserialize)]
struct ChartQuote {
    #[serde(default)]
    open: Vec<Option<f64>>,
    #[serde(default)]
    high: Vec<Option<f64>>,
    #[serde(default)]
    low: Vec<Option<f64>>,
    #[serde(default)]
    close: Vec<Option<f64>>,
    #[serde(default)]
    volume: Vec<Option<f64>>,
}

/// Turn a chart API response body into a raw table.
///
/// Null cells stay `Missing`; cleaning happens in [`normalize`](crate::normalize).
pub fn parse_chart(symbol: &str, body: &str) -> Result<RawTable, DataError> {
    let response: ChartResponse =
        serde_json::from_str(body).map_err(|e| DataError::Parse(e.to_string()))?;

    if let Some(err) = response.chart.error {
        if err.code.eq_ignore_ascii_case("Not Found") {
            return Err(DataError::NoData {
                symbol: symbol.to_string(),
            });
        }
        return Err(DataError::ExternalCall(format!(
            "{}: {}",
            err.code, err.description
        )));
    }

    let result = response
        .chart
        .result
        .and_then(|results| results.into_iter().next())
        .ok_or_else(|| DataError::NoData {
            symbol: symbol.to_string(),
        })?;

    if result.timestamp.is_empty() {
        return Err(DataError::NoData {
            symbol: symbol.to_string(),
        });
    }

    let quote = result.indicators.quote.into_iter().next().unwrap_or_default();
    let columns = ["Open", "High", "Low", "Close", "Volume"]
        .iter()
        .map(|c| c.to_string())
        .collect();

    let mut table = RawTable::new(symbol, columns);
    table.company = result.meta.long_name.or(result.meta.short_name);

    let cell = |values: &[Option<f64>], i: usize| RawValue::from(values.get(i).copied().flatten());
    for (i, ts) in result.timestamp.iter().enumerate() {
        table.push_row(
            ts * 1000,
            vec![
                cell(&quote.open, i),
                cell(&quote.high, i),
                cell(&quote.low, i),
                cell(&quote.close, i),
                cell(&quote.volume, i),
            ],
        );
    }

    Ok(table)
}

/// Query parameters for a window.
fn window_params(window: &Window) -> Vec<(&'static str, String)> {
    let interval = ("interval", window.timeframe().interval().to_string());
    match window.bounds_millis() {
        Some((start, end)) => vec![
            ("period1", (start / 1000).to_string()),
            ("period2", (end / 1000).to_string()),
            interval,
        ],
        None => vec![("range", window.timeframe().lookback().to_string()), interval],
    }
}

/// Historical bars from the Yahoo Finance chart endpoint.
pub struct YahooDataSource {
    config: YahooConfig,
    client: Client,
}

impl YahooDataSource {
    /// Create a new client.
    pub fn new(config: YahooConfig) -> Result<Self, DataError> {
        let mut headers = header::HeaderMap::new();
        headers.insert(
            header::USER_AGENT,
            header::HeaderValue::from_str(&config.user_agent)
                .map_err(|e| DataError::ExternalCall(e.to_string()))?,
        );

        let client = Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| DataError::ExternalCall(e.to_string()))?;

        Ok(Self { config, client })
    }

    /// Chart endpoint for `symbol`, which is escaped as a single path segment.
    fn chart_url(&self, symbol: &str) -> Result<Url, DataError> {
        let mut url = Url::parse(&self.config.base_url)
            .map_err(|e| DataError::ExternalCall(format!("Invalid base URL: {}", e)))?;
        url.path_segments_mut()
            .map_err(|_| DataError::ExternalCall(format!("Invalid base URL: {}", self.config.base_url)))?
            .pop_if_empty()
            .extend(["v8", "finance", "chart", symbol]);
        Ok(url)
    }
}

#[async_trait]
impl DataSource for YahooDataSource {
    #[instrument(skip(self), fields(symbol = %run.symbol))]
    async fn fetch(&self, run: &RunConfig) -> Result<RawTable, DataError> {
        let url = self.chart_url(&run.symbol)?;
        let params = window_params(&run.window);
        debug!(%url, ?params, "Requesting chart");

        let resp = self
            .client
            .get(url)
            .query(&params)
            .send()
            .await
            .map_err(|e| DataError::ExternalCall(e.to_string()))?;

        let status = resp.status();
        let body = resp
            .text()
            .await
            .map_err(|e| DataError::ExternalCall(e.to_string()))?;

        // Error responses still carry a chart envelope worth reading.
        let table = match parse_chart(&run.symbol, &body) {
            Err(DataError::Parse(_)) if !status.is_success() => {
                return Err(DataError::ExternalCall(format!("{}: {}", status, body)));
            }
            Err(DataError::Parse(msg)) => return Err(DataError::ExternalCall(msg)),
            other => other?,
        };

        info!(rows = table.len(), "Fetched chart");
        Ok(table)
    }

    fn name(&self) -> &str {
        "yahoo"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use candlescan_core::types::Timeframe;

    const BODY: &str = r#"{
        "chart": {
            "result": [{
                "meta": {"symbol": "AAPL", "longName": "Apple Inc.", "shortName": "Apple"},
                "timestamp": [1709596800, 1709683200, 1709769600],
                "indicators": {"quote": [{
                    "open":   [170.0, null, 172.5],
                    "high":   [171.0, 172.0, 173.0],
                    "low":    [169.0, 170.0, 171.0],
                    "close":  [170.5, 171.5, 172.8],
                    "volume": [1000000, 1200000, null]
                }]}
            }],
            "error": null
        }
    }"#;

    #[test]
    fn test_parse_chart_with_nulls() {
        let table = parse_chart("AAPL", BODY).unwrap();

        assert_eq!(table.len(), 3);
        assert_eq!(table.company.as_deref(), Some("Apple Inc."));
        assert_eq!(table.columns, vec!["Open", "High", "Low", "Close", "Volume"]);
        assert_eq!(table.rows[0].timestamp, 1_709_596_800_000);
        assert_eq!(table.rows[1].cells[0], RawValue::Missing);
        assert_eq!(table.rows[2].cells[4], RawValue::Missing);
        assert_eq!(table.rows[0].cells[4], RawValue::Number(1_000_000.0));
    }

    #[test]
    fn test_parse_chart_not_found() {
        let body = r#"{"chart":{"result":null,"error":{"code":"Not Found","description":"No data found, symbol may be delisted"}}}"#;
        assert_eq!(
            parse_chart("NOPE", body),
            Err(DataError::NoData {
                symbol: "NOPE".to_string()
            })
        );
    }

    #[test]
    fn test_parse_chart_provider_error() {
        let body = r#"{"chart":{"result":null,"error":{"code":"Bad Request","description":"Invalid interval"}}}"#;
        assert!(matches!(
            parse_chart("AAPL", body),
            Err(DataError::ExternalCall(msg)) if msg.contains("Invalid interval")
        ));
    }

    #[test]
    fn test_parse_chart_empty_result() {
        let body = r#"{"chart":{"result":[{"meta":{},"indicators":{"quote":[{}]}}],"error":null}}"#;
        assert!(matches!(parse_chart("AAPL", body), Err(DataError::NoData { .. })));
    }

    #[test]
    fn test_parse_chart_malformed() {
        assert!(matches!(parse_chart("AAPL", "<html>"), Err(DataError::Parse(_))));
    }

    #[test]
    fn test_window_params() {
        let preset = window_params(&Window::Preset(Timeframe::Hourly));
        assert_eq!(
            preset,
            vec![("range", "60d".to_string()), ("interval", "60m".to_string())]
        );

        let range = Window::parse_range("2024-01-01", "2024-01-31", Timeframe::Daily).unwrap();
        let params = window_params(&range);
        assert_eq!(params[0], ("period1", "1704067200".to_string()));
        assert_eq!(params[1], ("period2", "1706745600".to_string()));
        assert_eq!(params[2], ("interval", "1d".to_string()));
    }

    #[test]
    fn test_chart_url() {
        let source = YahooDataSource::new(YahooConfig {
            base_url: "http://localhost:9/".to_string(),
            ..YahooConfig::default()
        })
        .unwrap();
        assert_eq!(
            source.chart_url("AAPL").unwrap().as_str(),
            "http://localhost:9/v8/finance/chart/AAPL"
        );
        assert_eq!(source.name(), "yahoo");
    }

    #[test]
    fn test_chart_url_escapes_symbol() {
        let source = YahooDataSource::new(YahooConfig::default()).unwrap();

        let url = source.chart_url("BRK/B").unwrap();
        assert!(url.as_str().ends_with("/v8/finance/chart/BRK%2FB"));
        assert_eq!(url.path_segments().map(|s| s.count()), Some(4));

        let url = source.chart_url("^NSEI").unwrap();
        assert_eq!(url.path_segments().and_then(|s| s.last()).map(|s| s.ends_with("NSEI")), Some(true));
        assert_eq!(url.path_segments().map(|s| s.count()), Some(4));

        let url = source.chart_url("A B#C").unwrap();
        assert!(url.as_str().ends_with("/chart/A%20B%23C"));
        assert!(url.query().is_none());
    }
}
