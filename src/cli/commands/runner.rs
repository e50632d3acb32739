//! Shared fetch → analyse → report steps for the analysis commands.

use anyhow::{Context, Result};
use candlescan_config::AppConfig;
use candlescan_core::error::AnalysisError;
use candlescan_core::traits::DataSource;
use candlescan_core::types::{RunConfig, Timeframe, Window};
use candlescan_data::{load_series, CachedSource, CsvDataSource, YahooDataSource};
use candlescan_report::{export_report, print_report, render_json, ChartView};
use candlescan_signals::{
    analyze, Analysis, CombinedDeriver, Deriver, ScanDeriver, SignalReport, Variant,
};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::cli::{OutputArgs, OutputFormat};

/// Market data source for a run: a CSV file when given, the provider otherwise.
pub fn build_source(data: Option<&Path>, config: &AppConfig, cache: bool) -> Result<Box<dyn DataSource>> {
    let source: Box<dyn DataSource> = match data {
        Some(path) => Box::new(
            CsvDataSource::new(path)
                .with_context(|| format!("Cannot read data file {}", path.display()))?,
        ),
        None => Box::new(
            YahooDataSource::new(config.data.yahoo.clone())
                .context("Failed to create market data client")?,
        ),
    };

    if cache && config.data.cache {
        Ok(Box::new(CachedSource::new(source)))
    } else {
        Ok(source)
    }
}

/// Deriver for a variant, configured from the `[signals]` section.
pub fn build_deriver(variant: Variant, config: &AppConfig) -> Deriver {
    match variant {
        Variant::Combined => Deriver::Combined(CombinedDeriver::new(config.signals.combined.clone())),
        Variant::Scan => Deriver::Scan(ScanDeriver::new(config.signals.scan.clone())),
    }
}

/// Analysis window from command line flags.
///
/// Explicit dates select a range (daily bars unless a timeframe is given);
/// otherwise the timeframe's preset lookback is used.
pub fn build_window(
    timeframe: Option<&str>,
    start: Option<&str>,
    end: Option<&str>,
    default_timeframe: Timeframe,
) -> Result<Window> {
    let timeframe = match timeframe {
        Some(tf) => tf.parse::<Timeframe>()?,
        None => default_timeframe,
    };

    match (start, end) {
        (Some(start), Some(end)) => Ok(Window::parse_range(start, end, timeframe)?),
        (None, None) => Ok(Window::Preset(timeframe)),
        _ => anyhow::bail!("--start and --end must be given together"),
    }
}

/// What to do with a finished analysis.
#[derive(Debug, Clone)]
pub struct OutputPlan {
    pub format: OutputFormat,
    pub export_dir: Option<PathBuf>,
    pub scan_prefix: String,
    pub chart: bool,
}

impl OutputPlan {
    pub fn new(args: &OutputArgs, config: &AppConfig) -> Self {
        let export_dir = if args.no_export {
            None
        } else if let Some(dir) = &args.export {
            Some(dir.clone())
        } else if config.export.enabled {
            Some(PathBuf::from(&config.export.directory))
        } else {
            None
        };

        Self {
            format: args.output,
            export_dir,
            scan_prefix: config.export.scan_prefix.clone(),
            chart: args.chart && args.output == OutputFormat::Text,
        }
    }
}

/// Fetch, analyse and report one symbol.
///
/// Data conditions (no data, missing columns, too few bars, provider
/// failures) are reported and yield `Ok(None)`; only output failures are
/// errors.
pub async fn run_symbol(
    source: &dyn DataSource,
    run: RunConfig,
    deriver: &Deriver,
    config: &AppConfig,
    plan: &OutputPlan,
) -> Result<Option<Analysis>> {
    let analysis = match fetch_and_analyze(source, run.clone(), deriver, config).await {
        Ok(analysis) => analysis,
        Err(err) if err.is_recoverable() => {
            report_recoverable(&run, deriver, &err, plan)?;
            return Ok(None);
        }
        Err(err) => return Err(err.into()),
    };

    emit(&analysis, plan)?;
    Ok(Some(analysis))
}

async fn fetch_and_analyze(
    source: &dyn DataSource,
    run: RunConfig,
    deriver: &Deriver,
    config: &AppConfig,
) -> Result<Analysis, AnalysisError> {
    let loaded = load_series(source, &run).await?;

    let run = match (&run.company, loaded.company) {
        (None, Some(company)) => run.with_company(company),
        _ => run,
    };

    analyze(&run, &loaded.series, deriver, &config.indicators)
}

fn report_recoverable(
    run: &RunConfig,
    deriver: &Deriver,
    err: &AnalysisError,
    plan: &OutputPlan,
) -> Result<()> {
    warn!(symbol = %run.symbol, kind = err.kind(), "{}", err);

    match plan.format {
        OutputFormat::Json => {
            let report = SignalReport::new(run, 0, deriver.empty_events());
            println!("{}", render_json(&report)?);
        }
        OutputFormat::Text => println!("{}", err),
    }
    Ok(())
}

fn emit(analysis: &Analysis, plan: &OutputPlan) -> Result<()> {
    let report = &analysis.report;

    match plan.format {
        OutputFormat::Json => println!("{}", render_json(report)?),
        OutputFormat::Text => print_report(report),
    }

    if let Some(dir) = &plan.export_dir {
        let path = export_report(report, dir, &plan.scan_prefix)
            .with_context(|| format!("Failed to export report to {}", dir.display()))?;
        if plan.format == OutputFormat::Text {
            println!("\nSaved {}", path.display());
        } else {
            info!(path = %path.display(), "Saved report");
        }
    }

    if plan.chart {
        ChartView::new(&analysis.frame, report)
            .run()
            .context("Terminal chart failed")?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use candlescan_signals::ReportEvents;
    use std::io::Write;

    fn csv_file(rows: usize) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "Date,Open,High,Low,Close,Volume").unwrap();
        for i in 0..rows {
            let day = chrono::NaiveDate::from_ymd_opt(2024, 1, 1).unwrap() + chrono::Duration::days(i as i64);
            let base = 100.0 + (i as f64 * 0.5).sin() * 4.0;
            writeln!(file, "{},{},{},{},{},{}", day, base, base + 2.0, base - 2.0, base + 0.5, 1000 + i).unwrap();
        }
        file
    }

    fn quiet_plan() -> OutputPlan {
        OutputPlan {
            format: OutputFormat::Json,
            export_dir: None,
            scan_prefix: "Candlestick_Patterns".to_string(),
            chart: false,
        }
    }

    #[test]
    fn test_build_window() {
        assert_eq!(
            build_window(None, None, None, Timeframe::Daily).unwrap(),
            Window::Preset(Timeframe::Daily)
        );
        assert_eq!(
            build_window(Some("1h"), None, None, Timeframe::Daily).unwrap(),
            Window::Preset(Timeframe::Hourly)
        );

        let range = build_window(None, Some("2024-01-01"), Some("2024-02-01"), Timeframe::Daily).unwrap();
        assert_eq!(range.timeframe(), Timeframe::Daily);
        assert!(range.bounds_millis().is_some());

        assert!(build_window(None, Some("2024-01-01"), None, Timeframe::Daily).is_err());
        assert!(build_window(Some("4h"), None, None, Timeframe::Daily).is_err());
        assert!(build_window(None, Some("2024-02-01"), Some("2024-01-01"), Timeframe::Daily).is_err());
    }

    #[test]
    fn test_output_plan_export_dir() {
        let config = AppConfig::default();

        let plan = OutputPlan::new(&OutputArgs::default(), &config);
        assert_eq!(plan.export_dir, Some(PathBuf::from(".")));

        let args = OutputArgs {
            no_export: true,
            ..OutputArgs::default()
        };
        assert_eq!(OutputPlan::new(&args, &config).export_dir, None);

        let args = OutputArgs {
            export: Some(PathBuf::from("out")),
            chart: true,
            output: OutputFormat::Json,
            ..OutputArgs::default()
        };
        let plan = OutputPlan::new(&args, &config);
        assert_eq!(plan.export_dir, Some(PathBuf::from("out")));
        assert!(!plan.chart);
    }

    #[tokio::test]
    async fn test_run_symbol_from_csv() {
        let file = csv_file(60);
        let config = AppConfig::default();
        let source = build_source(Some(file.path()), &config, false).unwrap();
        let deriver = build_deriver(Variant::Scan, &config);
        let run = RunConfig::new("test", Window::default()).with_company("Test Corp");

        let analysis = run_symbol(source.as_ref(), run, &deriver, &config, &quiet_plan())
            .await
            .unwrap()
            .unwrap();

        assert_eq!(analysis.frame.len(), 60);
        assert_eq!(analysis.report.company, "Test Corp");
        assert!(matches!(analysis.report.events, ReportEvents::Scan(_)));
    }

    #[tokio::test]
    async fn test_run_symbol_recovers_from_short_history() {
        let file = csv_file(1);
        let config = AppConfig::default();
        let source = build_source(Some(file.path()), &config, true).unwrap();
        let deriver = build_deriver(Variant::Combined, &config);

        let result = run_symbol(
            source.as_ref(),
            RunConfig::new("test", Window::default()),
            &deriver,
            &config,
            &quiet_plan(),
        )
        .await
        .unwrap();

        assert!(result.is_none());
    }
}
