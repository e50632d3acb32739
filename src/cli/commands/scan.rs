//! Pattern scan command.

use anyhow::Result;
use candlescan_config::AppConfig;
use candlescan_core::types::RunConfig;
use candlescan_signals::Variant;
use tracing::info;

use super::runner::{build_deriver, build_source, build_window, run_symbol, OutputPlan};
use crate::cli::ScanArgs;

pub async fn run(args: ScanArgs, config: &AppConfig) -> Result<()> {
    let window = build_window(
        args.timeframe.as_deref(),
        args.start.as_deref(),
        args.end.as_deref(),
        config.defaults.timeframe,
    )?;

    let mut run = RunConfig::new(&args.symbol, window);
    if let Some(company) = &args.company {
        run = run.with_company(company.as_str());
    }
    info!(symbol = %run.symbol, window = %window.label(), "Scanning candlestick patterns");

    let source = build_source(args.output.data.as_deref(), config, false)?;
    let deriver = build_deriver(Variant::Scan, config);
    let plan = OutputPlan::new(&args.output, config);

    run_symbol(source.as_ref(), run, &deriver, config, &plan).await?;
    Ok(())
}
