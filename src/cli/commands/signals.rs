//! Combined signal command.

use anyhow::Result;
use candlescan_config::AppConfig;
use candlescan_core::types::RunConfig;
use candlescan_signals::Variant;
use tracing::info;

use super::runner::{build_deriver, build_source, build_window, run_symbol, OutputPlan};
use crate::cli::SignalsArgs;

pub async fn run(args: SignalsArgs, config: &AppConfig) -> Result<()> {
    let window = build_window(
        args.timeframe.as_deref(),
        args.start.as_deref(),
        args.end.as_deref(),
        config.defaults.timeframe,
    )?;
    let run = RunConfig::new(&args.symbol, window);
    info!(symbol = %run.symbol, window = %window.label(), "Deriving combined signals");

    let source = build_source(args.output.data.as_deref(), config, false)?;
    let deriver = build_deriver(Variant::Combined, config);
    let plan = OutputPlan::new(&args.output, config);

    run_symbol(source.as_ref(), run, &deriver, config, &plan).await?;
    Ok(())
}
