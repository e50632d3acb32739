//! Series-to-report analysis.

use candlescan_core::error::AnalysisError;
use candlescan_core::types::{BarSeries, RunConfig};
use candlescan_indicators::{FrameSettings, IndicatorFrame};
use tracing::{info, instrument};

use crate::registry::Deriver;
use crate::report::SignalReport;

/// Frame plus derived report for one symbol.
#[derive(Debug, Clone)]
pub struct Analysis {
    pub frame: IndicatorFrame,
    pub report: SignalReport,
}

/// Compute indicators for a cleaned series and run the deriver over them.
///
/// An empty series is `NoData` and a too-short one is `InsufficientData`;
/// callers treat both as "no events" and move on.
#[instrument(skip_all, fields(symbol = %run.symbol, variant = %deriver.variant()))]
pub fn analyze(
    run: &RunConfig,
    series: &BarSeries,
    deriver: &Deriver,
    settings: &FrameSettings,
) -> Result<Analysis, AnalysisError> {
    if series.is_empty() {
        return Err(AnalysisError::NoData {
            symbol: run.symbol.clone(),
        });
    }

    let frame = IndicatorFrame::compute(series, settings)?;
    let events = deriver.derive(&frame);

    info!(bars = frame.len(), events = events.len(), "Analysis complete");

    let report = SignalReport::new(run, frame.len(), events);
    Ok(Analysis { frame, report })
}
