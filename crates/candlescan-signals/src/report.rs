//! Analysis results handed to the formatters.

use candlescan_core::types::{RunConfig, Window};
use serde::{Deserialize, Serialize};

use crate::combined::CombinedSignal;
use crate::registry::Variant;
use crate::scan::{PatternEvent, PatternType};

/// Events produced by one variant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "variant", content = "events", rename_all = "snake_case")]
pub enum ReportEvents {
    Combined(Vec<CombinedSignal>),
    Scan(Vec<PatternEvent>),
}

impl ReportEvents {
    pub fn variant(&self) -> Variant {
        match self {
            ReportEvents::Combined(_) => Variant::Combined,
            ReportEvents::Scan(_) => Variant::Scan,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            ReportEvents::Combined(events) => events.len(),
            ReportEvents::Scan(events) => events.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Headline counts for a report.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportSummary {
    pub bars: usize,
    pub events: usize,
    /// Buy signals or bullish patterns
    pub bullish: usize,
    /// Sell signals or bearish patterns
    pub bearish: usize,
}

/// Everything one analysis run produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignalReport {
    pub symbol: String,
    /// Company name, or the symbol when unknown
    pub company: String,
    pub window: Window,
    /// Number of cleaned bars analysed
    pub bars: usize,
    #[serde(flatten)]
    pub events: ReportEvents,
}

impl SignalReport {
    pub fn new(run: &RunConfig, bars: usize, events: ReportEvents) -> Self {
        Self {
            symbol: run.symbol.clone(),
            company: run.company_label().to_string(),
            window: run.window,
            bars,
            events,
        }
    }

    pub fn variant(&self) -> Variant {
        self.events.variant()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn summary(&self) -> ReportSummary {
        let (bullish, bearish) = match &self.events {
            ReportEvents::Combined(signals) => (
                signals.iter().filter(|s| s.buy).count(),
                signals.iter().filter(|s| s.sell).count(),
            ),
            ReportEvents::Scan(events) => (
                events
                    .iter()
                    .filter(|e| e.pattern_type == PatternType::Bullish)
                    .count(),
                events
                    .iter()
                    .filter(|e| e.pattern_type == PatternType::Bearish)
                    .count(),
            ),
        };

        ReportSummary {
            bars: self.bars,
            events: self.events.len(),
            bullish,
            bearish,
        }
    }
}
