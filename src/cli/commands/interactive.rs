//! Interactive prompt loop.

use anyhow::Result;
use candlescan_config::AppConfig;
use candlescan_core::types::{parse_date, RunConfig, Timeframe, Window};
use candlescan_signals::Variant;
use chrono::{Duration, Local, NaiveDate};
use std::io::Write;
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};
use tracing::{error, info, warn};

use super::runner::{build_deriver, build_source, run_symbol, OutputPlan};
use crate::cli::{InteractiveArgs, VariantArg};

impl From<VariantArg> for Variant {
    fn from(arg: VariantArg) -> Self {
        match arg {
            VariantArg::Combined => Variant::Combined,
            VariantArg::Scan => Variant::Scan,
        }
    }
}

/// What the user typed at the symbol prompt.
#[derive(Debug, PartialEq, Eq)]
pub enum SymbolInput {
    Exit,
    Empty,
    Symbol(String),
}

pub fn parse_symbol(line: &str) -> SymbolInput {
    let line = line.trim();
    if line.is_empty() {
        SymbolInput::Empty
    } else if line.eq_ignore_ascii_case("exit") || line.eq_ignore_ascii_case("quit") {
        SymbolInput::Exit
    } else {
        SymbolInput::Symbol(line.to_uppercase())
    }
}

/// Start and end dates after fallbacks.
#[derive(Debug, PartialEq, Eq)]
pub struct ResolvedDates {
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub warnings: Vec<String>,
}

/// Parse the date prompts, falling back to `lookback_days` before `today`
/// for the start and to `today` for the end.
///
/// Blank input takes the default quietly; malformed input takes it with a
/// warning.
pub fn resolve_dates(start: &str, end: &str, today: NaiveDate, lookback_days: u32) -> ResolvedDates {
    let mut warnings = Vec::new();
    let default_start = today - Duration::days(i64::from(lookback_days));

    let mut pick = |input: &str, label: &str, default: NaiveDate| -> NaiveDate {
        if input.trim().is_empty() {
            return default;
        }
        parse_date(input).unwrap_or_else(|_| {
            warnings.push(format!(
                "Invalid {} date '{}', using {}",
                label,
                input.trim(),
                default
            ));
            default
        })
    };

    let start = pick(start, "start", default_start);
    let end = pick(end, "end", today);

    ResolvedDates {
        start,
        end,
        warnings,
    }
}

async fn prompt(lines: &mut Lines<BufReader<Stdin>>, text: &str) -> Result<Option<String>> {
    print!("{}", text);
    std::io::stdout().flush()?;
    Ok(lines.next_line().await?)
}

pub async fn run(args: InteractiveArgs, config: &AppConfig) -> Result<()> {
    let variant: Variant = args
        .variant
        .map(Into::into)
        .unwrap_or(config.signals.default_variant);
    let timeframe = match args.timeframe.as_deref() {
        Some(tf) => tf.parse::<Timeframe>()?,
        None => config.defaults.timeframe,
    };

    let source = build_source(args.output.data.as_deref(), config, true)?;
    let deriver = build_deriver(variant, config);
    let plan = OutputPlan::new(&args.output, config);
    info!(%variant, %timeframe, source = source.name(), "Starting interactive session");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        let Some(line) = prompt(&mut lines, "\nEnter stock symbol (or 'exit' to quit): ").await? else {
            break;
        };
        let symbol = match parse_symbol(&line) {
            SymbolInput::Exit => break,
            SymbolInput::Empty => continue,
            SymbolInput::Symbol(symbol) => symbol,
        };

        let start = prompt(&mut lines, "Start date (YYYY-MM-DD): ").await?.unwrap_or_default();
        let end = prompt(&mut lines, "End date (YYYY-MM-DD): ").await?.unwrap_or_default();

        let dates = resolve_dates(&start, &end, Local::now().date_naive(), config.defaults.lookback_days);
        for warning in &dates.warnings {
            warn!("{}", warning);
            println!("{}", warning);
        }

        let window = match Window::range(dates.start, dates.end, timeframe) {
            Ok(window) => window,
            Err(e) => {
                println!("{}", e);
                continue;
            }
        };

        let run = RunConfig::new(&symbol, window);
        if let Err(e) = run_symbol(source.as_ref(), run, &deriver, config, &plan).await {
            error!(%symbol, "{:#}", e);
            println!("Error: {:#}", e);
        }
    }

    println!("Goodbye.");
    Ok(())
}
