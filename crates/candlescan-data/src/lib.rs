//! Market data sources and price table normalization.
//!
//! Sources return provider tables as-is ([`RawTable`]); [`normalize`] turns
//! them into clean bar series.

mod cache;
mod csv_source;
mod normalize;
mod yahoo;

pub use cache::{CachedSource, DataCache};
pub use csv_source::CsvDataSource;
pub use normalize::{canonical_name, normalize, resolve_columns, ColumnMap, MIN_ROWS};
pub use yahoo::{parse_chart, YahooConfig, YahooDataSource};

use candlescan_core::error::DataError;
use candlescan_core::traits::DataSource;
use candlescan_core::types::{BarSeries, RawTable, RunConfig};
use tracing::instrument;

/// A cleaned series plus the provider's name for the instrument.
#[derive(Debug, Clone)]
pub struct LoadedSeries {
    pub series: BarSeries,
    pub company: Option<String>,
}

/// Fetch a run's table from `source` and clean it.
#[instrument(skip(source), fields(source = source.name(), symbol = %run.symbol))]
pub async fn load_series(source: &dyn DataSource, run: &RunConfig) -> Result<LoadedSeries, DataError> {
    let table: RawTable = source.fetch(run).await?;
    let series = normalize(&table)?;
    Ok(LoadedSeries {
        series,
        company: table.company,
    })
}
