//! Data source trait definitions.

use crate::error::DataError;
use crate::types::{RawTable, RunConfig};
use async_trait::async_trait;

/// Trait for historical price providers.
#[async_trait]
pub trait DataSource: Send + Sync {
    /// Fetch the raw price table for a run.
    ///
    /// # Returns
    /// The provider's table, oldest row first. An empty result is reported
    /// as [`DataError::NoData`] rather than an empty table.
    async fn fetch(&self, run: &RunConfig) -> Result<RawTable, DataError>;

    /// Get the data source name.
    fn name(&self) -> &str;
}
