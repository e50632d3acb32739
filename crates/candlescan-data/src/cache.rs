//! In-memory data caching.

use std::collections::HashMap;

use async_trait::async_trait;
use candlescan_core::error::DataError;
use candlescan_core::traits::DataSource;
use candlescan_core::types::{RawTable, RunConfig, Window};
use tokio::sync::Mutex;
use tracing::debug;

/// Raw tables keyed by symbol and window.
#[derive(Debug, Default)]
pub struct DataCache {
    cache: HashMap<(String, Window), RawTable>,
}

impl DataCache {
    /// Create an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get a cached table.
    pub fn get(&self, symbol: &str, window: &Window) -> Option<&RawTable> {
        self.cache.get(&(symbol.to_string(), *window))
    }

    /// Store a table.
    pub fn put(&mut self, symbol: &str, window: Window, table: RawTable) {
        self.cache.insert((symbol.to_string(), window), table);
    }

    /// Clear every window cached for a symbol.
    pub fn clear(&mut self, symbol: &str) {
        self.cache.retain(|(s, _), _| s != symbol);
    }

    /// Clear all cached data.
    pub fn clear_all(&mut self) {
        self.cache.clear();
    }

    pub fn len(&self) -> usize {
        self.cache.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cache.is_empty()
    }
}

/// A data source that remembers successful fetches for the session.
///
/// Failures are not cached, so a retried symbol is fetched again.
pub struct CachedSource {
    inner: Box<dyn DataSource>,
    cache: Mutex<DataCache>,
}

impl CachedSource {
    pub fn new(inner: Box<dyn DataSource>) -> Self {
        Self {
            inner,
            cache: Mutex::new(DataCache::new()),
        }
    }

    /// Number of cached tables.
    pub async fn cached(&self) -> usize {
        self.cache.lock().await.len()
    }
}

#[async_trait]
impl DataSource for CachedSource {
    async fn fetch(&self, run: &RunConfig) -> Result<RawTable, DataError> {
        if let Some(table) = self.cache.lock().await.get(&run.symbol, &run.window) {
            debug!(symbol = %run.symbol, "Cache hit");
            return Ok(table.clone());
        }

        let table = self.inner.fetch(run).await?;
        self.cache
            .lock()
            .await
            .put(&run.symbol, run.window, table.clone());
        Ok(table)
    }

    fn name(&self) -> &str {
        self.inner.name()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use candlescan_core::types::{RawValue, Timeframe};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    struct CountingSource {
        calls: Arc<AtomicUsize>,
    }

    #[async_trait]
    impl DataSource for CountingSource {
        async fn fetch(&self, run: &RunConfig) -> Result<RawTable, DataError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if run.symbol == "BAD" {
                return Err(DataError::NoData {
                    symbol: run.symbol.clone(),
                });
            }
            let mut table = RawTable::new(run.symbol.as_str(), vec!["Close".to_string()]);
            table.push_row(0, vec![RawValue::Number(1.0)]);
            Ok(table)
        }

        fn name(&self) -> &str {
            "counting"
        }
    }

    #[test]
    fn test_cache_put_get_clear() {
        let mut cache = DataCache::new();
        let daily = Window::Preset(Timeframe::Daily);
        let hourly = Window::Preset(Timeframe::Hourly);

        cache.put("AAPL", daily, RawTable::new("AAPL", vec![]));
        cache.put("AAPL", hourly, RawTable::new("AAPL", vec![]));
        cache.put("MSFT", daily, RawTable::new("MSFT", vec![]));

        assert!(cache.get("AAPL", &hourly).is_some());
        assert!(cache.get("MSFT", &hourly).is_none());

        cache.clear("AAPL");
        assert_eq!(cache.len(), 1);
        cache.clear_all();
        assert!(cache.is_empty());
    }

    #[tokio::test]
    async fn test_cached_source_fetches_once() {
        let calls = Arc::new(AtomicUsize::new(0));
        let source = CachedSource::new(Box::new(CountingSource {
            calls: calls.clone(),
        }));
        let run = RunConfig::new("AAPL", Window::default());

        source.fetch(&run).await.unwrap();
        source.fetch(&run).await.unwrap();

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(source.cached().await, 1);
        assert_eq!(source.name(), "counting");
    }

    #[tokio::test]
    async fn test_failures_not_cached() {
        let calls = Arc::new(AtomicUsize::new(0));
        let source = CachedSource::new(Box::new(CountingSource {
            calls: calls.clone(),
        }));
        let run = RunConfig::new("BAD", Window::default());

        assert!(source.fetch(&run).await.is_err());
        assert!(source.fetch(&run).await.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }
}
