//! Per-run configuration.

use serde::{Deserialize, Serialize};

use super::Window;

/// Everything one analysis run needs to know about what to fetch.
///
/// Built once per symbol and passed by reference to every stage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunConfig {
    /// Ticker symbol, upper-cased
    pub symbol: String,
    /// Display name for reports
    pub company: Option<String>,
    /// History window
    pub window: Window,
}

impl RunConfig {
    /// Create a run for a symbol.
    pub fn new(symbol: &str, window: Window) -> Self {
        Self {
            symbol: symbol.trim().to_uppercase(),
            company: None,
            window,
        }
    }

    /// Attach a company name.
    pub fn with_company(mut self, company: impl Into<String>) -> Self {
        let company = company.into();
        if !company.trim().is_empty() {
            self.company = Some(company.trim().to_string());
        }
        self
    }

    /// Company name if known, the symbol otherwise.
    pub fn company_label(&self) -> &str {
        self.company.as_deref().unwrap_or(&self.symbol)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Timeframe;

    #[test]
    fn test_symbol_normalized() {
        let run = RunConfig::new(" tatamotors.ns ", Window::Preset(Timeframe::Daily));
        assert_eq!(run.symbol, "TATAMOTORS.NS");
        assert_eq!(run.company_label(), "TATAMOTORS.NS");
    }

    #[test]
    fn test_company_label() {
        let run = RunConfig::new("AAPL", Window::default()).with_company("Apple Inc.");
        assert_eq!(run.company_label(), "Apple Inc.");

        let run = RunConfig::new("AAPL", Window::default()).with_company("   ");
        assert!(run.company.is_none());
    }
}
