//! Error types for candlescan.

use thiserror::Error;

/// Data source and normalization errors.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DataError {
    #[error("No data found for {symbol}")]
    NoData { symbol: String },

    #[error("Unrecognized price table: {0}")]
    Schema(String),

    #[error("Insufficient data: need {required} bars, have {available}")]
    InsufficientData { required: usize, available: usize },

    #[error("Market data request failed: {0}")]
    ExternalCall(String),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Invalid timeframe: {0}")]
    InvalidTimeframe(String),

    #[error("Invalid date: {0}")]
    InvalidDate(String),
}

/// Outcome of analysing one symbol when no events could be derived.
///
/// Every variant is recoverable: the caller reports it and moves on to the
/// next symbol (or ends the run cleanly).
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AnalysisError {
    #[error("No data found for {symbol}. Please check the symbol.")]
    NoData { symbol: String },

    #[error("Required price columns missing: {0}")]
    Schema(String),

    #[error("Insufficient data: need {required} bars, have {available}")]
    InsufficientData { required: usize, available: usize },

    #[error("External call failed: {0}")]
    ExternalCall(String),

    #[error("Invalid input: {0}")]
    Input(String),
}

impl AnalysisError {
    /// Short machine-friendly name of the failure kind.
    pub fn kind(&self) -> &'static str {
        match self {
            AnalysisError::NoData { .. } => "no_data",
            AnalysisError::Schema(_) => "schema",
            AnalysisError::InsufficientData { .. } => "insufficient_data",
            AnalysisError::ExternalCall(_) => "external_call",
            AnalysisError::Input(_) => "input",
        }
    }

    /// Whether processing may continue with the next symbol.
    pub fn is_recoverable(&self) -> bool {
        true
    }
}

impl From<DataError> for AnalysisError {
    fn from(err: DataError) -> Self {
        match err {
            DataError::NoData { symbol } => AnalysisError::NoData { symbol },
            DataError::Schema(msg) => AnalysisError::Schema(msg),
            DataError::InsufficientData {
                required,
                available,
            } => AnalysisError::InsufficientData {
                required,
                available,
            },
            DataError::ExternalCall(msg) | DataError::Parse(msg) => {
                AnalysisError::ExternalCall(msg)
            }
            DataError::InvalidTimeframe(msg) | DataError::InvalidDate(msg) => {
                AnalysisError::Input(msg)
            }
        }
    }
}

impl From<IndicatorError> for AnalysisError {
    fn from(err: IndicatorError) -> Self {
        match err {
            IndicatorError::InsufficientData {
                required,
                available,
            } => AnalysisError::InsufficientData {
                required,
                available,
            },
            IndicatorError::InvalidParameter(msg) => AnalysisError::Input(msg),
        }
    }
}

/// Indicator calculation errors.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum IndicatorError {
    #[error("Insufficient data: need {required} points, have {available}")]
    InsufficientData { required: usize, available: usize },

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_data_error_maps_to_analysis_kind() {
        let err: AnalysisError = DataError::NoData {
            symbol: "XYZ".to_string(),
        }
        .into();
        assert_eq!(err.kind(), "no_data");
        assert!(err.to_string().contains("XYZ"));

        let err: AnalysisError = DataError::Parse("bad json".to_string()).into();
        assert_eq!(err.kind(), "external_call");

        let err: AnalysisError = DataError::InvalidDate("2024-13-01".to_string()).into();
        assert_eq!(err.kind(), "input");
    }

    #[test]
    fn test_all_analysis_errors_recoverable() {
        let errors = [
            AnalysisError::NoData {
                symbol: "A".into(),
            },
            AnalysisError::Schema("close".into()),
            AnalysisError::InsufficientData {
                required: 2,
                available: 1,
            },
            AnalysisError::ExternalCall("timeout".into()),
        ];
        assert!(errors.iter().all(AnalysisError::is_recoverable));
    }
}
