//! Signal deriver trait.

use candlescan_indicators::IndicatorFrame;
use thiserror::Error;

/// Errors raised while configuring a variant.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum VariantError {
    #[error("Unknown variant: {0}")]
    NotFound(String),

    #[error("Invalid variant configuration: {0}")]
    InvalidConfig(String),
}

/// Validation hook for variant configuration.
pub trait VariantConfig {
    fn validate(&self) -> Result<(), VariantError>;
}

/// Turns an indicator frame into an ordered list of events.
///
/// Derivers are pure: the same frame always yields the same events, and a
/// frame too short for any indicator simply yields none.
pub trait SignalDeriver: Send + Sync {
    /// Event type emitted by this deriver.
    type Event;

    /// Get the variant name.
    fn name(&self) -> &str;

    /// Get the variant description.
    fn description(&self) -> &str;

    /// Derive events, oldest first.
    fn derive(&self, frame: &IndicatorFrame) -> Vec<Self::Event>;
}
