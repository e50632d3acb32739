//! Variant registry for selecting a deriver by name.

use std::fmt;
use std::str::FromStr;

use candlescan_indicators::IndicatorFrame;
use serde::{Deserialize, Serialize};

use crate::combined::{CombinedConfig, CombinedDeriver};
use crate::deriver::{SignalDeriver, VariantConfig, VariantError};
use crate::report::ReportEvents;
use crate::scan::{ScanConfig, ScanDeriver};

/// Named derivation variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Variant {
    /// Pattern + RSI + volume Buy, RSI Sell
    Combined,
    /// Every candlestick pattern occurrence
    #[default]
    Scan,
}

impl Variant {
    pub const ALL: [Variant; 2] = [Variant::Combined, Variant::Scan];

    /// Registry key.
    pub fn key(&self) -> &'static str {
        match self {
            Variant::Combined => "combined",
            Variant::Scan => "scan",
        }
    }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for Variant {
    type Err = VariantError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "combined" | "signals" => Ok(Variant::Combined),
            "scan" | "patterns" => Ok(Variant::Scan),
            other => Err(VariantError::NotFound(other.to_string())),
        }
    }
}

/// Information about a registered variant.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VariantInfo {
    pub variant: Variant,
    /// Display name
    pub name: String,
    pub description: String,
    /// Default configuration as JSON
    pub default_config: serde_json::Value,
}

/// A configured deriver for one of the variants.
#[derive(Debug, Clone)]
pub enum Deriver {
    Combined(CombinedDeriver),
    Scan(ScanDeriver),
}

impl Deriver {
    pub fn variant(&self) -> Variant {
        match self {
            Deriver::Combined(_) => Variant::Combined,
            Deriver::Scan(_) => Variant::Scan,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Deriver::Combined(d) => d.name(),
            Deriver::Scan(d) => d.name(),
        }
    }

    /// Run the deriver over a frame.
    pub fn derive(&self, frame: &IndicatorFrame) -> ReportEvents {
        match self {
            Deriver::Combined(d) => ReportEvents::Combined(d.derive(frame)),
            Deriver::Scan(d) => ReportEvents::Scan(d.derive(frame)),
        }
    }

    /// Same deriver with no events, used when analysis stops early.
    pub fn empty_events(&self) -> ReportEvents {
        match self {
            Deriver::Combined(_) => ReportEvents::Combined(Vec::new()),
            Deriver::Scan(_) => ReportEvents::Scan(Vec::new()),
        }
    }
}

/// Registry of the available variants.
pub struct VariantRegistry {
    variants: Vec<VariantInfo>,
}

impl VariantRegistry {
    /// Create a registry with both built-in variants.
    pub fn new() -> Self {
        let combined = CombinedDeriver::default();
        let scan = ScanDeriver::default();

        let variants = vec![
            VariantInfo {
                variant: Variant::Combined,
                name: combined.name().to_string(),
                description: combined.description().to_string(),
                default_config: serde_json::to_value(CombinedConfig::default()).unwrap_or_default(),
            },
            VariantInfo {
                variant: Variant::Scan,
                name: scan.name().to_string(),
                description: scan.description().to_string(),
                default_config: serde_json::to_value(ScanConfig::default()).unwrap_or_default(),
            },
        ];

        Self { variants }
    }

    /// List all variants in registry order.
    pub fn list(&self) -> &[VariantInfo] {
        &self.variants
    }

    /// Get variant info by key.
    pub fn get(&self, key: &str) -> Option<&VariantInfo> {
        let variant = key.parse::<Variant>().ok()?;
        self.variants.iter().find(|info| info.variant == variant)
    }

    pub fn exists(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Get all variant keys.
    pub fn names(&self) -> Vec<&'static str> {
        self.variants.iter().map(|info| info.variant.key()).collect()
    }

    /// Create a deriver from JSON configuration.
    pub fn create(&self, key: &str, config: serde_json::Value) -> Result<Deriver, VariantError> {
        match key.parse::<Variant>()? {
            Variant::Combined => {
                let config: CombinedConfig = serde_json::from_value(config)
                    .map_err(|e| VariantError::InvalidConfig(e.to_string()))?;
                config.validate()?;
                Ok(Deriver::Combined(CombinedDeriver::new(config)))
            }
            Variant::Scan => {
                let config: ScanConfig = serde_json::from_value(config)
                    .map_err(|e| VariantError::InvalidConfig(e.to_string()))?;
                config.validate()?;
                Ok(Deriver::Scan(ScanDeriver::new(config)))
            }
        }
    }

    /// Create a deriver with default configuration.
    pub fn create_default(&self, key: &str) -> Result<Deriver, VariantError> {
        let info = self
            .get(key)
            .ok_or_else(|| VariantError::NotFound(key.to_string()))?;
        self.create(key, info.default_config.clone())
    }
}

impl Default for VariantRegistry {
    fn default() -> Self {
        Self::new()
    }
}
