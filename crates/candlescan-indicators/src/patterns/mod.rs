//! Candlestick pattern recognition.
//!
//! Seventeen classic patterns, each reported per bar as a TA-Lib style code:
//! `+100` bullish, `-100` bearish, `0` absent. The set of patterns is a
//! closed enum so dispatch is a static table rather than a string lookup.

mod context;
mod detectors;

use std::fmt;
use std::str::FromStr;

use candlescan_core::types::Bar;
use serde::{Deserialize, Serialize};

use context::CandleContext;
use detectors::Detector;

/// Tunables shared by the pattern detectors.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PatternSettings {
    /// Number of preceding candles averaged for body/range references
    pub average_period: usize,
    /// How far the third candle of a star must push into the first body
    pub star_penetration: f64,
    /// How far a piercing line / dark cloud must push into the first body
    pub cover_penetration: f64,
}

impl Default for PatternSettings {
    fn default() -> Self {
        Self {
            average_period: 10,
            star_penetration: 0.3,
            cover_penetration: 0.5,
        }
    }
}

/// A recognised candlestick pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum CandlePattern {
    Hammer,
    #[serde(rename = "Inverted Hammer")]
    InvertedHammer,
    #[serde(rename = "Hanging Man")]
    HangingMan,
    #[serde(rename = "Shooting Star")]
    ShootingStar,
    Doji,
    #[serde(rename = "Dragonfly Doji")]
    DragonflyDoji,
    #[serde(rename = "Gravestone Doji")]
    GravestoneDoji,
    #[serde(rename = "Spinning Top")]
    SpinningTop,
    Marubozu,
    Engulfing,
    Harami,
    #[serde(rename = "Piercing Line")]
    PiercingLine,
    #[serde(rename = "Dark Cloud Cover")]
    DarkCloudCover,
    #[serde(rename = "Morning Star")]
    MorningStar,
    #[serde(rename = "Evening Star")]
    EveningStar,
    #[serde(rename = "Three White Soldiers")]
    ThreeWhiteSoldiers,
    #[serde(rename = "Three Black Crows")]
    ThreeBlackCrows,
}

/// Number of supported patterns.
pub const PATTERN_COUNT: usize = 17;

impl CandlePattern {
    /// Every pattern, in reporting order.
    pub const ALL: [CandlePattern; PATTERN_COUNT] = [
        CandlePattern::Hammer,
        CandlePattern::InvertedHammer,
        CandlePattern::HangingMan,
        CandlePattern::ShootingStar,
        CandlePattern::Doji,
        CandlePattern::DragonflyDoji,
        CandlePattern::GravestoneDoji,
        CandlePattern::SpinningTop,
        CandlePattern::Marubozu,
        CandlePattern::Engulfing,
        CandlePattern::Harami,
        CandlePattern::PiercingLine,
        CandlePattern::DarkCloudCover,
        CandlePattern::MorningStar,
        CandlePattern::EveningStar,
        CandlePattern::ThreeWhiteSoldiers,
        CandlePattern::ThreeBlackCrows,
    ];

    /// Display name, as shown in reports.
    pub fn name(&self) -> &'static str {
        match self {
            CandlePattern::Hammer => "Hammer",
            CandlePattern::InvertedHammer => "Inverted Hammer",
            CandlePattern::HangingMan => "Hanging Man",
            CandlePattern::ShootingStar => "Shooting Star",
            CandlePattern::Doji => "Doji",
            CandlePattern::DragonflyDoji => "Dragonfly Doji",
            CandlePattern::GravestoneDoji => "Gravestone Doji",
            CandlePattern::SpinningTop => "Spinning Top",
            CandlePattern::Marubozu => "Marubozu",
            CandlePattern::Engulfing => "Engulfing",
            CandlePattern::Harami => "Harami",
            CandlePattern::PiercingLine => "Piercing Line",
            CandlePattern::DarkCloudCover => "Dark Cloud Cover",
            CandlePattern::MorningStar => "Morning Star",
            CandlePattern::EveningStar => "Evening Star",
            CandlePattern::ThreeWhiteSoldiers => "Three White Soldiers",
            CandlePattern::ThreeBlackCrows => "Three Black Crows",
        }
    }

    /// TA-Lib function name (`CDLHAMMER`, ...).
    pub fn function_name(&self) -> &'static str {
        match self {
            CandlePattern::Hammer => "CDLHAMMER",
            CandlePattern::InvertedHammer => "CDLINVERTEDHAMMER",
            CandlePattern::HangingMan => "CDLHANGINGMAN",
            CandlePattern::ShootingStar => "CDLSHOOTINGSTAR",
            CandlePattern::Doji => "CDLDOJI",
            CandlePattern::DragonflyDoji => "CDLDRAGONFLYDOJI",
            CandlePattern::GravestoneDoji => "CDLGRAVESTONEDOJI",
            CandlePattern::SpinningTop => "CDLSPINNINGTOP",
            CandlePattern::Marubozu => "CDLMARUBOZU",
            CandlePattern::Engulfing => "CDLENGULFING",
            CandlePattern::Harami => "CDLHARAMI",
            CandlePattern::PiercingLine => "CDLPIERCING",
            CandlePattern::DarkCloudCover => "CDLDARKCLOUDCOVER",
            CandlePattern::MorningStar => "CDLMORNINGSTAR",
            CandlePattern::EveningStar => "CDLEVENINGSTAR",
            CandlePattern::ThreeWhiteSoldiers => "CDL3WHITESOLDIERS",
            CandlePattern::ThreeBlackCrows => "CDL3BLACKCROWS",
        }
    }

    /// Number of candles the shape spans.
    pub fn candles(&self) -> usize {
        match self {
            CandlePattern::Engulfing
            | CandlePattern::Harami
            | CandlePattern::PiercingLine
            | CandlePattern::DarkCloudCover => 2,
            CandlePattern::MorningStar
            | CandlePattern::EveningStar
            | CandlePattern::ThreeWhiteSoldiers
            | CandlePattern::ThreeBlackCrows => 3,
            _ => 1,
        }
    }

    /// Position in [`CandlePattern::ALL`].
    pub fn index(&self) -> usize {
        *self as usize
    }

    fn detector(&self) -> Detector {
        match self {
            CandlePattern::Hammer => detectors::hammer,
            CandlePattern::InvertedHammer => detectors::inverted_hammer,
            CandlePattern::HangingMan => detectors::hanging_man,
            CandlePattern::ShootingStar => detectors::shooting_star,
            CandlePattern::Doji => detectors::doji,
            CandlePattern::DragonflyDoji => detectors::dragonfly_doji,
            CandlePattern::GravestoneDoji => detectors::gravestone_doji,
            CandlePattern::SpinningTop => detectors::spinning_top,
            CandlePattern::Marubozu => detectors::marubozu,
            CandlePattern::Engulfing => detectors::engulfing,
            CandlePattern::Harami => detectors::harami,
            CandlePattern::PiercingLine => detectors::piercing,
            CandlePattern::DarkCloudCover => detectors::dark_cloud_cover,
            CandlePattern::MorningStar => detectors::morning_star,
            CandlePattern::EveningStar => detectors::evening_star,
            CandlePattern::ThreeWhiteSoldiers => detectors::three_white_soldiers,
            CandlePattern::ThreeBlackCrows => detectors::three_black_crows,
        }
    }

    /// Code series for this pattern, one entry per bar.
    pub fn detect(&self, bars: &[Bar], settings: &PatternSettings) -> Vec<i32> {
        let ctx = CandleContext::new(bars, settings.average_period);
        let detector = self.detector();
        (0..ctx.len())
            .map(|i| detector(&ctx, i, settings).unwrap_or(0))
            .collect()
    }

    /// Code sets for every pattern, one entry per bar.
    pub fn detect_all(bars: &[Bar], settings: &PatternSettings) -> Vec<PatternCodes> {
        let ctx = CandleContext::new(bars, settings.average_period);
        let table: Vec<(CandlePattern, Detector)> =
            Self::ALL.iter().map(|p| (*p, p.detector())).collect();

        (0..ctx.len())
            .map(|i| {
                let mut codes = PatternCodes::default();
                for (pattern, detector) in &table {
                    codes.set(*pattern, detector(&ctx, i, settings).unwrap_or(0));
                }
                codes
            })
            .collect()
    }
}

impl fmt::Display for CandlePattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for CandlePattern {
    type Err = String;

    /// Accepts a TA-Lib function name or a display name, ignoring case and spaces.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted: String = s
            .chars()
            .filter(|c| !c.is_whitespace() && *c != '_')
            .collect::<String>()
            .to_ascii_uppercase();

        Self::ALL
            .iter()
            .copied()
            .find(|p| {
                let display: String = p.name().split_whitespace().collect::<String>().to_ascii_uppercase();
                p.function_name() == wanted || display == wanted
            })
            .ok_or_else(|| format!("unknown candlestick pattern: {s}"))
    }
}

/// Pattern codes for one bar.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatternCodes([i32; PATTERN_COUNT]);

impl PatternCodes {
    /// Code for one pattern (0 when absent).
    pub fn get(&self, pattern: CandlePattern) -> i32 {
        self.0[pattern.index()]
    }

    /// Set the code for one pattern.
    pub fn set(&mut self, pattern: CandlePattern, code: i32) {
        self.0[pattern.index()] = code;
    }

    /// Builder-style [`PatternCodes::set`].
    pub fn with(mut self, pattern: CandlePattern, code: i32) -> Self {
        self.set(pattern, code);
        self
    }

    /// All codes in reporting order.
    pub fn iter(&self) -> impl Iterator<Item = (CandlePattern, i32)> + '_ {
        CandlePattern::ALL.iter().map(move |p| (*p, self.get(*p)))
    }

    /// Only the patterns present on this bar.
    pub fn nonzero(&self) -> impl Iterator<Item = (CandlePattern, i32)> + '_ {
        self.iter().filter(|(_, code)| *code != 0)
    }

    pub fn is_empty(&self) -> bool {
        self.0.iter().all(|c| *c == 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Quiet white candles: body 1.0, range 2.0, no pattern of their own.
    fn filler(count: usize) -> Vec<Bar> {
        (0..count)
            .map(|i| Bar::new(i as i64, 100.0, 101.5, 99.5, 101.0, 1000.0))
            .collect()
    }

    fn push(bars: &mut Vec<Bar>, open: f64, high: f64, low: f64, close: f64) -> usize {
        let ts = bars.len() as i64;
        bars.push(Bar::new(ts, open, high, low, close, 1000.0));
        bars.len() - 1
    }

    #[test]
    fn test_filler_has_no_patterns() {
        let bars = filler(15);
        let codes = CandlePattern::detect_all(&bars, &PatternSettings::default());
        assert!(codes.iter().all(|c| c.is_empty()));
    }

    #[test]
    fn test_hammer() {
        let mut bars = filler(12);
        let i = push(&mut bars, 99.5, 99.85, 98.0, 99.8);

        let codes = CandlePattern::Hammer.detect(&bars, &PatternSettings::default());
        assert_eq!(codes.len(), bars.len());
        assert_eq!(codes[i], 100);
        assert!(codes[..i].iter().all(|c| *c == 0));
    }

    #[test]
    fn test_bullish_engulfing() {
        let mut bars = filler(12);
        push(&mut bars, 101.0, 101.2, 99.8, 100.0);
        let i = push(&mut bars, 99.5, 101.8, 99.4, 101.5);

        let codes = CandlePattern::Engulfing.detect(&bars, &PatternSettings::default());
        assert_eq!(codes[i], 100);
        assert_eq!(codes[i - 1], 0);
    }

    #[test]
    fn test_bearish_engulfing() {
        let mut bars = vec![Bar::new(0, 100.0, 101.2, 99.8, 101.0, 1.0)];
        let i = push(&mut bars, 101.5, 101.6, 99.0, 99.5);

        let codes = CandlePattern::Engulfing.detect(&bars, &PatternSettings::default());
        assert_eq!(codes[i], -100);
    }

    #[test]
    fn test_morning_star() {
        let mut bars = filler(12);
        push(&mut bars, 102.0, 102.2, 98.8, 99.0);
        push(&mut bars, 98.5, 98.6, 98.1, 98.3);
        let i = push(&mut bars, 98.8, 101.6, 98.7, 101.5);

        let codes = CandlePattern::MorningStar.detect(&bars, &PatternSettings::default());
        assert_eq!(codes[i], 100);
    }

    #[test]
    fn test_morning_star_penetration() {
        let mut bars = filler(12);
        push(&mut bars, 102.0, 102.2, 98.8, 99.0);
        push(&mut bars, 98.5, 98.6, 98.1, 98.3);
        let i = push(&mut bars, 98.0, 99.9, 97.9, 99.8);

        // 99.8 does not clear 99.0 + 3.0 * 0.3
        let codes = CandlePattern::MorningStar.detect(&bars, &PatternSettings::default());
        assert_eq!(codes[i], 0);
    }

    #[test]
    fn test_doji() {
        let mut bars = filler(12);
        let i = push(&mut bars, 100.0, 101.0, 99.0, 100.1);

        let codes = CandlePattern::detect_all(&bars, &PatternSettings::default());
        assert_eq!(codes[i].get(CandlePattern::Doji), 100);
        assert_eq!(codes[i].get(CandlePattern::DragonflyDoji), 0);
    }

    #[test]
    fn test_three_white_soldiers() {
        let mut bars = filler(12);
        push(&mut bars, 100.0, 101.55, 99.9, 101.5);
        push(&mut bars, 101.0, 102.55, 100.9, 102.5);
        let i = push(&mut bars, 102.0, 103.55, 101.9, 103.5);

        let codes = CandlePattern::ThreeWhiteSoldiers.detect(&bars, &PatternSettings::default());
        assert_eq!(codes[i], 100);
    }

    #[test]
    fn test_no_codes_without_history() {
        let bars = vec![Bar::new(0, 100.0, 101.0, 99.0, 100.0, 1.0)];
        let codes = CandlePattern::detect_all(&bars, &PatternSettings::default());
        assert_eq!(codes.len(), 1);
        assert!(codes[0].is_empty());
        assert!(CandlePattern::detect_all(&[], &PatternSettings::default()).is_empty());
    }

    #[test]
    fn test_lookup() {
        assert_eq!("CDLHAMMER".parse::<CandlePattern>(), Ok(CandlePattern::Hammer));
        assert_eq!(
            "three white soldiers".parse::<CandlePattern>(),
            Ok(CandlePattern::ThreeWhiteSoldiers)
        );
        assert_eq!("cdl3blackcrows".parse::<CandlePattern>(), Ok(CandlePattern::ThreeBlackCrows));
        assert!("CDLUNKNOWN".parse::<CandlePattern>().is_err());
    }

    #[test]
    fn test_registry_order_and_index() {
        for (i, pattern) in CandlePattern::ALL.iter().enumerate() {
            assert_eq!(pattern.index(), i);
        }
        assert_eq!(CandlePattern::ALL[0].name(), "Hammer");
        assert_eq!(CandlePattern::ALL[16].name(), "Three Black Crows");
    }

    #[test]
    fn test_codes_nonzero() {
        let codes = PatternCodes::default()
            .with(CandlePattern::Engulfing, 100)
            .with(CandlePattern::Doji, -100);
        let present: Vec<_> = codes.nonzero().collect();
        assert_eq!(
            present,
            vec![(CandlePattern::Doji, -100), (CandlePattern::Engulfing, 100)]
        );
    }
}
