//! Timeframe and analysis window definitions.

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::DataError;

/// Bar sampling interval offered to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Timeframe {
    /// Daily bars over one year
    #[serde(rename = "1d")]
    #[default]
    Daily,
    /// Hourly bars over sixty days
    #[serde(rename = "1h")]
    Hourly,
    /// 15 minute bars over seven days
    #[serde(rename = "15m")]
    Minute15,
}

impl Timeframe {
    /// Lookback period requested from the provider.
    pub fn lookback(&self) -> &'static str {
        match self {
            Timeframe::Daily => "1y",
            Timeframe::Hourly => "60d",
            Timeframe::Minute15 => "7d",
        }
    }

    /// Provider sampling interval.
    pub fn interval(&self) -> &'static str {
        match self {
            Timeframe::Daily => "1d",
            Timeframe::Hourly => "60m",
            Timeframe::Minute15 => "15m",
        }
    }

    /// Check if this is an intraday timeframe.
    pub fn is_intraday(&self) -> bool {
        !matches!(self, Timeframe::Daily)
    }
}

impl fmt::Display for Timeframe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Timeframe::Daily => "1d",
            Timeframe::Hourly => "1h",
            Timeframe::Minute15 => "15m",
        };
        write!(f, "{}", s)
    }
}

impl FromStr for Timeframe {
    type Err = DataError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "1d" | "day" | "daily" => Ok(Timeframe::Daily),
            "1h" | "60m" | "hour" | "hourly" => Ok(Timeframe::Hourly),
            "15m" | "15min" => Ok(Timeframe::Minute15),
            _ => Err(DataError::InvalidTimeframe(s.to_string())),
        }
    }
}

/// The span of history one run analyses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Window {
    /// Fixed lookback for a timeframe (e.g. one year of daily bars).
    Preset(Timeframe),
    /// Explicit inclusive date range.
    Range {
        start: NaiveDate,
        end: NaiveDate,
        timeframe: Timeframe,
    },
}

impl Window {
    /// Build a date range window, rejecting an empty or inverted span.
    pub fn range(start: NaiveDate, end: NaiveDate, timeframe: Timeframe) -> Result<Self, DataError> {
        if start > end {
            return Err(DataError::InvalidDate(format!(
                "start {} is after end {}",
                start, end
            )));
        }
        Ok(Window::Range {
            start,
            end,
            timeframe,
        })
    }

    /// Build a range window from two `YYYY-MM-DD` strings.
    pub fn parse_range(start: &str, end: &str, timeframe: Timeframe) -> Result<Self, DataError> {
        Self::range(parse_date(start)?, parse_date(end)?, timeframe)
    }

    /// Sampling timeframe of the window.
    pub fn timeframe(&self) -> Timeframe {
        match self {
            Window::Preset(tf) => *tf,
            Window::Range { timeframe, .. } => *timeframe,
        }
    }

    /// Label used in titles and file names.
    pub fn label(&self) -> String {
        match self {
            Window::Preset(tf) => tf.to_string(),
            Window::Range { start, end, .. } => format!("{}_{}", start, end),
        }
    }

    /// Start and end of the range as Unix milliseconds, end inclusive of the whole day.
    pub fn bounds_millis(&self) -> Option<(i64, i64)> {
        match self {
            Window::Preset(_) => None,
            Window::Range { start, end, .. } => {
                let start_ms = start.and_time(NaiveTime::MIN).and_utc().timestamp_millis();
                let end_ms = end
                    .succ_opt()
                    .unwrap_or(*end)
                    .and_time(NaiveTime::MIN)
                    .and_utc()
                    .timestamp_millis();
                Some((start_ms, end_ms))
            }
        }
    }

    /// Check whether a bar timestamp falls inside the window.
    pub fn contains(&self, timestamp_ms: i64) -> bool {
        match self.bounds_millis() {
            Some((start, end)) => timestamp_ms >= start && timestamp_ms < end,
            None => true,
        }
    }
}

impl Default for Window {
    fn default() -> Self {
        Window::Preset(Timeframe::Daily)
    }
}

/// Parse a `YYYY-MM-DD` date.
pub fn parse_date(s: &str) -> Result<NaiveDate, DataError> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
        .map_err(|_| DataError::InvalidDate(s.to_string()))
}
