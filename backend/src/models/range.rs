use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Duration, Months, TimeZone, Utc};
use serde::{Deserialize, Serialize};

/// Named lookback window accepted by the history endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RangeSpec {
    #[serde(rename = "1d")]
    OneDay,
    #[serde(rename = "5d")]
    FiveDays,
    #[serde(rename = "1mo")]
    OneMonth,
    #[serde(rename = "3mo")]
    ThreeMonths,
    #[serde(rename = "6mo")]
    SixMonths,
    #[serde(rename = "1y")]
    OneYear,
    #[serde(rename = "5y")]
    FiveYears,
    #[serde(rename = "max")]
    Max,
}

/// Concrete `[start, end]` window a range resolves to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl RangeSpec {
    pub const ALL: [RangeSpec; 8] = [
        RangeSpec::OneDay,
        RangeSpec::FiveDays,
        RangeSpec::OneMonth,
        RangeSpec::ThreeMonths,
        RangeSpec::SixMonths,
        RangeSpec::OneYear,
        RangeSpec::FiveYears,
        RangeSpec::Max,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            RangeSpec::OneDay => "1d",
            RangeSpec::FiveDays => "5d",
            RangeSpec::OneMonth => "1mo",
            RangeSpec::ThreeMonths => "3mo",
            RangeSpec::SixMonths => "6mo",
            RangeSpec::OneYear => "1y",
            RangeSpec::FiveYears => "5y",
            RangeSpec::Max => "max",
        }
    }

    /// Resolve against `now`. Month and year offsets use calendar arithmetic,
    /// clamping to the last day of shorter months.
    pub fn resolve(&self, now: DateTime<Utc>) -> DateRange {
        let start = match self {
            RangeSpec::OneDay => now - Duration::days(1),
            RangeSpec::FiveDays => now - Duration::days(5),
            RangeSpec::OneMonth => months_back(now, 1),
            RangeSpec::ThreeMonths => months_back(now, 3),
            RangeSpec::SixMonths => months_back(now, 6),
            RangeSpec::OneYear => months_back(now, 12),
            RangeSpec::FiveYears => months_back(now, 60),
            RangeSpec::Max => epoch(),
        };

        DateRange { start, end: now }
    }

    /// Default moving-average window for charts over this range.
    pub fn default_window(&self) -> usize {
        match self {
            RangeSpec::OneDay | RangeSpec::FiveDays => 5,
            RangeSpec::OneMonth => 7,
            RangeSpec::ThreeMonths => 20,
            RangeSpec::SixMonths | RangeSpec::OneYear => 50,
            RangeSpec::FiveYears | RangeSpec::Max => 200,
        }
    }
}

impl Default for RangeSpec {
    fn default() -> Self {
        RangeSpec::OneYear
    }
}

impl fmt::Display for RangeSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RangeSpec {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        RangeSpec::ALL
            .iter()
            .copied()
            .find(|r| r.as_str() == s.trim())
            .ok_or_else(|| {
                format!(
                    "Unsupported range '{}'. Expected one of 1d, 5d, 1mo, 3mo, 6mo, 1y, 5y, max",
                    s
                )
            })
    }
}

fn months_back(now: DateTime<Utc>, months: u32) -> DateTime<Utc> {
    now.checked_sub_months(Months::new(months)).unwrap_or_else(epoch)
}

fn epoch() -> DateTime<Utc> {
    Utc.timestamp_opt(0, 0).single().unwrap_or(DateTime::<Utc>::MIN_UTC)
}
