use serde::{Deserialize, Serialize};

/// Calendar granularity used by the axis planner and tick generator.
///
/// Variants are ordered from finest to coarsest so `Ord` reads as "coarser than".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimeUnit {
    Minute,
    Hour,
    Day,
    Week,
    Month,
    Year,
}

impl TimeUnit {
    /// Average number of unit ticks contained in one year.
    #[must_use]
    pub fn ticks_per_year(self) -> f64 {
        match self {
            Self::Year => 1.0,
            Self::Month => 12.0,
            Self::Week => 365.2425 / 7.0,
            Self::Day => 365.2425,
            Self::Hour => 365.2425 * 24.0,
            Self::Minute => 365.2425 * 24.0 * 60.0,
        }
    }

    /// Unit used by the top marker track when spans tick in `self`.
    #[must_use]
    pub fn marker_unit(self) -> TimeUnit {
        match self {
            Self::Year | Self::Month => Self::Year,
            Self::Week | Self::Day => Self::Month,
            Self::Hour | Self::Minute => Self::Day,
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Year => "year",
            Self::Month => "month",
            Self::Week => "week",
            Self::Day => "day",
            Self::Hour => "hour",
            Self::Minute => "minute",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WeekStart {
    #[default]
    Monday,
    Sunday,
}

/// A single calendar-aligned axis tick, used by both the span and marker tracks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tick {
    /// Canonical position as a fractional year.
    pub yf: f64,
    pub label: String,
    pub unit: TimeUnit,
    /// Boundary tick: January, first day of month, midnight.
    pub major: bool,
    /// Absolute calendar index at the generating step; independent of pan.
    pub index: i64,
}
