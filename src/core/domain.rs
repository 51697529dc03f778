use serde::{Deserialize, Serialize};

use crate::core::event::TimelineEvent;
use crate::error::{TimelineError, TimelineResult};

pub const MIN_DOMAIN_SPAN_YEARS: f64 = 1.0;
pub const DEFAULT_DOMAIN_YEARS: (f64, f64) = (1990.0, 2030.0);

/// Closed year interval `[min_year, max_year]` backing the axis.
///
/// Deserialization goes through [`Domain::new`], so parsed payloads get the
/// same bound checks as constructed ones.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "DomainBounds")]
pub struct Domain {
    min_year: f64,
    max_year: f64,
}

#[derive(Deserialize)]
struct DomainBounds {
    min_year: f64,
    max_year: f64,
}

impl TryFrom<DomainBounds> for Domain {
    type Error = TimelineError;

    fn try_from(bounds: DomainBounds) -> TimelineResult<Self> {
        Self::new(bounds.min_year, bounds.max_year)
    }
}

impl Default for Domain {
    fn default() -> Self {
        Self {
            min_year: DEFAULT_DOMAIN_YEARS.0,
            max_year: DEFAULT_DOMAIN_YEARS.1,
        }
    }
}

impl Domain {
    /// Builds a domain, widening spans below one year.
    ///
    /// Reversed bounds are swapped; non-finite bounds are rejected.
    pub fn new(min_year: f64, max_year: f64) -> TimelineResult<Self> {
        if !min_year.is_finite() || !max_year.is_finite() {
            return Err(TimelineError::InvalidData(
                "domain bounds must be finite".to_owned(),
            ));
        }

        let (min_year, max_year) = (min_year.min(max_year), min_year.max(max_year));
        let max_year = if max_year - min_year < MIN_DOMAIN_SPAN_YEARS {
            min_year + MIN_DOMAIN_SPAN_YEARS
        } else {
            max_year
        };
        Ok(Self { min_year, max_year })
    }

    /// Fits a domain to the whole-year extents of all dated starts and ends.
    ///
    /// Padding is `max(1, round(span * pad_ratio))` years on each side.
    /// Returns `fallback` when no event resolves to a position.
    #[must_use]
    pub fn fit_events(events: &[TimelineEvent], pad_ratio: f64, fallback: Domain) -> Self {
        let mut bounds: Option<(i32, i32)> = None;
        for event in events {
            let dates = [event.start, event.end];
            for date in dates.into_iter().flatten() {
                if date.to_year_fraction().is_none() {
                    continue;
                }
                bounds = Some(match bounds {
                    Some((min, max)) => (min.min(date.year), max.max(date.year)),
                    None => (date.year, date.year),
                });
            }
        }

        let Some((min, max)) = bounds else {
            return fallback;
        };

        let span = f64::from(max) - f64::from(min);
        let pad_ratio = if pad_ratio.is_finite() {
            pad_ratio.max(0.0)
        } else {
            0.0
        };
        let pad = (span * pad_ratio).round().max(1.0);
        Self::new(f64::from(min) - pad, f64::from(max) + pad).unwrap_or(fallback)
    }

    #[must_use]
    pub fn min_year(self) -> f64 {
        self.min_year
    }

    #[must_use]
    pub fn max_year(self) -> f64 {
        self.max_year
    }

    #[must_use]
    pub fn span(self) -> f64 {
        (self.max_year - self.min_year).max(MIN_DOMAIN_SPAN_YEARS)
    }

    #[must_use]
    pub fn contains(self, yf: f64) -> bool {
        yf >= self.min_year && yf <= self.max_year
    }
}
