use serde::{Deserialize, Serialize};

use crate::core::domain::{Domain, MIN_DOMAIN_SPAN_YEARS};

/// Affine bijection between a year domain and the unit interval `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LinearScale {
    domain_start: f64,
    span: f64,
}

impl LinearScale {
    /// Spans shorter than one year are treated as one year.
    #[must_use]
    pub fn new(domain_start: f64, domain_end: f64) -> Self {
        Self {
            domain_start,
            span: (domain_end - domain_start).max(MIN_DOMAIN_SPAN_YEARS),
        }
    }

    #[must_use]
    pub fn from_domain(domain: Domain) -> Self {
        Self::new(domain.min_year(), domain.max_year())
    }

    #[must_use]
    pub fn domain(self) -> (f64, f64) {
        (self.domain_start, self.domain_start + self.span)
    }

    #[must_use]
    pub fn span(self) -> f64 {
        self.span
    }

    #[must_use]
    pub fn to_unit(self, year: f64) -> f64 {
        (year - self.domain_start) / self.span
    }

    #[must_use]
    pub fn from_unit(self, unit: f64) -> f64 {
        self.domain_start + unit * self.span
    }
}
