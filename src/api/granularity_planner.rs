use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::{Domain, TimeUnit};

use super::axis_config::{AxisConfig, DAYS_PER_YEAR, HOURS_PER_YEAR};

/// Upper bound on the year step search; spans wider than this many labels'
/// worth of steps fall back to the largest candidate.
const MAX_YEAR_STEP: u32 = 1_000_000_000;

/// Tick granularity selected for one recompute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GranularityPlan {
    pub unit: TimeUnit,
    pub step: u32,
}

/// Last committed plan and the scale at which it was committed.
///
/// Owned by the caller (one per axis) and threaded through each recompute.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlanMemo {
    pub scale: f64,
    pub plan: GranularityPlan,
}

/// Years on screen for `scale`, independent of pan.
#[must_use]
pub fn visible_span_years(domain: Domain, scale: f64) -> f64 {
    let scale = if scale.is_finite() && scale > 0.0 {
        scale
    } else {
        1.0
    };
    domain.span() / scale
}

/// Chooses unit and step for a visible span, without hysteresis.
#[must_use]
pub fn plan_for_span(span_years: f64, config: &AxisConfig) -> GranularityPlan {
    let thresholds = &config.thresholds;
    let base = config.canonical_base.max(1);
    let span = if span_years.is_finite() && span_years > 0.0 {
        span_years
    } else {
        f64::MAX
    };

    if span <= thresholds.minute_upper_hours / HOURS_PER_YEAR {
        return GranularityPlan {
            unit: TimeUnit::Minute,
            step: (60 / base).max(1),
        };
    }
    if span <= thresholds.hour_upper_days / DAYS_PER_YEAR {
        let step = if span <= thresholds.fine_hour_upper_days / DAYS_PER_YEAR {
            1
        } else {
            (24 / base).max(1)
        };
        return GranularityPlan {
            unit: TimeUnit::Hour,
            step,
        };
    }
    if span <= thresholds.day_upper_years {
        return GranularityPlan {
            unit: TimeUnit::Day,
            step: 1,
        };
    }
    if span <= thresholds.week_upper_years {
        return GranularityPlan {
            unit: TimeUnit::Week,
            step: 1,
        };
    }
    if span <= thresholds.month_upper_years {
        let step = if span <= thresholds.fine_month_upper_years {
            1
        } else {
            (12 / base).max(1)
        };
        return GranularityPlan {
            unit: TimeUnit::Month,
            step,
        };
    }

    GranularityPlan {
        unit: TimeUnit::Year,
        step: nice_year_step(span, config.max_labels),
    }
}

/// Smallest step from 1, 2, 5, 10, 20, 25, 50, 100, ... keeping
/// `span / step` within `max_labels`.
#[must_use]
pub fn nice_year_step(span_years: f64, max_labels: u32) -> u32 {
    let max_labels = f64::from(max_labels.max(1));
    let mut candidates = NiceYearSteps::default();
    loop {
        let Some(step) = candidates.next() else {
            return MAX_YEAR_STEP;
        };
        if span_years / f64::from(step) <= max_labels {
            return step;
        }
    }
}

#[derive(Debug, Default)]
struct NiceYearSteps {
    magnitude: u32,
    position: usize,
}

impl Iterator for NiceYearSteps {
    type Item = u32;

    fn next(&mut self) -> Option<u32> {
        if self.magnitude == 0 {
            const UNITS: [u32; 3] = [1, 2, 5];
            if let Some(step) = UNITS.get(self.position) {
                self.position += 1;
                return Some(*step);
            }
            self.magnitude = 10;
            self.position = 0;
        }

        // Tenths of the magnitude so 25 x 10^n stays integral.
        const TENTHS: [u32; 4] = [10, 20, 25, 50];
        loop {
            if let Some(tenths) = TENTHS.get(self.position) {
                self.position += 1;
                let step = (self.magnitude / 10).checked_mul(*tenths)?;
                if step > MAX_YEAR_STEP {
                    return None;
                }
                return Some(step);
            }
            self.magnitude = self.magnitude.checked_mul(10)?;
            self.position = 0;
        }
    }
}

/// Selects a plan for `scale`, holding the previous unit across small zoom
/// changes.
///
/// The returned memo keeps the previous commit scale while a plan is held, so
/// a slow zoom accumulates change until it crosses the threshold.
#[must_use]
pub fn plan_with_hysteresis(
    domain: Domain,
    scale: f64,
    config: &AxisConfig,
    previous: Option<PlanMemo>,
) -> (GranularityPlan, PlanMemo) {
    let fresh = plan_for_span(visible_span_years(domain, scale), config);
    let commit = PlanMemo { scale, plan: fresh };

    let Some(memo) = previous else {
        debug!(unit = fresh.unit.as_str(), step = fresh.step, scale, "plan selected");
        return (fresh, commit);
    };

    if fresh.unit != memo.plan.unit
        && memo.scale.is_finite()
        && memo.scale > 0.0
        && scale.is_finite()
    {
        let relative_change = (scale - memo.scale).abs() / memo.scale;
        if relative_change < config.hysteresis_pct {
            debug!(
                held_unit = memo.plan.unit.as_str(),
                fresh_unit = fresh.unit.as_str(),
                relative_change,
                "plan held by hysteresis"
            );
            return (memo.plan, memo);
        }
    }

    if fresh != memo.plan {
        debug!(
            from_unit = memo.plan.unit.as_str(),
            unit = fresh.unit.as_str(),
            step = fresh.step,
            scale,
            "plan changed"
        );
    }
    (fresh, commit)
}
