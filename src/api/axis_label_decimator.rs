use serde::{Deserialize, Serialize};

use crate::core::{LinearScale, Tick, Viewport};

use super::granularity_planner::GranularityPlan;

/// Span tick with its screen position and label visibility.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AxisSpan {
    #[serde(flatten)]
    pub tick: Tick,
    pub screen_fraction: f64,
    pub label_visible: bool,
}

/// Every `stride`-th label stays visible.
///
/// Computed from the pan-independent visible span so panning never changes
/// which labels survive.
#[must_use]
pub fn label_stride(plan: GranularityPlan, visible_span_years: f64, max_labels: u32) -> u64 {
    let estimate =
        plan.unit.ticks_per_year() * visible_span_years / f64::from(plan.step.max(1));
    if !estimate.is_finite() || estimate <= 0.0 {
        return 1;
    }
    let stride = (estimate / f64::from(max_labels.max(1))).ceil();
    if stride >= u64::MAX as f64 {
        u64::MAX
    } else {
        (stride as u64).max(1)
    }
}

/// A label is kept when its absolute index is a multiple of `stride`.
#[must_use]
pub fn is_label_visible(index: i64, stride: u64) -> bool {
    let stride = i128::from(stride.max(1));
    i128::from(index).rem_euclid(stride) == 0
}

#[must_use]
pub fn decimate_spans(
    ticks: Vec<Tick>,
    stride: u64,
    viewport: Viewport,
    scale: LinearScale,
) -> Vec<AxisSpan> {
    ticks
        .into_iter()
        .map(|tick| AxisSpan {
            screen_fraction: viewport.screen_fraction(tick.yf, scale),
            label_visible: is_label_visible(tick.index, stride),
            tick,
        })
        .collect()
}
