use serde::{Deserialize, Serialize};

use crate::core::{Domain, ScaleBounds, TimelineEvent, Viewport, VisibleRange};

use super::axis_edge_pinner::{AxisMarker, EdgePin};
use super::axis_label_decimator::AxisSpan;
use super::event_positioner::EventLayout;
use super::granularity_planner::{GranularityPlan, PlanMemo};

/// Everything one recompute needs besides configuration and the plan memo.
#[derive(Debug, Clone, Copy)]
pub struct RecomputeInput<'a> {
    pub domain: Domain,
    pub viewport: Viewport,
    pub events: &'a [TimelineEvent],
    pub axis_width_px: f64,
}

/// Renderer-agnostic output of a recompute. Every position is a screen
/// fraction; multiply by the axis width to get pixels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderModel {
    pub domain: Domain,
    /// Viewport after clamping.
    pub viewport: Viewport,
    pub scale_bounds: ScaleBounds,
    pub visible_range: VisibleRange,
    pub padded_range: VisibleRange,
    pub plan: GranularityPlan,
    pub plan_memo: PlanMemo,
    pub label_stride: u64,
    pub spans: Vec<AxisSpan>,
    pub markers: Vec<AxisMarker>,
    pub pins: Vec<EdgePin>,
    /// Event placement; its fields sit at the top level of the JSON model.
    #[serde(flatten)]
    pub layout: EventLayout,
    /// Set when a tick safety cap cut either track short.
    pub truncated: bool,
}

impl RenderModel {
    #[must_use]
    pub fn visible_labels(&self) -> impl Iterator<Item = &AxisSpan> {
        self.spans.iter().filter(|span| span.label_visible)
    }
}
