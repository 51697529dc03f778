use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};

use crate::core::{EventType, LinearScale, ScaleBounds, TimelineEvent, Viewport, clamp_pan};

/// Brush selections narrower than this are treated as a click at their
/// midpoint.
pub const MIN_BRUSH_WIDTH: f64 = 0.01;

/// Portion of the full domain currently on screen, in unit space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MinimapWindow {
    pub left: f64,
    pub width: f64,
}

impl MinimapWindow {
    #[must_use]
    pub fn of(viewport: Viewport) -> Self {
        let scale = if viewport.scale.is_finite() && viewport.scale > 0.0 {
            viewport.scale
        } else {
            1.0
        };
        let width = (1.0 / scale).min(1.0);
        let left = 0.5 - (0.5 + viewport.pan) / scale;
        let left = if left.is_finite() { left } else { 0.0 };
        Self {
            left: left.max(0.0).min(1.0 - width),
            width,
        }
    }

    #[must_use]
    pub fn right(self) -> f64 {
        self.left + self.width
    }
}

/// Pan that puts the window's left edge at `left`, clamped for `scale`.
#[must_use]
pub fn pan_for_window_left(left: f64, scale: f64) -> f64 {
    clamp_pan(scale * (0.5 - left) - 0.5, scale)
}

/// Centers the main view on the clicked unit position.
#[must_use]
pub fn center_on_click(viewport: Viewport, x_unit: f64, bounds: ScaleBounds) -> Viewport {
    viewport.center_on_unit(x_unit.clamp(0.0, 1.0), bounds)
}

/// Moves the window captured at drag start by `dx_unit` without resizing it.
#[must_use]
pub fn drag_window(
    start: MinimapWindow,
    scale: f64,
    dx_unit: f64,
    bounds: ScaleBounds,
) -> Viewport {
    let dx_unit = if dx_unit.is_finite() { dx_unit } else { 0.0 };
    let left = (start.left + dx_unit).max(0.0).min(1.0 - start.width);
    Viewport::new(scale, pan_for_window_left(left, scale)).clamped(bounds)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WindowEdge {
    Left,
    Right,
}

/// Resizes the window from `edge`, keeping the opposite edge fixed.
///
/// Width is bounded by the zoom limits, so the resulting scale is always
/// inside `bounds`.
#[must_use]
pub fn resize_window(
    start: MinimapWindow,
    edge: WindowEdge,
    dx_unit: f64,
    bounds: ScaleBounds,
) -> Viewport {
    let dx_unit = if dx_unit.is_finite() { dx_unit } else { 0.0 };
    let min_width = (1.0 / bounds.max).min(1.0);
    let requested = match edge {
        WindowEdge::Left => start.width - dx_unit,
        WindowEdge::Right => start.width + dx_unit,
    };
    let scale = bounds.clamp_scale(1.0 / requested.max(min_width).min(1.0));
    let width = (1.0 / scale).min(1.0);
    let left = match edge {
        WindowEdge::Left => start.right() - width,
        WindowEdge::Right => start.left,
    };
    let left = left.max(0.0).min(1.0 - width);
    Viewport::new(scale, pan_for_window_left(left, scale)).clamped(bounds)
}

/// Zooms the main view onto the brushed selection `[a, b]` in unit space.
///
/// The endpoints may arrive in either order. The scale becomes the inverse of
/// the selection width within `bounds`, centered on the selection.
#[must_use]
pub fn brush_window(viewport: Viewport, a: f64, b: f64, bounds: ScaleBounds) -> Viewport {
    let finite_or_zero = |value: f64| if value.is_finite() { value } else { 0.0 };
    let a = finite_or_zero(a).clamp(0.0, 1.0);
    let b = finite_or_zero(b).clamp(0.0, 1.0);
    let (left, right) = (a.min(b), a.max(b));
    let center = (left + right) / 2.0;
    let width = right - left;

    if width < MIN_BRUSH_WIDTH {
        return center_on_click(viewport, center, bounds);
    }

    let scale = bounds.clamp_scale(1.0 / width);
    let window = (1.0 / scale).min(1.0);
    let left = (center - window / 2.0).max(0.0).min(1.0 - window);
    Viewport::new(scale, pan_for_window_left(left, scale)).clamped(bounds)
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MinimapMark {
    pub event_id: String,
    pub unit: f64,
    pub event_type: EventType,
}

/// Unit positions of dated events, left to right.
#[must_use]
pub fn minimap_marks(events: &[TimelineEvent], scale: LinearScale) -> Vec<MinimapMark> {
    let mut marks: Vec<MinimapMark> = events
        .iter()
        .filter_map(|event| {
            let yf = event.start_year_fraction()?;
            Some(MinimapMark {
                event_id: event.id.clone(),
                unit: scale.to_unit(yf),
                event_type: event.event_type,
            })
        })
        .collect();
    marks.sort_by_key(|mark| OrderedFloat(mark.unit));
    marks
}
