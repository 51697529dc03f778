use serde::{Deserialize, Serialize};

use crate::error::{TimelineError, TimelineResult};

/// Wheel deltas are divided by this before clamping into a zoom step.
const WHEEL_DELTA_DIVISOR: f64 = 1000.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InteractionMode {
    Idle,
    Panning,
    Pinching,
}

/// Keyboard navigation commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NavigationKey {
    /// Moves content left, like dragging toward the left edge.
    PanLeft,
    /// Moves content right, revealing earlier dates.
    PanRight,
    ZoomIn,
    ZoomOut,
    Reset,
}

/// Pointer gesture state for one axis.
///
/// Gestures capture the viewport at their start and derive every update from
/// that capture, so dropped move events never accumulate drift.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InteractionState {
    mode: InteractionMode,
    drag_start_x_px: f64,
    drag_start_pan: f64,
    pinch_start_distance_px: f64,
    pinch_start_scale: f64,
}

impl Default for InteractionState {
    fn default() -> Self {
        Self {
            mode: InteractionMode::Idle,
            drag_start_x_px: 0.0,
            drag_start_pan: 0.0,
            pinch_start_distance_px: 0.0,
            pinch_start_scale: 1.0,
        }
    }
}

impl InteractionState {
    #[must_use]
    pub fn mode(self) -> InteractionMode {
        self.mode
    }

    pub fn on_drag_start(&mut self, x_px: f64, pan: f64) -> TimelineResult<()> {
        if !x_px.is_finite() {
            return Err(TimelineError::InvalidData(
                "drag position must be finite".to_owned(),
            ));
        }
        self.mode = InteractionMode::Panning;
        self.drag_start_x_px = x_px;
        self.drag_start_pan = pan;
        Ok(())
    }

    /// Unclamped pan for a pointer at `x_px`, or `None` when not dragging.
    #[must_use]
    pub fn drag_pan(self, x_px: f64, axis_width_px: f64) -> Option<f64> {
        if self.mode != InteractionMode::Panning
            || !x_px.is_finite()
            || !axis_width_px.is_finite()
            || axis_width_px <= 0.0
        {
            return None;
        }
        Some(self.drag_start_pan + (x_px - self.drag_start_x_px) / axis_width_px)
    }

    pub fn on_pinch_start(&mut self, distance_px: f64, scale: f64) -> TimelineResult<()> {
        if !distance_px.is_finite() || distance_px <= 0.0 {
            return Err(TimelineError::InvalidData(
                "pinch distance must be finite and > 0".to_owned(),
            ));
        }
        self.mode = InteractionMode::Pinching;
        self.pinch_start_distance_px = distance_px;
        self.pinch_start_scale = scale;
        Ok(())
    }

    /// Unclamped scale for the current finger distance, or `None` when not
    /// pinching.
    #[must_use]
    pub fn pinch_scale(self, distance_px: f64) -> Option<f64> {
        if self.mode != InteractionMode::Pinching || !distance_px.is_finite() || distance_px <= 0.0
        {
            return None;
        }
        Some(self.pinch_start_scale * distance_px / self.pinch_start_distance_px)
    }

    /// Ends any gesture and returns the mode that was active.
    pub fn end_gesture(&mut self) -> InteractionMode {
        std::mem::replace(&mut self.mode, InteractionMode::Idle)
    }
}

/// Zoom factor for a wheel event: `1 + clamp(-delta_y / 1000, ±clamp)`.
///
/// Returns `None` for a zero or non-finite delta.
#[must_use]
pub fn wheel_zoom_factor(delta_y: f64, delta_clamp: f64) -> Option<f64> {
    if delta_y == 0.0 || !delta_y.is_finite() {
        return None;
    }
    let limit = if delta_clamp.is_finite() {
        delta_clamp.abs()
    } else {
        0.0
    };
    Some(1.0 + (-delta_y / WHEEL_DELTA_DIVISOR).max(-limit).min(limit))
}
