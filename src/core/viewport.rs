use serde::{Deserialize, Serialize};

use crate::core::domain::Domain;
use crate::core::scale::LinearScale;
use crate::error::{TimelineError, TimelineResult};

/// Zoom limits and gesture tuning.
///
/// Runtime scale bounds are adaptive: `scale_min`/`scale_max` are the
/// configured base range, widened on the high end so the smallest visible span
/// reaches `min_visible_span_years`, and capped by `max_scale_cap`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ZoomTuning {
    pub scale_min: f64,
    pub scale_max: f64,
    pub min_visible_span_years: f64,
    pub max_scale_cap: f64,
    pub min_scale_floor: f64,
    pub wheel_delta_clamp: f64,
    pub keyboard_zoom_factor: f64,
    pub keyboard_pan_step: f64,
    pub snap_levels: Vec<f64>,
    pub snap_threshold: f64,
}

impl Default for ZoomTuning {
    fn default() -> Self {
        Self {
            scale_min: 0.5,
            scale_max: 5.0,
            // One hour.
            min_visible_span_years: 1.0 / (365.0 * 24.0),
            max_scale_cap: 1_000_000.0,
            min_scale_floor: 0.25,
            wheel_delta_clamp: 0.25,
            keyboard_zoom_factor: 1.1,
            keyboard_pan_step: 0.05,
            snap_levels: vec![0.5, 1.0, 2.0, 4.0, 5.0],
            snap_threshold: 0.06,
        }
    }
}

impl ZoomTuning {
    pub fn validate(&self) -> TimelineResult<()> {
        for (value, name) in [
            (self.scale_min, "scale_min"),
            (self.scale_max, "scale_max"),
            (self.min_visible_span_years, "min_visible_span_years"),
            (self.max_scale_cap, "max_scale_cap"),
            (self.min_scale_floor, "min_scale_floor"),
            (self.keyboard_zoom_factor, "keyboard_zoom_factor"),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(TimelineError::InvalidConfig(format!(
                    "zoom `{name}` must be finite and > 0"
                )));
            }
        }

        if self.scale_max < self.scale_min {
            return Err(TimelineError::InvalidConfig(
                "zoom `scale_max` must be >= `scale_min`".to_owned(),
            ));
        }
        if self.max_scale_cap < self.scale_max {
            return Err(TimelineError::InvalidConfig(
                "zoom `max_scale_cap` must be >= `scale_max`".to_owned(),
            ));
        }

        for (value, name) in [
            (self.wheel_delta_clamp, "wheel_delta_clamp"),
            (self.keyboard_pan_step, "keyboard_pan_step"),
            (self.snap_threshold, "snap_threshold"),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(TimelineError::InvalidConfig(format!(
                    "zoom `{name}` must be finite and >= 0"
                )));
            }
        }

        if self
            .snap_levels
            .iter()
            .any(|level| !level.is_finite() || *level <= 0.0)
        {
            return Err(TimelineError::InvalidConfig(
                "zoom snap levels must be finite and > 0".to_owned(),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScaleBounds {
    pub min: f64,
    pub max: f64,
}

impl ScaleBounds {
    #[must_use]
    pub fn clamp_scale(self, scale: f64) -> f64 {
        let scale = if scale.is_finite() { scale } else { 1.0 };
        scale.max(self.min).min(self.max)
    }
}

/// Computes runtime zoom bounds for `domain`.
///
/// Zooming in can reach but never exceed `min_visible_span_years`; zooming out
/// never goes below the configured floor.
#[must_use]
pub fn adaptive_scale_bounds(domain: Domain, tuning: &ZoomTuning) -> ScaleBounds {
    let span_limited = domain.span() / tuning.min_visible_span_years;
    let cap = tuning.max_scale_cap.max(tuning.scale_max);
    let max = if span_limited.is_finite() {
        span_limited.max(tuning.scale_max).min(cap)
    } else {
        cap
    };
    let min = tuning.min_scale_floor.max(tuning.scale_min).min(max);
    ScaleBounds { min, max }
}

/// Clamps `pan` so the scaled content always covers the viewport.
///
/// Returns exactly `0.0` when `scale <= 1`.
#[must_use]
pub fn clamp_pan(pan: f64, scale: f64) -> f64 {
    if !scale.is_finite() || scale <= 1.0 || !pan.is_finite() {
        return 0.0;
    }
    let bound = (scale - 1.0) / 2.0;
    pan.clamp(-bound, bound)
}

/// Snaps `scale` onto the nearest friendly level within a relative threshold.
#[must_use]
pub fn snap_scale(scale: f64, levels: &[f64], threshold: f64) -> f64 {
    let nearest = levels
        .iter()
        .copied()
        .filter(|level| level.is_finite() && *level > 0.0)
        .map(|level| (level, ((scale - level) / level).abs()))
        .min_by(|left, right| left.1.total_cmp(&right.1));

    match nearest {
        Some((level, distance)) if distance <= threshold => level,
        _ => scale,
    }
}

/// Zoom/pan state of one axis.
///
/// A unit position `u` lands on screen at `(u - 0.5) * scale + 0.5 + pan`:
/// scale about the center first, then pan. Every consumer shares this order.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub scale: f64,
    pub pan: f64,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            scale: 1.0,
            pan: 0.0,
        }
    }
}

impl Viewport {
    #[must_use]
    pub fn new(scale: f64, pan: f64) -> Self {
        Self { scale, pan }
    }

    /// Returns the nearest valid viewport inside `bounds`.
    #[must_use]
    pub fn clamped(self, bounds: ScaleBounds) -> Self {
        let scale = bounds.clamp_scale(self.scale);
        Self {
            scale,
            pan: clamp_pan(self.pan, scale),
        }
    }

    #[must_use]
    pub fn unit_to_screen_fraction(self, unit: f64) -> f64 {
        (unit - 0.5) * self.scale + 0.5 + self.pan
    }

    #[must_use]
    pub fn screen_fraction(self, yf: f64, scale: LinearScale) -> f64 {
        self.unit_to_screen_fraction(scale.to_unit(yf))
    }

    #[must_use]
    pub fn unit_at_screen_fraction(self, fraction: f64) -> f64 {
        (fraction - 0.5 - self.pan) / self.scale + 0.5
    }

    /// Unit interval currently covering the screen, not clamped to `[0, 1]`.
    #[must_use]
    pub fn visible_unit_range(self) -> (f64, f64) {
        let left = self.unit_at_screen_fraction(0.0);
        let right = self.unit_at_screen_fraction(1.0);
        (left.min(right), left.max(right))
    }

    #[must_use]
    pub fn pan_by(self, delta: f64, bounds: ScaleBounds) -> Self {
        if !delta.is_finite() {
            return self.clamped(bounds);
        }
        Self::new(self.scale, self.pan + delta).clamped(bounds)
    }

    /// Zooms by `factor` keeping the instant under `anchor_fraction` fixed.
    #[must_use]
    pub fn zoom_about(self, factor: f64, anchor_fraction: f64, bounds: ScaleBounds) -> Self {
        if !factor.is_finite() || factor <= 0.0 {
            return self.clamped(bounds);
        }
        let anchor = if anchor_fraction.is_finite() {
            anchor_fraction
        } else {
            0.5
        };
        let anchor_unit = self.unit_at_screen_fraction(anchor);
        let scale = bounds.clamp_scale(self.scale * factor);
        let pan = anchor - 0.5 - (anchor_unit - 0.5) * scale;
        Self::new(scale, pan).clamped(bounds)
    }

    /// Pans so `unit` sits at the screen center.
    #[must_use]
    pub fn center_on_unit(self, unit: f64, bounds: ScaleBounds) -> Self {
        Self::new(self.scale, -(unit - 0.5) * self.scale).clamped(bounds)
    }
}

/// Inclusive fractional-year range.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VisibleRange {
    pub start: f64,
    pub end: f64,
}

impl VisibleRange {
    /// Years currently on screen, clamped to the domain.
    #[must_use]
    pub fn of(viewport: Viewport, scale: LinearScale) -> Self {
        let (u_min, u_max) = viewport.visible_unit_range();
        Self {
            start: scale.from_unit(u_min.clamp(0.0, 1.0)),
            end: scale.from_unit(u_max.clamp(0.0, 1.0)),
        }
    }

    #[must_use]
    pub fn span(self) -> f64 {
        self.end - self.start
    }

    /// Symmetric pad so ticks do not pop exactly at the edges.
    #[must_use]
    pub fn padded(self, pad_ratio: f64) -> Self {
        let pad = self.span() * pad_ratio.max(0.0);
        Self {
            start: self.start - pad,
            end: self.end + pad,
        }
    }

    #[must_use]
    pub fn contains(self, yf: f64) -> bool {
        yf >= self.start && yf <= self.end
    }
}
