use tracing::{debug, trace, warn};

use crate::core::{
    Domain, LinearScale, ScaleBounds, TimelineEvent, Viewport, VisibleRange,
    adaptive_scale_bounds, snap_scale,
};
use crate::error::{TimelineError, TimelineResult};
use crate::interaction::{InteractionMode, InteractionState, NavigationKey, wheel_zoom_factor};

use super::axis_edge_pinner::{EstimatedLabelWidth, LabelWidthMeasure, PinContext, pin_edges};
use super::axis_label_decimator::{decimate_spans, label_stride};
use super::axis_ticks::{build_markers, build_spans};
use super::engine_config::TimelineConfig;
use super::event_positioner::layout_events;
use super::granularity_planner::{PlanMemo, plan_with_hysteresis, visible_span_years};
use super::minimap::{
    MinimapWindow, WindowEdge, brush_window, center_on_click, drag_window, resize_window,
};
use super::render_model::{RecomputeInput, RenderModel};

const DEFAULT_AXIS_WIDTH_PX: f64 = 1000.0;

/// Computes the full render model for one frame with the default label
/// width estimator.
///
/// Pure apart from the plan memo, which the caller threads from the previous
/// model's `plan_memo`.
#[must_use]
pub fn recompute(
    input: &RecomputeInput<'_>,
    config: &TimelineConfig,
    previous: Option<PlanMemo>,
) -> RenderModel {
    recompute_with_measure(input, config, previous, &EstimatedLabelWidth)
}

#[must_use]
pub fn recompute_with_measure(
    input: &RecomputeInput<'_>,
    config: &TimelineConfig,
    previous: Option<PlanMemo>,
    measure: &dyn LabelWidthMeasure,
) -> RenderModel {
    let domain = input.domain;
    let scale = LinearScale::from_domain(domain);
    let scale_bounds = adaptive_scale_bounds(domain, &config.zoom);
    if !input.viewport.scale.is_finite() || !input.viewport.pan.is_finite() {
        warn!(
            scale = input.viewport.scale,
            pan = input.viewport.pan,
            "non-finite viewport clamped"
        );
    }
    let viewport = input.viewport.clamped(scale_bounds);

    let (plan, plan_memo) = plan_with_hysteresis(domain, viewport.scale, &config.axis, previous);
    let visible_range = VisibleRange::of(viewport, scale);
    let padded_range = visible_range.padded(config.axis.visible_pad_ratio);

    let spans = build_spans(plan, padded_range, &config.axis);
    let markers = build_markers(plan, padded_range, &config.axis);
    let truncated = spans.truncated || markers.truncated;

    let stride = label_stride(
        plan,
        visible_span_years(domain, viewport.scale),
        config.axis.max_labels,
    );
    let spans = decimate_spans(spans.ticks, stride, viewport, scale);

    let axis_width_px = if input.axis_width_px.is_finite() && input.axis_width_px > 0.0 {
        input.axis_width_px
    } else {
        DEFAULT_AXIS_WIDTH_PX
    };
    let pinned = pin_edges(
        markers.ticks,
        plan.unit.marker_unit(),
        PinContext {
            viewport,
            scale,
            raw_range: visible_range,
            axis_width_px,
            config: &config.axis,
        },
        measure,
    );

    let layout = layout_events(input.events, domain, viewport, &config.events);

    debug!(
        unit = plan.unit.as_str(),
        step = plan.step,
        stride,
        spans = spans.len(),
        markers = pinned.markers.len(),
        pins = pinned.pins.len(),
        events = layout.events.len(),
        truncated,
        "timeline recomputed"
    );

    RenderModel {
        domain,
        viewport,
        scale_bounds,
        visible_range,
        padded_range,
        plan,
        plan_memo,
        label_stride: stride,
        spans,
        markers: pinned.markers,
        pins: pinned.pins,
        layout,
        truncated,
    }
}

/// Stateful facade for hosts driving one timeline axis.
///
/// Owns the domain, viewport and hysteresis memo; every navigation method
/// leaves the viewport clamped to the current adaptive bounds.
pub struct TimelineEngine<M: LabelWidthMeasure = EstimatedLabelWidth> {
    config: TimelineConfig,
    domain: Domain,
    viewport: Viewport,
    plan_memo: Option<PlanMemo>,
    interaction: InteractionState,
    minimap_drag: Option<MinimapWindow>,
    axis_width_px: f64,
    measure: M,
}

impl TimelineEngine<EstimatedLabelWidth> {
    pub fn new(config: TimelineConfig, domain: Domain) -> TimelineResult<Self> {
        Self::with_label_measure(config, domain, EstimatedLabelWidth)
    }
}

impl<M: LabelWidthMeasure> TimelineEngine<M> {
    pub fn with_label_measure(
        config: TimelineConfig,
        domain: Domain,
        measure: M,
    ) -> TimelineResult<Self> {
        config.validate()?;
        Ok(Self {
            config,
            domain,
            viewport: Viewport::default(),
            plan_memo: None,
            interaction: InteractionState::default(),
            minimap_drag: None,
            axis_width_px: DEFAULT_AXIS_WIDTH_PX,
            measure,
        })
    }

    #[must_use]
    pub fn config(&self) -> &TimelineConfig {
        &self.config
    }

    #[must_use]
    pub fn domain(&self) -> Domain {
        self.domain
    }

    #[must_use]
    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    #[must_use]
    pub fn scale_bounds(&self) -> ScaleBounds {
        adaptive_scale_bounds(self.domain, &self.config.zoom)
    }

    #[must_use]
    pub fn plan_memo(&self) -> Option<PlanMemo> {
        self.plan_memo
    }

    #[must_use]
    pub fn interaction_mode(&self) -> InteractionMode {
        self.interaction.mode()
    }

    #[must_use]
    pub fn axis_width_px(&self) -> f64 {
        self.axis_width_px
    }

    #[must_use]
    pub fn minimap_window(&self) -> MinimapWindow {
        MinimapWindow::of(self.viewport)
    }

    pub fn set_axis_width_px(&mut self, width_px: f64) -> TimelineResult<()> {
        if !width_px.is_finite() || width_px <= 0.0 {
            return Err(TimelineError::InvalidData(
                "axis width must be finite and > 0".to_owned(),
            ));
        }
        self.axis_width_px = width_px;
        Ok(())
    }

    pub fn set_config(&mut self, config: TimelineConfig) -> TimelineResult<()> {
        config.validate()?;
        self.config = config;
        self.plan_memo = None;
        self.viewport = self.viewport.clamped(self.scale_bounds());
        Ok(())
    }

    /// Replaces the domain; the plan memo is dropped since its scale no
    /// longer describes the same span.
    pub fn set_domain(&mut self, domain: Domain) {
        self.domain = domain;
        self.plan_memo = None;
        self.viewport = self.viewport.clamped(self.scale_bounds());
        debug!(
            min_year = domain.min_year(),
            max_year = domain.max_year(),
            "domain updated"
        );
    }

    pub fn fit_domain_to_events(&mut self, events: &[TimelineEvent]) -> Domain {
        let domain = Domain::fit_events(
            events,
            self.config.axis.domain_pad_ratio,
            Domain::default(),
        );
        self.set_domain(domain);
        domain
    }

    pub fn reset_hysteresis(&mut self) {
        self.plan_memo = None;
    }

    pub fn set_viewport(&mut self, viewport: Viewport) -> Viewport {
        self.apply_viewport(viewport.clamped(self.scale_bounds()))
    }

    pub fn reset_viewport(&mut self) -> Viewport {
        self.set_viewport(Viewport::default())
    }

    pub fn pan_by(&mut self, delta: f64) -> Viewport {
        let next = self.viewport.pan_by(delta, self.scale_bounds());
        self.apply_viewport(next)
    }

    /// Zooms about the screen center.
    pub fn zoom_by_factor(&mut self, factor: f64) -> Viewport {
        self.zoom_about(factor, 0.5)
    }

    pub fn zoom_about(&mut self, factor: f64, anchor_fraction: f64) -> Viewport {
        let next = self
            .viewport
            .zoom_about(factor, anchor_fraction, self.scale_bounds());
        self.apply_viewport(next)
    }

    pub fn center_on_unit(&mut self, unit: f64) -> Viewport {
        let next = self.viewport.center_on_unit(unit, self.scale_bounds());
        self.apply_viewport(next)
    }

    pub fn center_on_year(&mut self, yf: f64) -> Viewport {
        let unit = LinearScale::from_domain(self.domain).to_unit(yf);
        self.center_on_unit(unit)
    }

    pub fn pointer_down(&mut self, x_px: f64) -> TimelineResult<()> {
        self.interaction.on_drag_start(x_px, self.viewport.pan)
    }

    /// Pans by the pointer displacement since `pointer_down`; ignored when no
    /// drag is active.
    pub fn pointer_move(&mut self, x_px: f64) -> Viewport {
        match self.interaction.drag_pan(x_px, self.axis_width_px) {
            Some(pan) => self.set_viewport(Viewport::new(self.viewport.scale, pan)),
            None => self.viewport,
        }
    }

    pub fn pointer_up(&mut self) {
        self.interaction.end_gesture();
    }

    /// Wheel zoom about `anchor_fraction` (screen center when `None`).
    pub fn wheel(&mut self, delta_y: f64, anchor_fraction: Option<f64>) -> Viewport {
        match wheel_zoom_factor(delta_y, self.config.zoom.wheel_delta_clamp) {
            Some(factor) => self.zoom_about(factor, anchor_fraction.unwrap_or(0.5)),
            None => self.viewport,
        }
    }

    pub fn pinch_start(&mut self, distance_px: f64) -> TimelineResult<()> {
        self.interaction
            .on_pinch_start(distance_px, self.viewport.scale)
    }

    pub fn pinch_move(&mut self, distance_px: f64) -> Viewport {
        match self.interaction.pinch_scale(distance_px) {
            Some(scale) => {
                let factor = scale / self.viewport.scale;
                self.zoom_about(factor, 0.5)
            }
            None => self.viewport,
        }
    }

    /// Ends the pinch and settles onto a friendly zoom level when close.
    pub fn pinch_end(&mut self) -> Viewport {
        if self.interaction.end_gesture() != InteractionMode::Pinching {
            return self.viewport;
        }
        self.snap_current_scale()
    }

    pub fn key(&mut self, key: NavigationKey) -> Viewport {
        let zoom = &self.config.zoom;
        let (pan_step, zoom_factor) = (zoom.keyboard_pan_step, zoom.keyboard_zoom_factor);
        match key {
            NavigationKey::PanLeft => self.pan_by(-pan_step),
            NavigationKey::PanRight => self.pan_by(pan_step),
            NavigationKey::ZoomIn => {
                self.zoom_by_factor(zoom_factor);
                self.snap_current_scale()
            }
            NavigationKey::ZoomOut => {
                self.zoom_by_factor(1.0 / zoom_factor);
                self.snap_current_scale()
            }
            NavigationKey::Reset => self.reset_viewport(),
        }
    }

    /// Centers the main view on a minimap click at unit position `x_unit`.
    pub fn minimap_click(&mut self, x_unit: f64) -> Viewport {
        let next = center_on_click(self.viewport, x_unit, self.scale_bounds());
        self.apply_viewport(next)
    }

    pub fn minimap_drag_start(&mut self) {
        self.minimap_drag = Some(self.minimap_window());
    }

    /// Moves the minimap window by `dx_unit` from where the drag started.
    pub fn minimap_drag_move(&mut self, dx_unit: f64) -> Viewport {
        let Some(start) = self.minimap_drag else {
            return self.viewport;
        };
        let next = drag_window(start, self.viewport.scale, dx_unit, self.scale_bounds());
        self.apply_viewport(next)
    }

    /// Resizes the minimap window from `edge` by `dx_unit` from where the
    /// drag started.
    pub fn minimap_resize_move(&mut self, edge: WindowEdge, dx_unit: f64) -> Viewport {
        let Some(start) = self.minimap_drag else {
            return self.viewport;
        };
        let next = resize_window(start, edge, dx_unit, self.scale_bounds());
        self.apply_viewport(next)
    }

    /// Zooms onto a selection brushed across the minimap between unit
    /// positions `a` and `b`.
    pub fn minimap_brush(&mut self, a: f64, b: f64) -> Viewport {
        let next = brush_window(self.viewport, a, b, self.scale_bounds());
        self.apply_viewport(next)
    }

    pub fn minimap_drag_end(&mut self) {
        self.minimap_drag = None;
    }

    pub fn recompute(&mut self, events: &[TimelineEvent]) -> RenderModel {
        let input = RecomputeInput {
            domain: self.domain,
            viewport: self.viewport,
            events,
            axis_width_px: self.axis_width_px,
        };
        let model = recompute_with_measure(&input, &self.config, self.plan_memo, &self.measure);
        self.plan_memo = Some(model.plan_memo);
        self.viewport = model.viewport;
        model
    }

    pub fn snapshot_json_pretty(&mut self, events: &[TimelineEvent]) -> TimelineResult<String> {
        self.recompute(events).to_json_contract_v1_pretty()
    }

    fn snap_current_scale(&mut self) -> Viewport {
        let zoom = &self.config.zoom;
        let snapped = snap_scale(self.viewport.scale, &zoom.snap_levels, zoom.snap_threshold);
        if snapped == self.viewport.scale {
            return self.viewport;
        }
        let factor = snapped / self.viewport.scale;
        self.zoom_about(factor, 0.5)
    }

    fn apply_viewport(&mut self, next: Viewport) -> Viewport {
        if next != self.viewport {
            trace!(
                scale = next.scale,
                pan = next.pan,
                previous_scale = self.viewport.scale,
                previous_pan = self.viewport.pan,
                "viewport updated"
            );
        }
        self.viewport = next;
        next
    }
}
