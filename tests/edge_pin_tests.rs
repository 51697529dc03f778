use approx::assert_abs_diff_eq;
use timeline_rs::api::{
    AxisConfig, EstimatedLabelWidth, LabelWidthMeasure, PinContext, PinEdge, TimelineConfig,
    TimelineEngine, build_markers, estimate_label_text_width_px, pin_edges, plan_for_span,
};
use timeline_rs::core::{
    Domain, LinearScale, PartialDate, TimeUnit, Viewport, VisibleRange, ZoomTuning,
    adaptive_scale_bounds,
};
use timeline_rs::RenderModel;

const DAY_SCALE: f64 = 200.0;

fn april_first() -> f64 {
    PartialDate::ymd(2005, 4, 1)
        .to_year_fraction()
        .expect("dated")
}

fn model_centered_on(yf: f64) -> RenderModel {
    let domain = Domain::new(2000.0, 2010.0).expect("domain");
    let mut engine = TimelineEngine::new(TimelineConfig::default(), domain).expect("engine");
    engine.set_viewport(Viewport::new(DAY_SCALE, 0.0));
    engine.center_on_year(yf);
    engine.recompute(&[])
}

fn pin_labels(model: &RenderModel) -> Vec<&str> {
    model.pins.iter().map(|pin| pin.label.as_str()).collect()
}

fn pin_edges_of(model: &RenderModel) -> Vec<PinEdge> {
    model.pins.iter().map(|pin| pin.edge).collect()
}

#[test]
fn day_plan_at_high_zoom_uses_month_markers() {
    let model = model_centered_on(april_first());
    assert_eq!(model.plan.unit, TimeUnit::Day);
    assert!(
        model
            .markers
            .iter()
            .all(|marker| marker.tick.unit == TimeUnit::Month)
    );
}

#[test]
fn no_visible_marker_pins_the_enclosing_month() {
    let center = PartialDate::ymd(2005, 3, 16)
        .to_year_fraction()
        .expect("dated");
    let model = model_centered_on(center);

    assert!(
        model
            .markers
            .iter()
            .all(|marker| !model.visible_range.contains(marker.tick.yf))
    );
    assert_eq!(pin_labels(&model), vec!["Mar 2005"]);
    assert_eq!(model.pins[0].unit, TimeUnit::Month);
    assert_eq!(pin_edges_of(&model), vec![PinEdge::Left]);
}

#[test]
fn empty_window_late_in_the_month_pins_the_right_edge() {
    let center = PartialDate::ymd(2005, 3, 20)
        .to_year_fraction()
        .expect("dated");
    let model = model_centered_on(center);

    assert_eq!(pin_labels(&model), vec!["Mar 2005"]);
    assert_eq!(pin_edges_of(&model), vec![PinEdge::Right]);
}

#[test]
fn centered_marker_is_kept_beside_the_left_pin() {
    let model = model_centered_on(april_first());

    let april = model
        .markers
        .iter()
        .find(|marker| marker.tick.label == "Apr 2005")
        .expect("april marker kept");
    assert_abs_diff_eq!(april.screen_fraction, 0.5, epsilon = 1e-6);
    assert_eq!(pin_labels(&model), vec!["Mar 2005"]);
    assert_eq!(pin_edges_of(&model), vec![PinEdge::Left]);
}

#[test]
fn marker_near_left_edge_becomes_the_pin() {
    let model = model_centered_on(april_first() + 0.0245);

    assert!(
        model
            .markers
            .iter()
            .all(|marker| marker.tick.label != "Apr 2005")
    );
    assert_eq!(pin_labels(&model), vec!["Apr 2005"]);
    assert_eq!(pin_edges_of(&model), vec![PinEdge::Left]);
    assert_abs_diff_eq!(model.pins[0].yf, april_first(), epsilon = 1e-9);
}

#[test]
fn marker_near_right_edge_becomes_a_right_pin() {
    let model = model_centered_on(april_first() - 0.0245);

    assert!(
        model
            .markers
            .iter()
            .all(|marker| marker.tick.label != "Apr 2005")
    );
    assert_eq!(pin_labels(&model), vec!["Mar 2005", "Apr 2005"]);
    assert_eq!(pin_edges_of(&model), vec![PinEdge::Left, PinEdge::Right]);
    assert_abs_diff_eq!(model.pins[1].yf, april_first(), epsilon = 1e-9);
}

#[test]
fn threshold_is_padding_plus_half_the_label_width() {
    let config = AxisConfig::default();
    let half_width = estimate_label_text_width_px("Apr 2005", config.marker_font_px) / 2.0;
    let threshold = config.pin_threshold_px + half_width;
    assert_abs_diff_eq!(threshold, 31.025, epsilon = 1e-9);
}

#[test]
fn two_visible_markers_need_no_pins() {
    // Two and a half years on screen gives quarterly spans with yearly markers.
    let domain = Domain::new(2000.0, 2010.0).expect("domain");
    let mut engine = TimelineEngine::new(TimelineConfig::default(), domain).expect("engine");
    engine.set_viewport(Viewport::new(4.0, 0.0));
    let model = engine.recompute(&[]);

    let visible = model
        .markers
        .iter()
        .filter(|marker| model.visible_range.contains(marker.tick.yf))
        .count();
    assert!(visible >= 2);
    assert!(model.pins.is_empty());
}

#[test]
fn disabled_pinning_keeps_markers_untouched() {
    let domain = Domain::new(2000.0, 2010.0).expect("domain");
    let config = TimelineConfig::default()
        .with_axis(AxisConfig::default().with_edge_pinning(false));
    let mut engine = TimelineEngine::new(config, domain).expect("engine");
    engine.set_viewport(Viewport::new(DAY_SCALE, 0.0));
    engine.center_on_year(april_first() + 0.0245);
    let model = engine.recompute(&[]);

    assert!(model.pins.is_empty());
    assert!(
        model
            .markers
            .iter()
            .any(|marker| marker.tick.label == "Apr 2005")
    );
}

struct WideLabels;

impl LabelWidthMeasure for WideLabels {
    fn label_width_px(&self, _text: &str, _font_px: f64) -> f64 {
        400.0
    }
}

#[test]
fn host_measure_widens_the_pin_threshold() {
    let domain = Domain::new(2000.0, 2010.0).expect("domain");
    let scale = LinearScale::from_domain(domain);
    let bounds = adaptive_scale_bounds(domain, &ZoomTuning::default());
    let config = AxisConfig::default();

    // Marker sits 100px from the left edge of a 1000px axis.
    let center = april_first() + 0.02;
    let viewport = Viewport::new(DAY_SCALE, 0.0).center_on_unit(scale.to_unit(center), bounds);
    let raw_range = VisibleRange::of(viewport, scale);
    let plan = plan_for_span(raw_range.span(), &config);
    let ticks = build_markers(plan, raw_range.padded(config.visible_pad_ratio), &config).ticks;
    let context = PinContext {
        viewport,
        scale,
        raw_range,
        axis_width_px: 1000.0,
        config: &config,
    };

    let estimated = pin_edges(ticks.clone(), TimeUnit::Month, context, &EstimatedLabelWidth);
    assert!(
        estimated
            .markers
            .iter()
            .any(|marker| marker.tick.label == "Apr 2005")
    );
    assert_eq!(estimated.pins[0].label, "Mar 2005");

    let wide = pin_edges(ticks, TimeUnit::Month, context, &WideLabels);
    assert!(
        wide.markers
            .iter()
            .all(|marker| marker.tick.label != "Apr 2005")
    );
    assert_eq!(wide.pins[0].label, "Apr 2005");
}
