use approx::assert_abs_diff_eq;
use timeline_rs::core::{
    Domain, EventType, LinearScale, PartialDate, TimelineEvent, Viewport, VisibleRange,
    ZoomTuning, adaptive_scale_bounds, clamp_pan,
};

#[test]
fn linear_scale_maps_domain_onto_unit_interval() {
    let scale = LinearScale::new(2000.0, 2010.0);
    assert_eq!(scale.to_unit(2000.0), 0.0);
    assert_eq!(scale.to_unit(2005.0), 0.5);
    assert_eq!(scale.to_unit(2010.0), 1.0);
    assert_eq!(scale.from_unit(0.25), 2002.5);
}

#[test]
fn linear_scale_widens_degenerate_spans() {
    let scale = LinearScale::new(2000.0, 2000.0);
    assert_eq!(scale.span(), 1.0);
    assert_eq!(scale.to_unit(2000.5), 0.5);
}

#[test]
fn domain_rejects_non_finite_bounds() {
    assert!(Domain::new(f64::NAN, 2000.0).is_err());
    assert!(Domain::new(1990.0, f64::INFINITY).is_err());
}

#[test]
fn domain_swaps_reversed_bounds_and_widens_short_spans() {
    let domain = Domain::new(2010.0, 2000.0).expect("domain");
    assert_eq!((domain.min_year(), domain.max_year()), (2000.0, 2010.0));

    let short = Domain::new(2000.0, 2000.25).expect("domain");
    assert_eq!(short.max_year(), 2001.0);
    assert_eq!(short.span(), 1.0);
}

#[test]
fn deserialized_domains_are_normalized_like_constructed_ones() {
    let reversed: Domain =
        serde_json::from_str(r#"{ "min_year": 2010.0, "max_year": 2000.0 }"#).expect("domain");
    assert_eq!(reversed, Domain::new(2000.0, 2010.0).expect("domain"));

    let short: Domain =
        serde_json::from_str(r#"{ "min_year": 2000.0, "max_year": 2000.5 }"#).expect("domain");
    assert_eq!(short.max_year(), 2001.0);

    let missing = serde_json::from_str::<Domain>(r#"{ "min_year": 2000.0 }"#);
    assert!(missing.is_err());
}

#[test]
fn fit_events_pads_whole_year_extents() {
    let events = vec![
        TimelineEvent::new("a", "A").with_start(PartialDate::ymd(1995, 6, 1)),
        TimelineEvent::new("b", "B")
            .with_start(PartialDate::year(2000))
            .with_end(PartialDate::year(2015)),
        TimelineEvent::new("c", "Undated").with_type(EventType::Personal),
    ];
    let domain = Domain::fit_events(&events, 0.1, Domain::default());
    // Span 20 years, pad round(2.0) = 2.
    assert_eq!((domain.min_year(), domain.max_year()), (1993.0, 2017.0));
}

#[test]
fn fit_events_uses_at_least_one_year_of_padding() {
    let events = vec![TimelineEvent::new("a", "A").with_start(PartialDate::year(2005))];
    let domain = Domain::fit_events(&events, 0.1, Domain::default());
    assert_eq!((domain.min_year(), domain.max_year()), (2004.0, 2006.0));
}

#[test]
fn fit_events_falls_back_without_dated_events() {
    let events = vec![TimelineEvent::new("a", "A")];
    let domain = Domain::fit_events(&events, 0.1, Domain::default());
    assert_eq!((domain.min_year(), domain.max_year()), (1990.0, 2030.0));
}

#[test]
fn adaptive_bounds_reach_one_hour_visible_span() {
    let domain = Domain::new(2000.0, 2010.0).expect("domain");
    let bounds = adaptive_scale_bounds(domain, &ZoomTuning::default());
    assert_abs_diff_eq!(bounds.max, 87_600.0, epsilon = 1e-6);
    assert_eq!(bounds.min, 0.5);
}

#[test]
fn adaptive_bounds_respect_the_hard_cap() {
    let domain = Domain::new(-100_000.0, 100_000.0).expect("domain");
    let bounds = adaptive_scale_bounds(domain, &ZoomTuning::default());
    assert_eq!(bounds.max, 1_000_000.0);
}

#[test]
fn clamped_viewport_replaces_non_finite_scale() {
    let domain = Domain::new(2000.0, 2010.0).expect("domain");
    let bounds = adaptive_scale_bounds(domain, &ZoomTuning::default());
    let viewport = Viewport::new(f64::NAN, 3.0).clamped(bounds);
    assert_eq!(viewport, Viewport::new(1.0, 0.0));

    let zoomed_out = Viewport::new(0.01, 0.2).clamped(bounds);
    assert_eq!(zoomed_out, Viewport::new(0.5, 0.0));
}

#[test]
fn pan_is_bounded_so_content_covers_the_screen() {
    assert_eq!(clamp_pan(10.0, 3.0), 1.0);
    assert_eq!(clamp_pan(-10.0, 3.0), -1.0);
    assert_eq!(clamp_pan(0.3, 3.0), 0.3);
    assert_eq!(clamp_pan(0.3, 1.0), 0.0);
}

#[test]
fn screen_fraction_scales_about_center_then_pans() {
    let scale = LinearScale::new(2000.0, 2010.0);
    let viewport = Viewport::new(2.0, 0.25);
    assert_abs_diff_eq!(viewport.screen_fraction(2005.0, scale), 0.75, epsilon = 1e-12);
    assert_abs_diff_eq!(viewport.screen_fraction(2007.5, scale), 1.25, epsilon = 1e-12);
    assert_abs_diff_eq!(viewport.unit_at_screen_fraction(0.75), 0.5, epsilon = 1e-12);
}

#[test]
fn zoom_about_keeps_anchor_instant_fixed() {
    let domain = Domain::new(2000.0, 2010.0).expect("domain");
    let bounds = adaptive_scale_bounds(domain, &ZoomTuning::default());
    let viewport = Viewport::new(2.0, 0.1);
    let anchor = 0.3;
    let before = viewport.unit_at_screen_fraction(anchor);
    let zoomed = viewport.zoom_about(1.5, anchor, bounds);
    assert_abs_diff_eq!(zoomed.scale, 3.0, epsilon = 1e-12);
    assert_abs_diff_eq!(zoomed.unit_at_screen_fraction(anchor), before, epsilon = 1e-12);
}

#[test]
fn visible_range_is_clamped_to_domain_and_padded_symmetrically() {
    let scale = LinearScale::new(2000.0, 2010.0);
    let zoomed_out = VisibleRange::of(Viewport::new(0.5, 0.0), scale);
    assert_eq!((zoomed_out.start, zoomed_out.end), (2000.0, 2010.0));

    let zoomed_in = VisibleRange::of(Viewport::new(2.0, 0.0), scale);
    assert_abs_diff_eq!(zoomed_in.start, 2002.5, epsilon = 1e-9);
    assert_abs_diff_eq!(zoomed_in.end, 2007.5, epsilon = 1e-9);

    let padded = zoomed_in.padded(0.05);
    assert_abs_diff_eq!(padded.start, 2002.25, epsilon = 1e-9);
    assert_abs_diff_eq!(padded.end, 2007.75, epsilon = 1e-9);
}
