use approx::assert_abs_diff_eq;
use timeline_rs::api::{EventLayoutConfig, StackSide, layout_events};
use timeline_rs::core::{Domain, EventType, PartialDate, TimelineEvent, Viewport};

fn domain() -> Domain {
    Domain::new(2000.0, 2010.0).expect("domain")
}

fn event_at(id: &str, date: PartialDate) -> TimelineEvent {
    TimelineEvent::new(id, id).with_start(date)
}

#[test]
fn domain_midpoint_projects_to_screen_center() {
    let events = vec![event_at("mid", PartialDate::year(2005))];
    let layout = layout_events(
        &events,
        domain(),
        Viewport::default(),
        &EventLayoutConfig::default(),
    );

    assert_eq!(layout.events.len(), 1);
    let event = &layout.events[0];
    assert_abs_diff_eq!(event.screen_fraction, 0.5, epsilon = 1e-12);
    assert!(event.in_view);
    assert!(!event.out_of_domain);
    assert_eq!(event.overflow_count, None);
}

#[test]
fn identical_timestamps_stack_on_opposite_sides() {
    let date = PartialDate::ymd(2005, 1, 1);
    let events = vec![event_at("a", date), event_at("b", date)];
    let layout = layout_events(
        &events,
        domain(),
        Viewport::default(),
        &EventLayoutConfig::default(),
    );

    let [first, second] = layout.events.as_slice() else {
        panic!("expected two positioned events");
    };
    assert_eq!(first.group_key, "2005|1|1|0|0");
    assert_eq!(first.group_key, second.group_key);
    assert_eq!((first.side, first.level), (StackSide::Above, 0));
    assert_eq!((second.side, second.level), (StackSide::Below, 0));
}

#[test]
fn overfull_group_folds_the_remainder_into_an_overflow() {
    let date = PartialDate::ymd(2005, 1, 1);
    let events: Vec<_> = (0..5)
        .map(|index| event_at(&format!("e{index}"), date))
        .collect();
    let config = EventLayoutConfig::default().with_max_per_group(4);
    let layout = layout_events(&events, domain(), Viewport::default(), &config);

    assert_eq!(layout.events.len(), 4);
    assert_eq!(layout.events[0].overflow_count, Some(1));
    assert!(layout.events[1..].iter().all(|event| event.overflow_count.is_none()));
    assert_eq!(layout.overflows.len(), 1);
    assert_eq!(layout.overflows[0].hidden_count, 1);
    assert_eq!(layout.overflows[0].hidden_event_ids, vec!["e4".to_owned()]);
    assert_eq!(layout.accounted_event_count(), 5);
}

#[test]
fn stack_slots_alternate_sides_then_climb_levels() {
    let date = PartialDate::ymd(2005, 6, 1);
    let events: Vec<_> = (0..6)
        .map(|index| event_at(&format!("e{index}"), date))
        .collect();
    let config = EventLayoutConfig::default().with_max_per_group(8);
    let layout = layout_events(&events, domain(), Viewport::default(), &config);

    let slots: Vec<(StackSide, u8)> = layout
        .events
        .iter()
        .map(|event| (event.side, event.level))
        .collect();
    assert_eq!(
        slots,
        vec![
            (StackSide::Above, 0),
            (StackSide::Below, 0),
            (StackSide::Above, 1),
            (StackSide::Below, 1),
            (StackSide::Above, 2),
            (StackSide::Below, 2),
        ]
    );
}

#[test]
fn nearby_events_join_the_anchor_group() {
    // 0.5% of the screen at scale 1 over ten years is about 18 days.
    let events = vec![
        event_at("a", PartialDate::ymd(2005, 1, 1)),
        event_at("b", PartialDate::ymd(2005, 1, 10)),
        event_at("c", PartialDate::ymd(2005, 3, 1)),
    ];
    let layout = layout_events(
        &events,
        domain(),
        Viewport::default(),
        &EventLayoutConfig::default(),
    );

    assert_eq!(layout.events[0].group_key, layout.events[1].group_key);
    assert_eq!(layout.events[1].side, StackSide::Below);
    assert_ne!(layout.events[2].group_key, layout.events[0].group_key);
    assert_eq!(layout.events[2].side, StackSide::Above);
}

#[test]
fn output_is_chronological_with_input_order_breaking_ties() {
    let events = vec![
        event_at("late", PartialDate::year(2008)),
        event_at("tie-first", PartialDate::year(2003)),
        event_at("early", PartialDate::ymd(2001, 2, 3)),
        event_at("tie-second", PartialDate::ymd(2003, 1, 1)),
    ];
    let config = EventLayoutConfig::default().with_group_epsilon_pct(0.0);
    let layout = layout_events(&events, domain(), Viewport::default(), &config);

    let ids: Vec<&str> = layout
        .events
        .iter()
        .map(|event| event.event_id.as_str())
        .collect();
    assert_eq!(ids, vec!["early", "tie-first", "tie-second", "late"]);
    assert_eq!(layout.events[1].event_index, 1);
}

#[test]
fn undated_and_unrepresentable_events_are_reported_not_positioned() {
    let events = vec![
        TimelineEvent::new("no-start", "Someday").with_type(EventType::Personal),
        event_at("far-future", PartialDate::year(300_000)),
        event_at("dated", PartialDate::year(2004)),
    ];
    let layout = layout_events(
        &events,
        domain(),
        Viewport::default(),
        &EventLayoutConfig::default(),
    );

    assert_eq!(
        layout.undated_event_ids,
        vec!["no-start".to_owned(), "far-future".to_owned()]
    );
    assert_eq!(layout.events.len(), 1);
    assert_eq!(layout.accounted_event_count(), events.len());
}

#[test]
fn out_of_domain_events_are_flagged_and_clamped() {
    let events = vec![event_at("old", PartialDate::year(1990))];
    let layout = layout_events(
        &events,
        domain(),
        Viewport::default(),
        &EventLayoutConfig::default(),
    );

    let event = &layout.events[0];
    assert!(event.out_of_domain);
    assert!(!event.in_view);
    assert!(event.raw_fraction < 0.0);
    assert_eq!(event.screen_fraction, 0.0);
}

#[test]
fn events_clamped_to_the_same_edge_stack_instead_of_overlapping() {
    let events = vec![
        event_at("edge", PartialDate::year(2002)),
        event_at("beyond", PartialDate::year(2003)),
        event_at("far", PartialDate::year(2004)),
    ];
    let layout = layout_events(
        &events,
        domain(),
        Viewport::new(5.0, 2.0),
        &EventLayoutConfig::default(),
    );

    assert_eq!(layout.events.len(), 3);
    for event in &layout.events {
        assert_abs_diff_eq!(event.screen_fraction, 1.0, epsilon = 1e-9);
        assert_eq!(event.group_key, layout.events[0].group_key);
    }
    let slots: Vec<(StackSide, u8)> = layout
        .events
        .iter()
        .map(|event| (event.side, event.level))
        .collect();
    assert_eq!(
        slots,
        vec![
            (StackSide::Above, 0),
            (StackSide::Below, 0),
            (StackSide::Above, 1),
        ]
    );
    assert!(layout.events[1..].iter().all(|event| !event.in_view));
}

#[test]
fn ranged_events_carry_their_end_position() {
    let events = vec![
        event_at("range", PartialDate::year(2002)).with_end(PartialDate::year(2004)),
    ];
    let layout = layout_events(
        &events,
        domain(),
        Viewport::default(),
        &EventLayoutConfig::default(),
    );

    let event = &layout.events[0];
    assert_eq!(event.end_yf, Some(2004.0));
    assert_abs_diff_eq!(
        event.end_screen_fraction.expect("end fraction"),
        0.4,
        epsilon = 1e-12
    );
}

#[test]
fn dense_runs_cluster_when_zoomed_out() {
    let mut events: Vec<_> = (0..30)
        .map(|index| event_at(&format!("dense{index}"), PartialDate::year(2005)))
        .collect();
    events.push(event_at("lonely", PartialDate::year(2009)));

    let layout = layout_events(
        &events,
        domain(),
        Viewport::new(0.5, 0.0),
        &EventLayoutConfig::default(),
    );

    assert!(layout.clustering_active);
    assert_eq!(layout.clusters.len(), 1);
    assert_eq!(layout.clusters[0].count, 30);
    assert_abs_diff_eq!(layout.clusters[0].screen_fraction, 0.5, epsilon = 0.01);
    assert_eq!(layout.events.len(), 1);
    assert_eq!(layout.events[0].event_id, "lonely");
    assert!(layout.events[0].clustered);
    assert_eq!(layout.accounted_event_count(), events.len());
}

#[test]
fn clustering_stays_off_at_the_threshold_scale() {
    let events: Vec<_> = (0..30)
        .map(|index| event_at(&format!("dense{index}"), PartialDate::year(2005)))
        .collect();
    let layout = layout_events(
        &events,
        domain(),
        Viewport::default(),
        &EventLayoutConfig::default(),
    );

    assert!(!layout.clustering_active);
    assert!(layout.clusters.is_empty());
    assert!(layout.events.iter().all(|event| !event.clustered));
    assert_eq!(layout.accounted_event_count(), events.len());
}

#[test]
fn clustering_needs_enough_dated_events() {
    let mut events: Vec<_> = (0..23)
        .map(|index| event_at(&format!("dense{index}"), PartialDate::year(2005)))
        .collect();
    events.push(TimelineEvent::new("undated", "Undated"));

    let layout = layout_events(
        &events,
        domain(),
        Viewport::new(0.5, 0.0),
        &EventLayoutConfig::default(),
    );
    assert!(!layout.clustering_active);
}
