use timeline_rs::api::{
    AxisConfig, DAYS_PER_YEAR, GranularityPlan, HOURS_PER_YEAR, plan_for_span,
    plan_with_hysteresis,
};
use timeline_rs::core::{Domain, TimeUnit};

fn plan(unit: TimeUnit, step: u32) -> GranularityPlan {
    GranularityPlan { unit, step }
}

#[test]
fn ladder_selects_unit_and_step_by_visible_span() {
    let config = AxisConfig::default();
    let cases = [
        (10.0, plan(TimeUnit::Year, 1)),
        (40.0, plan(TimeUnit::Year, 5)),
        (300.0, plan(TimeUnit::Year, 25)),
        (3.0, plan(TimeUnit::Month, 3)),
        (2.5, plan(TimeUnit::Month, 3)),
        (1.0, plan(TimeUnit::Month, 1)),
        (0.3, plan(TimeUnit::Week, 1)),
        (0.05, plan(TimeUnit::Day, 1)),
        (3.0 / DAYS_PER_YEAR, plan(TimeUnit::Hour, 6)),
        (0.5 / DAYS_PER_YEAR, plan(TimeUnit::Hour, 1)),
        (2.0 / HOURS_PER_YEAR, plan(TimeUnit::Minute, 15)),
    ];
    for (span, expected) in cases {
        assert_eq!(plan_for_span(span, &config), expected, "span {span}");
    }
}

#[test]
fn canonical_base_drives_sub_unit_steps() {
    let config = AxisConfig::default().with_canonical_base(2);
    assert_eq!(plan_for_span(2.5, &config), plan(TimeUnit::Month, 6));
    assert_eq!(
        plan_for_span(3.0 / DAYS_PER_YEAR, &config),
        plan(TimeUnit::Hour, 12)
    );
    assert_eq!(
        plan_for_span(2.0 / HOURS_PER_YEAR, &config),
        plan(TimeUnit::Minute, 30)
    );
}

#[test]
fn non_finite_span_falls_back_to_the_coarsest_plan() {
    let planned = plan_for_span(f64::NAN, &AxisConfig::default());
    assert_eq!(planned.unit, TimeUnit::Year);
    assert!(planned.step >= 1);
}

#[test]
fn first_plan_commits_without_memo() {
    let domain = Domain::new(2000.0, 2010.0).expect("domain");
    let (planned, memo) = plan_with_hysteresis(domain, 1.0, &AxisConfig::default(), None);
    assert_eq!(planned, plan(TimeUnit::Year, 1));
    assert_eq!(memo.plan, planned);
    assert_eq!(memo.scale, 1.0);
}

#[test]
fn small_scale_change_across_a_boundary_holds_the_unit() {
    let domain = Domain::new(2000.0, 2010.0).expect("domain");
    let config = AxisConfig::default();

    // Span 3.03 years: still yearly.
    let (_, memo) = plan_with_hysteresis(domain, 3.30, &config, None);
    assert_eq!(memo.plan.unit, TimeUnit::Year);

    // Span 2.94 years would be monthly, but the change is under 8%.
    let (held, held_memo) = plan_with_hysteresis(domain, 3.40, &config, Some(memo));
    assert_eq!(held.unit, TimeUnit::Year);
    assert_eq!(held_memo, memo);

    let (switched, switched_memo) = plan_with_hysteresis(domain, 4.0, &config, Some(held_memo));
    assert_eq!(switched, plan(TimeUnit::Month, 3));
    assert_eq!(switched_memo.scale, 4.0);
}

#[test]
fn slow_zoom_eventually_switches_units() {
    let domain = Domain::new(2000.0, 2010.0).expect("domain");
    let config = AxisConfig::default();
    let mut scale = 3.30;
    let (_, mut memo) = plan_with_hysteresis(domain, scale, &config, None);

    let mut switched_at = None;
    for _ in 0..40 {
        scale *= 1.01;
        let (planned, next) = plan_with_hysteresis(domain, scale, &config, Some(memo));
        memo = next;
        if planned.unit == TimeUnit::Month {
            switched_at = Some(scale);
            break;
        }
    }

    let switched_at = switched_at.expect("slow zoom must switch to months");
    assert!(switched_at < (10.0 / 3.0) * 1.08 * 1.02);
}

#[test]
fn same_unit_step_changes_are_never_held() {
    let domain = Domain::new(0.0, 1000.0).expect("domain");
    let config = AxisConfig::default();
    let (first, memo) = plan_with_hysteresis(domain, 1.0, &config, None);
    let (second, _) = plan_with_hysteresis(domain, 1.05, &config, Some(memo));
    assert_eq!(first.unit, TimeUnit::Year);
    assert_eq!(second.unit, TimeUnit::Year);
    assert_eq!(second, plan_for_span(1000.0 / 1.05, &config));
}
