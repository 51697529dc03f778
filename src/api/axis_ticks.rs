use chrono::{DateTime, Datelike, NaiveDate, Timelike, Utc};
use serde::{Deserialize, Serialize};
use tracing::{trace, warn};

use crate::core::calendar::{align_to_unit_start, next_tick, unit_index};
use crate::core::{
    Tick, TimeUnit, VisibleRange, WeekStart, datetime_to_year_fraction, year_fraction_to_datetime,
};

use super::axis_config::AxisConfig;
use super::axis_label_format::{format_marker_label, format_span_label};
use super::granularity_planner::GranularityPlan;

/// Ticks generated for one track, with a flag set when a safety cap cut the
/// walk short.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TickTrack {
    pub ticks: Vec<Tick>,
    pub truncated: bool,
}

/// Fine ticks at the plan's unit and step across `range`.
#[must_use]
pub fn build_spans(plan: GranularityPlan, range: VisibleRange, config: &AxisConfig) -> TickTrack {
    let cap = tick_cap(plan.unit, config);
    walk_calendar(
        plan.unit,
        plan.step,
        range,
        config.week_start,
        cap,
        format_span_label,
    )
}

/// Coarse context ticks for the plan: one per enclosing marker unit.
///
/// Year plans mark the same multiples the spans use.
#[must_use]
pub fn build_markers(plan: GranularityPlan, range: VisibleRange, config: &AxisConfig) -> TickTrack {
    let unit = plan.unit.marker_unit();
    let step = if plan.unit == TimeUnit::Year {
        plan.step
    } else {
        1
    };
    walk_calendar(
        unit,
        step,
        range,
        config.week_start,
        config.max_day_ticks,
        format_marker_label,
    )
}

fn tick_cap(unit: TimeUnit, config: &AxisConfig) -> usize {
    match unit {
        TimeUnit::Minute => config.max_minute_ticks,
        TimeUnit::Hour => config.max_hour_ticks,
        TimeUnit::Day | TimeUnit::Week | TimeUnit::Month | TimeUnit::Year => {
            config.max_day_ticks
        }
    }
}

fn walk_calendar(
    unit: TimeUnit,
    step: u32,
    range: VisibleRange,
    week_start: WeekStart,
    cap: usize,
    label: fn(DateTime<Utc>, TimeUnit) -> String,
) -> TickTrack {
    let mut track = TickTrack::default();
    if !range.start.is_finite() || !range.end.is_finite() || range.end < range.start {
        warn!(
            start = range.start,
            end = range.end,
            "skipping tick walk over invalid range"
        );
        return track;
    }

    let Some(mut cursor) = year_fraction_to_datetime(range.start)
        .and_then(|time| aligned_start(time, unit, step, week_start))
    else {
        warn!(
            start = range.start,
            end = range.end,
            unit = unit.as_str(),
            "skipping tick walk outside the representable calendar"
        );
        return track;
    };

    loop {
        let Some(yf) = datetime_to_year_fraction(cursor) else {
            break;
        };
        if yf > range.end {
            break;
        }
        if yf >= range.start {
            if track.ticks.len() >= cap {
                track.truncated = true;
                warn!(unit = unit.as_str(), step, cap, "tick generation hit safety cap");
                break;
            }
            track.ticks.push(Tick {
                yf,
                label: label(cursor, unit),
                unit,
                major: is_major(cursor, unit),
                index: unit_index(cursor, unit, step),
            });
        }
        let Some(next) = next_tick(cursor, unit, step) else {
            break;
        };
        cursor = next;
    }

    trace!(
        unit = unit.as_str(),
        step,
        count = track.ticks.len(),
        "tick track generated"
    );
    track
}

/// Aligns to the unit start, then back to the previous multiple of `step`
/// within the enclosing calendar unit so ticks land on stable boundaries.
fn aligned_start(
    time: DateTime<Utc>,
    unit: TimeUnit,
    step: u32,
    week_start: WeekStart,
) -> Option<DateTime<Utc>> {
    let start = align_to_unit_start(time, unit, week_start)?;
    let step = step.max(1);
    let date = start.date_naive();
    match unit {
        TimeUnit::Year => {
            let year = date.year() - date.year().rem_euclid(i32::try_from(step).ok()?);
            Some(NaiveDate::from_ymd_opt(year, 1, 1)?.and_hms_opt(0, 0, 0)?.and_utc())
        }
        TimeUnit::Month => {
            let month0 = date.month0() - date.month0() % step;
            Some(
                NaiveDate::from_ymd_opt(date.year(), month0 + 1, 1)?
                    .and_hms_opt(0, 0, 0)?
                    .and_utc(),
            )
        }
        TimeUnit::Hour => {
            let hour = start.hour() - start.hour() % step;
            Some(date.and_hms_opt(hour, 0, 0)?.and_utc())
        }
        TimeUnit::Minute => {
            let minute = start.minute() - start.minute() % step;
            Some(date.and_hms_opt(start.hour(), minute, 0)?.and_utc())
        }
        TimeUnit::Week | TimeUnit::Day => Some(start),
    }
}

fn is_major(time: DateTime<Utc>, unit: TimeUnit) -> bool {
    match unit {
        TimeUnit::Year => true,
        TimeUnit::Month => time.month() == 1,
        TimeUnit::Week => time.day() <= 7,
        TimeUnit::Day => time.day() == 1,
        TimeUnit::Hour => time.hour() == 0,
        TimeUnit::Minute => time.hour() == 0 && time.minute() == 0,
    }
}
