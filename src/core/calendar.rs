//! UTC calendar arithmetic shared by every positioning path.
//!
//! Fractional years are computed from exact millisecond offsets so month and
//! year lengths (leap years, 28–31 day months) are respected. Tick walks use
//! calendar increments, never fixed-millisecond stepping across months.

use std::cmp::Ordering;

use chrono::{DateTime, Datelike, Days, Months, NaiveDate, Timelike, Utc};
use serde::{Deserialize, Serialize};

use crate::core::types::{TimeUnit, WeekStart};
use crate::error::{TimelineError, TimelineResult};

pub const MS_PER_MINUTE: i64 = 60_000;
pub const MS_PER_HOUR: i64 = 60 * MS_PER_MINUTE;
pub const MS_PER_DAY: i64 = 24 * MS_PER_HOUR;

const MINUTES_PER_DAY: u64 = 24 * 60;
// Keeps `year + fraction` strictly below the next year.
const MAX_YEAR_FRACTION: f64 = 0.999_999_999;

#[must_use]
pub fn is_leap_year(year: i32) -> bool {
    (year % 4 == 0 && year % 100 != 0) || year % 400 == 0
}

/// Days in `month` of `year`; the month is clamped into `1..=12`.
#[must_use]
pub fn days_in_month(year: i32, month: u32) -> u32 {
    match month.clamp(1, 12) {
        2 if is_leap_year(year) => 29,
        2 => 28,
        4 | 6 | 9 | 11 => 30,
        _ => 31,
    }
}

/// Calendar point with graduated precision.
///
/// Missing trailing fields mean "start of that unit" for ordering and
/// positioning; they stay `None` so formatting can render only what was given.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PartialDate {
    pub year: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub month: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub day: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hour: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub minute: Option<u32>,
}

/// Fully populated calendar point produced by [`PartialDate::normalize`].
///
/// Field order makes the derived `Ord` chronological.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NormalizedDate {
    pub year: i32,
    pub month: u32,
    pub day: u32,
    pub hour: u32,
    pub minute: u32,
}

impl PartialDate {
    #[must_use]
    pub fn year(year: i32) -> Self {
        Self {
            year,
            month: None,
            day: None,
            hour: None,
            minute: None,
        }
    }

    #[must_use]
    pub fn ymd(year: i32, month: u32, day: u32) -> Self {
        Self::year(year).with_month(month).with_day(day)
    }

    #[must_use]
    pub fn with_month(mut self, month: u32) -> Self {
        self.month = Some(month);
        self
    }

    #[must_use]
    pub fn with_day(mut self, day: u32) -> Self {
        self.day = Some(day);
        self
    }

    #[must_use]
    pub fn with_hour(mut self, hour: u32) -> Self {
        self.hour = Some(hour);
        self
    }

    #[must_use]
    pub fn with_minute(mut self, minute: u32) -> Self {
        self.minute = Some(minute);
        self
    }

    /// Single source of truth for missing-field defaults.
    #[must_use]
    pub fn normalize(self) -> NormalizedDate {
        let month = self.month.unwrap_or(1).clamp(1, 12);
        let day = self
            .day
            .unwrap_or(1)
            .clamp(1, days_in_month(self.year, month));
        NormalizedDate {
            year: self.year,
            month,
            day,
            hour: self.hour.unwrap_or(0).min(23),
            minute: self.minute.unwrap_or(0).min(59),
        }
    }

    /// Fractional year, or `None` when the year cannot be represented.
    #[must_use]
    pub fn to_year_fraction(self) -> Option<f64> {
        self.normalize().to_year_fraction()
    }

    /// Grouping key for identical timestamps, e.g. `2005|1|1|0|0`.
    #[must_use]
    pub fn timestamp_key(self) -> String {
        self.normalize().timestamp_key()
    }

    /// Strict calendar validation for hosts that accept user input.
    ///
    /// The positioning core itself never calls this; it normalizes instead.
    pub fn validate(self, min_year: i32, max_year: i32) -> TimelineResult<()> {
        if self.year < min_year || self.year > max_year {
            return Err(TimelineError::InvalidDate {
                field: "year",
                value: i64::from(self.year),
            });
        }
        if let Some(month) = self.month {
            if !(1..=12).contains(&month) {
                return Err(TimelineError::InvalidDate {
                    field: "month",
                    value: i64::from(month),
                });
            }
            if let Some(day) = self.day {
                if day < 1 || day > days_in_month(self.year, month) {
                    return Err(TimelineError::InvalidDate {
                        field: "day",
                        value: i64::from(day),
                    });
                }
            }
        }
        if let Some(hour) = self.hour.filter(|hour| *hour > 23) {
            return Err(TimelineError::InvalidDate {
                field: "hour",
                value: i64::from(hour),
            });
        }
        if let Some(minute) = self.minute.filter(|minute| *minute > 59) {
            return Err(TimelineError::InvalidDate {
                field: "minute",
                value: i64::from(minute),
            });
        }
        Ok(())
    }
}

impl NormalizedDate {
    #[must_use]
    pub fn timestamp_key(self) -> String {
        format!(
            "{}|{}|{}|{}|{}",
            self.year, self.month, self.day, self.hour, self.minute
        )
    }

    #[must_use]
    pub fn to_datetime(self) -> Option<DateTime<Utc>> {
        NaiveDate::from_ymd_opt(self.year, self.month, self.day)?
            .and_hms_opt(self.hour, self.minute, 0)
            .map(|naive| naive.and_utc())
    }

    #[must_use]
    pub fn to_year_fraction(self) -> Option<f64> {
        let (base, next) = year_bounds_ms(self.year)?;
        let t = self.to_datetime()?.timestamp_millis();
        let fraction = (t - base) as f64 / (next - base) as f64;
        Some(f64::from(self.year) + fraction.clamp(0.0, MAX_YEAR_FRACTION))
    }
}

/// Orders partial dates by their normalized calendar fields.
#[must_use]
pub fn compare_partial_dates(a: &PartialDate, b: &PartialDate) -> Ordering {
    a.normalize().cmp(&b.normalize())
}

/// Renders only the provided parts: `2020`, `2020-05`, `2020-05-03`,
/// `2020-05-03 09:00`, `2020-05-03 09:07`.
#[must_use]
pub fn format_partial_date(date: &PartialDate) -> String {
    let mut out = date.year.to_string();
    if let Some(month) = date.month {
        out.push_str(&format!("-{month:02}"));
        if let Some(day) = date.day {
            out.push_str(&format!("-{day:02}"));
        }
    }
    if date.hour.is_some() || date.minute.is_some() {
        out.push_str(&format!(
            " {:02}:{:02}",
            date.hour.unwrap_or(0),
            date.minute.unwrap_or(0)
        ));
    }
    out
}

fn year_start_ms(year: i32) -> Option<i64> {
    NaiveDate::from_ymd_opt(year, 1, 1)?
        .and_hms_opt(0, 0, 0)
        .map(|naive| naive.and_utc().timestamp_millis())
}

fn year_bounds_ms(year: i32) -> Option<(i64, i64)> {
    let base = year_start_ms(year)?;
    let next = year_start_ms(year.checked_add(1)?)?;
    Some((base, next))
}

#[must_use]
pub fn datetime_to_year_fraction(time: DateTime<Utc>) -> Option<f64> {
    let year = time.year();
    let (base, next) = year_bounds_ms(year)?;
    let fraction = (time.timestamp_millis() - base) as f64 / (next - base) as f64;
    Some(f64::from(year) + fraction.clamp(0.0, MAX_YEAR_FRACTION))
}

/// Inverse of [`datetime_to_year_fraction`], rounded to the millisecond.
#[must_use]
pub fn year_fraction_to_datetime(yf: f64) -> Option<DateTime<Utc>> {
    if !yf.is_finite() {
        return None;
    }
    let year_floor = yf.floor();
    if year_floor < f64::from(i32::MIN) || year_floor > f64::from(i32::MAX) {
        return None;
    }
    let year = year_floor as i32;
    let (base, next) = year_bounds_ms(year)?;
    let offset = ((yf - year_floor) * (next - base) as f64).round() as i64;
    DateTime::<Utc>::from_timestamp_millis(base + offset)
}

/// Truncates `time` to the start of the enclosing `unit`.
#[must_use]
pub fn align_to_unit_start(
    time: DateTime<Utc>,
    unit: TimeUnit,
    week_start: WeekStart,
) -> Option<DateTime<Utc>> {
    let date = time.date_naive();
    let (date, hour, minute) = match unit {
        TimeUnit::Year => (NaiveDate::from_ymd_opt(date.year(), 1, 1)?, 0, 0),
        TimeUnit::Month => (NaiveDate::from_ymd_opt(date.year(), date.month(), 1)?, 0, 0),
        TimeUnit::Week => {
            let back = match week_start {
                WeekStart::Monday => date.weekday().num_days_from_monday(),
                WeekStart::Sunday => date.weekday().num_days_from_sunday(),
            };
            (date.checked_sub_days(Days::new(u64::from(back)))?, 0, 0)
        }
        TimeUnit::Day => (date, 0, 0),
        TimeUnit::Hour => (date, time.hour(), 0),
        TimeUnit::Minute => (date, time.hour(), time.minute()),
    };
    date.and_hms_opt(hour, minute, 0).map(|naive| naive.and_utc())
}

/// Advances `time` by `step` calendar units.
///
/// Hours and minutes carry into the date explicitly so day boundaries are
/// crossed through calendar arithmetic as well.
#[must_use]
pub fn next_tick(time: DateTime<Utc>, unit: TimeUnit, step: u32) -> Option<DateTime<Utc>> {
    let step = step.max(1);
    let naive = time.naive_utc();
    let next = match unit {
        TimeUnit::Year => naive.checked_add_months(Months::new(step.checked_mul(12)?))?,
        TimeUnit::Month => naive.checked_add_months(Months::new(step))?,
        TimeUnit::Week => naive.checked_add_days(Days::new(7 * u64::from(step)))?,
        TimeUnit::Day => naive.checked_add_days(Days::new(u64::from(step)))?,
        TimeUnit::Hour => return add_minutes_with_carry(time, 60 * u64::from(step)),
        TimeUnit::Minute => return add_minutes_with_carry(time, u64::from(step)),
    };
    Some(next.and_utc())
}

fn add_minutes_with_carry(time: DateTime<Utc>, minutes: u64) -> Option<DateTime<Utc>> {
    let minute_of_day = u64::from(time.hour() * 60 + time.minute()) + minutes;
    let carry_days = minute_of_day / MINUTES_PER_DAY;
    let remainder = (minute_of_day % MINUTES_PER_DAY) as u32;
    time.date_naive()
        .checked_add_days(Days::new(carry_days))?
        .and_hms_opt(remainder / 60, remainder % 60, time.second())
        .map(|naive| naive.and_utc())
}

/// Absolute index of an aligned tick at `step`, independent of any viewport.
///
/// Day, hour and minute indexes are `floor((t - epoch) / (unit_ms * step))`.
#[must_use]
pub fn unit_index(time: DateTime<Utc>, unit: TimeUnit, step: u32) -> i64 {
    let step = i64::from(step.max(1));
    let millis = time.timestamp_millis();
    match unit {
        TimeUnit::Year => i64::from(time.year()).div_euclid(step),
        TimeUnit::Month => {
            (i64::from(time.year()) * 12 + i64::from(time.month0())).div_euclid(step)
        }
        TimeUnit::Week => millis.div_euclid(MS_PER_DAY * 7 * step),
        TimeUnit::Day => millis.div_euclid(MS_PER_DAY * step),
        TimeUnit::Hour => millis.div_euclid(MS_PER_HOUR * step),
        TimeUnit::Minute => millis.div_euclid(MS_PER_MINUTE * step),
    }
}
