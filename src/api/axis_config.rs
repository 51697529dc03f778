use serde::{Deserialize, Serialize};

use crate::core::WeekStart;
use crate::error::{TimelineError, TimelineResult};

/// Visible-span thresholds of the granularity ladder.
///
/// Each field is the inclusive upper bound for the named unit; spans above
/// `month_upper_years` tick in years.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GranularityThresholds {
    pub minute_upper_hours: f64,
    pub hour_upper_days: f64,
    pub day_upper_years: f64,
    pub week_upper_years: f64,
    pub month_upper_years: f64,
    /// Hour ticks use step 1 at or below this many days.
    pub fine_hour_upper_days: f64,
    /// Month ticks use step 1 at or below this many years.
    pub fine_month_upper_years: f64,
}

impl Default for GranularityThresholds {
    fn default() -> Self {
        Self {
            minute_upper_hours: 6.0,
            hour_upper_days: 7.0,
            day_upper_years: 0.08,
            week_upper_years: 0.5,
            month_upper_years: 3.0,
            fine_hour_upper_days: 1.0,
            fine_month_upper_years: 1.5,
        }
    }
}

impl GranularityThresholds {
    fn validate(self) -> TimelineResult<()> {
        for (value, name) in [
            (self.minute_upper_hours, "minute_upper_hours"),
            (self.hour_upper_days, "hour_upper_days"),
            (self.day_upper_years, "day_upper_years"),
            (self.week_upper_years, "week_upper_years"),
            (self.month_upper_years, "month_upper_years"),
            (self.fine_hour_upper_days, "fine_hour_upper_days"),
            (self.fine_month_upper_years, "fine_month_upper_years"),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(TimelineError::InvalidConfig(format!(
                    "granularity threshold `{name}` must be finite and > 0"
                )));
            }
        }

        let ladder_years = [
            self.minute_upper_hours / HOURS_PER_YEAR,
            self.hour_upper_days / DAYS_PER_YEAR,
            self.day_upper_years,
            self.week_upper_years,
            self.month_upper_years,
        ];
        if ladder_years.windows(2).any(|pair| pair[0] > pair[1]) {
            return Err(TimelineError::InvalidConfig(
                "granularity thresholds must increase from minutes to months".to_owned(),
            ));
        }
        Ok(())
    }
}

/// Calendar year length used to convert threshold hours/days to years.
pub const DAYS_PER_YEAR: f64 = 365.0;
pub const HOURS_PER_YEAR: f64 = DAYS_PER_YEAR * 24.0;

/// Axis planning, tick generation and label placement settings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AxisConfig {
    pub thresholds: GranularityThresholds,
    /// Divisor used to derive minute, hour and month steps (`60/b`, `24/b`, `12/b`).
    pub canonical_base: u32,
    pub max_labels: u32,
    /// Relative scale change below which a unit switch is deferred.
    pub hysteresis_pct: f64,
    /// Symmetric pad applied to the visible range before generating ticks.
    pub visible_pad_ratio: f64,
    /// Padding applied when fitting the domain to events.
    pub domain_pad_ratio: f64,
    pub week_start: WeekStart,
    pub max_day_ticks: usize,
    pub max_hour_ticks: usize,
    pub max_minute_ticks: usize,
    pub edge_pinning: bool,
    pub pin_threshold_px: f64,
    pub marker_font_px: f64,
}

impl Default for AxisConfig {
    fn default() -> Self {
        Self {
            thresholds: GranularityThresholds::default(),
            canonical_base: 4,
            max_labels: 14,
            hysteresis_pct: 0.08,
            visible_pad_ratio: 0.05,
            domain_pad_ratio: 0.1,
            week_start: WeekStart::Monday,
            max_day_ticks: 1200,
            max_hour_ticks: 1500,
            max_minute_ticks: 3000,
            edge_pinning: true,
            pin_threshold_px: 6.0,
            marker_font_px: 11.0,
        }
    }
}

impl AxisConfig {
    #[must_use]
    pub fn with_max_labels(mut self, max_labels: u32) -> Self {
        self.max_labels = max_labels;
        self
    }

    #[must_use]
    pub fn with_canonical_base(mut self, canonical_base: u32) -> Self {
        self.canonical_base = canonical_base;
        self
    }

    #[must_use]
    pub fn with_hysteresis_pct(mut self, hysteresis_pct: f64) -> Self {
        self.hysteresis_pct = hysteresis_pct;
        self
    }

    #[must_use]
    pub fn with_week_start(mut self, week_start: WeekStart) -> Self {
        self.week_start = week_start;
        self
    }

    #[must_use]
    pub fn with_edge_pinning(mut self, enabled: bool) -> Self {
        self.edge_pinning = enabled;
        self
    }

    #[must_use]
    pub fn with_thresholds(mut self, thresholds: GranularityThresholds) -> Self {
        self.thresholds = thresholds;
        self
    }

    pub fn validate(&self) -> TimelineResult<()> {
        self.thresholds.validate()?;

        if self.canonical_base == 0 || self.canonical_base > 12 {
            return Err(TimelineError::InvalidConfig(
                "axis `canonical_base` must be in 1..=12".to_owned(),
            ));
        }
        if self.max_labels == 0 {
            return Err(TimelineError::InvalidConfig(
                "axis `max_labels` must be > 0".to_owned(),
            ));
        }
        for (value, name) in [
            (self.max_day_ticks, "max_day_ticks"),
            (self.max_hour_ticks, "max_hour_ticks"),
            (self.max_minute_ticks, "max_minute_ticks"),
        ] {
            if value == 0 {
                return Err(TimelineError::InvalidConfig(format!(
                    "axis `{name}` must be > 0"
                )));
            }
        }
        for (value, name) in [
            (self.hysteresis_pct, "hysteresis_pct"),
            (self.visible_pad_ratio, "visible_pad_ratio"),
            (self.domain_pad_ratio, "domain_pad_ratio"),
            (self.pin_threshold_px, "pin_threshold_px"),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(TimelineError::InvalidConfig(format!(
                    "axis `{name}` must be finite and >= 0"
                )));
            }
        }
        if !self.marker_font_px.is_finite() || self.marker_font_px <= 0.0 {
            return Err(TimelineError::InvalidConfig(
                "axis `marker_font_px` must be finite and > 0".to_owned(),
            ));
        }
        Ok(())
    }
}
