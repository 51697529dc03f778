pub mod calendar;
pub mod domain;
pub mod event;
pub mod scale;
pub mod types;
pub mod viewport;

pub use calendar::{
    NormalizedDate, PartialDate, compare_partial_dates, datetime_to_year_fraction,
    days_in_month, format_partial_date, is_leap_year, year_fraction_to_datetime,
};
pub use domain::Domain;
pub use event::{EventType, TimelineEvent};
pub use scale::LinearScale;
pub use types::{Tick, TimeUnit, WeekStart};
pub use viewport::{
    ScaleBounds, Viewport, VisibleRange, ZoomTuning, adaptive_scale_bounds, clamp_pan,
    snap_scale,
};
