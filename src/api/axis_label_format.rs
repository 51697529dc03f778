use chrono::{DateTime, Utc};

use crate::core::TimeUnit;

/// Label for a tick on the span track.
#[must_use]
pub fn format_span_label(time: DateTime<Utc>, unit: TimeUnit) -> String {
    let pattern = match unit {
        TimeUnit::Year => "%Y",
        TimeUnit::Month => "%b",
        TimeUnit::Week => "%b %-d",
        TimeUnit::Day => "%-d",
        TimeUnit::Hour | TimeUnit::Minute => "%H:%M",
    };
    time.format(pattern).to_string()
}

/// Label for a marker or edge pin; carries enough context to stand alone.
#[must_use]
pub fn format_marker_label(time: DateTime<Utc>, unit: TimeUnit) -> String {
    let pattern = match unit {
        TimeUnit::Year => "%Y",
        TimeUnit::Month => "%b %Y",
        TimeUnit::Week | TimeUnit::Day => "%b %-d, %Y",
        TimeUnit::Hour | TimeUnit::Minute => "%b %-d, %Y %H:%M",
    };
    time.format(pattern).to_string()
}
