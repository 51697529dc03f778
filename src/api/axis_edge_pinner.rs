use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::core::calendar::{align_to_unit_start, next_tick};
use crate::core::{
    LinearScale, Tick, TimeUnit, Viewport, VisibleRange, WeekStart, datetime_to_year_fraction,
    year_fraction_to_datetime,
};

use super::axis_config::AxisConfig;
use super::axis_label_format::format_marker_label;

/// Measures rendered label width in pixels.
///
/// Hosts with a real text backend plug their measurement in here; the
/// default [`EstimatedLabelWidth`] keeps layout deterministic without one.
pub trait LabelWidthMeasure {
    fn label_width_px(&self, text: &str, font_px: f64) -> f64;
}

/// Character-class width estimate.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EstimatedLabelWidth;

impl LabelWidthMeasure for EstimatedLabelWidth {
    fn label_width_px(&self, text: &str, font_px: f64) -> f64 {
        estimate_label_text_width_px(text, font_px)
    }
}

#[must_use]
pub fn estimate_label_text_width_px(text: &str, font_size_px: f64) -> f64 {
    let units = text.chars().fold(0.0, |acc, ch| {
        acc + match ch {
            '0'..='9' => 0.62,
            '.' | ',' => 0.34,
            '-' | '+' | '%' | ':' => 0.42,
            ' ' => 0.33,
            _ => 0.58,
        }
    });
    (units * font_size_px).max(font_size_px)
}

/// Marker-track tick placed on screen.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AxisMarker {
    #[serde(flatten)]
    pub tick: Tick,
    pub screen_fraction: f64,
}

/// Screen edge a pin is drawn against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PinEdge {
    Left,
    Right,
}

/// Synthetic label drawn at a screen edge so the marker unit is always named.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EdgePin {
    /// Start of the pinned unit as a fractional year.
    pub yf: f64,
    pub label: String,
    pub unit: TimeUnit,
    pub edge: PinEdge,
}

/// Markers that survive pinning plus the pins to draw.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PinnedMarkers {
    pub markers: Vec<AxisMarker>,
    pub pins: Vec<EdgePin>,
}

/// Inputs shared by marker placement and pinning.
#[derive(Debug, Clone, Copy)]
pub struct PinContext<'a> {
    pub viewport: Viewport,
    pub scale: LinearScale,
    /// Unpadded visible range; pins name the unit under its true edges.
    pub raw_range: VisibleRange,
    pub axis_width_px: f64,
    pub config: &'a AxisConfig,
}

/// Places markers on screen and adds edge pins when at most one marker is
/// visible.
#[must_use]
pub fn pin_edges(
    ticks: Vec<Tick>,
    marker_unit: TimeUnit,
    context: PinContext<'_>,
    measure: &dyn LabelWidthMeasure,
) -> PinnedMarkers {
    let mut markers: Vec<AxisMarker> = ticks
        .into_iter()
        .map(|tick| AxisMarker {
            screen_fraction: context.viewport.screen_fraction(tick.yf, context.scale),
            tick,
        })
        .collect();

    if !context.config.edge_pinning {
        return PinnedMarkers {
            markers,
            pins: Vec::new(),
        };
    }

    let visible: Vec<usize> = markers
        .iter()
        .enumerate()
        .filter(|(_, marker)| context.raw_range.contains(marker.tick.yf))
        .map(|(index, _)| index)
        .collect();

    let pin_at = |yf: f64, edge: PinEdge| {
        edge_pin(yf, marker_unit, context.config.week_start, edge)
            .into_iter()
            .collect::<Vec<_>>()
    };

    let pins = match visible.as_slice() {
        [] => pin_at(
            context.raw_range.start,
            nearer_boundary_edge(context.raw_range, marker_unit, context.config.week_start),
        ),
        [only] => {
            let marker = &markers[*only];
            let width_px = context.axis_width_px.max(0.0);
            let x_px = marker.screen_fraction * width_px;
            let threshold = context.config.pin_threshold_px
                + measure.label_width_px(&marker.tick.label, context.config.marker_font_px) / 2.0;

            if x_px <= threshold {
                trace!(label = %marker.tick.label, x_px, threshold, "marker replaced by left pin");
                let pin = EdgePin {
                    yf: marker.tick.yf,
                    label: marker.tick.label.clone(),
                    unit: marker_unit,
                    edge: PinEdge::Left,
                };
                markers.remove(*only);
                vec![pin]
            } else if width_px - x_px <= threshold {
                trace!(label = %marker.tick.label, x_px, threshold, "marker replaced by right pin");
                markers.remove(*only);
                let mut pins = pin_at(context.raw_range.start, PinEdge::Left);
                pins.extend(pin_at(context.raw_range.end, PinEdge::Right));
                pins
            } else {
                pin_at(context.raw_range.start, PinEdge::Left)
            }
        }
        _ => Vec::new(),
    };

    PinnedMarkers { markers, pins }
}

/// Pin naming the `unit` that contains `yf`.
fn edge_pin(yf: f64, unit: TimeUnit, week_start: WeekStart, edge: PinEdge) -> Option<EdgePin> {
    let time = year_fraction_to_datetime(yf)?;
    let start = align_to_unit_start(time, unit, week_start)?;
    Some(EdgePin {
        yf: datetime_to_year_fraction(start)?,
        label: format_marker_label(start, unit),
        unit,
        edge,
    })
}

/// With no marker on screen both edges sit inside one unit. The pin goes to
/// the edge closer to one of that unit's boundaries.
fn nearer_boundary_edge(range: VisibleRange, unit: TimeUnit, week_start: WeekStart) -> PinEdge {
    let boundaries = year_fraction_to_datetime(range.start)
        .and_then(|time| align_to_unit_start(time, unit, week_start))
        .and_then(|start| Some((start, next_tick(start, unit, 1)?)))
        .and_then(|(start, end)| {
            Some((datetime_to_year_fraction(start)?, datetime_to_year_fraction(end)?))
        });

    match boundaries {
        Some((start, end)) if end - range.end < range.start - start => PinEdge::Right,
        _ => PinEdge::Left,
    }
}
