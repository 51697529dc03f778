use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use tracing::{debug, trace};

use crate::core::{Domain, EventType, LinearScale, NormalizedDate, TimelineEvent, Viewport};
use crate::error::{TimelineError, TimelineResult};

use super::event_clustering::{BucketConfig, EventCluster, bucket_by_position};

/// Event projection, grouping and clustering settings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EventLayoutConfig {
    /// Clustering applies strictly below this viewport scale.
    pub cluster_scale_threshold: f64,
    pub cluster_min_items: usize,
    pub cluster_bucket_width: f64,
    pub cluster_edge_pad: f64,
    pub cluster_min_size: usize,
    /// Events within this many percent of screen width from a group anchor
    /// share the anchor's group.
    pub group_epsilon_pct: f64,
    pub max_per_group: usize,
    pub max_stack_levels: u8,
}

impl Default for EventLayoutConfig {
    fn default() -> Self {
        Self {
            cluster_scale_threshold: 1.0,
            cluster_min_items: 24,
            cluster_bucket_width: 0.015,
            cluster_edge_pad: 0.02,
            cluster_min_size: 4,
            group_epsilon_pct: 0.5,
            max_per_group: 4,
            max_stack_levels: 4,
        }
    }
}

impl EventLayoutConfig {
    #[must_use]
    pub fn with_max_per_group(mut self, max_per_group: usize) -> Self {
        self.max_per_group = max_per_group;
        self
    }

    #[must_use]
    pub fn with_group_epsilon_pct(mut self, group_epsilon_pct: f64) -> Self {
        self.group_epsilon_pct = group_epsilon_pct;
        self
    }

    #[must_use]
    pub fn with_clustering(mut self, scale_threshold: f64, min_items: usize) -> Self {
        self.cluster_scale_threshold = scale_threshold;
        self.cluster_min_items = min_items;
        self
    }

    pub fn validate(&self) -> TimelineResult<()> {
        for (value, name) in [
            (self.cluster_scale_threshold, "cluster_scale_threshold"),
            (self.cluster_edge_pad, "cluster_edge_pad"),
            (self.group_epsilon_pct, "group_epsilon_pct"),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(TimelineError::InvalidConfig(format!(
                    "event layout `{name}` must be finite and >= 0"
                )));
            }
        }
        if !self.cluster_bucket_width.is_finite() || self.cluster_bucket_width <= 0.0 {
            return Err(TimelineError::InvalidConfig(
                "event layout `cluster_bucket_width` must be finite and > 0".to_owned(),
            ));
        }
        if self.cluster_edge_pad >= 0.5 {
            return Err(TimelineError::InvalidConfig(
                "event layout `cluster_edge_pad` must be < 0.5".to_owned(),
            ));
        }
        for (value, name) in [
            (self.cluster_min_size, "cluster_min_size"),
            (self.max_per_group, "max_per_group"),
            (usize::from(self.max_stack_levels), "max_stack_levels"),
        ] {
            if value == 0 {
                return Err(TimelineError::InvalidConfig(format!(
                    "event layout `{name}` must be > 0"
                )));
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StackSide {
    Above,
    Below,
}

/// Individually rendered event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PositionedEvent {
    pub event_id: String,
    /// Position of the event in the input slice.
    pub event_index: usize,
    pub event_type: EventType,
    pub group_key: String,
    pub start_yf: f64,
    pub end_yf: Option<f64>,
    /// Screen position clamped to `[0, 1]`.
    pub screen_fraction: f64,
    pub raw_fraction: f64,
    pub end_screen_fraction: Option<f64>,
    pub side: StackSide,
    pub level: u8,
    /// Set while clustering is active and this event's bucket stayed sparse.
    pub clustered: bool,
    /// Number of hidden members, carried by the anchor of an overflowing group.
    pub overflow_count: Option<usize>,
    pub out_of_domain: bool,
    pub in_view: bool,
}

/// "+N" badge for members cut from an overfull group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OverflowIndicator {
    pub group_key: String,
    pub screen_fraction: f64,
    pub hidden_count: usize,
    pub hidden_event_ids: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EventLayout {
    pub events: Vec<PositionedEvent>,
    pub clusters: Vec<EventCluster>,
    pub overflows: Vec<OverflowIndicator>,
    pub undated_event_ids: Vec<String>,
    pub clustering_active: bool,
}

impl EventLayout {
    #[must_use]
    pub fn hidden_event_count(&self) -> usize {
        self.overflows
            .iter()
            .map(|overflow| overflow.hidden_count)
            .sum()
    }

    #[must_use]
    pub fn clustered_event_count(&self) -> usize {
        self.clusters.iter().map(|cluster| cluster.count).sum()
    }

    /// Every input event is counted exactly once by one of the outputs.
    #[must_use]
    pub fn accounted_event_count(&self) -> usize {
        self.clustered_event_count()
            + self.events.len()
            + self.hidden_event_count()
            + self.undated_event_ids.len()
    }
}

#[derive(Debug, Clone)]
struct ProjectedEvent<'a> {
    index: usize,
    event: &'a TimelineEvent,
    start: NormalizedDate,
    start_yf: f64,
    end_yf: Option<f64>,
    raw_fraction: f64,
    end_raw_fraction: Option<f64>,
}

fn project_event(
    index: usize,
    event: &TimelineEvent,
    scale: LinearScale,
    viewport: Viewport,
) -> Option<ProjectedEvent<'_>> {
    let start = event.start?;
    let start_yf = start.to_year_fraction()?;
    let end_yf = event.end_year_fraction();
    Some(ProjectedEvent {
        index,
        event,
        start: start.normalize(),
        start_yf,
        end_yf,
        raw_fraction: viewport.screen_fraction(start_yf, scale),
        end_raw_fraction: end_yf.map(|yf| viewport.screen_fraction(yf, scale)),
    })
}

#[cfg(feature = "parallel-projection")]
fn project_events(
    events: &[TimelineEvent],
    scale: LinearScale,
    viewport: Viewport,
) -> Vec<Option<ProjectedEvent<'_>>> {
    use rayon::prelude::*;

    events
        .par_iter()
        .enumerate()
        .map(|(index, event)| project_event(index, event, scale, viewport))
        .collect()
}

#[cfg(not(feature = "parallel-projection"))]
fn project_events(
    events: &[TimelineEvent],
    scale: LinearScale,
    viewport: Viewport,
) -> Vec<Option<ProjectedEvent<'_>>> {
    events
        .iter()
        .enumerate()
        .map(|(index, event)| project_event(index, event, scale, viewport))
        .collect()
}

/// Projects, clusters, groups and stacks events for one viewport.
///
/// Output order follows normalized start date, ties broken by input order.
#[must_use]
pub fn layout_events(
    events: &[TimelineEvent],
    domain: Domain,
    viewport: Viewport,
    config: &EventLayoutConfig,
) -> EventLayout {
    let scale = LinearScale::from_domain(domain);
    let mut layout = EventLayout::default();
    let mut projected = Vec::with_capacity(events.len());
    for (event, projection) in events.iter().zip(project_events(events, scale, viewport)) {
        match projection {
            Some(projection) => projected.push(projection),
            None => layout.undated_event_ids.push(event.id.clone()),
        }
    }
    projected.sort_by(|a, b| a.start.cmp(&b.start).then_with(|| a.index.cmp(&b.index)));

    layout.clustering_active = viewport.scale < config.cluster_scale_threshold
        && projected.len() >= config.cluster_min_items;

    let individuals = if layout.clustering_active {
        let fractions: Vec<f64> = projected.iter().map(|item| item.raw_fraction).collect();
        let partition = bucket_by_position(
            &fractions,
            BucketConfig {
                bucket_width: config.cluster_bucket_width,
                edge_pad: config.cluster_edge_pad,
                min_size: config.cluster_min_size,
            },
        );
        layout.clusters = partition
            .clusters
            .iter()
            .map(|bucket| {
                let members = bucket.members.iter().map(|member| &projected[*member]);
                EventCluster {
                    bucket: bucket.bucket,
                    screen_fraction: bucket.center_fraction,
                    count: bucket.members.len(),
                    event_ids: members.clone().map(|item| item.event.id.clone()).collect(),
                    start_yf: members
                        .clone()
                        .map(|item| item.start_yf)
                        .fold(f64::INFINITY, f64::min),
                    end_yf: members
                        .map(|item| item.end_yf.unwrap_or(item.start_yf))
                        .fold(f64::NEG_INFINITY, f64::max),
                }
            })
            .collect();
        partition
            .individuals
            .into_iter()
            .map(|index| &projected[index])
            .collect::<Vec<_>>()
    } else {
        projected.iter().collect()
    };

    stack_groups(&individuals, domain, config, &mut layout);

    debug!(
        positioned = layout.events.len(),
        clusters = layout.clusters.len(),
        overflows = layout.overflows.len(),
        undated = layout.undated_event_ids.len(),
        clustering = layout.clustering_active,
        "events laid out"
    );
    layout
}

/// Groups consecutive events near the same drawn position and assigns stack
/// slots.
///
/// Grouping runs on the clamped fraction, so off-screen events pinned to the
/// same edge share one stack instead of overlapping.
fn stack_groups(
    items: &[&ProjectedEvent<'_>],
    domain: Domain,
    config: &EventLayoutConfig,
    layout: &mut EventLayout,
) {
    let epsilon = config.group_epsilon_pct / 100.0;
    let mut groups: Vec<SmallVec<[usize; 4]>> = Vec::new();
    let mut anchor_fraction = f64::NAN;
    for (position, item) in items.iter().enumerate() {
        let fraction = item.raw_fraction.clamp(0.0, 1.0);
        let joins_anchor = (fraction - anchor_fraction).abs() <= epsilon;
        if let Some(group) = groups.last_mut().filter(|_| joins_anchor) {
            group.push(position);
            continue;
        }
        anchor_fraction = fraction;
        let mut group = SmallVec::new();
        group.push(position);
        groups.push(group);
    }

    let max_per_group = config.max_per_group.max(1);
    let levels = config.max_stack_levels.max(1);
    for group in groups {
        let anchor = items[group[0]];
        let group_key = anchor.start.timestamp_key();
        let hidden_count = group.len().saturating_sub(max_per_group);

        for (slot, position) in group.iter().take(max_per_group).enumerate() {
            let item = items[*position];
            let side = if slot % 2 == 0 {
                StackSide::Above
            } else {
                StackSide::Below
            };
            let level = ((slot / 2) % usize::from(levels)) as u8;
            layout.events.push(PositionedEvent {
                event_id: item.event.id.clone(),
                event_index: item.index,
                event_type: item.event.event_type,
                group_key: group_key.clone(),
                start_yf: item.start_yf,
                end_yf: item.end_yf,
                screen_fraction: item.raw_fraction.clamp(0.0, 1.0),
                raw_fraction: item.raw_fraction,
                end_screen_fraction: item.end_raw_fraction.map(|end| end.clamp(0.0, 1.0)),
                side,
                level,
                clustered: layout.clustering_active,
                overflow_count: (slot == 0 && hidden_count > 0).then_some(hidden_count),
                out_of_domain: !domain.contains(item.start_yf),
                in_view: (0.0..=1.0).contains(&item.raw_fraction),
            });
        }

        if hidden_count > 0 {
            trace!(group = %group_key, hidden_count, "group overflow");
            layout.overflows.push(OverflowIndicator {
                group_key,
                screen_fraction: anchor.raw_fraction.clamp(0.0, 1.0),
                hidden_count,
                hidden_event_ids: group
                    .iter()
                    .skip(max_per_group)
                    .map(|position| items[*position].event.id.clone())
                    .collect(),
            });
        }
    }
}
