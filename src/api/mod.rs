mod axis_config;
mod axis_edge_pinner;
mod axis_label_decimator;
mod axis_label_format;
mod axis_ticks;
mod engine;
mod engine_config;
mod event_clustering;
mod event_filter;
mod event_positioner;
mod granularity_planner;
mod json_contract;
mod minimap;
mod render_model;

pub use axis_config::{AxisConfig, DAYS_PER_YEAR, GranularityThresholds, HOURS_PER_YEAR};
pub use axis_edge_pinner::{
    AxisMarker, EdgePin, EstimatedLabelWidth, LabelWidthMeasure, PinContext, PinEdge,
    PinnedMarkers, estimate_label_text_width_px, pin_edges,
};
pub use axis_label_decimator::{AxisSpan, decimate_spans, is_label_visible, label_stride};
pub use axis_label_format::{format_marker_label, format_span_label};
pub use axis_ticks::{TickTrack, build_markers, build_spans};
pub use engine::{TimelineEngine, recompute, recompute_with_measure};
pub use engine_config::TimelineConfig;
pub use event_clustering::{
    BucketConfig, BucketPartition, ClusterBucket, EventCluster, bucket_by_position,
};
pub use event_filter::{EventFilter, FilteredEvents, SortOrder};
pub use event_positioner::{
    EventLayout, EventLayoutConfig, OverflowIndicator, PositionedEvent, StackSide, layout_events,
};
pub use granularity_planner::{
    GranularityPlan, PlanMemo, nice_year_step, plan_for_span, plan_with_hysteresis,
    visible_span_years,
};
pub use json_contract::{RENDER_MODEL_JSON_SCHEMA_V1, RenderModelJsonContractV1};
pub use minimap::{
    MIN_BRUSH_WIDTH, MinimapMark, MinimapWindow, WindowEdge, brush_window, center_on_click,
    drag_window, minimap_marks, pan_for_window_left, resize_window,
};
pub use render_model::{RecomputeInput, RenderModel};
