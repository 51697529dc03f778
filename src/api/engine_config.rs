use serde::{Deserialize, Serialize};

use crate::core::ZoomTuning;
use crate::error::{TimelineError, TimelineResult};

use super::axis_config::AxisConfig;
use super::event_positioner::EventLayoutConfig;

/// Public timeline configuration.
///
/// Serializable so hosts can persist and reload tuning without inventing
/// their own format. Missing fields fall back to defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimelineConfig {
    pub zoom: ZoomTuning,
    pub axis: AxisConfig,
    pub events: EventLayoutConfig,
}

impl TimelineConfig {
    #[must_use]
    pub fn with_zoom(mut self, zoom: ZoomTuning) -> Self {
        self.zoom = zoom;
        self
    }

    #[must_use]
    pub fn with_axis(mut self, axis: AxisConfig) -> Self {
        self.axis = axis;
        self
    }

    #[must_use]
    pub fn with_events(mut self, events: EventLayoutConfig) -> Self {
        self.events = events;
        self
    }

    pub fn validate(&self) -> TimelineResult<()> {
        self.zoom.validate()?;
        self.axis.validate()?;
        self.events.validate()
    }

    /// Parses and validates a configuration document.
    pub fn from_json_str(input: &str) -> TimelineResult<Self> {
        let config: Self = serde_json::from_str(input).map_err(|e| {
            TimelineError::InvalidConfig(format!("failed to parse timeline config: {e}"))
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json_pretty(&self) -> TimelineResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| {
            TimelineError::InvalidConfig(format!("failed to serialize timeline config: {e}"))
        })
    }
}
