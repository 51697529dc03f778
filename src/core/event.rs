use serde::{Deserialize, Serialize};

use crate::core::calendar::PartialDate;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventType {
    History,
    Personal,
    Science,
    Culture,
    Tech,
    #[default]
    Other,
}

/// Event record supplied by the host.
///
/// Positioning reads only `id`, `event_type`, `start` and `end`; title and
/// body are carried for filtering and for the host's own rendering.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimelineEvent {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub body: String,
    #[serde(default, rename = "type")]
    pub event_type: EventType,
    #[serde(default)]
    pub start: Option<PartialDate>,
    #[serde(default)]
    pub end: Option<PartialDate>,
}

impl TimelineEvent {
    #[must_use]
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            body: String::new(),
            event_type: EventType::Other,
            start: None,
            end: None,
        }
    }

    #[must_use]
    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = body.into();
        self
    }

    #[must_use]
    pub fn with_type(mut self, event_type: EventType) -> Self {
        self.event_type = event_type;
        self
    }

    #[must_use]
    pub fn with_start(mut self, start: PartialDate) -> Self {
        self.start = Some(start);
        self
    }

    #[must_use]
    pub fn with_end(mut self, end: PartialDate) -> Self {
        self.end = Some(end);
        self
    }

    #[must_use]
    pub fn start_year_fraction(&self) -> Option<f64> {
        self.start.and_then(PartialDate::to_year_fraction)
    }

    #[must_use]
    pub fn end_year_fraction(&self) -> Option<f64> {
        self.end.and_then(PartialDate::to_year_fraction)
    }

    /// An event is dated when its start resolves to an axis position.
    #[must_use]
    pub fn is_dated(&self) -> bool {
        self.start_year_fraction().is_some()
    }
}
