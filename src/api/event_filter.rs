use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::core::{EventType, TimelineEvent};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    #[default]
    DateAsc,
    DateDesc,
}

/// Host-side list filter: type set, free-text search and date order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EventFilter {
    /// `None` or an empty set admits every type.
    pub types: Option<BTreeSet<EventType>>,
    pub search: String,
    pub sort: SortOrder,
}

/// Filtered events split by whether they can be positioned.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilteredEvents {
    pub dated: Vec<TimelineEvent>,
    pub undated: Vec<TimelineEvent>,
}

impl EventFilter {
    #[must_use]
    pub fn with_types(mut self, types: impl IntoIterator<Item = EventType>) -> Self {
        self.types = Some(types.into_iter().collect());
        self
    }

    #[must_use]
    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = search.into();
        self
    }

    #[must_use]
    pub fn with_sort(mut self, sort: SortOrder) -> Self {
        self.sort = sort;
        self
    }

    #[must_use]
    pub fn matches(&self, event: &TimelineEvent) -> bool {
        let type_ok = match &self.types {
            Some(types) if !types.is_empty() => types.contains(&event.event_type),
            _ => true,
        };
        if !type_ok {
            return false;
        }

        let query = self.search.trim().to_lowercase();
        query.is_empty()
            || event.title.to_lowercase().contains(&query)
            || event.body.to_lowercase().contains(&query)
    }

    /// Filters `events`, then sorts the dated ones. Undated events keep input
    /// order; ties in date keep input order in both directions.
    #[must_use]
    pub fn partition(&self, events: &[TimelineEvent]) -> FilteredEvents {
        let mut filtered = FilteredEvents::default();
        for event in events.iter().filter(|event| self.matches(event)) {
            if event.is_dated() {
                filtered.dated.push(event.clone());
            } else {
                filtered.undated.push(event.clone());
            }
        }

        filtered.dated.sort_by(|a, b| {
            let order = a.start.map(|d| d.normalize()).cmp(&b.start.map(|d| d.normalize()));
            match self.sort {
                SortOrder::DateAsc => order,
                SortOrder::DateDesc => order.reverse(),
            }
        });
        filtered
    }
}
