//! Aggregated view over the event log.

use std::collections::BTreeMap;

use osborn_core::Timestamp;
use serde::{Deserialize, Serialize};

use crate::AnalyticsEvent;

/// Inclusive timestamp window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeRange {
    pub start: Timestamp,
    pub end: Timestamp,
}

impl TimeRange {
    pub fn new(start: Timestamp, end: Timestamp) -> Self {
        Self { start, end }
    }

    pub fn contains(&self, timestamp: Timestamp) -> bool {
        timestamp >= self.start && timestamp <= self.end
    }

    /// Smallest range covering every event, or `None` for no events.
    pub fn spanning<'a, I>(events: I) -> Option<Self>
    where
        I: IntoIterator<Item = &'a AnalyticsEvent>,
    {
        events.into_iter().fold(None, |range: Option<TimeRange>, event| {
            Some(match range {
                None => TimeRange::new(event.timestamp, event.timestamp),
                Some(r) => TimeRange::new(r.start.min(event.timestamp), r.end.max(event.timestamp)),
            })
        })
    }
}

/// Summary counts for a set of events.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyticsReport {
    pub total_events: usize,
    /// Event count per event name.
    pub event_counts: BTreeMap<String, usize>,
    /// Distinct non-empty user identifiers.
    pub unique_users: usize,
    pub session_id: String,
    /// The requested range, or the observed span when none was requested.
    /// `None` when no range was requested and there were no events.
    pub time_range: Option<TimeRange>,
}

impl AnalyticsReport {
    pub(crate) fn build(
        events: &[&AnalyticsEvent],
        session_id: &str,
        requested: Option<TimeRange>,
    ) -> Self {
        let mut event_counts = BTreeMap::new();
        for event in events {
            *event_counts.entry(event.name.clone()).or_insert(0) += 1;
        }

        let mut users: Vec<&str> = events
            .iter()
            .filter(|e| e.has_user())
            .filter_map(|e| e.user_id.as_deref())
            .collect();
        users.sort_unstable();
        users.dedup();

        Self {
            total_events: events.len(),
            event_counts,
            unique_users: users.len(),
            session_id: session_id.to_string(),
            time_range: requested.or_else(|| TimeRange::spanning(events.iter().copied())),
        }
    }

    /// Count for a single event name, 0 when never seen.
    pub fn count(&self, name: &str) -> usize {
        self.event_counts.get(name).copied().unwrap_or(0)
    }
}
