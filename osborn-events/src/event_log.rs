//! The event log itself.

use std::sync::{Mutex, MutexGuard, PoisonError};

use chrono::Utc;
use osborn_core::{new_entity_id, AnalyticsSettings};

use crate::{AnalyticsEvent, AnalyticsReport, Properties, TimeRange};

/// Buffer length that triggers truncation.
pub const MAX_EVENTS: usize = 1000;

/// Number of newest events kept after truncation.
pub const RETAINED_EVENTS: usize = 500;

/// Event name recorded by [`EventLog::page`].
pub const PAGE_VIEW_EVENT: &str = "page_view";

/// Event name recorded by [`EventLog::action`].
pub const USER_ACTION_EVENT: &str = "user_action";

#[derive(Debug)]
struct LogState {
    events: Vec<AnalyticsEvent>,
    user_id: Option<String>,
    session_id: String,
    enabled: bool,
}

/// Append-only, size-bounded analytics buffer.
///
/// All methods take `&self`; share the log with `Arc<EventLog>`. Appending
/// and truncating happen under one lock, so concurrent writers never lose
/// an event to a racing truncation or overshoot the retention window.
#[derive(Debug)]
pub struct EventLog {
    state: Mutex<LogState>,
}

impl Default for EventLog {
    fn default() -> Self {
        Self::new()
    }
}

impl EventLog {
    /// Create an enabled log with a fresh session identifier.
    pub fn new() -> Self {
        Self {
            state: Mutex::new(LogState {
                events: Vec::new(),
                user_id: None,
                session_id: new_entity_id().to_string(),
                enabled: true,
            }),
        }
    }

    pub fn with_settings(settings: &AnalyticsSettings) -> Self {
        let log = Self::new();
        log.set_enabled(settings.enabled);
        log
    }

    fn lock(&self) -> MutexGuard<'_, LogState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Attach a user identifier to subsequently tracked events.
    pub fn set_user_id(&self, user_id: impl Into<String>) {
        self.lock().user_id = Some(user_id.into());
    }

    pub fn clear_user_id(&self) {
        self.lock().user_id = None;
    }

    /// While disabled, `track` records nothing at all.
    pub fn set_enabled(&self, enabled: bool) {
        self.lock().enabled = enabled;
    }

    pub fn is_enabled(&self) -> bool {
        self.lock().enabled
    }

    pub fn session_id(&self) -> String {
        self.lock().session_id.clone()
    }

    /// Append an event stamped with the current time, user and session.
    pub fn track(&self, name: impl Into<String>, properties: Option<Properties>) {
        let mut state = self.lock();
        if !state.enabled {
            return;
        }

        let event = AnalyticsEvent::new(
            name.into(),
            properties,
            Utc::now(),
            state.user_id.clone(),
            state.session_id.clone(),
        );
        state.events.push(event);

        if state.events.len() > MAX_EVENTS {
            let dropped = state.events.len() - RETAINED_EVENTS;
            state.events.drain(..dropped);
            tracing::debug!(dropped, retained = RETAINED_EVENTS, "analytics buffer truncated");
        }
    }

    /// Track a `page_view` with the page name merged into the properties.
    ///
    /// Caller properties are applied after the page name and may replace it.
    pub fn page(&self, page_name: &str, properties: Option<Properties>) {
        self.track(PAGE_VIEW_EVENT, Some(merge_named("page", page_name, properties)));
    }

    /// Track a `user_action` with the action name merged into the properties.
    pub fn action(&self, action_name: &str, properties: Option<Properties>) {
        self.track(USER_ACTION_EVENT, Some(merge_named("action", action_name, properties)));
    }

    /// Snapshot copy of the buffered events, oldest first.
    pub fn events(&self) -> Vec<AnalyticsEvent> {
        self.lock().events.clone()
    }

    pub fn len(&self) -> usize {
        self.lock().events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().events.is_empty()
    }

    /// Aggregate the buffered events, optionally restricted to `time_range`.
    pub fn report(&self, time_range: Option<TimeRange>) -> AnalyticsReport {
        let state = self.lock();
        let filtered: Vec<&AnalyticsEvent> = state
            .events
            .iter()
            .filter(|e| time_range.map_or(true, |range| range.contains(e.timestamp)))
            .collect();
        AnalyticsReport::build(&filtered, &state.session_id, time_range)
    }

    /// Drop every buffered event. User, session and enabled flag are kept.
    pub fn clear(&self) {
        self.lock().events.clear();
    }
}

fn merge_named(key: &str, value: &str, properties: Option<Properties>) -> Properties {
    let mut merged = Properties::new();
    merged.insert(key.to_string(), serde_json::Value::String(value.to_string()));
    if let Some(properties) = properties {
        merged.extend(properties);
    }
    merged
}

// =============================================================================
// TESTS
// =============================================================================
