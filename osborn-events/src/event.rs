//! Analytics event record.

use osborn_core::{new_entity_id, EntityId, Timestamp};
use serde::{Deserialize, Serialize};

/// Open string-keyed property bag attached to an event.
pub type Properties = serde_json::Map<String, serde_json::Value>;

/// A single tracked occurrence. Immutable once appended to the log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyticsEvent {
    pub id: EntityId,
    pub name: String,
    pub properties: Option<Properties>,
    pub timestamp: Timestamp,
    pub user_id: Option<String>,
    pub session_id: String,
}

impl AnalyticsEvent {
    pub(crate) fn new(
        name: String,
        properties: Option<Properties>,
        timestamp: Timestamp,
        user_id: Option<String>,
        session_id: String,
    ) -> Self {
        Self {
            id: new_entity_id(),
            name,
            properties,
            timestamp,
            user_id,
            session_id,
        }
    }

    /// Look up a single property value.
    pub fn property(&self, key: &str) -> Option<&serde_json::Value> {
        self.properties.as_ref().and_then(|props| props.get(key))
    }

    /// True when the event carries a non-empty user identifier.
    pub fn has_user(&self) -> bool {
        self.user_id.as_deref().is_some_and(|id| !id.is_empty())
    }
}
