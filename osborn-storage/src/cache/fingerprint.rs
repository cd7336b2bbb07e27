//! Request fingerprints: stable cache keys derived from request parameters.
//!
//! Two requests that differ only in letter case, surrounding whitespace or
//! parameter order map to the same key.

use std::collections::BTreeMap;

use osborn_core::compute_content_hash;
use serde_json::{Map, Value};

/// Normalised description of a cacheable request.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RequestFingerprint {
    topic: String,
    kind: Option<String>,
    params: BTreeMap<String, String>,
}

fn normalize(value: &str) -> String {
    value.trim().to_lowercase()
}

impl RequestFingerprint {
    pub fn new(topic: &str) -> Self {
        Self {
            topic: normalize(topic),
            kind: None,
            params: BTreeMap::new(),
        }
    }

    /// Request category, e.g. `"ranking"` or `"analysis"`.
    pub fn with_kind(mut self, kind: &str) -> Self {
        self.kind = Some(normalize(kind));
        self
    }

    /// Add a request parameter. Blank values are dropped.
    pub fn with_param(mut self, key: &str, value: impl ToString) -> Self {
        let value = normalize(&value.to_string());
        if !value.is_empty() {
            self.params.insert(key.trim().to_string(), value);
        }
        self
    }

    pub fn topic(&self) -> &str {
        &self.topic
    }

    pub fn kind(&self) -> Option<&str> {
        self.kind.as_deref()
    }

    /// Canonical JSON rendering with sorted parameter keys.
    pub fn canonical(&self) -> String {
        let params: Map<String, Value> = self
            .params
            .iter()
            .map(|(k, v)| (k.clone(), Value::String(v.clone())))
            .collect();

        let mut object = Map::new();
        object.insert("topic".to_string(), Value::String(self.topic.clone()));
        object.insert(
            "kind".to_string(),
            self.kind.clone().map(Value::String).unwrap_or(Value::Null),
        );
        object.insert("params".to_string(), Value::Object(params));
        Value::Object(object).to_string()
    }

    /// Hex SHA-256 of [`canonical`](Self::canonical); the cache key.
    pub fn key(&self) -> String {
        hex::encode(compute_content_hash(self.canonical().as_bytes()))
    }
}
