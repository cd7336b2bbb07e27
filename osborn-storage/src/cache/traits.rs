//! Cache statistics and the observer hook used for telemetry.

use osborn_events::{EventLog, Properties};
use serde::{Deserialize, Serialize};

/// Event name tracked when capacity pressure evicts an entry.
pub const CACHE_EVICTED_EVENT: &str = "cache_evicted";

/// Event name tracked when a read finds and reaps an expired entry.
pub const CACHE_EXPIRED_EVENT: &str = "cache_expired";

/// Point-in-time statistics about a cache.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CacheStats {
    /// Entries currently stored, including expired ones not yet reaped.
    pub size: usize,
    pub max_size: usize,
    /// Stored entries already past their expiry.
    pub expired: usize,
    /// Live reads since creation or the last `clear`.
    pub hits: u64,
    /// Reads that found nothing or an expired entry.
    pub misses: u64,
    /// Entries removed to make room for new keys.
    pub evictions: u64,
}

impl CacheStats {
    /// Fraction of reads that were live hits, 0 before any read.
    ///
    /// Counters reset on `clear`, so this covers the current cache
    /// lifetime only.
    pub fn hit_rate(&self) -> f64 {
        match self.hits + self.misses {
            0 => 0.0,
            reads => self.hits as f64 / reads as f64,
        }
    }
}

/// Receives notifications about entries leaving the cache involuntarily.
///
/// Called after the cache lock is released, so an observer may use the
/// cache itself.
pub trait CacheObserver: Send + Sync {
    /// `key` was evicted to make room for a new entry.
    fn on_evict(&self, key: &str);

    /// `key` was found expired and removed.
    fn on_expire(&self, key: &str);
}

fn key_properties(key: &str) -> Properties {
    let mut properties = Properties::new();
    properties.insert("key".to_string(), serde_json::Value::String(key.to_string()));
    properties
}

impl CacheObserver for EventLog {
    fn on_evict(&self, key: &str) {
        self.track(CACHE_EVICTED_EVENT, Some(key_properties(key)));
    }

    fn on_expire(&self, key: &str) {
        self.track(CACHE_EXPIRED_EVENT, Some(key_properties(key)));
    }
}
