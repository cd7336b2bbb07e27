//! A single cached value with its bookkeeping.

use std::time::Instant;

use osborn_core::{new_entity_id, EntityId};

/// Stored value plus expiry and access metadata.
///
/// `last_accessed >= created` always holds; both come from the cache clock.
#[derive(Debug, Clone)]
pub struct CacheEntry<V> {
    pub id: EntityId,
    pub key: String,
    pub value: V,
    /// `None` means the entry never expires.
    pub expiry: Option<Instant>,
    pub created: Instant,
    pub last_accessed: Instant,
    /// Tie-breaker for entries touched at the same instant.
    pub(crate) access_seq: u64,
}

impl<V> CacheEntry<V> {
    pub(crate) fn new(key: String, value: V, expiry: Option<Instant>, now: Instant, seq: u64) -> Self {
        Self {
            id: new_entity_id(),
            key,
            value,
            expiry,
            created: now,
            last_accessed: now,
            access_seq: seq,
        }
    }

    /// An entry is expired from its expiry instant onwards, so a zero TTL
    /// is expired immediately.
    pub fn is_expired(&self, now: Instant) -> bool {
        self.expiry.is_some_and(|expiry| now >= expiry)
    }

    pub(crate) fn touch(&mut self, now: Instant, seq: u64) {
        self.last_accessed = self.last_accessed.max(now);
        self.access_seq = seq;
    }

    /// LRU ordering key: oldest access first, then oldest touch.
    pub(crate) fn recency(&self) -> (Instant, u64) {
        (self.last_accessed, self.access_seq)
    }
}
