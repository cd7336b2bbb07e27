//! The bounded TTL cache.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

use osborn_core::CacheSettings;

use super::clock::{Clock, SystemClock};
use super::entry::CacheEntry;
use super::traits::{CacheObserver, CacheStats};

struct CacheState<V> {
    entries: HashMap<String, CacheEntry<V>>,
    /// Incremented on every insert and live read.
    access_seq: u64,
    hits: u64,
    misses: u64,
    evictions: u64,
}

impl<V> CacheState<V> {
    fn new() -> Self {
        Self {
            entries: HashMap::new(),
            access_seq: 0,
            hits: 0,
            misses: 0,
            evictions: 0,
        }
    }

    fn next_seq(&mut self) -> u64 {
        self.access_seq += 1;
        self.access_seq
    }

    /// Remove the least recently accessed entry, returning its key.
    fn evict_lru(&mut self) -> Option<String> {
        let oldest = self
            .entries
            .values()
            .min_by_key(|entry| entry.recency())
            .map(|entry| entry.key.clone())?;
        self.entries.remove(&oldest);
        self.evictions += 1;
        Some(oldest)
    }
}

/// Keyed store with a capacity limit, per-entry expiry and LRU eviction.
///
/// All methods take `&self`. The whole store sits behind one mutex, so an
/// eviction scan and the insert that needed it happen as one step: two
/// concurrent inserts can never both evict against the same view or push
/// the cache past `max_size`.
///
/// Values are moved in on `set` and cloned out on `get`; no reference to
/// stored data outlives a `delete`, `clear` or eviction. Wrap large values
/// in `Arc` to make the clone cheap.
pub struct BoundedTtlCache<V> {
    state: Mutex<CacheState<V>>,
    max_size: usize,
    default_ttl: Duration,
    clock: Arc<dyn Clock>,
    observer: Option<Arc<dyn CacheObserver>>,
}

impl<V> fmt::Debug for BoundedTtlCache<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BoundedTtlCache")
            .field("max_size", &self.max_size)
            .field("default_ttl", &self.default_ttl)
            .field("len", &self.len())
            .field("clock", &self.clock)
            .field("observed", &self.observer.is_some())
            .finish()
    }
}

impl<V> BoundedTtlCache<V> {
    /// Create a cache on the system clock with no observer.
    ///
    /// `max_size = 0` is allowed and produces a cache that retains nothing.
    pub fn new(max_size: usize, default_ttl: Duration) -> Self {
        Self {
            state: Mutex::new(CacheState::new()),
            max_size,
            default_ttl,
            clock: Arc::new(SystemClock),
            observer: None,
        }
    }

    pub fn from_settings(settings: &CacheSettings) -> Self {
        Self::new(settings.max_size, settings.default_ttl())
    }

    /// Use `clock` for all expiry and access times.
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Notify `observer` of evictions and expiry reaps.
    pub fn with_observer(mut self, observer: Arc<dyn CacheObserver>) -> Self {
        self.observer = Some(observer);
        self
    }

    pub fn max_size(&self) -> usize {
        self.max_size
    }

    pub fn default_ttl(&self) -> Duration {
        self.default_ttl
    }

    fn lock(&self) -> MutexGuard<'_, CacheState<V>> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Store `value` under `key`, expiring after `ttl` (or the default TTL).
    ///
    /// Inserting a new key into a full cache evicts the least recently
    /// accessed entry first. Overwriting an existing key never evicts and
    /// resets its creation time, access time and expiry. A TTL too large to
    /// represent is treated as "never expires".
    pub fn set(&self, key: impl Into<String>, value: V, ttl: Option<Duration>) {
        let key = key.into();
        let now = self.clock.now();
        let expiry = now.checked_add(ttl.unwrap_or(self.default_ttl));

        let evicted = {
            let mut guard = self.lock();
            let state = &mut *guard;

            let evicted = if state.entries.len() >= self.max_size && !state.entries.contains_key(&key) {
                state.evict_lru()
            } else {
                None
            };

            if self.max_size > 0 {
                let seq = state.next_seq();
                state
                    .entries
                    .insert(key.clone(), CacheEntry::new(key, value, expiry, now, seq));
            }
            evicted
        };

        if let Some(evicted) = evicted {
            tracing::debug!(key = %evicted, max_size = self.max_size, "cache entry evicted");
            if let Some(observer) = &self.observer {
                observer.on_evict(&evicted);
            }
        }
    }

    /// Remove `key`, reporting whether anything was removed.
    pub fn delete(&self, key: &str) -> bool {
        self.lock().entries.remove(key).is_some()
    }

    /// Remove every entry and reset the hit/miss/eviction counters.
    pub fn clear(&self) {
        let mut state = self.lock();
        state.entries.clear();
        state.hits = 0;
        state.misses = 0;
        state.evictions = 0;
    }

    /// True if `key` is stored and unexpired. Does not count as an access
    /// and does not reap.
    pub fn contains(&self, key: &str) -> bool {
        let now = self.clock.now();
        self.lock()
            .entries
            .get(key)
            .is_some_and(|entry| !entry.is_expired(now))
    }

    /// Number of stored entries, expired-but-unreaped ones included.
    pub fn len(&self) -> usize {
        self.lock().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().entries.is_empty()
    }

    /// Sorted snapshot of stored keys.
    pub fn keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.lock().entries.keys().cloned().collect();
        keys.sort();
        keys
    }

    /// Remove every expired entry now, returning how many were removed.
    ///
    /// Only runs when called; the cache never sweeps on its own.
    pub fn purge_expired(&self) -> usize {
        let now = self.clock.now();
        let reaped: Vec<String> = {
            let mut state = self.lock();
            let expired: Vec<String> = state
                .entries
                .values()
                .filter(|entry| entry.is_expired(now))
                .map(|entry| entry.key.clone())
                .collect();
            for key in &expired {
                state.entries.remove(key);
            }
            expired
        };

        for key in &reaped {
            self.notify_expired(key);
        }
        reaped.len()
    }

    /// Snapshot of size, capacity, unreaped expired entries and counters.
    pub fn stats(&self) -> CacheStats {
        let now = self.clock.now();
        let state = self.lock();
        CacheStats {
            size: state.entries.len(),
            max_size: self.max_size,
            expired: state
                .entries
                .values()
                .filter(|entry| entry.is_expired(now))
                .count(),
            hits: state.hits,
            misses: state.misses,
            evictions: state.evictions,
        }
    }

    fn notify_expired(&self, key: &str) {
        tracing::debug!(key, "cache entry expired");
        if let Some(observer) = &self.observer {
            observer.on_expire(key);
        }
    }
}

impl<V: Clone> BoundedTtlCache<V> {
    /// Look up `key`.
    ///
    /// An expired entry is removed and reported absent. A live hit refreshes
    /// the entry's last access time.
    pub fn get(&self, key: &str) -> Option<V> {
        let now = self.clock.now();
        let mut guard = self.lock();
        let state = &mut *guard;

        let expired = match state.entries.get(key) {
            None => {
                state.misses += 1;
                return None;
            }
            Some(entry) => entry.is_expired(now),
        };

        if expired {
            state.entries.remove(key);
            state.misses += 1;
            drop(guard);
            self.notify_expired(key);
            return None;
        }

        let seq = state.next_seq();
        let entry = state.entries.get_mut(key)?;
        entry.touch(now, seq);
        state.hits += 1;
        Some(entry.value.clone())
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::ManualClock;

    fn manual_cache(max_size: usize, ttl_ms: u64) -> (BoundedTtlCache<i32>, Arc<ManualClock>) {
        let clock = Arc::new(ManualClock::new());
        let cache = BoundedTtlCache::new(max_size, Duration::from_millis(ttl_ms)).with_clock(clock.clone());
        (cache, clock)
    }

    #[test]
    fn test_set_then_get_round_trip() {
        let (cache, _) = manual_cache(10, 1000);
        cache.set("a", 1, None);
        assert_eq!(cache.get("a"), Some(1));
        assert_eq!(cache.get("missing"), None);
    }

    #[test]
    fn test_entry_expires_after_default_ttl() {
        let (cache, clock) = manual_cache(10, 1000);
        cache.set("a", 1, None);
        clock.advance(Duration::from_millis(999));
        assert_eq!(cache.get("a"), Some(1));
        clock.advance(Duration::from_millis(1));
        assert_eq!(cache.get("a"), None);
        assert_eq!(cache.len(), 0);
    }

    #[test]
    fn test_explicit_ttl_overrides_default() {
        let (cache, clock) = manual_cache(10, 1000);
        cache.set("short", 1, Some(Duration::from_millis(10)));
        cache.set("long", 2, Some(Duration::from_secs(60)));
        clock.advance(Duration::from_secs(5));
        assert_eq!(cache.get("short"), None);
        assert_eq!(cache.get("long"), Some(2));
    }

    #[test]
    fn test_zero_ttl_is_immediately_unreadable() {
        let (cache, _) = manual_cache(10, 1000);
        cache.set("a", 1, Some(Duration::ZERO));
        assert_eq!(cache.get("a"), None);
    }

    #[test]
    fn test_zero_ttl_on_system_clock() {
        let cache = BoundedTtlCache::new(10, Duration::from_secs(60));
        cache.set("a", 1, Some(Duration::ZERO));
        assert_eq!(cache.get("a"), None);
    }

    #[test]
    fn test_huge_ttl_never_expires() {
        let (cache, clock) = manual_cache(10, 1000);
        cache.set("forever", 1, Some(Duration::MAX));
        clock.advance(Duration::from_secs(365 * 86_400));
        assert_eq!(cache.get("forever"), Some(1));
    }

    #[test]
    fn test_expiry_is_lazy() {
        let (cache, clock) = manual_cache(10, 1000);
        cache.set("a", 1, None);
        cache.set("b", 2, None);
        clock.advance(Duration::from_secs(2));

        let stats = cache.stats();
        assert_eq!(stats.size, 2);
        assert_eq!(stats.expired, 2);
        assert!(!cache.contains("a"));

        assert_eq!(cache.get("a"), None);
        let stats = cache.stats();
        assert_eq!(stats.size, 1);
        assert_eq!(stats.expired, 1);
    }

    #[test]
    fn test_end_to_end_lru_scenario() {
        let (cache, clock) = manual_cache(2, 1000);
        cache.set("a", 1, None);
        clock.advance(Duration::from_millis(1));
        cache.set("b", 2, None);
        clock.advance(Duration::from_millis(1));
        assert_eq!(cache.get("a"), Some(1));
        clock.advance(Duration::from_millis(1));
        cache.set("c", 3, None);

        assert_eq!(cache.get("b"), None);
        assert_eq!(cache.get("a"), Some(1));
        assert_eq!(cache.get("c"), Some(3));
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn test_lru_tie_break_without_clock_movement() {
        // All operations at the same instant: access order still decides.
        let (cache, _) = manual_cache(2, 1000);
        cache.set("a", 1, None);
        cache.set("b", 2, None);
        assert_eq!(cache.get("a"), Some(1));
        cache.set("c", 3, None);
        assert_eq!(cache.keys(), vec!["a".to_string(), "c".to_string()]);
    }

    #[test]
    fn test_overwrite_at_capacity_does_not_evict() {
        let (cache, clock) = manual_cache(2, 1000);
        cache.set("a", 1, None);
        cache.set("b", 2, None);
        cache.set("a", 10, None);
        assert_eq!(cache.len(), 2);
        assert_eq!(cache.get("a"), Some(10));
        assert_eq!(cache.get("b"), Some(2));
        assert_eq!(cache.stats().evictions, 0);

        // Overwrite also resets expiry.
        clock.advance(Duration::from_millis(800));
        cache.set("b", 20, None);
        clock.advance(Duration::from_millis(800));
        assert_eq!(cache.get("a"), None);
        assert_eq!(cache.get("b"), Some(20));
    }

    #[test]
    fn test_overwrite_resets_created() {
        let (cache, clock) = manual_cache(2, 1000);
        cache.set("a", 1, None);
        let first_id = cache.lock().entries["a"].id;
        clock.advance(Duration::from_millis(5));
        cache.set("a", 2, None);

        let state = cache.lock();
        let entry = &state.entries["a"];
        assert_ne!(entry.id, first_id);
        assert_eq!(entry.created, entry.last_accessed);
    }

    #[test]
    fn test_get_refreshes_last_accessed() {
        let (cache, clock) = manual_cache(2, 1000);
        cache.set("a", 1, None);
        clock.advance(Duration::from_millis(40));
        cache.get("a");
        let state = cache.lock();
        let entry = &state.entries["a"];
        assert_eq!(entry.last_accessed - entry.created, Duration::from_millis(40));
    }

    #[test]
    fn test_zero_capacity_retains_nothing() {
        let (cache, _) = manual_cache(0, 1000);
        cache.set("a", 1, None);
        cache.set("b", 2, None);
        assert!(cache.is_empty());
        assert_eq!(cache.get("a"), None);
        assert_eq!(cache.stats().max_size, 0);
    }

    #[test]
    fn test_delete_reports_removal() {
        let (cache, _) = manual_cache(2, 1000);
        cache.set("a", 1, None);
        assert!(cache.delete("a"));
        assert!(!cache.delete("a"));
        assert_eq!(cache.get("a"), None);
    }

    #[test]
    fn test_clear_empties_and_resets_counters() {
        let (cache, _) = manual_cache(2, 1000);
        cache.set("a", 1, None);
        cache.get("a");
        cache.get("b");
        cache.clear();
        let stats = cache.stats();
        assert_eq!(stats.size, 0);
        assert_eq!(stats.hits, 0);
        assert_eq!(stats.misses, 0);
    }

    #[test]
    fn test_stats_counts_hits_and_misses() {
        let (cache, _) = manual_cache(3, 1000);
        cache.set("a", 1, None);
        cache.get("a");
        cache.get("a");
        cache.get("a");
        cache.get("nope");

        let stats = cache.stats();
        assert_eq!(stats.hits, 3);
        assert_eq!(stats.misses, 1);
        assert!((stats.hit_rate() - 0.75).abs() < 1e-9);
        assert_eq!(stats.max_size, 3);
    }

    #[test]
    fn test_contains_does_not_touch() {
        let (cache, clock) = manual_cache(2, 1000);
        cache.set("a", 1, None);
        clock.advance(Duration::from_millis(1));
        cache.set("b", 2, None);
        clock.advance(Duration::from_millis(1));
        assert!(cache.contains("a"));
        cache.set("c", 3, None);
        assert!(!cache.contains("a"));
        assert_eq!(cache.stats().hits, 0);
    }

    #[test]
    fn test_purge_expired_removes_only_expired() {
        let (cache, clock) = manual_cache(10, 1000);
        cache.set("old", 1, None);
        clock.advance(Duration::from_millis(500));
        cache.set("new", 2, None);
        clock.advance(Duration::from_millis(600));

        assert_eq!(cache.purge_expired(), 1);
        assert_eq!(cache.keys(), vec!["new".to_string()]);
        assert_eq!(cache.stats().expired, 0);
    }

    #[test]
    fn test_from_settings() {
        let settings = CacheSettings::default().with_max_size(7);
        let cache: BoundedTtlCache<i32> = BoundedTtlCache::from_settings(&settings);
        assert_eq!(cache.max_size(), 7);
        assert_eq!(cache.default_ttl(), Duration::from_secs(300));
    }

    #[test]
    fn test_concurrent_inserts_never_exceed_capacity() {
        let cache = Arc::new(BoundedTtlCache::new(16, Duration::from_secs(60)));
        let workers: Vec<_> = (0..8)
            .map(|worker| {
                let cache = Arc::clone(&cache);
                std::thread::spawn(move || {
                    for i in 0..200 {
                        cache.set(format!("{}-{}", worker, i), i, None);
                        assert!(cache.len() <= 16);
                    }
                })
            })
            .collect();
        for worker in workers {
            worker.join().unwrap();
        }
        assert_eq!(cache.len(), 16);
        assert_eq!(cache.stats().evictions, 8 * 200 - 16);
    }
}
