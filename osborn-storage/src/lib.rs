//! Osborn Storage - In-Memory Caching
//!
//! Holds computed artifacts (ranked results, analysis outputs) so repeated
//! requests are answered without recomputation. Nothing here persists
//! across process restarts.

pub mod cache;

pub use cache::{
    BoundedTtlCache, CacheEntry, CacheObserver, CacheStats, Clock, ManualClock,
    RequestFingerprint, SystemClock, CACHE_EVICTED_EVENT, CACHE_EXPIRED_EVENT,
};
