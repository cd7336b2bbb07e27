//! Bounded, time-expiring cache keyed by request fingerprint.
//!
//! # Expiry
//!
//! Expiry is lazy. An expired entry stays in the store until it is read,
//! evicted by capacity pressure, or removed by an explicit
//! [`BoundedTtlCache::purge_expired`] call. There is no background sweep,
//! which is why [`CacheStats::expired`] can be non-zero.
//!
//! # Eviction
//!
//! Inserting a new key into a full cache first evicts the entry with the
//! oldest last access (LRU), found by a full scan:
//!
//! ```text
//! max_size = 2
//! set a, set b, get a, set c  →  b evicted, {a, c} remain
//! ```
//!
//! # Example
//!
//! ```ignore
//! let cache = BoundedTtlCache::new(100, Duration::from_secs(300));
//! let key = RequestFingerprint::new("Smart lamp").with_kind("ranking").key();
//! if cache.get(&key).is_none() {
//!     cache.set(key, compute(), None);
//! }
//! ```

mod bounded;
mod clock;
mod entry;
mod fingerprint;
mod traits;

pub use bounded::BoundedTtlCache;
pub use clock::{Clock, ManualClock, SystemClock};
pub use entry::CacheEntry;
pub use fingerprint::RequestFingerprint;
pub use traits::{CacheObserver, CacheStats, CACHE_EVICTED_EVENT, CACHE_EXPIRED_EVENT};
