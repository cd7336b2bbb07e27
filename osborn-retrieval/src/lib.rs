//! Osborn Retrieval - Read-Through Case Ranking
//!
//! Composes the pieces of the workspace into the request path:
//!
//! ```text
//! query + candidates
//!     │
//!     ▼
//! RequestFingerprint ──→ BoundedTtlCache ──hit──→ cached matches
//!                              │
//!                             miss
//!                              ▼
//!                 Timer::measure(rank_candidates)
//!                              │
//!                              ▼
//!                  cache.set + EventLog::track
//! ```
//!
//! All collaborators are passed in explicitly; nothing here is global.

mod matches;
mod retriever;

pub use matches::{CaseMatch, Retrieval};
pub use retriever::{
    CaseRetriever, RANKING_TIMER, RETRIEVAL_CACHE_HIT_EVENT, RETRIEVAL_COMPUTED_EVENT,
    RETRIEVAL_SLOW_EVENT,
};
