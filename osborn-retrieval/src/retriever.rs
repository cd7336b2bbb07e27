//! The read-through case retriever.

use std::sync::Arc;
use std::time::Duration;

use osborn_core::{compute_content_hash, rank_candidates, CaseRecord, OsbornConfig, OsbornResult};
use osborn_events::{EventLog, Properties};
use osborn_storage::{BoundedTtlCache, CacheObserver, RequestFingerprint};
use osborn_telemetry::Timer;
use serde_json::json;

use crate::{CaseMatch, Retrieval};

/// Tracked when a request is answered from the cache.
pub const RETRIEVAL_CACHE_HIT_EVENT: &str = "retrieval_cache_hit";

/// Tracked after every ranking computation.
pub const RETRIEVAL_COMPUTED_EVENT: &str = "retrieval_computed";

/// Tracked when a ranking took longer than the configured slow threshold.
pub const RETRIEVAL_SLOW_EVENT: &str = "retrieval_slow";

/// Timer name for ranking computations.
pub const RANKING_TIMER: &str = "case_ranking";

const FINGERPRINT_KIND: &str = "case_ranking";

// Separates fields inside the candidate digest input.
const UNIT_SEPARATOR: char = '\u{1f}';
const RECORD_SEPARATOR: char = '\u{1e}';

type MatchCache = BoundedTtlCache<Arc<Vec<CaseMatch>>>;

/// Ranks candidate cases against a query, caching results per request.
///
/// Two calls with the same query (ignoring case and surrounding
/// whitespace), the same ranking settings and the same candidates resolve
/// to the same cache key. Any change to a candidate's id, text or tags
/// produces a different key, so stale rankings are never served for an
/// edited library; they simply age out.
///
/// # Example
///
/// ```ignore
/// let retriever = CaseRetriever::from_config(OsbornConfig::default())?;
/// let first = retriever.retrieve("solar charger", &cases);
/// let again = retriever.retrieve("Solar Charger", &cases);
/// assert!(again.was_cache_hit);
/// ```
#[derive(Debug)]
pub struct CaseRetriever {
    cache: Arc<MatchCache>,
    events: Arc<EventLog>,
    timer: Arc<Timer>,
    config: OsbornConfig,
}

impl CaseRetriever {
    /// Assemble a retriever from existing collaborators.
    ///
    /// The caller owns the wiring; `config.cache` is not consulted here
    /// because the cache is already built.
    pub fn new(
        cache: Arc<MatchCache>,
        events: Arc<EventLog>,
        timer: Arc<Timer>,
        config: OsbornConfig,
    ) -> Self {
        Self {
            cache,
            events,
            timer,
            config,
        }
    }

    /// Validate `config` and build fresh collaborators from it.
    ///
    /// Cache evictions and expiry reaps are reported to the event log.
    pub fn from_config(config: OsbornConfig) -> OsbornResult<Self> {
        config.validate()?;

        let events = Arc::new(EventLog::with_settings(&config.analytics));
        let observer: Arc<dyn CacheObserver> = events.clone();
        let cache = Arc::new(BoundedTtlCache::from_settings(&config.cache).with_observer(observer));

        Ok(Self::new(cache, events, Arc::new(Timer::new()), config))
    }

    pub fn config(&self) -> &OsbornConfig {
        &self.config
    }

    pub fn cache(&self) -> &MatchCache {
        &self.cache
    }

    pub fn events(&self) -> &EventLog {
        &self.events
    }

    pub fn timer(&self) -> &Timer {
        &self.timer
    }

    /// Fingerprint identifying a request: query, ranking settings and a
    /// digest of the candidate set.
    pub fn fingerprint(&self, query: &str, candidates: &[CaseRecord]) -> RequestFingerprint {
        let ranking = &self.config.ranking;
        RequestFingerprint::new(query)
            .with_kind(FINGERPRINT_KIND)
            .with_param("threshold", ranking.threshold)
            .with_param("text_weight", ranking.weights.text)
            .with_param("tag_weight", ranking.weights.tags)
            .with_param("candidates", candidate_digest(candidates))
    }

    /// Rank `candidates` against `query`, answering from the cache when
    /// the same request was ranked recently.
    pub fn retrieve(&self, query: &str, candidates: &[CaseRecord]) -> Retrieval {
        let key = self.fingerprint(query, candidates).key();

        if let Some(matches) = self.cache.get(&key) {
            tracing::debug!(%key, result_count = matches.len(), "retrieval cache hit");
            self.events.track(
                RETRIEVAL_CACHE_HIT_EVENT,
                Some(properties([("key", json!(key)), ("result_count", json!(matches.len()))])),
            );
            return Retrieval {
                matches,
                was_cache_hit: true,
                elapsed: Duration::ZERO,
                key,
            };
        }

        let (matches, elapsed) = self.timer.measure(RANKING_TIMER, || {
            rank_candidates(query, candidates, &self.config.ranking)
                .into_iter()
                .map(CaseMatch::from)
                .collect::<Vec<_>>()
        });
        let matches = Arc::new(matches);

        self.cache
            .set(key.clone(), Arc::clone(&matches), self.config.retrieval.result_ttl());
        tracing::debug!(
            %key,
            candidate_count = candidates.len(),
            result_count = matches.len(),
            duration_ms = elapsed.as_millis() as u64,
            "retrieval computed"
        );
        self.record_computed(&key, elapsed, matches.len());

        Retrieval {
            matches,
            was_cache_hit: false,
            elapsed,
            key,
        }
    }

    /// Drop any cached ranking for this request. Returns whether one existed.
    pub fn invalidate(&self, query: &str, candidates: &[CaseRecord]) -> bool {
        let key = self.fingerprint(query, candidates).key();
        let removed = self.cache.delete(&key);
        if removed {
            tracing::debug!(%key, "retrieval invalidated");
        }
        removed
    }

    fn record_computed(&self, key: &str, elapsed: Duration, result_count: usize) {
        let duration_ms = elapsed.as_millis() as u64;
        self.events.track(
            RETRIEVAL_COMPUTED_EVENT,
            Some(properties([
                ("key", json!(key)),
                ("duration_ms", json!(duration_ms)),
                ("result_count", json!(result_count)),
            ])),
        );

        let slow_threshold = self.config.retrieval.slow_threshold();
        if elapsed > slow_threshold {
            let threshold_ms = slow_threshold.as_millis() as u64;
            tracing::warn!(key, duration_ms, threshold_ms, "slow case ranking");
            self.events.track(
                RETRIEVAL_SLOW_EVENT,
                Some(properties([
                    ("key", json!(key)),
                    ("duration_ms", json!(duration_ms)),
                    ("threshold_ms", json!(threshold_ms)),
                ])),
            );
        }
    }
}

fn properties<const N: usize>(pairs: [(&str, serde_json::Value); N]) -> Properties {
    pairs
        .into_iter()
        .map(|(k, v)| (k.to_string(), v))
        .collect()
}

/// Hex SHA-256 over every candidate's id, text and tags, in input order.
fn candidate_digest(candidates: &[CaseRecord]) -> String {
    let mut buffer = String::new();
    for case in candidates {
        for field in [&case.id, &case.title, &case.description] {
            buffer.push_str(field);
            buffer.push(UNIT_SEPARATOR);
        }
        for tag in &case.tags {
            buffer.push_str(tag);
            buffer.push(UNIT_SEPARATOR);
        }
        buffer.push(RECORD_SEPARATOR);
    }
    hex::encode(compute_content_hash(buffer.as_bytes()))
}

// =============================================================================
// TESTS
// =============================================================================
