//! Osborn Test Utilities
//!
//! Shared test infrastructure for the Osborn workspace:
//! - Proptest generators for case records, text and tags
//! - A recording cache observer
//! - Fixtures for common scenarios
//! - Assertions for ranking output

use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

pub use osborn_core::{CaseRecord, OsbornConfig, SimilarityWeights};
pub use osborn_events::{EventLog, Properties};
pub use osborn_storage::{BoundedTtlCache, CacheObserver, ManualClock};

// ============================================================================
// RECORDING OBSERVER
// ============================================================================

/// Cache observer that remembers every notification, in order.
#[derive(Debug, Default)]
pub struct RecordingObserver {
    evicted: Mutex<Vec<String>>,
    expired: Mutex<Vec<String>>,
}

impl RecordingObserver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn evicted(&self) -> Vec<String> {
        self.evicted.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    pub fn expired(&self) -> Vec<String> {
        self.expired.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }
}

impl CacheObserver for RecordingObserver {
    fn on_evict(&self, key: &str) {
        self.evicted
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(key.to_string());
    }

    fn on_expire(&self, key: &str) {
        self.expired
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(key.to_string());
    }
}

// ============================================================================
// PROPTEST GENERATORS
// ============================================================================

pub mod generators {
    //! Proptest strategies for Osborn inputs.

    use super::*;
    use proptest::prelude::*;

    const VOCABULARY: &[&str] = &[
        "smart", "solar", "charger", "drone", "lamp", "battery", "wireless", "sensor",
        "electric", "vehicle", "phone", "home", "delivery", "health", "tracker",
    ];

    /// A single word: mostly from a shared vocabulary so texts overlap.
    pub fn arb_word() -> impl Strategy<Value = String> {
        prop_oneof![
            4 => prop::sample::select(VOCABULARY).prop_map(str::to_string),
            1 => "[a-z]{2,10}",
        ]
    }

    /// Free text of up to `max_words` words joined by mixed separators.
    pub fn arb_text(max_words: usize) -> impl Strategy<Value = String> {
        prop::collection::vec(
            (arb_word(), prop_oneof![Just(" "), Just("-"), Just("_")]),
            0..=max_words,
        )
        .prop_map(|parts| {
            parts
                .into_iter()
                .map(|(word, sep)| format!("{}{}", word, sep))
                .collect::<String>()
        })
    }

    /// Tags with mixed case so case-insensitive matching is exercised.
    pub fn arb_tags() -> impl Strategy<Value = Vec<String>> {
        prop::collection::vec(
            prop_oneof![
                prop::sample::select(VOCABULARY).prop_map(str::to_string),
                prop::sample::select(VOCABULARY).prop_map(|t| t.to_uppercase()),
                "[A-Za-z]{1,8}",
            ],
            0..6,
        )
    }

    pub fn arb_weights() -> impl Strategy<Value = SimilarityWeights> {
        (0.0f64..=1.0, 0.0f64..=1.0).prop_map(|(text, tags)| SimilarityWeights::new(text, tags))
    }

    pub fn arb_case_record() -> impl Strategy<Value = CaseRecord> {
        (
            "[a-z0-9]{4,12}",
            arb_text(4),
            arb_text(12),
            arb_tags(),
            prop::option::of(prop::sample::select(vec!["technology", "energy", "healthcare"])),
        )
            .prop_map(|(id, title, description, tags, industry)| {
                let case = CaseRecord::new(id, title, description).with_tags(tags);
                match industry {
                    Some(industry) => case.with_industry(industry),
                    None => case,
                }
            })
    }

    /// Case records with distinct ids.
    pub fn arb_case_set(max: usize) -> impl Strategy<Value = Vec<CaseRecord>> {
        prop::collection::vec(arb_case_record(), 0..=max).prop_map(|cases| {
            cases
                .into_iter()
                .enumerate()
                .map(|(i, mut case)| {
                    case.id = format!("{}-{}", case.id, i);
                    case
                })
                .collect()
        })
    }
}

// ============================================================================
// TEST FIXTURES
// ============================================================================

pub mod fixtures {
    //! Pre-built fixtures for common testing scenarios.

    use super::*;

    /// A small library of innovation cases across industries.
    ///
    /// Texts are short so that natural queries clear the default threshold.
    pub fn sample_cases() -> Vec<CaseRecord> {
        vec![
            CaseRecord::new("case-smartphone", "Smartphone", "Touchscreen phone with camera")
                .with_tags(["mobile", "touchscreen", "consumer-electronics"])
                .with_industry("technology"),
            CaseRecord::new("case-ev", "Electric vehicles", "Battery electric cars")
                .with_tags(["battery", "electric", "automotive"])
                .with_industry("automotive"),
            CaseRecord::new("case-solar-charger", "Solar phone charger", "Portable solar charger")
                .with_tags(["solar", "battery", "portable"])
                .with_industry("energy"),
            CaseRecord::new("case-drone-delivery", "Drone delivery", "Autonomous drone parcels")
                .with_tags(["drone", "logistics", "autonomous"])
                .with_industry("logistics"),
            CaseRecord::new("case-smart-lamp", "Smart lamp", "Wireless smart lamp")
                .with_tags(["smart-home", "wireless", "lighting"])
                .with_industry("technology"),
        ]
    }

    /// Config with a tiny cache and a short TTL for expiry tests.
    pub fn small_cache_config() -> OsbornConfig {
        let mut config = OsbornConfig::default();
        config.cache = config
            .cache
            .with_max_size(2)
            .with_default_ttl(Duration::from_millis(100));
        config
    }

    /// Cache on a manual clock, plus the clock to drive it.
    pub fn manual_cache<V>(max_size: usize, ttl: Duration) -> (BoundedTtlCache<V>, Arc<ManualClock>) {
        let clock = Arc::new(ManualClock::new());
        let cache = BoundedTtlCache::new(max_size, ttl).with_clock(clock.clone());
        (cache, clock)
    }

    /// Properties map from string pairs.
    pub fn properties<'a, I>(pairs: I) -> Properties
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        pairs
            .into_iter()
            .map(|(k, v)| (k.to_string(), serde_json::Value::String(v.to_string())))
            .collect()
    }

    /// Event log with `count` generic events already tracked.
    pub fn event_log_with(count: usize) -> EventLog {
        let log = EventLog::new();
        for i in 0..count {
            log.track(format!("event_{}", i % 3), None);
        }
        log
    }
}

// ============================================================================
// CUSTOM ASSERTIONS
// ============================================================================

pub mod assertions {
    //! Assertions for ranking output.

    /// Assert scores are in non-increasing order.
    pub fn assert_descending(scores: &[f64]) {
        for (i, pair) in scores.windows(2).enumerate() {
            assert!(
                pair[0] >= pair[1],
                "scores not descending at {}: {} < {}",
                i,
                pair[0],
                pair[1]
            );
        }
    }

    /// Assert every score clears `threshold`.
    pub fn assert_all_at_least(scores: &[f64], threshold: f64) {
        for score in scores {
            assert!(*score >= threshold, "score {} below threshold {}", score, threshold);
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================
