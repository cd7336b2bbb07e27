//! Osborn Core - Similarity Scoring and Ranking
//!
//! Pure building blocks of case retrieval. Every other crate in the
//! workspace depends on this one:
//! - identity helpers (UUIDv7 ids, timestamps, content hashes)
//! - the error taxonomy for the few fallible operations
//! - configuration loaded from TOML
//! - the three similarity signals and their weighted composite
//! - the ranking engine that filters and orders candidate cases

mod case;
mod config;
mod error;
mod identity;
mod ranking;
mod similarity;

pub use case::{CaseRecord, Rankable};
pub use config::{AnalyticsSettings, CacheSettings, OsbornConfig, RankingSettings, RetrievalSettings};
pub use error::{ConfigError, OsbornError, OsbornResult, ValidationError, VectorError};
pub use identity::{compute_content_hash, new_entity_id, ContentHash, EntityId, Timestamp};
pub use ranking::{
    find_most_similar, find_most_similar_text, find_most_similar_weighted, no_tags,
    rank_candidates, RankedMatch, DEFAULT_THRESHOLD,
};
pub use similarity::{
    comprehensive_similarity, cosine_similarity, tag_similarity, text_similarity, tokenize,
    try_cosine_similarity, SimilarityWeights,
};
