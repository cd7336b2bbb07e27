//! Similarity signals used to rank candidate cases.
//!
//! Every function here is pure. Degenerate input (empty token sets,
//! mismatched vector lengths, zero magnitudes) scores 0 rather than
//! failing, so a bad candidate only ranks low instead of aborting a query.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::{OsbornResult, ValidationError, VectorError};

/// Weights applied to each signal by [`comprehensive_similarity`].
///
/// The composite is a plain weighted sum, not normalised by the weight
/// total. Weights that do not sum to 1.0 shift the score scale, and
/// thresholds must be chosen with that in mind.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SimilarityWeights {
    pub text: f64,
    pub tags: f64,
}

impl Default for SimilarityWeights {
    fn default() -> Self {
        Self {
            text: 0.6,
            tags: 0.4,
        }
    }
}

impl SimilarityWeights {
    pub fn new(text: f64, tags: f64) -> Self {
        Self { text, tags }
    }

    /// Sum of both weights; the upper bound of any composite score.
    pub fn total(&self) -> f64 {
        self.text + self.tags
    }

    /// Check that each weight is a finite number in `[0, 1]`.
    pub fn validate(&self) -> OsbornResult<()> {
        for (field, value) in [("weights.text", self.text), ("weights.tags", self.tags)] {
            if !value.is_finite() || !(0.0..=1.0).contains(&value) {
                return Err(ValidationError::InvalidValue {
                    field: field.to_string(),
                    reason: format!("{} is outside [0, 1]", value),
                }
                .into());
            }
        }
        Ok(())
    }
}

// ============================================================================
// TOKENIZATION
// ============================================================================

fn is_separator(c: char) -> bool {
    c.is_whitespace() || c == '-' || c == '_'
}

/// Split text into its set of lower-cased word tokens.
///
/// Words are separated by whitespace, hyphens and underscores. Tokens of a
/// single character carry no signal and are dropped.
pub fn tokenize(text: &str) -> HashSet<String> {
    text.to_lowercase()
        .split(is_separator)
        .filter(|word| word.chars().count() > 1)
        .map(str::to_string)
        .collect()
}

/// Jaccard index of two sets. Empty on either side scores 0, never 1.
fn jaccard(a: &HashSet<String>, b: &HashSet<String>) -> f64 {
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }
    let intersection = a.intersection(b).count();
    let union = a.len() + b.len() - intersection;
    intersection as f64 / union as f64
}

// ============================================================================
// SIGNALS
// ============================================================================

/// Word-overlap similarity of two texts (Jaccard index over [`tokenize`]).
pub fn text_similarity(a: &str, b: &str) -> f64 {
    jaccard(&tokenize(a), &tokenize(b))
}

/// Cosine similarity that reports why a comparison is meaningless.
///
/// Fails on length mismatch or non-finite components. A zero-magnitude
/// vector is not an error and scores 0.
pub fn try_cosine_similarity(v1: &[f64], v2: &[f64]) -> OsbornResult<f64> {
    if v1.len() != v2.len() {
        return Err(VectorError::DimensionMismatch {
            expected: v1.len(),
            got: v2.len(),
        }
        .into());
    }
    if v1.iter().chain(v2.iter()).any(|x| !x.is_finite()) {
        return Err(VectorError::InvalidVector {
            reason: "vector contains a non-finite component".to_string(),
        }
        .into());
    }

    let mut dot_product = 0.0f64;
    let mut norm_a = 0.0f64;
    let mut norm_b = 0.0f64;

    for (a, b) in v1.iter().zip(v2.iter()) {
        dot_product += a * b;
        norm_a += a * a;
        norm_b += b * b;
    }

    let norm_a = norm_a.sqrt();
    let norm_b = norm_b.sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        return Ok(0.0);
    }

    Ok(dot_product / (norm_a * norm_b))
}

/// Cosine similarity of two equal-length vectors, or 0 when undefined.
pub fn cosine_similarity(v1: &[f64], v2: &[f64]) -> f64 {
    try_cosine_similarity(v1, v2).unwrap_or(0.0)
}

/// Case-insensitive Jaccard index over literal tags.
///
/// Tags are compared whole; "smart-home" does not match "home".
pub fn tag_similarity<A, B>(tags1: &[A], tags2: &[B]) -> f64
where
    A: AsRef<str>,
    B: AsRef<str>,
{
    if tags1.is_empty() || tags2.is_empty() {
        return 0.0;
    }
    let set1: HashSet<String> = tags1.iter().map(|t| t.as_ref().to_lowercase()).collect();
    let set2: HashSet<String> = tags2.iter().map(|t| t.as_ref().to_lowercase()).collect();
    jaccard(&set1, &set2)
}

/// Weighted sum of text and tag similarity.
pub fn comprehensive_similarity<A, B>(
    text1: &str,
    text2: &str,
    tags1: &[A],
    tags2: &[B],
    weights: &SimilarityWeights,
) -> f64
where
    A: AsRef<str>,
    B: AsRef<str>,
{
    text_similarity(text1, text2) * weights.text + tag_similarity(tags1, tags2) * weights.tags
}

// =============================================================================
// TESTS
// =============================================================================
