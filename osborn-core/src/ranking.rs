//! Ranking engine: score every candidate, keep those above a threshold,
//! order best-first.
//!
//! The query contributes text only. Its tag list is always empty, so the tag
//! signal of the composite is 0 unless a caller folds tags into the query
//! text.

use crate::{comprehensive_similarity, Rankable, RankingSettings, SimilarityWeights};

/// Minimum composite score returned when the caller does not choose one.
pub const DEFAULT_THRESHOLD: f64 = 0.3;

/// Tags supplied on the query side of every comparison.
const QUERY_TAGS: &[&str] = &[];

/// A candidate that cleared the threshold, borrowed from the caller's input.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RankedMatch<'a, T> {
    pub item: &'a T,
    pub similarity: f64,
}

/// Tag accessor for candidates that carry no tags.
pub fn no_tags<T>(_item: &T) -> &[String] {
    &[]
}

/// Rank `items` against `query` using the default signal weights.
///
/// Returns matches with `similarity >= threshold`, highest first. Equal
/// scores keep their input order. An empty input or a threshold nothing
/// reaches yields an empty vector.
pub fn find_most_similar<'a, T, I, S, FT, FG, G>(
    query: &str,
    items: I,
    get_text: FT,
    get_tags: FG,
    threshold: f64,
) -> Vec<RankedMatch<'a, T>>
where
    T: 'a,
    I: IntoIterator<Item = &'a T>,
    S: AsRef<str>,
    FT: Fn(&'a T) -> S,
    FG: Fn(&'a T) -> G,
    G: IntoIterator,
    G::Item: AsRef<str>,
{
    find_most_similar_weighted(
        query,
        items,
        get_text,
        get_tags,
        threshold,
        &SimilarityWeights::default(),
    )
}

/// [`find_most_similar`] with explicit signal weights.
pub fn find_most_similar_weighted<'a, T, I, S, FT, FG, G>(
    query: &str,
    items: I,
    get_text: FT,
    get_tags: FG,
    threshold: f64,
    weights: &SimilarityWeights,
) -> Vec<RankedMatch<'a, T>>
where
    T: 'a,
    I: IntoIterator<Item = &'a T>,
    S: AsRef<str>,
    FT: Fn(&'a T) -> S,
    FG: Fn(&'a T) -> G,
    G: IntoIterator,
    G::Item: AsRef<str>,
{
    let mut matches: Vec<RankedMatch<'a, T>> = items
        .into_iter()
        .map(|item| {
            let tags: Vec<G::Item> = get_tags(item).into_iter().collect();
            RankedMatch {
                item,
                similarity: comprehensive_similarity(
                    query,
                    get_text(item).as_ref(),
                    QUERY_TAGS,
                    &tags,
                    weights,
                ),
            }
        })
        .filter(|m| m.similarity >= threshold)
        .collect();

    // sort_by is stable: ties keep input order.
    matches.sort_by(|a, b| b.similarity.total_cmp(&a.similarity));
    matches
}

/// Rank by text alone with the default threshold.
pub fn find_most_similar_text<'a, T, I, S, FT>(
    query: &str,
    items: I,
    get_text: FT,
) -> Vec<RankedMatch<'a, T>>
where
    T: 'a,
    I: IntoIterator<Item = &'a T>,
    S: AsRef<str>,
    FT: Fn(&'a T) -> S,
{
    find_most_similar(query, items, get_text, no_tags::<T>, DEFAULT_THRESHOLD)
}

/// Rank any [`Rankable`] collection with the given settings.
pub fn rank_candidates<'a, T, I>(
    query: &str,
    items: I,
    settings: &RankingSettings,
) -> Vec<RankedMatch<'a, T>>
where
    T: Rankable + 'a,
    I: IntoIterator<Item = &'a T>,
{
    find_most_similar_weighted(
        query,
        items,
        T::rank_text,
        T::rank_tags,
        settings.threshold,
        &settings.weights,
    )
}

// =============================================================================
// TESTS
// =============================================================================
