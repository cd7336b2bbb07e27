//! Owned ranking results.

use std::sync::Arc;
use std::time::Duration;

use osborn_core::{CaseRecord, RankedMatch};
use serde::{Deserialize, Serialize};

/// A ranked case, owned so it can outlive the candidate slice it came from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaseMatch {
    pub case: CaseRecord,
    pub similarity: f64,
}

impl From<RankedMatch<'_, CaseRecord>> for CaseMatch {
    fn from(ranked: RankedMatch<'_, CaseRecord>) -> Self {
        Self {
            case: ranked.item.clone(),
            similarity: ranked.similarity,
        }
    }
}

/// Outcome of one retrieval.
#[derive(Debug, Clone)]
pub struct Retrieval {
    /// Matches best-first. Shared with the cache entry.
    pub matches: Arc<Vec<CaseMatch>>,
    pub was_cache_hit: bool,
    /// Ranking time; zero for cache hits.
    pub elapsed: Duration,
    /// Cache key the request resolved to.
    pub key: String,
}

impl Retrieval {
    pub fn len(&self) -> usize {
        self.matches.len()
    }

    pub fn is_empty(&self) -> bool {
        self.matches.is_empty()
    }

    /// Case ids in rank order.
    pub fn case_ids(&self) -> Vec<&str> {
        self.matches.iter().map(|m| m.case.id.as_str()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_ranked_match_clones_case() {
        let case = CaseRecord::new("c1", "Smart lamp", "Wireless lamp");
        let ranked = RankedMatch {
            item: &case,
            similarity: 0.5,
        };
        let owned = CaseMatch::from(ranked);
        drop(case);
        assert_eq!(owned.case.id, "c1");
        assert_eq!(owned.similarity, 0.5);
    }

    #[test]
    fn test_case_ids_in_order() {
        let retrieval = Retrieval {
            matches: Arc::new(vec![
                CaseMatch {
                    case: CaseRecord::new("b", "B", ""),
                    similarity: 0.9,
                },
                CaseMatch {
                    case: CaseRecord::new("a", "A", ""),
                    similarity: 0.4,
                },
            ]),
            was_cache_hit: false,
            elapsed: Duration::ZERO,
            key: "k".to_string(),
        };
        assert_eq!(retrieval.case_ids(), vec!["b", "a"]);
        assert_eq!(retrieval.len(), 2);
        assert!(!retrieval.is_empty());
    }
}
