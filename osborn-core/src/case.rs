//! Candidate case records fed into the ranking engine.

use serde::{Deserialize, Serialize};

/// A previously analysed case that a query can be matched against.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CaseRecord {
    pub id: String,
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub industry: Option<String>,
}

impl CaseRecord {
    pub fn new(id: impl Into<String>, title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            description: description.into(),
            tags: Vec::new(),
            industry: None,
        }
    }

    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_industry(mut self, industry: impl Into<String>) -> Self {
        self.industry = Some(industry.into());
        self
    }
}

/// Anything that exposes a description and tags for ranking.
///
/// Implementing this lets a collection be ranked with
/// [`crate::rank_candidates`] instead of passing accessor closures.
pub trait Rankable {
    /// Text compared against the query.
    fn rank_text(&self) -> String;

    /// Tags compared in the tag signal.
    fn rank_tags(&self) -> &[String];
}

impl Rankable for CaseRecord {
    /// Title and description together, so a query matching either scores.
    fn rank_text(&self) -> String {
        format!("{} {}", self.title, self.description)
    }

    fn rank_tags(&self) -> &[String] {
        &self.tags
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_case_record_builders() {
        let case = CaseRecord::new("case-2", "Electric vehicles", "Replacing combustion drivetrains")
            .with_tags(["energy", "mobility"])
            .with_industry("manufacturing");
        assert_eq!(case.tags, vec!["energy".to_string(), "mobility".to_string()]);
        assert_eq!(case.industry.as_deref(), Some("manufacturing"));
    }

    #[test]
    fn test_rank_text_joins_title_and_description() {
        let case = CaseRecord::new("case-1", "Smartphone", "From feature phones to touch screens");
        assert_eq!(case.rank_text(), "Smartphone From feature phones to touch screens");
        assert!(case.rank_tags().is_empty());
    }

    #[test]
    fn test_case_record_deserializes_without_optional_fields() {
        let json = r#"{"id":"case-9","title":"Drone delivery","description":"Parcels by air"}"#;
        let case: CaseRecord = serde_json::from_str(json).unwrap();
        assert!(case.tags.is_empty());
        assert!(case.industry.is_none());
    }
}
