//! Configuration types
//!
//! Every section has working defaults so an empty TOML document is a valid
//! configuration. Values that are present are validated before use.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::{ConfigError, OsbornResult, SimilarityWeights, DEFAULT_THRESHOLD};

/// Bounded TTL cache sizing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CacheSettings {
    /// Maximum number of live entries. Zero is allowed and retains nothing.
    pub max_size: usize,
    /// TTL applied when `set` is called without one, in milliseconds.
    pub default_ttl_ms: u64,
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            max_size: 100,
            default_ttl_ms: 5 * 60 * 1000,
        }
    }
}

impl CacheSettings {
    pub fn default_ttl(&self) -> Duration {
        Duration::from_millis(self.default_ttl_ms)
    }

    pub fn with_max_size(mut self, max_size: usize) -> Self {
        self.max_size = max_size;
        self
    }

    pub fn with_default_ttl(mut self, ttl: Duration) -> Self {
        self.default_ttl_ms = ttl.as_millis().min(u64::MAX as u128) as u64;
        self
    }
}

/// Ranking threshold and signal weights.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RankingSettings {
    /// Minimum composite score for a candidate to be returned.
    pub threshold: f64,
    pub weights: SimilarityWeights,
}

impl Default for RankingSettings {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_THRESHOLD,
            weights: SimilarityWeights::default(),
        }
    }
}

impl RankingSettings {
    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.threshold = threshold;
        self
    }

    pub fn with_weights(mut self, weights: SimilarityWeights) -> Self {
        self.weights = weights;
        self
    }
}

/// Read-through retrieval behaviour.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RetrievalSettings {
    /// Rankings slower than this are logged and tracked as slow.
    pub slow_threshold_ms: u64,
    /// TTL for cached ranked results; the cache default when unset.
    pub result_ttl_ms: Option<u64>,
}

impl Default for RetrievalSettings {
    fn default() -> Self {
        Self {
            slow_threshold_ms: 500,
            result_ttl_ms: None,
        }
    }
}

impl RetrievalSettings {
    pub fn slow_threshold(&self) -> Duration {
        Duration::from_millis(self.slow_threshold_ms)
    }

    pub fn result_ttl(&self) -> Option<Duration> {
        self.result_ttl_ms.map(Duration::from_millis)
    }

    pub fn with_slow_threshold(mut self, threshold: Duration) -> Self {
        self.slow_threshold_ms = threshold.as_millis().min(u64::MAX as u128) as u64;
        self
    }

    pub fn with_result_ttl(mut self, ttl: Duration) -> Self {
        self.result_ttl_ms = Some(ttl.as_millis().min(u64::MAX as u128) as u64);
        self
    }
}

/// Analytics event log switches.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AnalyticsSettings {
    pub enabled: bool,
}

impl Default for AnalyticsSettings {
    fn default() -> Self {
        Self { enabled: true }
    }
}

/// Master configuration struct.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OsbornConfig {
    pub cache: CacheSettings,
    pub ranking: RankingSettings,
    pub retrieval: RetrievalSettings,
    pub analytics: AnalyticsSettings,
}

impl OsbornConfig {
    /// Parse and validate a TOML document.
    pub fn from_toml_str(source: &str) -> OsbornResult<Self> {
        let config: OsbornConfig =
            toml::from_str(source).map_err(|e| ConfigError::Toml(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a TOML file.
    pub fn from_path(path: &Path) -> OsbornResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        Self::from_toml_str(&contents)
    }

    /// Validate the configuration.
    ///
    /// Validates:
    /// - ranking.threshold is finite and >= 0
    /// - ranking weights are each in [0, 1]
    /// - retrieval.slow_threshold_ms > 0
    pub fn validate(&self) -> OsbornResult<()> {
        let threshold = self.ranking.threshold;
        if !threshold.is_finite() || threshold < 0.0 {
            return Err(ConfigError::InvalidValue {
                field: "ranking.threshold".to_string(),
                value: threshold.to_string(),
                reason: "must be a finite number >= 0".to_string(),
            }
            .into());
        }

        self.ranking.weights.validate()?;

        if self.retrieval.slow_threshold_ms == 0 {
            return Err(ConfigError::InvalidValue {
                field: "retrieval.slow_threshold_ms".to_string(),
                value: "0".to_string(),
                reason: "must be greater than 0".to_string(),
            }
            .into());
        }

        Ok(())
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::OsbornError;

    #[test]
    fn test_defaults() {
        let config = OsbornConfig::default();
        assert_eq!(config.cache.max_size, 100);
        assert_eq!(config.cache.default_ttl(), Duration::from_secs(300));
        assert_eq!(config.ranking.threshold, 0.3);
        assert_eq!(config.ranking.weights, SimilarityWeights::new(0.6, 0.4));
        assert_eq!(config.retrieval.slow_threshold(), Duration::from_millis(500));
        assert!(config.retrieval.result_ttl().is_none());
        assert!(config.analytics.enabled);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_empty_toml_is_default() {
        let config = OsbornConfig::from_toml_str("").unwrap();
        assert_eq!(config, OsbornConfig::default());
    }

    #[test]
    fn test_partial_toml_overrides() {
        let source = r#"
            [cache]
            max_size = 2
            default_ttl_ms = 1000

            [ranking]
            threshold = 0.5

            [ranking.weights]
            text = 0.8
            tags = 0.2

            [retrieval]
            result_ttl_ms = 60000

            [analytics]
            enabled = false
        "#;
        let config = OsbornConfig::from_toml_str(source).unwrap();
        assert_eq!(config.cache.max_size, 2);
        assert_eq!(config.cache.default_ttl(), Duration::from_secs(1));
        assert_eq!(config.ranking.threshold, 0.5);
        assert_eq!(config.ranking.weights, SimilarityWeights::new(0.8, 0.2));
        assert_eq!(config.retrieval.slow_threshold_ms, 500);
        assert_eq!(config.retrieval.result_ttl(), Some(Duration::from_secs(60)));
        assert!(!config.analytics.enabled);
    }

    #[test]
    fn test_partial_weights_table_keeps_other_default() {
        let config = OsbornConfig::from_toml_str("[ranking.weights]\ntext = 0.8\n").unwrap();
        assert_eq!(config.ranking.weights, SimilarityWeights::new(0.8, 0.4));
        assert_eq!(config.ranking.threshold, 0.3);
    }

    #[test]
    fn test_unknown_weight_rejected() {
        let err = OsbornConfig::from_toml_str("[ranking.weights]\nimpact = 0.1\n").unwrap_err();
        assert!(matches!(err, OsbornError::Config(ConfigError::Toml(_))));
    }

    #[test]
    fn test_zero_max_size_is_valid() {
        let config = OsbornConfig::from_toml_str("[cache]\nmax_size = 0\n").unwrap();
        assert_eq!(config.cache.max_size, 0);
    }

    #[test]
    fn test_unknown_field_rejected() {
        let err = OsbornConfig::from_toml_str("[cache]\nmax_entries = 3\n").unwrap_err();
        assert!(matches!(err, OsbornError::Config(ConfigError::Toml(_))));
    }

    #[test]
    fn test_invalid_weights_rejected() {
        let err = OsbornConfig::from_toml_str("[ranking.weights]\ntext = 1.5\ntags = 0.4\n")
            .unwrap_err();
        assert!(matches!(err, OsbornError::Validation(_)));
    }

    #[test]
    fn test_negative_threshold_rejected() {
        let config = OsbornConfig {
            ranking: RankingSettings::default().with_threshold(-0.1),
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(OsbornError::Config(ConfigError::InvalidValue { .. }))
        ));
    }

    #[test]
    fn test_zero_slow_threshold_rejected() {
        let config = OsbornConfig {
            retrieval: RetrievalSettings {
                slow_threshold_ms: 0,
                result_ttl_ms: None,
            },
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = OsbornConfig::from_path(Path::new("/nonexistent/osborn.toml")).unwrap_err();
        assert!(matches!(err, OsbornError::Config(ConfigError::Io { .. })));
    }

    #[test]
    fn test_builders() {
        let cache = CacheSettings::default()
            .with_max_size(2)
            .with_default_ttl(Duration::from_millis(1500));
        assert_eq!(cache.max_size, 2);
        assert_eq!(cache.default_ttl_ms, 1500);

        let retrieval = RetrievalSettings::default()
            .with_slow_threshold(Duration::from_millis(50))
            .with_result_ttl(Duration::from_secs(2));
        assert_eq!(retrieval.slow_threshold_ms, 50);
        assert_eq!(retrieval.result_ttl_ms, Some(2000));
    }
}
