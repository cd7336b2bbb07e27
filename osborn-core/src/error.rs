//! Error types for Osborn operations
//!
//! Scoring, ranking, caching and timing never fail: they degrade to a
//! neutral value instead. These errors cover the fallible edges only,
//! such as loading configuration or asking for a strict vector comparison.

use thiserror::Error;

/// Vector operation errors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum VectorError {
    #[error("Dimension mismatch: expected {expected}, got {got}")]
    DimensionMismatch { expected: usize, got: usize },

    #[error("Invalid vector: {reason}")]
    InvalidVector { reason: String },
}

/// Configuration errors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid value for {field}: {value} - {reason}")]
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Failed to read config file {path}: {reason}")]
    Io { path: String, reason: String },

    #[error("Failed to parse config TOML: {0}")]
    Toml(String),
}

/// Validation errors for caller-supplied values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Invalid value for {field}: {reason}")]
    InvalidValue { field: String, reason: String },
}

/// Master error type for all Osborn errors.
#[derive(Debug, Clone, Error)]
pub enum OsbornError {
    #[error("Vector error: {0}")]
    Vector(#[from] VectorError),

    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

/// Result type alias for Osborn operations.
pub type OsbornResult<T> = Result<T, OsbornError>;

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vector_error_display_dimension_mismatch() {
        let err = VectorError::DimensionMismatch {
            expected: 384,
            got: 768,
        };
        let msg = format!("{}", err);
        assert!(msg.contains("Dimension mismatch"));
        assert!(msg.contains("384"));
        assert!(msg.contains("768"));
    }

    #[test]
    fn test_config_error_display_invalid_value() {
        let err = ConfigError::InvalidValue {
            field: "ranking.threshold".to_string(),
            value: "NaN".to_string(),
            reason: "must be a finite number".to_string(),
        };
        let msg = format!("{}", err);
        assert!(msg.contains("ranking.threshold"));
        assert!(msg.contains("NaN"));
        assert!(msg.contains("finite"));
    }

    #[test]
    fn test_config_error_display_toml() {
        let err = ConfigError::Toml("expected `=`".to_string());
        assert!(format!("{}", err).contains("expected `=`"));
    }

    #[test]
    fn test_osborn_error_from_variants() {
        let vector = OsbornError::from(VectorError::InvalidVector {
            reason: "empty".to_string(),
        });
        assert!(matches!(vector, OsbornError::Vector(_)));

        let config = OsbornError::from(ConfigError::Toml("bad".to_string()));
        assert!(matches!(config, OsbornError::Config(_)));

        let validation = OsbornError::from(ValidationError::InvalidValue {
            field: "weights.text".to_string(),
            reason: "must be in [0, 1]".to_string(),
        });
        assert!(matches!(validation, OsbornError::Validation(_)));
    }
}
