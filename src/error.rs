//! Error types for the log-sentinel engine

use thiserror::Error;

/// Result type alias for log-sentinel operations
pub type Result<T> = std::result::Result<T, SentinelError>;

/// Main error type for the anomaly detection engine
#[derive(Error, Debug)]
pub enum SentinelError {
    /// The training corpus yielded no usable tokens. The caller must supply
    /// better data; there is nothing to learn from.
    #[error("Empty vocabulary: training corpus yielded no usable tokens")]
    EmptyVocabulary,

    /// Too few training vectors to build an ensemble.
    #[error("Insufficient data: need at least {needed} training vectors, got {available}")]
    InsufficientData { needed: usize, available: usize },

    /// A transform/score/predict call arrived before `fit` completed.
    #[error("Model not trained: call train before predicting")]
    NotTrained,

    #[error("Invalid parameter: {name} = {value}, {reason}")]
    InvalidParameter {
        name: String,
        value: String,
        reason: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = SentinelError::EmptyVocabulary;
        assert_eq!(
            err.to_string(),
            "Empty vocabulary: training corpus yielded no usable tokens"
        );
    }

    #[test]
    fn test_insufficient_data_display() {
        let err = SentinelError::InsufficientData {
            needed: 2,
            available: 1,
        };
        assert_eq!(
            err.to_string(),
            "Insufficient data: need at least 2 training vectors, got 1"
        );
    }
}
