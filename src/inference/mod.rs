//! Inference Module - boundary around the trained classifier
//!
//! The classifier is an externally trained artifact. Nothing here
//! interprets its internals; callers only see a class and a probability.

pub mod handle;
pub mod onnx;

pub use handle::{ModelHandle, ModelLoadError, ModelMetadata};
pub use onnx::OnnxClassifier;

use crate::features::FeatureVector;

/// Label the classifier emits for fraud
pub const POSITIVE_CLASS: i64 = 1;

/// Classifier output for one feature vector
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Classification {
    pub predicted_class: i64,
    /// Probability of `POSITIVE_CLASS`
    pub fraud_probability: f64,
}

impl Classification {
    pub fn is_fraud(&self) -> bool {
        self.predicted_class == POSITIVE_CLASS
    }
}

#[derive(Debug, thiserror::Error)]
pub enum InferenceError {
    #[error("expected {expected} features, got {actual}")]
    FeatureCount { expected: usize, actual: usize },

    #[error("invalid probability {0}")]
    InvalidProbability(f64),

    #[error("{0}")]
    Runtime(String),
}

/// Trait for loaded classifiers (ONNX, test doubles)
pub trait Classifier: Send + Sync {
    fn classify(&self, features: &FeatureVector) -> Result<Classification, InferenceError>;

    /// Type name reported by `/metrics`
    fn model_type(&self) -> &str;

    /// Feature columns the model accepts, when it declares a fixed count
    fn input_width(&self) -> Option<usize> {
        None
    }
}

/// Reject probabilities a well-formed classifier cannot produce
pub fn checked_probability(p: f64) -> Result<f64, InferenceError> {
    if p.is_finite() && (0.0..=1.0).contains(&p) {
        Ok(p)
    } else {
        Err(InferenceError::InvalidProbability(p))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_fraud_follows_class() {
        let c = Classification {
            predicted_class: 1,
            fraud_probability: 0.4,
        };
        assert!(c.is_fraud());
        let c = Classification {
            predicted_class: 0,
            fraud_probability: 0.9,
        };
        assert!(!c.is_fraud());
    }

    #[test]
    fn test_checked_probability() {
        assert!(checked_probability(0.0).is_ok());
        assert!(checked_probability(1.0).is_ok());
        assert!(checked_probability(1.01).is_err());
        assert!(checked_probability(f64::NAN).is_err());
    }
}
