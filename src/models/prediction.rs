//! Prediction request/response models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::transaction::TransactionRecord;

/// Scored transaction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionResult {
    /// Probability of the positive (fraud) class, 0.0 - 1.0
    pub fraud_probability: f64,
    pub is_fraud: bool,
    /// Distance from the 0.5 decision boundary, scaled to 0.0 - 1.0
    pub confidence: f64,
    pub response_time_ms: f64,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchPredictionRequest {
    pub transactions: Vec<TransactionRecord>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchResult {
    pub predictions: Vec<PredictionResult>,
    pub total_transactions: usize,
    pub total_fraud_detected: usize,
    pub response_time_ms: f64,
}

/// Map a positive-class probability to a boundary distance in [0, 1]
pub fn confidence_from_probability(probability: f64) -> f64 {
    (probability - 0.5).abs() * 2.0
}

/// Round milliseconds to two decimals for the wire
pub fn round_ms(ms: f64) -> f64 {
    (ms * 100.0).round() / 100.0
}
