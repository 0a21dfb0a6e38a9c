//! Scoring pipeline: validate → derive → infer → format
//!
//! Free of HTTP and observability concerns. Handlers own timing headers and
//! request counters; this module only measures its own latency for the
//! response body.

use std::sync::Arc;
use std::time::Instant;

use chrono::{DateTime, Local, TimeZone, Utc};
use tracing::warn;

use crate::features::{derive, FeatureVector};
use crate::inference::{checked_probability, Classification, InferenceError, ModelHandle};
use crate::models::{
    confidence_from_probability, round_ms, BatchResult, PredictionResult, TransactionRecord,
    ValidationFailure,
};

/// Largest accepted batch
pub const MAX_BATCH_SIZE: usize = 100;

#[derive(Debug, thiserror::Error)]
pub enum ScoringError {
    #[error("Model not loaded")]
    Unavailable,

    #[error("Validation failed: {0}")]
    Validation(ValidationFailure),

    #[error("Maximum {max} transactions per batch, got {count}")]
    BatchTooLarge { count: usize, max: usize },

    #[error(transparent)]
    Inference(#[from] InferenceError),
}

/// Entry point for scoring, holding the optional model handle.
///
/// `None` means no model was loaded at startup; every scoring call then
/// fails with [`ScoringError::Unavailable`].
#[derive(Clone, Default)]
pub struct ScoringService {
    model: Option<Arc<ModelHandle>>,
}

impl ScoringService {
    pub fn new(model: Option<Arc<ModelHandle>>) -> Self {
        Self { model }
    }

    pub fn with_model(model: ModelHandle) -> Self {
        Self::new(Some(Arc::new(model)))
    }

    pub fn unloaded() -> Self {
        Self::default()
    }

    pub fn model(&self) -> Option<&ModelHandle> {
        self.model.as_deref()
    }

    pub fn is_loaded(&self) -> bool {
        self.model.is_some()
    }

    fn handle(&self) -> Result<&ModelHandle, ScoringError> {
        self.model().ok_or(ScoringError::Unavailable)
    }

    /// Score one transaction against the local wall clock
    pub fn predict(&self, record: &TransactionRecord) -> Result<PredictionResult, ScoringError> {
        self.predict_at(record, &Local::now())
    }

    /// Score one transaction; `now` fills in hour/month the caller omitted
    pub fn predict_at<Tz: TimeZone>(
        &self,
        record: &TransactionRecord,
        now: &DateTime<Tz>,
    ) -> Result<PredictionResult, ScoringError> {
        let handle = self.handle()?;
        let start = Instant::now();

        record.check().map_err(ScoringError::Validation)?;

        let classification = classify(handle, record, now)?;
        let elapsed_ms = start.elapsed().as_secs_f64() * 1000.0;

        Ok(format_result(classification, round_ms(elapsed_ms)))
    }

    /// Score up to [`MAX_BATCH_SIZE`] transactions against the local wall clock
    pub fn predict_batch(&self, records: &[TransactionRecord]) -> Result<BatchResult, ScoringError> {
        self.predict_batch_at(records, &Local::now())
    }

    /// Score a batch. Every record is validated before any is scored, and
    /// the first inference failure aborts the whole batch.
    pub fn predict_batch_at<Tz: TimeZone>(
        &self,
        records: &[TransactionRecord],
        now: &DateTime<Tz>,
    ) -> Result<BatchResult, ScoringError> {
        let handle = self.handle()?;

        if records.len() > MAX_BATCH_SIZE {
            return Err(ScoringError::BatchTooLarge {
                count: records.len(),
                max: MAX_BATCH_SIZE,
            });
        }

        let start = Instant::now();

        let mut failure = ValidationFailure::default();
        for (i, record) in records.iter().enumerate() {
            if let Err(e) = record.check() {
                failure.merge(e.prefixed(&format!("transactions[{}]", i)));
            }
        }
        if !failure.is_empty() {
            return Err(ScoringError::Validation(failure));
        }

        let mut predictions = Vec::with_capacity(records.len());
        let mut total_fraud = 0;

        for record in records {
            let classification = classify(handle, record, now)?;
            if classification.is_fraud() {
                total_fraud += 1;
            }
            // Per-item latency is not tracked in batch mode
            predictions.push(format_result(classification, 0.0));
        }

        let elapsed_ms = start.elapsed().as_secs_f64() * 1000.0;

        Ok(BatchResult {
            total_transactions: predictions.len(),
            total_fraud_detected: total_fraud,
            predictions,
            response_time_ms: round_ms(elapsed_ms),
        })
    }
}

fn classify<Tz: TimeZone>(
    handle: &ModelHandle,
    record: &TransactionRecord,
    now: &DateTime<Tz>,
) -> Result<Classification, InferenceError> {
    let derived = derive(record, now);
    let vector = FeatureVector::align(&derived, handle.feature_names());

    if !vector.missing().is_empty() {
        warn!(missing = ?vector.missing(), "Missing features, using defaults");
    }

    let classification = handle.classifier().classify(&vector)?;
    checked_probability(classification.fraud_probability)?;
    Ok(classification)
}

fn format_result(classification: Classification, response_time_ms: f64) -> PredictionResult {
    PredictionResult {
        fraud_probability: classification.fraud_probability,
        is_fraud: classification.is_fraud(),
        confidence: confidence_from_probability(classification.fraud_probability),
        response_time_ms,
        timestamp: Utc::now(),
    }
}
