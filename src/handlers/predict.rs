//! Prediction handlers
//!
//! Inference runs on the blocking pool; the ONNX session call is CPU-bound.

use axum::{extract::State, Json};

use crate::extract::AppJson;
use crate::models::{BatchPredictionRequest, BatchResult, PredictionResult, TransactionRecord};
use crate::{AppError, AppResult, AppState};

/// Score a single transaction
pub async fn single(
    State(state): State<AppState>,
    AppJson(record): AppJson<TransactionRecord>,
) -> AppResult<Json<PredictionResult>> {
    let scoring = state.scoring.clone();
    let result = tokio::task::spawn_blocking(move || scoring.predict(&record))
        .await?
        .map_err(|e| AppError::from_scoring(e, "Prediction"))?;

    state.stats.record_prediction(result.is_fraud);
    Ok(Json(result))
}

/// Score up to 100 transactions
pub async fn batch(
    State(state): State<AppState>,
    AppJson(req): AppJson<BatchPredictionRequest>,
) -> AppResult<Json<BatchResult>> {
    let scoring = state.scoring.clone();
    let result = tokio::task::spawn_blocking(move || scoring.predict_batch(&req.transactions))
        .await?
        .map_err(|e| AppError::from_scoring(e, "Batch prediction"))?;

    tracing::info!(
        total = result.total_transactions,
        fraud = result.total_fraud_detected,
        response_time_ms = result.response_time_ms,
        "Batch scored"
    );

    state
        .stats
        .record_batch(result.total_transactions, result.total_fraud_detected);
    Ok(Json(result))
}
