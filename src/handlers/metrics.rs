//! Monitoring handlers

use axum::{extract::State, Json};
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::features::LayoutInfo;
use crate::stats::StatsSummary;
use crate::AppState;

#[derive(Debug, Serialize)]
pub struct ModelMetricsResponse {
    model_loaded: bool,
    model_type: Option<String>,
    feature_count: usize,
    timestamp: DateTime<Utc>,
}

/// Model load state
pub async fn model(State(state): State<AppState>) -> Json<ModelMetricsResponse> {
    let model = state.scoring.model();

    Json(ModelMetricsResponse {
        model_loaded: model.is_some(),
        model_type: model.map(|m| m.model_type().to_string()),
        feature_count: model.map(|m| m.feature_count()).unwrap_or(0),
        timestamp: Utc::now(),
    })
}

#[derive(Debug, Serialize)]
pub struct RequestMetricsResponse {
    #[serde(flatten)]
    stats: StatsSummary,
    feature_layout_version: u8,
    feature_layout_hash: String,
    timestamp: DateTime<Utc>,
}

/// Request counters and latency summary
pub async fn requests(State(state): State<AppState>) -> Json<RequestMetricsResponse> {
    let layout = LayoutInfo::current();

    Json(RequestMetricsResponse {
        stats: state.stats.summary(),
        feature_layout_version: layout.version,
        feature_layout_hash: layout.hash_hex(),
        timestamp: Utc::now(),
    })
}
