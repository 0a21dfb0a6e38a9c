//! Health check handler

use axum::{extract::State, Json};
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::AppState;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    status: &'static str,
    model_loaded: bool,
    timestamp: DateTime<Utc>,
}

pub async fn check(State(state): State<AppState>) -> Json<HealthResponse> {
    let model_loaded = state.scoring.is_loaded();

    Json(HealthResponse {
        status: if model_loaded { "healthy" } else { "unhealthy" },
        model_loaded,
        timestamp: Utc::now(),
    })
}
