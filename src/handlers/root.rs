//! Service descriptor

use axum::{extract::State, Json};
use serde::Serialize;

use crate::AppState;

#[derive(Debug, Serialize)]
pub struct ApiInfo {
    message: &'static str,
    version: &'static str,
    environment: String,
    health: &'static str,
    metrics: &'static str,
}

pub async fn info(State(state): State<AppState>) -> Json<ApiInfo> {
    Json(ApiInfo {
        message: "Fraud Detection API",
        version: env!("CARGO_PKG_VERSION"),
        environment: state.config.environment.clone(),
        health: "/health",
        metrics: "/metrics",
    })
}
