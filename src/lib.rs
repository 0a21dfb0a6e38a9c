//! Fraud Scoring API
//!
//! Serves a pre-trained fraud classifier over HTTP.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    FRAUD SCORING API                        │
//! ├─────────────────────────────────────────────────────────────┤
//! │  ┌───────────┐  ┌──────────────────────────────────────┐   │
//! │  │  HTTP     │  │  Scoring Service                     │   │
//! │  │  (Axum)   │─▶│  validate → derive → infer → format  │   │
//! │  └─────┬─────┘  └──────────────────┬───────────────────┘   │
//! │        │                           ▼                        │
//! │  ┌─────┴─────┐            ┌─────────────────┐              │
//! │  │  Request  │            │  ModelHandle    │              │
//! │  │  Stats    │            │  (ONNX Runtime) │              │
//! │  └───────────┘            └─────────────────┘              │
//! └─────────────────────────────────────────────────────────────┘
//! ```

pub mod config;
pub mod error;
pub mod extract;
pub mod features;
pub mod handlers;
pub mod inference;
pub mod middleware;
pub mod models;
pub mod scoring;
pub mod stats;

use std::sync::Arc;

use axum::{
    middleware as axum_middleware,
    routing::{get, post},
    Router,
};
use tower_http::{catch_panic::CatchPanicLayer, compression::CompressionLayer, trace::TraceLayer};

pub use config::Config;
pub use error::{AppError, AppResult};
pub use scoring::ScoringService;
pub use stats::RequestStats;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub scoring: ScoringService,
    pub stats: Arc<RequestStats>,
    pub config: Config,
}

impl AppState {
    pub fn new(scoring: ScoringService, config: Config) -> Self {
        Self {
            scoring,
            stats: Arc::new(RequestStats::new()),
            config,
        }
    }
}

/// Create the main router with all routes
pub fn create_router(state: AppState) -> Router {
    let routes = Router::new()
        .route("/api", get(handlers::root::info))
        .route("/health", get(handlers::health::check))
        .route("/metrics", get(handlers::metrics::model))
        .route("/metrics/requests", get(handlers::metrics::requests))
        .route("/predict", post(handlers::predict::single))
        .route("/predict/batch", post(handlers::predict::batch))
        .method_not_allowed_fallback(handlers::method_not_allowed)
        .fallback(handlers::not_found);

    // Innermost first: panics become 500s before timing sees them
    routes
        .layer(CatchPanicLayer::custom(middleware::panic::into_response))
        .layer(axum_middleware::from_fn_with_state(
            state.stats.clone(),
            middleware::timing::track_requests,
        ))
        .layer(axum_middleware::from_fn(middleware::timing::process_time_header))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
