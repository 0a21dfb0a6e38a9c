//! Fraud Scoring API Server
//!
//! Loads the classifier once, then serves scoring requests until shutdown.

use std::sync::Arc;

use anyhow::{bail, Context};
use fraud_scoring_api::{
    config::Config, create_router, inference::ModelHandle, AppState, ScoringService,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration
    dotenvy::dotenv().ok();
    let config = Config::from_env();

    init_tracing(&config);

    tracing::info!("Fraud Scoring API starting...");
    tracing::info!("Loading model from {}", config.model_path.display());

    let model = match ModelHandle::load(
        &config.model_path,
        &config.model_metadata_path,
        config.ort_intra_threads,
    ) {
        Ok(handle) => {
            tracing::info!(
                model_type = handle.model_type(),
                feature_count = handle.feature_count(),
                "Model loaded successfully"
            );
            Some(Arc::new(handle))
        }
        Err(e) if config.is_production() => {
            bail!("Error loading model: {}", e);
        }
        Err(e) => {
            tracing::error!("Error loading model: {}. Serving without a model.", e);
            None
        }
    };

    let state = AppState::new(ScoringService::new(model), config.clone());
    let app = create_router(state);

    // Start server
    let addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind listener on {addr}"))?;
    tracing::info!("🚀 Server listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server terminated unexpectedly")?;

    tracing::info!("Shutting down...");
    Ok(())
}

fn init_tracing(config: &Config) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "fraud_scoring_api=debug,tower_http=debug".into());

    let registry = tracing_subscriber::registry().with(filter);

    if config.json_logs() {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl-C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
