//! HTTP handlers

pub mod health;
pub mod metrics;
pub mod predict;
pub mod root;

use crate::AppError;

/// Fallback for unmatched routes
pub async fn not_found() -> AppError {
    AppError::NotFound("Not Found".to_string())
}

/// Fallback for known routes hit with the wrong method
pub async fn method_not_allowed() -> AppError {
    AppError::MethodNotAllowed
}
