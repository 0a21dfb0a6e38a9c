//! Error handling

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::models::ValidationFailure;
use crate::scoring::ScoringError;

pub type AppResult<T> = Result<T, AppError>;

#[derive(Debug)]
pub enum AppError {
    // Client errors
    ValidationError(ValidationFailure),
    MalformedBody(String),
    BatchTooLarge(String),
    NotFound(String),
    MethodNotAllowed,
    /// Body could not be read at all (size limit, broken stream)
    BodyRejected(StatusCode, String),

    // Model errors
    ServiceUnavailable,
    PredictionFailed(String),

    // Generic errors
    InternalError(String),
}

impl AppError {
    /// Wrap a scoring error, naming the failed operation for 500s
    pub fn from_scoring(err: ScoringError, operation: &str) -> Self {
        match err {
            ScoringError::Unavailable => AppError::ServiceUnavailable,
            ScoringError::Validation(failure) => AppError::ValidationError(failure),
            ScoringError::BatchTooLarge { max, .. } => {
                AppError::BatchTooLarge(format!("Maximum {} transactions per batch", max))
            }
            ScoringError::Inference(e) => {
                AppError::PredictionFailed(format!("{} failed: {}", operation, e))
            }
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::ValidationError(_) | AppError::MalformedBody(_) => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            AppError::BatchTooLarge(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            AppError::BodyRejected(status, _) => *status,
            AppError::ServiceUnavailable => StatusCode::SERVICE_UNAVAILABLE,
            AppError::PredictionFailed(_) | AppError::InternalError(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let timestamp = chrono::Utc::now().to_rfc3339();

        let body = match &self {
            AppError::ValidationError(failure) => {
                tracing::debug!("Validation failed: {}", failure);
                json!({
                    "error": "Validation failed",
                    "detail": failure.errors,
                    "status_code": status.as_u16(),
                    "timestamp": timestamp,
                })
            }
            AppError::MalformedBody(msg) => json!({
                "error": "Invalid request body",
                "detail": msg,
                "status_code": status.as_u16(),
                "timestamp": timestamp,
            }),
            AppError::BatchTooLarge(msg) | AppError::NotFound(msg) => json!({
                "error": msg,
                "status_code": status.as_u16(),
                "timestamp": timestamp,
            }),
            AppError::MethodNotAllowed => json!({
                "error": "Method Not Allowed",
                "status_code": status.as_u16(),
                "timestamp": timestamp,
            }),
            AppError::BodyRejected(_, msg) => json!({
                "error": "Request body rejected",
                "detail": msg,
                "status_code": status.as_u16(),
                "timestamp": timestamp,
            }),
            AppError::ServiceUnavailable => json!({
                "error": "Model not loaded",
                "status_code": status.as_u16(),
                "timestamp": timestamp,
            }),
            AppError::PredictionFailed(msg) => {
                tracing::error!("Prediction error: {}", msg);
                json!({
                    "error": msg,
                    "status_code": status.as_u16(),
                    "timestamp": timestamp,
                })
            }
            AppError::InternalError(msg) => {
                tracing::error!("Internal error: {}", msg);
                json!({
                    "error": "Internal server error",
                    "detail": msg,
                    "status_code": status.as_u16(),
                    "timestamp": timestamp,
                })
            }
        };

        (status, Json(body)).into_response()
    }
}

/// Decode failures are 422; transport failures keep their own status
impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        match rejection {
            JsonRejection::BytesRejection(_) => {
                AppError::BodyRejected(rejection.status(), rejection.body_text())
            }
            other => AppError::MalformedBody(other.body_text()),
        }
    }
}

impl From<tokio::task::JoinError> for AppError {
    fn from(err: tokio::task::JoinError) -> Self {
        AppError::InternalError(format!("Scoring task failed: {}", err))
    }
}
