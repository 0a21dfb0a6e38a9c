//! Panic recovery

use std::any::Any;

use axum::response::{IntoResponse, Response};

use crate::AppError;

/// Turn a handler panic into the standard 500 error body
pub fn into_response(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "unknown panic".to_string()
    };

    AppError::InternalError(detail).into_response()
}
