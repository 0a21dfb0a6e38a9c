//! Request extractors

use axum::extract::FromRequest;

use crate::error::AppError;

/// `Json` with rejections reported through [`AppError`] (422 + error body)
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct AppJson<T>(pub T);
