//! Timing middleware
//!
//! Two independent layers: one stamps `x-process-time` on every response,
//! the other feeds [`RequestStats`]. Neither touches the scoring pipeline.

use std::sync::Arc;
use std::time::Instant;

use axum::{
    extract::{Request, State},
    http::HeaderValue,
    middleware::Next,
    response::Response,
};

use crate::stats::RequestStats;

pub const PROCESS_TIME_HEADER: &str = "x-process-time";

/// Middleware: add processing time in seconds as a response header
pub async fn process_time_header(req: Request, next: Next) -> Response {
    let start = Instant::now();
    let mut response = next.run(req).await;

    let elapsed = start.elapsed().as_secs_f64();
    if let Ok(value) = HeaderValue::from_str(&elapsed.to_string()) {
        response.headers_mut().insert(PROCESS_TIME_HEADER, value);
    }

    response
}

/// Middleware: count requests, errors and latency
pub async fn track_requests(
    State(stats): State<Arc<RequestStats>>,
    req: Request,
    next: Next,
) -> Response {
    let start = Instant::now();
    let response = next.run(req).await;

    let status = response.status();
    stats.record_request(
        start.elapsed(),
        status.is_client_error() || status.is_server_error(),
    );

    response
}
