//! Request statistics for the monitoring endpoint
//!
//! Counters are relaxed atomics; the latency window is a bounded ring.
//! Precision loss under contention is acceptable.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use parking_lot::Mutex;
use serde::Serialize;

/// Latency samples kept for the summary
pub const LATENCY_WINDOW: usize = 1000;

/// p95 is only reported past this many samples
const P95_MIN_SAMPLES: usize = 20;

#[derive(Debug)]
pub struct RequestStats {
    total_requests: AtomicU64,
    total_errors: AtomicU64,
    total_predictions: AtomicU64,
    total_batch_predictions: AtomicU64,
    fraud_detected: AtomicU64,
    non_fraud_detected: AtomicU64,
    /// Response times in seconds
    latencies: Mutex<VecDeque<f64>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatsSummary {
    pub total_requests: u64,
    pub total_predictions: u64,
    pub total_batch_predictions: u64,
    pub total_errors: u64,
    pub fraud_detected: u64,
    pub non_fraud_detected: u64,
    pub avg_response_time: f64,
    pub min_response_time: Option<f64>,
    pub max_response_time: Option<f64>,
    pub p95_response_time: Option<f64>,
    pub error_rate: f64,
}

impl RequestStats {
    pub fn new() -> Self {
        Self {
            total_requests: AtomicU64::new(0),
            total_errors: AtomicU64::new(0),
            total_predictions: AtomicU64::new(0),
            total_batch_predictions: AtomicU64::new(0),
            fraud_detected: AtomicU64::new(0),
            non_fraud_detected: AtomicU64::new(0),
            latencies: Mutex::new(VecDeque::with_capacity(LATENCY_WINDOW)),
        }
    }

    /// Record one finished HTTP request
    pub fn record_request(&self, elapsed: Duration, failed: bool) {
        self.total_requests.fetch_add(1, Ordering::Relaxed);
        if failed {
            self.total_errors.fetch_add(1, Ordering::Relaxed);
            return;
        }

        let mut latencies = self.latencies.lock();
        if latencies.len() == LATENCY_WINDOW {
            latencies.pop_front();
        }
        latencies.push_back(elapsed.as_secs_f64());
    }

    /// Record outcomes of a single `/predict` call
    pub fn record_prediction(&self, is_fraud: bool) {
        self.total_predictions.fetch_add(1, Ordering::Relaxed);
        self.record_outcomes(usize::from(is_fraud), usize::from(!is_fraud));
    }

    /// Record outcomes of a `/predict/batch` call
    pub fn record_batch(&self, total: usize, fraud: usize) {
        self.total_batch_predictions.fetch_add(1, Ordering::Relaxed);
        self.record_outcomes(fraud, total.saturating_sub(fraud));
    }

    fn record_outcomes(&self, fraud: usize, legit: usize) {
        self.fraud_detected.fetch_add(fraud as u64, Ordering::Relaxed);
        self.non_fraud_detected.fetch_add(legit as u64, Ordering::Relaxed);
    }

    pub fn summary(&self) -> StatsSummary {
        let total_requests = self.total_requests.load(Ordering::Relaxed);
        let total_errors = self.total_errors.load(Ordering::Relaxed);

        let mut sorted: Vec<f64> = self.latencies.lock().iter().copied().collect();
        sorted.sort_by(|a, b| a.total_cmp(b));

        let avg_response_time = if sorted.is_empty() {
            0.0
        } else {
            sorted.iter().sum::<f64>() / sorted.len() as f64
        };

        let p95_response_time = if sorted.len() > P95_MIN_SAMPLES {
            sorted.get(sorted.len() * 95 / 100).copied()
        } else {
            None
        };

        let error_rate = if total_requests > 0 {
            total_errors as f64 / total_requests as f64
        } else {
            0.0
        };

        StatsSummary {
            total_requests,
            total_predictions: self.total_predictions.load(Ordering::Relaxed),
            total_batch_predictions: self.total_batch_predictions.load(Ordering::Relaxed),
            total_errors,
            fraud_detected: self.fraud_detected.load(Ordering::Relaxed),
            non_fraud_detected: self.non_fraud_detected.load(Ordering::Relaxed),
            avg_response_time,
            min_response_time: sorted.first().copied(),
            max_response_time: sorted.last().copied(),
            p95_response_time,
            error_rate,
        }
    }
}

impl Default for RequestStats {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_summary() {
        let stats = RequestStats::new();
        let summary = stats.summary();
        assert_eq!(summary.total_requests, 0);
        assert_eq!(summary.avg_response_time, 0.0);
        assert_eq!(summary.error_rate, 0.0);
        assert!(summary.min_response_time.is_none());
        assert!(summary.p95_response_time.is_none());
    }

    #[test]
    fn test_requests_and_errors() {
        let stats = RequestStats::new();
        stats.record_request(Duration::from_millis(10), false);
        stats.record_request(Duration::from_millis(30), false);
        stats.record_request(Duration::from_millis(5), true);

        let summary = stats.summary();
        assert_eq!(summary.total_requests, 3);
        assert_eq!(summary.total_errors, 1);
        assert!((summary.avg_response_time - 0.02).abs() < 1e-9);
        assert_eq!(summary.min_response_time, Some(0.01));
        assert_eq!(summary.max_response_time, Some(0.03));
        assert!((summary.error_rate - 1.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_prediction_outcomes() {
        let stats = RequestStats::new();
        stats.record_prediction(true);
        stats.record_prediction(false);
        stats.record_batch(10, 3);

        let summary = stats.summary();
        assert_eq!(summary.total_predictions, 2);
        assert_eq!(summary.total_batch_predictions, 1);
        assert_eq!(summary.fraud_detected, 4);
        assert_eq!(summary.non_fraud_detected, 8);
    }

    #[test]
    fn test_latency_window_bounded() {
        let stats = RequestStats::new();
        for i in 0..(LATENCY_WINDOW + 50) {
            stats.record_request(Duration::from_millis(i as u64), false);
        }
        let summary = stats.summary();
        assert_eq!(summary.total_requests, (LATENCY_WINDOW + 50) as u64);
        // Oldest samples were evicted
        assert_eq!(summary.min_response_time, Some(0.05));
        assert!(summary.p95_response_time.is_some());
    }
}
