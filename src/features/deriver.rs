//! Feature Deriver - engineered features from a transaction record

use chrono::{DateTime, Datelike, TimeZone, Timelike};

use super::layout::DERIVED_FEATURE_COUNT;
use super::vector::DerivedFeatures;
use crate::models::TransactionRecord;

/// Derive the engineered slots for `record`.
///
/// `now` supplies hour and month when the caller omitted them; everything
/// else is a pure function of the record. Caller-supplied overrides win.
pub fn derive<Tz: TimeZone>(record: &TransactionRecord, now: &DateTime<Tz>) -> DerivedFeatures {
    let failed = record.failed_transaction_count_7d;
    let daily = record.daily_transaction_count;

    let high_failure_flag = record
        .high_failure_flag
        .map(|v| v as f64)
        .unwrap_or(if failed > 0.0 { 1.0 } else { 0.0 });

    let failure_rate = record.failure_rate.unwrap_or(if daily > 0 {
        failed / daily as f64
    } else {
        0.0
    });

    let amount_deviation = record
        .amount_deviation
        .unwrap_or((record.transaction_amount - record.avg_transaction_amount_7d).abs());

    let risk_amount_interaction = record
        .risk_amount_interaction
        .unwrap_or(record.risk_score * record.transaction_amount);

    let hour = record.hour.unwrap_or(now.hour() as i64) as f64;
    let month = record.month.unwrap_or(now.month() as i64) as f64;

    let values: [f64; DERIVED_FEATURE_COUNT] = [
        failed,
        record.risk_score,
        high_failure_flag,
        record.transaction_amount,
        record.avg_transaction_amount_7d,
        risk_amount_interaction,
        amount_deviation,
        failure_rate,
        hour,
        record.card_age as f64,
        month,
    ];

    DerivedFeatures { values }
}
