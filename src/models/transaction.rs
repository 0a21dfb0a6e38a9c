//! Transaction record model

use serde::{Deserialize, Serialize};
use validator::Validate;

use super::validation::ValidationFailure;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TransactionType {
    #[serde(rename = "ATM Withdrawal")]
    AtmWithdrawal,
    #[serde(rename = "POS")]
    Pos,
    Online,
    Transfer,
    Payment,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeviceType {
    Mobile,
    Laptop,
    Tablet,
    Desktop,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AuthenticationMethod {
    Biometric,
    Password,
    #[serde(rename = "PIN")]
    Pin,
    #[serde(rename = "OTP")]
    Otp,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CardType {
    Visa,
    Mastercard,
    Discover,
    Amex,
}

/// Inbound transaction to score.
///
/// Categorical fields are closed enums, so an unknown value is rejected while
/// decoding the body. Numeric domains are checked by [`TransactionRecord::check`].
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct TransactionRecord {
    #[validate(range(exclusive_min = 0.0, message = "must be greater than 0"))]
    pub transaction_amount: f64,

    #[validate(range(min = 0.0, message = "must be greater than or equal to 0"))]
    pub account_balance: f64,

    pub transaction_type: TransactionType,
    pub device_type: DeviceType,
    pub location: String,
    pub merchant_category: String,

    #[validate(range(min = 0, max = 1, message = "must be 0 or 1"))]
    pub ip_address_flag: i64,

    #[validate(range(min = 0, message = "must be greater than or equal to 0"))]
    pub previous_fraudulent_activity: i64,

    #[validate(range(min = 0, message = "must be greater than or equal to 0"))]
    pub daily_transaction_count: i64,

    #[validate(range(min = 0.0, message = "must be greater than or equal to 0"))]
    pub avg_transaction_amount_7d: f64,

    #[validate(range(min = 0.0, message = "must be greater than or equal to 0"))]
    pub failed_transaction_count_7d: f64,

    pub card_type: CardType,

    /// Card age in days
    #[validate(range(min = 0, message = "must be greater than or equal to 0"))]
    pub card_age: i64,

    #[validate(range(min = 0.0, message = "must be greater than or equal to 0"))]
    pub transaction_distance: f64,

    pub authentication_method: AuthenticationMethod,

    #[validate(range(min = 0.0, max = 1.0, message = "must be between 0 and 1"))]
    pub risk_score: f64,

    #[validate(range(min = 0, max = 1, message = "must be 0 or 1"))]
    pub is_weekend: i64,

    /// Local hour of the transaction; defaults to the current hour
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(range(min = 0, max = 23, message = "must be between 0 and 23"))]
    pub hour: Option<i64>,

    /// Month of the transaction; defaults to the current month
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(range(min = 1, max = 12, message = "must be between 1 and 12"))]
    pub month: Option<i64>,

    // Caller overrides for derived features
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(range(min = 0, max = 1, message = "must be 0 or 1"))]
    pub high_failure_flag: Option<i64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(range(min = 0.0, message = "must be greater than or equal to 0"))]
    pub failure_rate: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(range(min = 0.0, message = "must be greater than or equal to 0"))]
    pub amount_deviation: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(range(min = 0.0, message = "must be greater than or equal to 0"))]
    pub risk_amount_interaction: Option<f64>,
}

impl TransactionRecord {
    /// Check every numeric domain, collecting all offending fields
    pub fn check(&self) -> Result<(), ValidationFailure> {
        self.validate().map_err(|e| ValidationFailure::from_errors(&e))
    }
}


#[cfg(test)]
mod tests {
    use super::fixtures::sample;
    use super::*;

    #[test]
    fn test_sample_is_valid() {
        assert!(sample().check().is_ok());
    }

    #[test]
    fn test_negative_amount_rejected() {
        let mut record = sample();
        record.transaction_amount = -100.0;
        let err = record.check().unwrap_err();
        assert_eq!(err.fields(), vec!["transaction_amount"]);
    }

    #[test]
    fn test_zero_amount_rejected() {
        let mut record = sample();
        record.transaction_amount = 0.0;
        assert!(record.check().is_err());
    }

    #[test]
    fn test_risk_score_out_of_range() {
        let mut record = sample();
        record.risk_score = 1.5;
        let err = record.check().unwrap_err();
        assert_eq!(err.fields(), vec!["risk_score"]);
        assert!(err.to_string().contains("between 0 and 1"));
    }

    #[test]
    fn test_ip_flag_must_be_binary() {
        let mut record = sample();
        record.ip_address_flag = 2;
        let err = record.check().unwrap_err();
        assert_eq!(err.fields(), vec!["ip_address_flag"]);
    }

    #[test]
    fn test_multiple_fields_reported_sorted() {
        let mut record = sample();
        record.risk_score = -0.1;
        record.card_age = -1;
        record.month = Some(13);
        let err = record.check().unwrap_err();
        assert_eq!(err.fields(), vec!["card_age", "month", "risk_score"]);
    }

    #[test]
    fn test_hour_bounds() {
        let mut record = sample();
        record.hour = Some(23);
        assert!(record.check().is_ok());
        record.hour = Some(24);
        assert!(record.check().is_err());
    }

    #[test]
    fn test_unknown_transaction_type_fails_decoding() {
        let mut value = serde_json::to_value(sample()).unwrap();
        value["transaction_type"] = serde_json::json!("InvalidType");
        let err = serde_json::from_value::<TransactionRecord>(value).unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("ATM Withdrawal"));
        assert!(msg.contains("Payment"));
    }

    #[test]
    fn test_categorical_wire_names() {
        let value = serde_json::to_value(sample()).unwrap();
        assert_eq!(value["transaction_type"], "POS");
        assert_eq!(value["authentication_method"], "PIN");
        assert!(value.get("hour").is_none());

        let atm: TransactionType = serde_json::from_str("\"ATM Withdrawal\"").unwrap();
        assert_eq!(atm, TransactionType::AtmWithdrawal);
    }
}
