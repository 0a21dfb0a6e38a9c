//! Field-level validation failures

use serde::Serialize;
use std::fmt;
use validator::ValidationErrors;

/// One offending field and why it was rejected
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

/// Every field that failed validation, sorted by field name
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValidationFailure {
    pub errors: Vec<FieldError>,
}

impl ValidationFailure {
    pub fn from_errors(errors: &ValidationErrors) -> Self {
        let mut collected: Vec<FieldError> = errors
            .field_errors()
            .into_iter()
            .flat_map(|(field, errs)| {
                let field = field.to_string();
                errs.iter().map(move |e| FieldError {
                    field: field.clone(),
                    message: e
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| e.code.to_string()),
                })
            })
            .collect();

        collected.sort_by(|a, b| a.field.cmp(&b.field));
        Self { errors: collected }
    }

    pub fn single(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            errors: vec![FieldError {
                field: field.into(),
                message: message.into(),
            }],
        }
    }

    /// Qualify every field name, e.g. `transactions[3].risk_score`
    pub fn prefixed(mut self, prefix: &str) -> Self {
        for error in &mut self.errors {
            error.field = format!("{}.{}", prefix, error.field);
        }
        self
    }

    pub fn merge(&mut self, other: ValidationFailure) {
        self.errors.extend(other.errors);
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn fields(&self) -> Vec<&str> {
        self.errors.iter().map(|e| e.field.as_str()).collect()
    }
}

impl fmt::Display for ValidationFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self
            .errors
            .iter()
            .map(|e| format!("{}: {}", e.field, e.message))
            .collect();
        write!(f, "{}", parts.join("; "))
    }
}

impl std::error::Error for ValidationFailure {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prefix_and_display() {
        let failure = ValidationFailure::single("risk_score", "must be between 0 and 1")
            .prefixed("transactions[2]");
        assert_eq!(failure.fields(), vec!["transactions[2].risk_score"]);
        assert_eq!(
            failure.to_string(),
            "transactions[2].risk_score: must be between 0 and 1"
        );
    }

    #[test]
    fn test_merge() {
        let mut failure = ValidationFailure::default();
        assert!(failure.is_empty());
        failure.merge(ValidationFailure::single("a", "bad"));
        failure.merge(ValidationFailure::single("b", "bad"));
        assert_eq!(failure.fields(), vec!["a", "b"]);
    }
}
