//! Feature Vector - model input aligned to the artifact's column order

use serde::{Deserialize, Serialize};

use super::layout::{derived_index, DERIVED_FEATURE_COUNT};

// ============================================================================
// DERIVED FEATURES
// ============================================================================

/// Values in `DERIVED_FEATURES` order, before alignment
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DerivedFeatures {
    pub values: [f64; DERIVED_FEATURE_COUNT],
}

impl DerivedFeatures {
    pub fn get(&self, name: &str) -> Option<f64> {
        derived_index(name).map(|i| self.values[i])
    }
}

// ============================================================================
// ALIGNED VECTOR
// ============================================================================

/// Ordered model input: one value per column the model was fit with
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureVector {
    names: Vec<String>,
    values: Vec<f64>,
    /// Expected columns the deriver does not produce (zero-filled)
    missing: Vec<String>,
}

impl FeatureVector {
    /// Reorder `derived` into `expected` order, zero-filling unknown columns.
    /// Derived slots the model does not use are dropped.
    pub fn align(derived: &DerivedFeatures, expected: &[String]) -> Self {
        let mut values = Vec::with_capacity(expected.len());
        let mut missing = Vec::new();

        for name in expected {
            match derived.get(name) {
                Some(value) => values.push(value),
                None => {
                    values.push(0.0);
                    missing.push(name.clone());
                }
            }
        }

        Self {
            names: expected.to_vec(),
            values,
            missing,
        }
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn missing(&self) -> &[String] {
        &self.missing
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<f64> {
        self.names
            .iter()
            .position(|n| n == name)
            .map(|i| self.values[i])
    }

    /// Values narrowed to f32 for tensor input
    pub fn to_f32(&self) -> Vec<f32> {
        self.values.iter().map(|&v| v as f32).collect()
    }
}
