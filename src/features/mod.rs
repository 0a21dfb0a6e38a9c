//! Features Module - Transaction Feature Engineering
//!
//! Derivation is kept separate from alignment: the deriver knows nothing
//! about the loaded model, and the vector knows nothing about transactions.

pub mod deriver;
pub mod layout;
pub mod vector;

pub use deriver::derive;
pub use layout::{LayoutInfo, DERIVED_FEATURES, FALLBACK_MODEL_FEATURES};
pub use vector::{DerivedFeatures, FeatureVector};
