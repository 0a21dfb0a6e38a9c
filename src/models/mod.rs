//! Data models

pub mod prediction;
pub mod transaction;
pub mod validation;

pub use prediction::*;
pub use transaction::*;
pub use validation::*;
