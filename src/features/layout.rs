//! Feature Layout - Derived Feature Definition
//!
//! **This file controls the derived feature schema.**
//!
//! The model is fit against named columns, so slot order here is only the
//! order the deriver produces them in. Alignment to the model's own column
//! order happens in [`super::vector::FeatureVector::align`].
//!
//! ## Rules:
//! 1. Add, remove or rename a slot → increment `FEATURE_VERSION`
//! 2. Keep `DERIVED_FEATURE_COUNT` equal to `DERIVED_FEATURES.len()`

use crc32fast::Hasher;

// ============================================================================
// FEATURE VERSION
// ============================================================================

/// Current derived layout version
pub const FEATURE_VERSION: u8 = 1;

// ============================================================================
// DERIVED LAYOUT
// ============================================================================

/// Slots produced by the feature deriver, in production order
pub const DERIVED_FEATURES: &[&str] = &[
    "Failed_Transaction_Count_7d", // 0
    "Risk_Score",                  // 1
    "High_Failure_Flag",           // 2: 1 if any failed transaction in 7d
    "Transaction_Amount",          // 3
    "Avg_Transaction_Amount_7d",   // 4
    "Risk_Amount_Interaction",     // 5: risk_score * amount
    "Amount_Deviation",            // 6: |amount - avg_7d|
    "Failure_Rate",                // 7: failed / daily count
    "Hour",                        // 8
    "Card_Age",                    // 9
    "Month",                       // 10
];

/// Number of derived slots
pub const DERIVED_FEATURE_COUNT: usize = 11;

// ============================================================================
// FALLBACK MODEL COLUMNS
// ============================================================================

/// Column order assumed when the artifact does not publish its own.
///
/// This is the full-schema training layout. Only five of these columns are
/// produced by the deriver; the rest are zero-filled at alignment time.
pub const FALLBACK_MODEL_FEATURES: &[&str] = &[
    "Transaction_Amount",
    "Account_Balance",
    "Previous_Fraudulent_Activity",
    "Daily_Transaction_Count",
    "Avg_Transaction_Amount_7d",
    "Failed_Transaction_Count_7d",
    "Card_Age",
    "Transaction_Distance",
    "Risk_Score",
    "Is_Weekend",
    "Transaction_Type",
    "Device_Type",
    "Location",
    "Merchant_Category",
    "IP_Address_Flag",
    "Card_Type",
    "Authentication_Method",
];

pub fn fallback_feature_names() -> Vec<String> {
    FALLBACK_MODEL_FEATURES.iter().map(|s| s.to_string()).collect()
}

// ============================================================================
// LAYOUT HASH
// ============================================================================

/// CRC32 of the version byte and the slot names in order
pub fn layout_hash() -> u32 {
    let mut hasher = Hasher::new();

    hasher.update(&[FEATURE_VERSION]);

    for name in DERIVED_FEATURES {
        hasher.update(name.as_bytes());
        hasher.update(&[0]); // Separator
    }

    hasher.finalize()
}

/// Layout summary for logging and the stats endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LayoutInfo {
    pub version: u8,
    pub hash: u32,
}

impl LayoutInfo {
    pub fn current() -> Self {
        Self {
            version: FEATURE_VERSION,
            hash: layout_hash(),
        }
    }

    /// Hash as published in model sidecars: 8 lowercase hex digits
    pub fn hash_hex(&self) -> String {
        format!("{:08x}", self.hash)
    }

    /// Whether a hash recorded at training time matches this layout.
    /// Unparseable values never match.
    pub fn matches(&self, published: &str) -> bool {
        let trimmed = published.trim();
        let digits = trimmed
            .strip_prefix("0x")
            .or_else(|| trimmed.strip_prefix("0X"))
            .unwrap_or(trimmed);
        u32::from_str_radix(digits, 16).is_ok_and(|h| h == self.hash)
    }
}

/// Index of a derived slot by name
pub fn derived_index(name: &str) -> Option<usize> {
    DERIVED_FEATURES.iter().position(|&n| n == name)
}

/// Names from `expected` that the deriver does not produce
pub fn unmapped_columns(expected: &[String]) -> Vec<String> {
    expected
        .iter()
        .filter(|name| derived_index(name).is_none())
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_derived_feature_count() {
        assert_eq!(DERIVED_FEATURES.len(), DERIVED_FEATURE_COUNT);
        assert_eq!(FALLBACK_MODEL_FEATURES.len(), 17);
    }

    #[test]
    fn test_layout_hash_stable() {
        assert_eq!(layout_hash(), layout_hash());
        assert_ne!(layout_hash(), 0);
        assert_eq!(LayoutInfo::current().hash, layout_hash());
    }

    #[test]
    fn test_published_hash_matching() {
        let layout = LayoutInfo::current();
        let hex = layout.hash_hex();
        assert_eq!(hex.len(), 8);

        assert!(layout.matches(&hex));
        assert!(layout.matches(&hex.to_uppercase()));
        assert!(layout.matches(&format!("0x{}", hex)));
        assert!(!layout.matches(&format!("{:08x}", layout.hash ^ 1)));
        assert!(!layout.matches("not-a-hash"));
        assert!(!layout.matches(""));
    }

    #[test]
    fn test_derived_index() {
        assert_eq!(derived_index("Failed_Transaction_Count_7d"), Some(0));
        assert_eq!(derived_index("Month"), Some(10));
        assert_eq!(derived_index("Account_Balance"), None);
    }

    #[test]
    fn test_fallback_columns_mostly_unmapped() {
        let unmapped = unmapped_columns(&fallback_feature_names());
        assert_eq!(unmapped.len(), 12);
        assert!(unmapped.contains(&"Account_Balance".to_string()));
        assert!(!unmapped.contains(&"Risk_Score".to_string()));
    }
}
