//! Feature Layout - Canonical Feature Definition
//!
//! **This file controls the feature schema the encoder produces.**
//!
//! ## Rules:
//! 1. Add feature → increment FEATURE_VERSION
//! 2. Change order → increment FEATURE_VERSION
//! 3. Remove feature → increment FEATURE_VERSION
//!
//! The model declares its own column order at load time; this layout is what
//! the encoder can produce before reindexing against it.

use crc32fast::Hasher;
use serde::{Deserialize, Serialize};

// ============================================================================
// FEATURE VERSION
// ============================================================================

/// Current feature layout version
pub const FEATURE_VERSION: u8 = 1;

// ============================================================================
// FEATURE LAYOUT (Authoritative source)
// ============================================================================

/// Feature names in the order the encoder produces them
pub const FEATURE_LAYOUT: &[&str] = &[
    "Month",                    // 0: 1-12
    "Age",                      // 1: 18-100
    "Occupation",               // 2: categorical code
    "Annual_Income",            // 3
    "Monthly_Inhand_Salary",    // 4
    "Credit_History_Age",       // 5: years
    "Total_Emi_Per_Month",      // 6
    "Num_Bank_Accounts",        // 7
    "Num_Credit_Card",          // 8
    "Interest_Rate",            // 9
    "Num_Of_Loan",              // 10
    "Type_Of_Loan",             // 11: categorical code
    "Num_Credit_Inquiries",     // 12
    "Credit_Mix",               // 13: categorical code
    "Outstanding_Debt",         // 14
    "Credit_Utilization_Ratio", // 15
    "Amount_Invested_Monthly",  // 16
    "Payment_Behaviour",        // 17: categorical code
    "Monthly_Balance",          // 18
];

/// Total number of features
/// IMPORTANT: Must match FEATURE_LAYOUT.len()!
pub const FEATURE_COUNT: usize = 19;

// ============================================================================
// LAYOUT HASH
// ============================================================================

/// CRC32 over an ordered list of feature names
pub fn compute_layout_hash<S: AsRef<str>>(names: &[S]) -> u32 {
    let mut hasher = Hasher::new();

    hasher.update(&[FEATURE_VERSION]);

    for name in names {
        hasher.update(name.as_ref().as_bytes());
        hasher.update(&[0]); // Separator
    }

    hasher.finalize()
}

/// Hash of the canonical layout
pub fn layout_hash() -> u32 {
    compute_layout_hash(FEATURE_LAYOUT)
}

// ============================================================================
// LAYOUT INFO
// ============================================================================

/// Layout information for serialization/logging
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayoutInfo {
    pub version: u8,
    pub hash: u32,
    pub feature_count: usize,
    pub feature_names: Vec<String>,
}

impl LayoutInfo {
    pub fn current() -> Self {
        Self {
            version: FEATURE_VERSION,
            hash: layout_hash(),
            feature_count: FEATURE_COUNT,
            feature_names: FEATURE_LAYOUT.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl Default for LayoutInfo {
    fn default() -> Self {
        Self::current()
    }
}

// ============================================================================
// LAYOUT DRIFT
// ============================================================================

/// Differences between the canonical layout and a model's declared columns
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LayoutDrift {
    /// Expected by the model but never produced; reindexing fills these with 0
    pub zero_filled: Vec<String>,
    /// Produced by the encoder but ignored by the model; dropped on reindex
    pub dropped: Vec<String>,
}

impl LayoutDrift {
    pub fn is_empty(&self) -> bool {
        self.zero_filled.is_empty() && self.dropped.is_empty()
    }
}

/// Compare a model's expected columns against the canonical layout
pub fn compare_layout<S: AsRef<str>>(expected: &[S]) -> LayoutDrift {
    let zero_filled = expected
        .iter()
        .map(AsRef::as_ref)
        .filter(|name| feature_index(name).is_none())
        .map(str::to_string)
        .collect();

    let dropped = FEATURE_LAYOUT
        .iter()
        .filter(|name| !expected.iter().any(|e| e.as_ref() == **name))
        .map(|name| name.to_string())
        .collect();

    LayoutDrift { zero_filled, dropped }
}

// ============================================================================
// FEATURE INDEX LOOKUP
// ============================================================================

/// Get feature index by name (O(n) but features are few)
pub fn feature_index(name: &str) -> Option<usize> {
    FEATURE_LAYOUT.iter().position(|&n| n == name)
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_feature_count() {
        assert_eq!(FEATURE_COUNT, 19);
        assert_eq!(FEATURE_LAYOUT.len(), FEATURE_COUNT);
    }

    #[test]
    fn test_layout_hash_depends_on_order() {
        let forward = compute_layout_hash(&["Age", "Month"]);
        let reversed = compute_layout_hash(&["Month", "Age"]);
        assert_ne!(forward, reversed);
        assert_eq!(forward, compute_layout_hash(&["Age", "Month"]));
    }

    #[test]
    fn test_layout_hash_non_zero() {
        assert_ne!(layout_hash(), 0);
    }

    #[test]
    fn test_feature_index() {
        assert_eq!(feature_index("Month"), Some(0));
        assert_eq!(feature_index("Occupation"), Some(2));
        assert_eq!(feature_index("Monthly_Balance"), Some(18));
        assert_eq!(feature_index("Customer_ID"), None);
    }

    #[test]
    fn test_compare_layout_identical() {
        let drift = compare_layout(FEATURE_LAYOUT);
        assert!(drift.is_empty());
    }

    #[test]
    fn test_compare_layout_reports_both_directions() {
        let expected = vec!["Age".to_string(), "Delay_from_due_date".to_string()];
        let drift = compare_layout(&expected);

        assert_eq!(drift.zero_filled, vec!["Delay_from_due_date".to_string()]);
        assert_eq!(drift.dropped.len(), FEATURE_COUNT - 1);
        assert!(!drift.dropped.contains(&"Age".to_string()));
    }

    #[test]
    fn test_layout_info() {
        let info = LayoutInfo::current();
        assert_eq!(info.version, FEATURE_VERSION);
        assert_eq!(info.feature_names.len(), FEATURE_COUNT);
        assert_eq!(info.hash, layout_hash());
    }
}
