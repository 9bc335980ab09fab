//! Encoded Record - Model-ready row
//!
//! Turns a `RawInput` into one row aligned to the model's declared columns:
//! 1. categorical labels → integer codes (unknown → sentinel)
//! 2. canonical name → value map
//! 3. reindex onto the expected columns, absent names filled with 0

use std::collections::HashMap;

use serde::ser::{Serialize, SerializeMap, Serializer};

use super::encoding::{CREDIT_MIX, OCCUPATION, PAYMENT_BEHAVIOUR, TYPE_OF_LOAN};
use super::input::RawInput;
use super::layout::compute_layout_hash;

/// Value used for expected columns the encoder does not produce
pub const FILL_VALUE: f64 = 0.0;

// ============================================================================
// ENCODED RECORD
// ============================================================================

/// Ordered (feature, value) row, columns exactly as requested at encode time
#[derive(Debug, Clone, PartialEq)]
pub struct EncodedRecord {
    columns: Vec<(String, f64)>,
}

impl EncodedRecord {
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Column names in order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|(name, _)| name.as_str())
    }

    /// Column values in order
    pub fn values(&self) -> Vec<f64> {
        self.columns.iter().map(|(_, value)| *value).collect()
    }

    /// Get value by column name
    pub fn get(&self, name: &str) -> Option<f64> {
        self.columns
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, value)| *value)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.columns.iter().map(|(name, value)| (name.as_str(), *value))
    }

    /// True when names and order equal `expected`
    pub fn matches_columns<S: AsRef<str>>(&self, expected: &[S]) -> bool {
        self.columns.len() == expected.len()
            && self
                .names()
                .zip(expected.iter())
                .all(|(name, e)| name == e.as_ref())
    }

    /// Hash of this record's column layout
    pub fn layout_hash(&self) -> u32 {
        let names: Vec<&str> = self.names().collect();
        compute_layout_hash(&names)
    }

    /// JSON-serializable form for logging
    pub fn to_log_entry(&self) -> serde_json::Value {
        serde_json::json!({
            "layout_hash": self.layout_hash(),
            "columns": self.len(),
            "record": self,
        })
    }
}

/// Serialized as a JSON object keeping column order
impl Serialize for EncodedRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.columns.len()))?;
        for (name, value) in &self.columns {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

// ============================================================================
// ENCODER
// ============================================================================

/// Canonical feature name → value, categoricals already coded
pub fn feature_map(raw: &RawInput) -> HashMap<&'static str, f64> {
    HashMap::from([
        ("Month", f64::from(raw.month)),
        ("Age", f64::from(raw.age)),
        (OCCUPATION.feature, OCCUPATION.encode(&raw.occupation) as f64),
        ("Annual_Income", raw.annual_income),
        ("Monthly_Inhand_Salary", raw.monthly_inhand_salary),
        ("Credit_History_Age", raw.credit_history_age),
        ("Total_Emi_Per_Month", raw.total_emi_per_month),
        ("Num_Bank_Accounts", f64::from(raw.num_bank_accounts)),
        ("Num_Credit_Card", f64::from(raw.num_credit_card)),
        ("Interest_Rate", raw.interest_rate),
        ("Num_Of_Loan", f64::from(raw.num_of_loan)),
        (TYPE_OF_LOAN.feature, TYPE_OF_LOAN.encode(&raw.type_of_loan) as f64),
        ("Num_Credit_Inquiries", f64::from(raw.num_credit_inquiries)),
        (CREDIT_MIX.feature, CREDIT_MIX.encode(&raw.credit_mix) as f64),
        ("Outstanding_Debt", raw.outstanding_debt),
        ("Credit_Utilization_Ratio", raw.credit_utilization_ratio),
        ("Amount_Invested_Monthly", raw.amount_invested_monthly),
        (
            PAYMENT_BEHAVIOUR.feature,
            PAYMENT_BEHAVIOUR.encode(&raw.payment_behaviour) as f64,
        ),
        ("Monthly_Balance", raw.monthly_balance),
    ])
}

/// Align a feature map onto `expected`, filling absent names
pub fn reindex<S: AsRef<str>>(features: &HashMap<&str, f64>, expected: &[S]) -> EncodedRecord {
    let columns = expected
        .iter()
        .map(|name| {
            let name = name.as_ref();
            let value = features.get(name).copied().unwrap_or(FILL_VALUE);
            (name.to_string(), value)
        })
        .collect();

    EncodedRecord { columns }
}

/// Encode one request against the model's expected columns
pub fn encode<S: AsRef<str>>(raw: &RawInput, expected: &[S]) -> EncodedRecord {
    reindex(&feature_map(raw), expected)
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::features::input::RawInputBuilder;
    use crate::logic::features::layout::{FEATURE_COUNT, FEATURE_LAYOUT};

    #[test]
    fn test_feature_map_covers_layout() {
        let map = feature_map(&RawInputBuilder::new().build());
        assert_eq!(map.len(), FEATURE_COUNT);
        for name in FEATURE_LAYOUT {
            assert!(map.contains_key(name), "missing {}", name);
        }
    }

    #[test]
    fn test_encode_follows_expected_order() {
        let raw = RawInputBuilder::new().age(30).month(4).build();
        let expected = ["Age", "Month"];
        let record = encode(&raw, &expected);

        assert_eq!(record.names().collect::<Vec<_>>(), vec!["Age", "Month"]);
        assert_eq!(record.values(), vec![30.0, 4.0]);
    }

    #[test]
    fn test_missing_expected_column_is_zero() {
        let raw = RawInputBuilder::new().build();
        let record = encode(&raw, &["Age", "Delay_from_due_date"]);

        assert_eq!(record.get("Delay_from_due_date"), Some(0.0));
        assert_eq!(record.len(), 2);
    }

    #[test]
    fn test_unexpected_columns_dropped() {
        let raw = RawInputBuilder::new().annual_income(50_000.0).build();
        let record = encode(&raw, &["Age"]);

        assert_eq!(record.get("Annual_Income"), None);
        assert_eq!(record.len(), 1);
    }

    #[test]
    fn test_matches_columns() {
        let record = encode(&RawInputBuilder::new().build(), &["Month", "Age"]);
        assert!(record.matches_columns(&["Month", "Age"]));
        assert!(!record.matches_columns(&["Age", "Month"]));
        assert!(!record.matches_columns(&["Month"]));
    }

    #[test]
    fn test_serialize_keeps_order() {
        let record = encode(&RawInputBuilder::new().build(), &["Month", "Age", "Credit_Mix"]);
        let json = serde_json::to_string(&record).unwrap();
        assert_eq!(json, r#"{"Month":1.0,"Age":18.0,"Credit_Mix":0.0}"#);
    }

    #[test]
    fn test_to_log_entry() {
        let record = encode(&RawInputBuilder::new().build(), FEATURE_LAYOUT);
        let log = record.to_log_entry();
        assert_eq!(log["columns"], FEATURE_COUNT);
        assert!(log["layout_hash"].as_u64().is_some());
    }
}
