//! Categorical Encoding Tables
//!
//! Fixed label → integer code tables used by the trained classifier.
//! Unknown labels degrade to `UNKNOWN_CODE` instead of failing.

/// Code substituted for a label missing from its table
pub const UNKNOWN_CODE: i64 = -1;

/// Closed mapping from categorical label to integer code
#[derive(Debug, Clone, Copy)]
pub struct EncodingTable {
    /// Feature name the code is written under
    pub feature: &'static str,
    pub entries: &'static [(&'static str, i64)],
}

impl EncodingTable {
    /// Exact lookup, `None` when the label is not in the table
    pub fn code(&self, label: &str) -> Option<i64> {
        self.entries
            .iter()
            .find(|(l, _)| *l == label)
            .map(|(_, code)| *code)
    }

    /// Lookup with sentinel fallback
    pub fn encode(&self, label: &str) -> i64 {
        self.code(label).unwrap_or_else(|| {
            log::warn!(
                "Unknown {} value {:?}, encoding as {}",
                self.feature,
                label,
                UNKNOWN_CODE
            );
            UNKNOWN_CODE
        })
    }

    /// Accepted labels in code order
    pub fn labels(&self) -> Vec<&'static str> {
        self.entries.iter().map(|(label, _)| *label).collect()
    }
}

pub const OCCUPATION: EncodingTable = EncodingTable {
    feature: "Occupation",
    entries: &[
        ("Salaried", 0),
        ("Self-Employed", 1),
        ("Business", 2),
        ("Unemployed", 3),
    ],
};

pub const TYPE_OF_LOAN: EncodingTable = EncodingTable {
    feature: "Type_Of_Loan",
    entries: &[
        ("Home Loan", 0),
        ("Car Loan", 1),
        ("Personal Loan", 2),
        ("Credit Card Loan", 3),
        ("Other", 4),
    ],
};

pub const CREDIT_MIX: EncodingTable = EncodingTable {
    feature: "Credit_Mix",
    entries: &[("Good", 0), ("Standard", 1), ("Poor", 2)],
};

pub const PAYMENT_BEHAVIOUR: EncodingTable = EncodingTable {
    feature: "Payment_Behaviour",
    entries: &[("Low Spend", 0), ("High Spend", 1), ("Moderate Spend", 2)],
};

/// All categorical tables
pub const TABLES: [EncodingTable; 4] = [OCCUPATION, TYPE_OF_LOAN, CREDIT_MIX, PAYMENT_BEHAVIOUR];
