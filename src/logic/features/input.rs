//! Raw Input - One Prediction Request
//!
//! Values as gathered by the collector, before encoding.
//! Categorical fields stay as labels so the encoder can apply its tables.

use serde::{Deserialize, Serialize};

/// Lower/upper bounds the collector enforces
pub const MONTH_RANGE: (u32, u32) = (1, 12);
pub const AGE_RANGE: (u32, u32) = (18, 100);

/// Input rejected by the collector limits
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum InputError {
    #[error("{field} must be between {min} and {max}, got {value}")]
    OutOfRange {
        field: &'static str,
        min: u32,
        max: u32,
        value: u32,
    },

    #[error("{field} must be a finite non-negative number, got {value}")]
    Negative { field: &'static str, value: f64 },
}

/// Nineteen attributes of one applicant
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawInput {
    pub month: u32,
    pub age: u32,
    pub occupation: String,
    pub annual_income: f64,
    pub monthly_inhand_salary: f64,
    /// Years
    pub credit_history_age: f64,
    pub total_emi_per_month: f64,
    pub num_bank_accounts: u32,
    pub num_credit_card: u32,
    pub interest_rate: f64,
    pub num_of_loan: u32,
    pub type_of_loan: String,
    pub num_credit_inquiries: u32,
    pub credit_mix: String,
    pub outstanding_debt: f64,
    pub credit_utilization_ratio: f64,
    pub amount_invested_monthly: f64,
    pub payment_behaviour: String,
    pub monthly_balance: f64,
}

impl RawInput {
    /// Check the numeric limits of the input form
    pub fn validate(&self) -> Result<(), InputError> {
        check_range("month", self.month, MONTH_RANGE)?;
        check_range("age", self.age, AGE_RANGE)?;

        let reals = [
            ("annual_income", self.annual_income),
            ("monthly_inhand_salary", self.monthly_inhand_salary),
            ("credit_history_age", self.credit_history_age),
            ("total_emi_per_month", self.total_emi_per_month),
            ("interest_rate", self.interest_rate),
            ("outstanding_debt", self.outstanding_debt),
            ("credit_utilization_ratio", self.credit_utilization_ratio),
            ("amount_invested_monthly", self.amount_invested_monthly),
            ("monthly_balance", self.monthly_balance),
        ];

        for (field, value) in reals {
            if !value.is_finite() || value < 0.0 {
                return Err(InputError::Negative { field, value });
            }
        }

        Ok(())
    }

    /// Load a request from a JSON document
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

fn check_range(field: &'static str, value: u32, (min, max): (u32, u32)) -> Result<(), InputError> {
    if value < min || value > max {
        return Err(InputError::OutOfRange { field, min, max, value });
    }
    Ok(())
}

/// Builder starting from the form's minimum values
pub struct RawInputBuilder {
    input: RawInput,
}

impl RawInputBuilder {
    pub fn new() -> Self {
        Self {
            input: RawInput {
                month: MONTH_RANGE.0,
                age: AGE_RANGE.0,
                occupation: "Salaried".to_string(),
                annual_income: 0.0,
                monthly_inhand_salary: 0.0,
                credit_history_age: 0.0,
                total_emi_per_month: 0.0,
                num_bank_accounts: 0,
                num_credit_card: 0,
                interest_rate: 0.0,
                num_of_loan: 0,
                type_of_loan: "Home Loan".to_string(),
                num_credit_inquiries: 0,
                credit_mix: "Good".to_string(),
                outstanding_debt: 0.0,
                credit_utilization_ratio: 0.0,
                amount_invested_monthly: 0.0,
                payment_behaviour: "Low Spend".to_string(),
                monthly_balance: 0.0,
            },
        }
    }

    pub fn month(mut self, value: u32) -> Self {
        self.input.month = value;
        self
    }

    pub fn age(mut self, value: u32) -> Self {
        self.input.age = value;
        self
    }

    pub fn occupation(mut self, value: &str) -> Self {
        self.input.occupation = value.to_string();
        self
    }

    pub fn annual_income(mut self, value: f64) -> Self {
        self.input.annual_income = value;
        self
    }

    pub fn type_of_loan(mut self, value: &str) -> Self {
        self.input.type_of_loan = value.to_string();
        self
    }

    pub fn credit_mix(mut self, value: &str) -> Self {
        self.input.credit_mix = value.to_string();
        self
    }

    pub fn payment_behaviour(mut self, value: &str) -> Self {
        self.input.payment_behaviour = value.to_string();
        self
    }

    pub fn outstanding_debt(mut self, value: f64) -> Self {
        self.input.outstanding_debt = value;
        self
    }

    pub fn num_of_loan(mut self, value: u32) -> Self {
        self.input.num_of_loan = value;
        self
    }

    pub fn build(self) -> RawInput {
        self.input
    }
}

impl Default for RawInputBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_defaults_are_valid() {
        let input = RawInputBuilder::new().build();
        assert_eq!(input.month, 1);
        assert_eq!(input.age, 18);
        assert!(input.validate().is_ok());
    }

    #[test]
    fn test_month_out_of_range() {
        let input = RawInputBuilder::new().month(13).build();
        assert_eq!(
            input.validate(),
            Err(InputError::OutOfRange { field: "month", min: 1, max: 12, value: 13 })
        );
        assert!(RawInputBuilder::new().month(0).build().validate().is_err());
    }

    #[test]
    fn test_age_limits() {
        assert!(RawInputBuilder::new().age(17).build().validate().is_err());
        assert!(RawInputBuilder::new().age(100).build().validate().is_ok());
        assert!(RawInputBuilder::new().age(101).build().validate().is_err());
    }

    #[test]
    fn test_negative_and_nan_rejected() {
        let negative = RawInputBuilder::new().outstanding_debt(-1.0).build();
        assert!(matches!(
            negative.validate(),
            Err(InputError::Negative { field: "outstanding_debt", .. })
        ));

        let nan = RawInputBuilder::new().annual_income(f64::NAN).build();
        assert!(nan.validate().is_err());
    }

    #[test]
    fn test_validate_ignores_categorical_labels() {
        let input = RawInputBuilder::new().occupation("Astronaut").build();
        assert!(input.validate().is_ok());
    }

    #[test]
    fn test_from_json() {
        let json = serde_json::to_string(&RawInputBuilder::new().age(42).build()).unwrap();
        let parsed = RawInput::from_json(&json).unwrap();
        assert_eq!(parsed.age, 42);

        assert!(RawInput::from_json(r#"{"month": 1}"#).is_err());
    }
}
