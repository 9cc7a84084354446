use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::MortgageCalcError;
use crate::MortgageCalcResult;

/// All monetary values. Wraps Decimal to prevent accidental f64 usage.
pub type Money = Decimal;

/// Annual interest rate as entered on the form (5 = 5%).
pub type Percent = Decimal;

/// Periodic rates expressed as decimals (0.05 = 5%). Never as percentages.
pub type Rate = Decimal;

/// Repayment style selected on the form.
///
/// The selection is carried through to the result but does not change the
/// maths: both styles are priced with the amortising formula.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MortgageType {
    #[default]
    Repayment,
    InterestOnly,
}

impl MortgageType {
    pub const ALL: [MortgageType; 2] = [MortgageType::Repayment, MortgageType::InterestOnly];

    pub fn as_str(&self) -> &'static str {
        match self {
            MortgageType::Repayment => "repayment",
            MortgageType::InterestOnly => "interest-only",
        }
    }

    /// Exact match against the wire names.
    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.as_str() == value)
    }
}

impl fmt::Display for MortgageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A validated mortgage request.
///
/// Produced by [`crate::validation::validate`]; may also be deserialized
/// directly, in which case [`MortgageInput::check_invariants`] guards the
/// calculator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MortgageInput {
    /// Principal borrowed.
    pub amount: Money,
    /// Term in whole years.
    pub term: u32,
    /// Annual interest rate in percent.
    pub rate: Percent,
    #[serde(rename = "type")]
    pub mortgage_type: MortgageType,
}

impl MortgageInput {
    /// amount > 0, term >= 1, rate >= 0.
    pub fn check_invariants(&self) -> MortgageCalcResult<()> {
        if self.amount <= Decimal::ZERO {
            return Err(MortgageCalcError::InvalidInput {
                field: "amount".into(),
                reason: "Amount must be greater than 0".into(),
            });
        }
        if self.term == 0 {
            return Err(MortgageCalcError::InvalidInput {
                field: "term".into(),
                reason: "Term must be at least 1 year".into(),
            });
        }
        if self.rate < Decimal::ZERO {
            return Err(MortgageCalcError::InvalidInput {
                field: "rate".into(),
                reason: "Rate must be 0 or greater".into(),
            });
        }
        Ok(())
    }
}

/// What the "total" figure reports.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TotalBasis {
    /// Monthly repayment × number of monthly payments.
    #[default]
    Cumulative,
    /// One year's instalment priced at the annual rate; `amount / term` at 0%.
    AnnualInstalment,
}

impl TotalBasis {
    pub fn as_str(&self) -> &'static str {
        match self {
            TotalBasis::Cumulative => "cumulative",
            TotalBasis::AnnualInstalment => "annual-instalment",
        }
    }
}

/// Calculator settings. Every field has a default so `{}` is a valid config.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CalculatorConfig {
    pub total_basis: TotalBasis,
}

/// Standard computation output envelope
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputationOutput<T: Serialize> {
    pub result: T,
    pub methodology: String,
    pub assumptions: serde_json::Value,
    pub warnings: Vec<String>,
    pub metadata: ComputationMetadata,
}

/// Metadata for every computation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputationMetadata {
    pub version: String,
    pub computation_time_us: u64,
    pub precision: String,
}

/// Helper to wrap computation results with metadata
pub fn with_metadata<T: Serialize>(
    methodology: &str,
    assumptions: &impl Serialize,
    warnings: Vec<String>,
    elapsed_us: u64,
    result: T,
) -> ComputationOutput<T> {
    ComputationOutput {
        result,
        methodology: methodology.to_string(),
        assumptions: serde_json::to_value(assumptions).unwrap_or_default(),
        warnings,
        metadata: ComputationMetadata {
            version: env!("CARGO_PKG_VERSION").to_string(),
            computation_time_us: elapsed_us,
            precision: "rust_decimal_128bit".to_string(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn sample() -> MortgageInput {
        MortgageInput {
            amount: dec!(200_000),
            term: 25,
            rate: dec!(5),
            mortgage_type: MortgageType::Repayment,
        }
    }

    #[test]
    fn test_mortgage_type_wire_names() {
        assert_eq!(MortgageType::parse("repayment"), Some(MortgageType::Repayment));
        assert_eq!(MortgageType::parse("interest-only"), Some(MortgageType::InterestOnly));
        assert_eq!(MortgageType::parse("Repayment"), None);
        assert_eq!(
            serde_json::to_value(MortgageType::InterestOnly).unwrap(),
            serde_json::json!("interest-only")
        );
    }

    #[test]
    fn test_mortgage_input_uses_type_key() {
        let value = serde_json::to_value(sample()).unwrap();
        assert_eq!(value["type"], "repayment");
        assert_eq!(value["amount"], "200000");
    }

    #[test]
    fn test_check_invariants() {
        assert!(sample().check_invariants().is_ok());

        let zero_term = MortgageInput { term: 0, ..sample() };
        match zero_term.check_invariants() {
            Err(MortgageCalcError::InvalidInput { field, .. }) => assert_eq!(field, "term"),
            other => panic!("Expected InvalidInput on term, got {other:?}"),
        }

        let negative_rate = MortgageInput { rate: dec!(-0.5), ..sample() };
        assert!(negative_rate.check_invariants().is_err());
    }

    #[test]
    fn test_config_defaults_from_empty_object() {
        let config: CalculatorConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config.total_basis, TotalBasis::Cumulative);

        let config: CalculatorConfig =
            serde_json::from_str(r#"{"total_basis": "annual-instalment"}"#).unwrap();
        assert_eq!(config.total_basis, TotalBasis::AnnualInstalment);
    }
}
