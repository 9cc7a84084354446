//! Monthly and total repayment for a validated mortgage.
//!
//! Rates arrive as annual percentages and terms as whole years; both are
//! converted here to the periodic rate and payment count that
//! [`level_payment`] expects. All math in `rust_decimal::Decimal`.

use std::time::Instant;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::error::MortgageCalcError;
use crate::format::format_money;
use crate::time_value::level_payment;
use crate::types::{
    with_metadata, CalculatorConfig, ComputationOutput, Money, MortgageInput, MortgageType,
    Percent, Rate, TotalBasis,
};
use crate::MortgageCalcResult;

const MONTHS_PER_YEAR: u64 = 12;

// ---------------------------------------------------------------------------
// Output types
// ---------------------------------------------------------------------------

/// Unformatted repayment figures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepaymentFigures {
    pub monthly: Money,
    pub total: Money,
}

/// Repayment figures as displayed: two decimals, UK grouping.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepaymentResult {
    pub monthly: String,
    pub total: String,
}

impl From<RepaymentFigures> for RepaymentResult {
    fn from(figures: RepaymentFigures) -> Self {
        RepaymentResult {
            monthly: format_money(figures.monthly),
            total: format_money(figures.total),
        }
    }
}

// ---------------------------------------------------------------------------
// Formulas
// ---------------------------------------------------------------------------

fn annual_to_periodic(rate: Percent, periods_per_year: u64) -> Rate {
    rate / dec!(100) / Decimal::from(periods_per_year)
}

/// Monthly repayment on `amount` at `rate` percent a year over `term` years.
///
/// r = rate / 100 / 12, n = term * 12. A zero rate is straight-line
/// `amount / n`.
pub fn monthly_repayment(amount: Money, rate: Percent, term: u32) -> MortgageCalcResult<Money> {
    let periods = u64::from(term) * MONTHS_PER_YEAR;
    level_payment(amount, annual_to_periodic(rate, MONTHS_PER_YEAR), periods)
}

/// One year's instalment when the loan is repaid annually: r = rate / 100,
/// n = term. A zero rate is `amount / term`.
pub fn annual_instalment(amount: Money, rate: Percent, term: u32) -> MortgageCalcResult<Money> {
    level_payment(amount, annual_to_periodic(rate, 1), u64::from(term))
}

/// Total repayment under the chosen basis.
pub fn total_repayment(
    amount: Money,
    rate: Percent,
    term: u32,
    basis: TotalBasis,
) -> MortgageCalcResult<Money> {
    match basis {
        TotalBasis::Cumulative => {
            let monthly = monthly_repayment(amount, rate, term)?;
            cumulative_total(amount, rate, monthly, term)
        }
        TotalBasis::AnnualInstalment => annual_instalment(amount, rate, term),
    }
}

/// Every monthly payment summed. At 0% that is exactly `amount`; the monthly
/// figure itself may not divide evenly.
fn cumulative_total(amount: Money, rate: Percent, monthly: Money, term: u32) -> MortgageCalcResult<Money> {
    if rate.is_zero() {
        return Ok(amount);
    }
    let payments = Decimal::from(u64::from(term) * MONTHS_PER_YEAR);
    monthly
        .checked_mul(payments)
        .ok_or_else(|| MortgageCalcError::Overflow {
            context: "cumulative total".into(),
        })
}

/// Both figures for a validated input, unformatted.
pub fn repayment_figures(
    input: &MortgageInput,
    config: &CalculatorConfig,
) -> MortgageCalcResult<RepaymentFigures> {
    let monthly = monthly_repayment(input.amount, input.rate, input.term)?;
    let total = match config.total_basis {
        TotalBasis::Cumulative => cumulative_total(input.amount, input.rate, monthly, input.term)?,
        TotalBasis::AnnualInstalment => annual_instalment(input.amount, input.rate, input.term)?,
    };
    Ok(RepaymentFigures { monthly, total })
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Compute the displayed repayment figures.
///
/// The input is re-checked because it may have been deserialized rather than
/// produced by the validator.
pub fn calculate_repayments(
    input: &MortgageInput,
    config: &CalculatorConfig,
) -> MortgageCalcResult<ComputationOutput<RepaymentResult>> {
    let start = Instant::now();
    input.check_invariants()?;

    let mut warnings: Vec<String> = Vec::new();
    if input.mortgage_type == MortgageType::InterestOnly {
        warnings.push(
            "Interest-only mortgages are priced with the amortising formula; \
             figures include principal repayment"
                .into(),
        );
    }

    let figures = repayment_figures(input, config)?;
    tracing::debug!(
        basis = config.total_basis.as_str(),
        monthly = %figures.monthly,
        total = %figures.total,
        "calculated repayments"
    );

    let methodology = match config.total_basis {
        TotalBasis::Cumulative => "Amortising monthly repayment; total = monthly × term × 12",
        TotalBasis::AnnualInstalment => "Amortising monthly repayment; total = annual instalment",
    };

    let assumptions = serde_json::json!({
        "input": input,
        "total_basis": config.total_basis,
    });

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        methodology,
        &assumptions,
        warnings,
        elapsed,
        RepaymentResult::from(figures),
    ))
}
