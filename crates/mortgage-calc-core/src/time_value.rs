use rust_decimal::Decimal;
use rust_decimal::MathematicalOps;

use crate::error::MortgageCalcError;
use crate::types::{Money, Rate};
use crate::MortgageCalcResult;

fn overflow(context: &str) -> MortgageCalcError {
    MortgageCalcError::Overflow {
        context: context.into(),
    }
}

/// Level payment that amortises `principal` to zero over `periods` equal
/// instalments at `periodic_rate` per period.
///
/// Evaluated as `P * r / (1 - (1 + r)^-n)`, which equals the textbook
/// `P * r * (1 + r)^n / ((1 + r)^n - 1)`. When `(1 + r)^n` is too large for a
/// 128-bit decimal the discount term is taken as zero and the payment tends to
/// `P * r`. A zero rate, or one too small to move `1 + r`, falls back to
/// straight-line `P / n`.
///
/// Positive in, positive out: unlike spreadsheet PMT there is no sign flip.
pub fn level_payment(principal: Money, periodic_rate: Rate, periods: u64) -> MortgageCalcResult<Money> {
    if periods == 0 {
        return Err(MortgageCalcError::InvalidInput {
            field: "periods".into(),
            reason: "Number of periods must be > 0".into(),
        });
    }

    let n = Decimal::from(periods);

    if periodic_rate.is_zero() {
        return principal
            .checked_div(n)
            .ok_or_else(|| overflow("straight-line payment"));
    }

    let one_plus_r = Decimal::ONE
        .checked_add(periodic_rate)
        .ok_or_else(|| overflow("growth factor"))?;

    let discount = match one_plus_r.checked_powu(periods) {
        Some(factor) if !factor.is_zero() => Decimal::ONE.checked_div(factor).unwrap_or(Decimal::ZERO),
        Some(_) => return Err(overflow("growth factor")),
        None => Decimal::ZERO,
    };

    let annuity_denominator = Decimal::ONE - discount;
    if annuity_denominator.is_zero() {
        return principal
            .checked_div(n)
            .ok_or_else(|| overflow("straight-line payment"));
    }

    principal
        .checked_mul(periodic_rate)
        .and_then(|interest| interest.checked_div(annuity_denominator))
        .ok_or_else(|| overflow("level payment"))
}
