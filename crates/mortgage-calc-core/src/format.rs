use rust_decimal::{Decimal, RoundingStrategy};

/// Render money the way a UK locale does: two fraction digits, comma
/// thousands separators, period decimal point. Halves round away from zero.
pub fn format_money(value: Decimal) -> String {
    let rounded = value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    let negative = rounded.is_sign_negative() && !rounded.is_zero();
    let fixed = format!("{:.2}", rounded.abs());

    let (int_part, frac_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3 + 4);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    if negative {
        format!("-{grouped}.{frac_part}")
    } else {
        format!("{grouped}.{frac_part}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_groups_thousands() {
        assert_eq!(format_money(dec!(1234567.891)), "1,234,567.89");
        assert_eq!(format_money(dec!(1169.18)), "1,169.18");
        assert_eq!(format_money(dec!(100000)), "100,000.00");
    }

    #[test]
    fn test_small_values_pad_to_two_places() {
        assert_eq!(format_money(dec!(100)), "100.00");
        assert_eq!(format_money(dec!(0)), "0.00");
        assert_eq!(format_money(dec!(7.5)), "7.50");
    }

    #[test]
    fn test_midpoint_rounds_away_from_zero() {
        assert_eq!(format_money(dec!(0.005)), "0.01");
        assert_eq!(format_money(dec!(999.995)), "1,000.00");
        assert_eq!(format_money(dec!(2.344)), "2.34");
    }

    #[test]
    fn test_negative_values() {
        assert_eq!(format_money(dec!(-1234.5)), "-1,234.50");
        assert_eq!(format_money(dec!(-0.001)), "0.00");
    }
}
