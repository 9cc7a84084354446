//! Form validation: raw field text in, a clean [`MortgageInput`] or a
//! per-field error map out.
//!
//! Every field is checked independently against an ordered rule table so a
//! single submission reports all of its problems at once.

use std::collections::BTreeMap;
use std::fmt;
use std::time::Instant;

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::types::{with_metadata, ComputationOutput, MortgageInput, MortgageType};

// ---------------------------------------------------------------------------
// Raw input
// ---------------------------------------------------------------------------

/// The four form fields exactly as entered. `None` means the field was left
/// empty or never sent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawMortgageInput {
    #[serde(default, deserialize_with = "raw_field", skip_serializing_if = "Option::is_none")]
    pub amount: Option<String>,
    #[serde(default, deserialize_with = "raw_field", skip_serializing_if = "Option::is_none")]
    pub term: Option<String>,
    #[serde(default, deserialize_with = "raw_field", skip_serializing_if = "Option::is_none")]
    pub rate: Option<String>,
    #[serde(
        rename = "type",
        default,
        deserialize_with = "raw_field",
        skip_serializing_if = "Option::is_none"
    )]
    pub mortgage_type: Option<String>,
}

impl RawMortgageInput {
    pub fn get(&self, field: Field) -> Option<&str> {
        match field {
            Field::Amount => self.amount.as_deref(),
            Field::Term => self.term.as_deref(),
            Field::Rate => self.rate.as_deref(),
            Field::MortgageType => self.mortgage_type.as_deref(),
        }
    }

    /// Copy with one field replaced.
    pub fn with(&self, field: Field, value: Option<String>) -> Self {
        let mut next = self.clone();
        match field {
            Field::Amount => next.amount = value,
            Field::Term => next.term = value,
            Field::Rate => next.rate = value,
            Field::MortgageType => next.mortgage_type = value,
        }
        next
    }

    pub fn is_empty(&self) -> bool {
        Field::ALL.iter().all(|f| self.get(*f).is_none())
    }
}

/// Accepts a JSON string, number or null for a raw field. Numbers keep their
/// literal text so the validator sees what the user typed.
pub fn raw_field<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        None | Some(serde_json::Value::Null) => None,
        Some(serde_json::Value::String(s)) => Some(s),
        Some(serde_json::Value::Number(n)) => Some(n.to_string()),
        Some(other) => Some(other.to_string()),
    })
}

// ---------------------------------------------------------------------------
// Fields and errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Field {
    Amount,
    Term,
    Rate,
    #[serde(rename = "type")]
    MortgageType,
}

impl Field {
    pub const ALL: [Field; 4] = [Field::Amount, Field::Term, Field::Rate, Field::MortgageType];

    pub fn as_str(&self) -> &'static str {
        match self {
            Field::Amount => "amount",
            Field::Term => "term",
            Field::Rate => "rate",
            Field::MortgageType => "type",
        }
    }

    /// Message shown when the field is empty or not a number.
    pub fn required_message(&self) -> &'static str {
        match self {
            Field::Amount => "Amount is required",
            Field::Term => "Term is required",
            Field::Rate => "Rate is required",
            Field::MortgageType => "Mortgage type is required",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldErrorKind {
    /// Empty, absent or not a number.
    MissingValue,
    BelowMinimum,
    AboveMaximum,
    NotWholeNumber,
    /// Not one of the allowed choices.
    InvalidEnum,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    pub kind: FieldErrorKind,
    pub message: String,
}

/// Field-scoped validation failures, at most one per field, ordered by field.
///
/// Serializes as `{ "amount": "Amount is required", ... }`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors {
    errors: BTreeMap<Field, FieldError>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records an error unless the field already has one.
    pub fn add(&mut self, field: Field, kind: FieldErrorKind, message: impl Into<String>) {
        self.errors.entry(field).or_insert_with(|| FieldError {
            kind,
            message: message.into(),
        });
    }

    pub fn get(&self, field: Field) -> Option<&FieldError> {
        self.errors.get(&field)
    }

    pub fn message(&self, field: Field) -> Option<&str> {
        self.get(field).map(|e| e.message.as_str())
    }

    pub fn contains(&self, field: Field) -> bool {
        self.errors.contains_key(&field)
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Field, &FieldError)> {
        self.errors.iter().map(|(f, e)| (*f, e))
    }

    pub fn fields(&self) -> Vec<Field> {
        self.errors.keys().copied().collect()
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self
            .iter()
            .map(|(field, err)| format!("{field}: {}", err.message))
            .collect();
        f.write_str(&parts.join("; "))
    }
}

impl Serialize for ValidationErrors {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.errors.len()))?;
        for (field, err) in &self.errors {
            map.serialize_entry(field.as_str(), &err.message)?;
        }
        map.end()
    }
}

// ---------------------------------------------------------------------------
// Rules
// ---------------------------------------------------------------------------

/// A constraint on a numeric field that has already parsed.
struct NumericRule {
    field: Field,
    holds: fn(Decimal) -> bool,
    kind: FieldErrorKind,
    message: &'static str,
}

/// Largest amount the form accepts.
pub const MAX_AMOUNT: Decimal = dec!(1_000_000_000_000);

/// Largest annual rate, in percent, the form accepts.
pub const MAX_RATE: Decimal = dec!(100);

/// Evaluated top to bottom; the first failing rule for a field wins.
const NUMERIC_RULES: &[NumericRule] = &[
    NumericRule {
        field: Field::Amount,
        holds: |v| v > Decimal::ZERO,
        kind: FieldErrorKind::BelowMinimum,
        message: "Amount must be greater than 0",
    },
    NumericRule {
        field: Field::Amount,
        holds: |v| v <= MAX_AMOUNT,
        kind: FieldErrorKind::AboveMaximum,
        message: "Amount must be 1,000,000,000,000 or less",
    },
    NumericRule {
        field: Field::Term,
        holds: |v| v >= Decimal::ONE,
        kind: FieldErrorKind::BelowMinimum,
        message: "Term must be at least 1 year",
    },
    NumericRule {
        field: Field::Term,
        holds: |v| v.fract().is_zero() && v.to_u32().is_some(),
        kind: FieldErrorKind::NotWholeNumber,
        message: "Term must be a whole number of years",
    },
    NumericRule {
        field: Field::Rate,
        holds: |v| v >= Decimal::ZERO,
        kind: FieldErrorKind::BelowMinimum,
        message: "Rate must be 0 or greater",
    },
    NumericRule {
        field: Field::Rate,
        holds: |v| v <= MAX_RATE,
        kind: FieldErrorKind::AboveMaximum,
        message: "Rate must be 100 or less",
    },
];

/// Parse form text as a decimal. Blank and non-numeric text yield `None`.
///
/// Digit separators are not accepted. Numbers outside the 128-bit decimal
/// range saturate to `Decimal::MAX` / `Decimal::MIN`, and magnitudes too small
/// to represent become zero, so the range rules report them.
pub fn parse_number(raw: Option<&str>) -> Option<Decimal> {
    let text = raw?.trim();
    if text.is_empty() || text.contains('_') {
        return None;
    }
    if let Some(value) = text
        .parse::<Decimal>()
        .ok()
        .or_else(|| Decimal::from_scientific(text).ok())
    {
        return Some(value);
    }

    let float = text.parse::<f64>().ok()?;
    if float.is_nan() || text.to_ascii_lowercase().contains("inf") {
        return None;
    }
    Some(if float.abs() < 1.0 {
        Decimal::ZERO
    } else if float.is_sign_negative() {
        Decimal::MIN
    } else {
        Decimal::MAX
    })
}

fn check_numeric(field: Field, raw: &RawMortgageInput, errors: &mut ValidationErrors) -> Option<Decimal> {
    let Some(value) = parse_number(raw.get(field)) else {
        errors.add(field, FieldErrorKind::MissingValue, field.required_message());
        return None;
    };

    let failed = NUMERIC_RULES
        .iter()
        .filter(|rule| rule.field == field)
        .find(|rule| !(rule.holds)(value));

    match failed {
        Some(rule) => {
            errors.add(field, rule.kind, rule.message);
            None
        }
        None => Some(value),
    }
}

fn check_mortgage_type(raw: &RawMortgageInput, errors: &mut ValidationErrors) -> Option<MortgageType> {
    let field = Field::MortgageType;
    let text = raw.get(field).map(str::trim).unwrap_or_default();
    if text.is_empty() {
        errors.add(field, FieldErrorKind::MissingValue, field.required_message());
        return None;
    }
    let parsed = MortgageType::parse(text);
    if parsed.is_none() {
        errors.add(field, FieldErrorKind::InvalidEnum, field.required_message());
    }
    parsed
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Validate all four fields. Returns the clean record, or every field error.
pub fn validate(raw: &RawMortgageInput) -> Result<MortgageInput, ValidationErrors> {
    let mut errors = ValidationErrors::new();

    let amount = check_numeric(Field::Amount, raw, &mut errors);
    let term = check_numeric(Field::Term, raw, &mut errors).and_then(|t| t.to_u32());
    let rate = check_numeric(Field::Rate, raw, &mut errors);
    let mortgage_type = check_mortgage_type(raw, &mut errors);

    tracing::debug!(failed_fields = errors.len(), "validated mortgage form");

    match (amount, term, rate, mortgage_type) {
        (Some(amount), Some(term), Some(rate), Some(mortgage_type)) if errors.is_empty() => {
            Ok(MortgageInput {
                amount,
                term,
                rate,
                mortgage_type,
            })
        }
        _ => Err(errors),
    }
}

/// Either side of a validation, shaped for form surfaces.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ValidationOutcome {
    Valid { valid: bool, input: MortgageInput },
    Invalid { valid: bool, errors: ValidationErrors },
}

impl ValidationOutcome {
    pub fn is_valid(&self) -> bool {
        matches!(self, ValidationOutcome::Valid { .. })
    }
}

impl From<Result<MortgageInput, ValidationErrors>> for ValidationOutcome {
    fn from(result: Result<MortgageInput, ValidationErrors>) -> Self {
        match result {
            Ok(input) => ValidationOutcome::Valid { valid: true, input },
            Err(errors) => ValidationOutcome::Invalid { valid: false, errors },
        }
    }
}

/// Validate and wrap the outcome in the standard envelope.
pub fn validate_input(raw: &RawMortgageInput) -> ComputationOutput<ValidationOutcome> {
    let start = Instant::now();
    let outcome = ValidationOutcome::from(validate(raw));
    let elapsed = start.elapsed().as_micros() as u64;
    with_metadata("Mortgage form validation", raw, Vec::new(), elapsed, outcome)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    fn raw(amount: &str, term: &str, rate: &str, kind: &str) -> RawMortgageInput {
        let opt = |s: &str| if s.is_empty() { None } else { Some(s.to_string()) };
        RawMortgageInput {
            amount: opt(amount),
            term: opt(term),
            rate: opt(rate),
            mortgage_type: opt(kind),
        }
    }

    #[test]
    fn test_valid_input_produces_clean_record() {
        let input = validate(&raw("200000", "25", "5", "repayment")).unwrap();
        assert_eq!(
            input,
            MortgageInput {
                amount: dec!(200000),
                term: 25,
                rate: dec!(5),
                mortgage_type: MortgageType::Repayment,
            }
        );
    }

    #[test]
    fn test_all_missing_reports_every_field() {
        let errors = validate(&RawMortgageInput::default()).unwrap_err();
        assert_eq!(errors.len(), 4);
        assert_eq!(errors.message(Field::Amount), Some("Amount is required"));
        assert_eq!(errors.message(Field::Term), Some("Term is required"));
        assert_eq!(errors.message(Field::Rate), Some("Rate is required"));
        assert_eq!(errors.message(Field::MortgageType), Some("Mortgage type is required"));
        assert!(errors.iter().all(|(_, e)| e.kind == FieldErrorKind::MissingValue));
    }

    #[test]
    fn test_non_numeric_is_required() {
        let errors = validate(&raw("lots", "25", "5", "repayment")).unwrap_err();
        assert_eq!(errors.fields(), vec![Field::Amount]);
        assert_eq!(errors.message(Field::Amount), Some("Amount is required"));
    }

    #[test]
    fn test_below_minimum_messages() {
        let errors = validate(&raw("0", "0", "-1", "repayment")).unwrap_err();
        assert_eq!(errors.message(Field::Amount), Some("Amount must be greater than 0"));
        assert_eq!(errors.message(Field::Term), Some("Term must be at least 1 year"));
        assert_eq!(errors.message(Field::Rate), Some("Rate must be 0 or greater"));
        assert!(!errors.contains(Field::MortgageType));
        assert_eq!(errors.get(Field::Term).unwrap().kind, FieldErrorKind::BelowMinimum);
    }

    #[test]
    fn test_fractional_amount_below_one_is_accepted() {
        let input = validate(&raw("0.5", "1", "0", "repayment")).unwrap();
        assert_eq!(input.amount, dec!(0.5));
    }

    #[test]
    fn test_fractional_term_rejected() {
        let errors = validate(&raw("1000", "2.5", "3", "repayment")).unwrap_err();
        let err = errors.get(Field::Term).unwrap();
        assert_eq!(err.kind, FieldErrorKind::NotWholeNumber);
        assert_eq!(err.message, "Term must be a whole number of years");
    }

    #[test]
    fn test_whole_term_with_trailing_zeros_accepted() {
        let input = validate(&raw("1000", "10.00", "3", "repayment")).unwrap();
        assert_eq!(input.term, 10);
    }

    #[test]
    fn test_unknown_type_is_invalid_enum() {
        let errors = validate(&raw("1000", "10", "3", "balloon")).unwrap_err();
        let err = errors.get(Field::MortgageType).unwrap();
        assert_eq!(err.kind, FieldErrorKind::InvalidEnum);
        assert_eq!(err.message, "Mortgage type is required");
    }

    #[test]
    fn test_whitespace_is_trimmed() {
        let input = validate(&raw(" 1500 ", " 3", "2.5 ", " interest-only ")).unwrap();
        assert_eq!(input.amount, dec!(1500));
        assert_eq!(input.rate, dec!(2.5));
        assert_eq!(input.mortgage_type, MortgageType::InterestOnly);
    }

    #[test]
    fn test_blank_is_missing() {
        let errors = validate(&raw("   ", "10", "3", "repayment")).unwrap_err();
        assert_eq!(errors.get(Field::Amount).unwrap().kind, FieldErrorKind::MissingValue);
    }

    #[test]
    fn test_scientific_notation_parses() {
        assert_eq!(parse_number(Some("2e5")), Some(dec!(200000)));
    }

    #[test]
    fn test_digit_separators_are_not_numbers() {
        assert_eq!(parse_number(Some("1_000")), None);
        let errors = validate(&raw("1_000", "10", "3", "repayment")).unwrap_err();
        assert_eq!(errors.message(Field::Amount), Some("Amount is required"));
    }

    #[test]
    fn test_out_of_range_numbers_saturate() {
        assert_eq!(parse_number(Some("1e29")), Some(Decimal::MAX));
        assert_eq!(parse_number(Some("100000000000000000000000000000")), Some(Decimal::MAX));
        assert_eq!(parse_number(Some("-1e400")), Some(Decimal::MIN));
        assert_eq!(parse_number(Some("1e-40")), Some(Decimal::ZERO));
        assert_eq!(parse_number(Some("inf")), None);
        assert_eq!(parse_number(Some("NaN")), None);
    }

    #[test]
    fn test_out_of_range_numbers_report_range_messages() {
        let errors = validate(&raw("1e29", "1e29", "-1e29", "repayment")).unwrap_err();
        assert_eq!(errors.message(Field::Amount), Some("Amount must be 1,000,000,000,000 or less"));
        assert_eq!(errors.get(Field::Amount).unwrap().kind, FieldErrorKind::AboveMaximum);
        assert_eq!(errors.get(Field::Term).unwrap().kind, FieldErrorKind::NotWholeNumber);
        assert_eq!(errors.message(Field::Rate), Some("Rate must be 0 or greater"));
    }

    #[test]
    fn test_upper_bounds() {
        assert!(validate(&raw("1000000000000", "40", "100", "repayment")).is_ok());
        let errors = validate(&raw("1000000000000.01", "40", "100.5", "repayment")).unwrap_err();
        assert_eq!(errors.message(Field::Amount), Some("Amount must be 1,000,000,000,000 or less"));
        assert_eq!(errors.message(Field::Rate), Some("Rate must be 100 or less"));
        assert_eq!(errors.get(Field::Rate).unwrap().kind, FieldErrorKind::AboveMaximum);
    }

    #[test]
    fn test_raw_input_accepts_numbers_and_strings() {
        let parsed: RawMortgageInput = serde_json::from_str(
            r#"{"amount": 200000, "term": "25", "rate": 5.5, "type": "repayment"}"#,
        )
        .unwrap();
        assert_eq!(parsed.amount.as_deref(), Some("200000"));
        assert_eq!(parsed.term.as_deref(), Some("25"));
        assert_eq!(parsed.rate.as_deref(), Some("5.5"));
        assert_eq!(parsed.mortgage_type.as_deref(), Some("repayment"));
    }

    #[test]
    fn test_raw_input_null_and_absent_are_missing() {
        let parsed: RawMortgageInput = serde_json::from_str(r#"{"amount": null}"#).unwrap();
        assert!(parsed.is_empty());
    }

    #[test]
    fn test_errors_serialize_as_message_map() {
        let errors = validate(&raw("", "10", "3", "")).unwrap_err();
        assert_eq!(
            serde_json::to_value(&errors).unwrap(),
            serde_json::json!({
                "amount": "Amount is required",
                "type": "Mortgage type is required",
            })
        );
        assert_eq!(
            errors.to_string(),
            "amount: Amount is required; type: Mortgage type is required"
        );
    }

    #[test]
    fn test_validate_input_envelope() {
        let output = validate_input(&raw("-5", "10", "3", "repayment"));
        assert!(!output.result.is_valid());
        let value = serde_json::to_value(&output).unwrap();
        assert_eq!(value["result"]["valid"], false);
        assert_eq!(value["result"]["errors"]["amount"], "Amount must be greater than 0");
        assert_eq!(value["methodology"], "Mortgage form validation");
    }
}
