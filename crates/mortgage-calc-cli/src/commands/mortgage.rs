use clap::Args;
use serde_json::Value;

use mortgage_calc_core::calculator;
use mortgage_calc_core::validation::{self, RawMortgageInput};
use mortgage_calc_core::{CalculatorConfig, MortgageCalcError};

use crate::input;

/// Raw form fields. Values are passed through as typed so the validator
/// reports problems the same way the form does.
#[derive(Args)]
#[command(allow_hyphen_values = true)]
pub struct FormArgs {
    /// Path to JSON input file with amount, term, rate and type (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    /// Mortgage amount
    #[arg(long)]
    pub amount: Option<String>,

    /// Mortgage term in years
    #[arg(long)]
    pub term: Option<String>,

    /// Annual interest rate in percent
    #[arg(long)]
    pub rate: Option<String>,

    /// Mortgage type: repayment or interest-only
    #[arg(long = "type", value_name = "TYPE")]
    pub mortgage_type: Option<String>,
}

impl FormArgs {
    fn has_field_flags(&self) -> bool {
        self.amount.is_some()
            || self.term.is_some()
            || self.rate.is_some()
            || self.mortgage_type.is_some()
    }

    fn into_raw(self) -> RawMortgageInput {
        RawMortgageInput {
            amount: self.amount,
            term: self.term,
            rate: self.rate,
            mortgage_type: self.mortgage_type,
        }
    }
}

/// Resolve the raw form from `--input`, the field flags, or piped stdin.
fn read_form(args: FormArgs) -> Result<RawMortgageInput, Box<dyn std::error::Error>> {
    if let Some(ref path) = args.input {
        tracing::debug!(path = path.as_str(), "reading form from file");
        return input::file::read_json(path);
    }
    if args.has_field_flags() {
        return Ok(args.into_raw());
    }
    if let Some(data) = input::stdin::read_stdin()? {
        tracing::debug!("reading form from stdin");
        return Ok(serde_json::from_value(data)?);
    }
    Ok(RawMortgageInput::default())
}

pub fn run_calculate(
    args: FormArgs,
    config: &CalculatorConfig,
) -> Result<Value, Box<dyn std::error::Error>> {
    let raw = read_form(args)?;
    let mortgage = validation::validate(&raw).map_err(MortgageCalcError::from)?;
    let result = calculator::calculate_repayments(&mortgage, config)?;
    Ok(serde_json::to_value(result)?)
}

pub fn run_validate(args: FormArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let raw = read_form(args)?;
    let result = validation::validate_input(&raw);
    Ok(serde_json::to_value(result)?)
}
