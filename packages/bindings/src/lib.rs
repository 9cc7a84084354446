use napi::Result as NapiResult;
use napi_derive::napi;
use serde::Deserialize;

use mortgage_calc_core::form::{self, FormEvent};
use mortgage_calc_core::validation::{self, RawMortgageInput};
use mortgage_calc_core::{calculator, CalculatorConfig};

/// Convert any Display error into a napi::Error.
fn to_napi_error(e: impl std::fmt::Display) -> napi::Error {
    napi::Error::from_reason(e.to_string())
}

#[derive(Deserialize)]
struct FormRequest {
    input: RawMortgageInput,
    #[serde(default)]
    config: CalculatorConfig,
}

#[derive(Deserialize)]
struct SessionRequest {
    events: Vec<FormEvent>,
    #[serde(default)]
    config: CalculatorConfig,
}

// ---------------------------------------------------------------------------
// Form
// ---------------------------------------------------------------------------

/// `input_json` is the raw field object `{ amount, term, rate, type }`.
#[napi]
pub fn validate_mortgage(input_json: String) -> NapiResult<String> {
    let raw: RawMortgageInput = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = validation::validate_input(&raw);
    serde_json::to_string(&output).map_err(to_napi_error)
}

/// `input_json` is `{ input: { amount, term, rate, type }, config? }`.
/// Invalid fields reject with the JSON error map as the reason.
#[napi]
pub fn calculate_repayments(input_json: String) -> NapiResult<String> {
    let request: FormRequest = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let mortgage = match validation::validate(&request.input) {
        Ok(mortgage) => mortgage,
        Err(errors) => {
            let reason = serde_json::to_string(&errors).map_err(to_napi_error)?;
            return Err(napi::Error::from_reason(reason));
        }
    };
    let output =
        calculator::calculate_repayments(&mortgage, &request.config).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

/// `input_json` is `{ events: [...], config? }`.
#[napi]
pub fn replay_session(input_json: String) -> NapiResult<String> {
    let request: SessionRequest = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = form::replay(&request.events, &request.config).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}
