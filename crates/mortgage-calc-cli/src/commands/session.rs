use clap::Args;
use serde_json::Value;

use mortgage_calc_core::form::{self, FormEvent};
use mortgage_calc_core::CalculatorConfig;

use crate::input;

#[derive(Args)]
pub struct SessionArgs {
    /// Path to JSON array of form events
    #[arg(long)]
    pub input: Option<String>,
}

pub fn run_session(
    args: SessionArgs,
    config: &CalculatorConfig,
) -> Result<Value, Box<dyn std::error::Error>> {
    let events: Vec<FormEvent> = if let Some(ref path) = args.input {
        input::file::read_json(path)?
    } else if let Some(data) = input::stdin::read_stdin()? {
        serde_json::from_value(data)?
    } else {
        return Err("--input <events.json> or stdin required for session replay".into());
    };
    tracing::debug!(events = events.len(), "replaying form session");
    let result = form::replay(&events, config)?;
    Ok(serde_json::to_value(result)?)
}
