//! Form lifecycle as an explicit state machine over immutable snapshots.
//!
//! ```text
//!   Idle ──submit──▶ Validating ──▶ Invalid
//!                        │            │
//!                        ▼            │ submit
//!                     Computed ◀──────┘
//!   (any) ──reset──▶ Idle
//! ```
//!
//! Each transition returns a new [`FormSnapshot`]; the previous one is left
//! untouched so a surface can diff or replay them.

use std::fmt;
use std::time::Instant;

use serde::{Deserialize, Serialize};

use crate::calculator::{repayment_figures, RepaymentResult};
use crate::error::MortgageCalcError;
use crate::types::{with_metadata, CalculatorConfig, ComputationOutput};
use crate::validation::{raw_field, validate, Field, RawMortgageInput, ValidationErrors};
use crate::MortgageCalcResult;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FormStatus {
    #[default]
    Idle,
    Validating,
    Invalid,
    Computed,
}

impl FormStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            FormStatus::Idle => "idle",
            FormStatus::Validating => "validating",
            FormStatus::Invalid => "invalid",
            FormStatus::Computed => "computed",
        }
    }
}

impl fmt::Display for FormStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Everything a surface needs to render the form at one point in time.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FormSnapshot {
    pub status: FormStatus,
    pub raw: RawMortgageInput,
    /// Present only while `Invalid`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<ValidationErrors>,
    /// `None` renders the results placeholder.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<RepaymentResult>,
}

fn log_transition(from: FormStatus, to: FormStatus) {
    tracing::debug!(from = from.as_str(), to = to.as_str(), "form transition");
}

impl FormSnapshot {
    /// Idle with empty fields and the results placeholder.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_placeholder(&self) -> bool {
        self.result.is_none()
    }

    /// Edit a single field. Editing never validates, so status, errors and
    /// result carry over unchanged.
    pub fn with_field(&self, field: Field, value: Option<String>) -> Self {
        FormSnapshot {
            raw: self.raw.with(field, value),
            ..self.clone()
        }
    }

    /// Enter `Validating` with the submitted values.
    pub fn begin_submit(&self, raw: RawMortgageInput) -> Self {
        log_transition(self.status, FormStatus::Validating);
        FormSnapshot {
            status: FormStatus::Validating,
            raw,
            errors: None,
            result: self.result.clone(),
        }
    }

    /// Leave `Validating` for `Invalid` or `Computed`.
    ///
    /// An invalid submission keeps the previous result on display.
    pub fn resolve(&self, config: &CalculatorConfig) -> MortgageCalcResult<Self> {
        if self.status != FormStatus::Validating {
            return Err(MortgageCalcError::InvalidTransition {
                from: self.status.to_string(),
                action: "resolve".into(),
            });
        }

        let next = match validate(&self.raw) {
            Err(errors) => FormSnapshot {
                status: FormStatus::Invalid,
                raw: self.raw.clone(),
                errors: Some(errors),
                result: self.result.clone(),
            },
            Ok(input) => {
                let figures = repayment_figures(&input, config)?;
                FormSnapshot {
                    status: FormStatus::Computed,
                    raw: self.raw.clone(),
                    errors: None,
                    result: Some(figures.into()),
                }
            }
        };

        log_transition(self.status, next.status);
        Ok(next)
    }

    /// `begin_submit` then `resolve`.
    pub fn submit(&self, raw: RawMortgageInput, config: &CalculatorConfig) -> MortgageCalcResult<Self> {
        self.begin_submit(raw).resolve(config)
    }

    /// Clear every field, error and result.
    pub fn reset(&self) -> Self {
        log_transition(self.status, FormStatus::Idle);
        Self::new()
    }
}

// ---------------------------------------------------------------------------
// Session replay
// ---------------------------------------------------------------------------

/// A user action on the form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum FormEvent {
    Edit {
        field: Field,
        #[serde(default, deserialize_with = "raw_field")]
        value: Option<String>,
    },
    /// Submit the given values, or the current field values when omitted.
    Submit {
        #[serde(default)]
        input: Option<RawMortgageInput>,
    },
    Reset,
}

#[derive(Debug, Clone, Serialize)]
pub struct SessionReplay {
    /// Every snapshot produced, in order. A submit produces two.
    pub snapshots: Vec<FormSnapshot>,
    pub final_status: FormStatus,
}

/// Apply `events` to a fresh form and collect every snapshot.
pub fn replay(
    events: &[FormEvent],
    config: &CalculatorConfig,
) -> MortgageCalcResult<ComputationOutput<SessionReplay>> {
    let start = Instant::now();
    let mut current = FormSnapshot::new();
    let mut snapshots = Vec::with_capacity(events.len() * 2);

    for event in events {
        match event {
            FormEvent::Edit { field, value } => {
                current = current.with_field(*field, value.clone());
                snapshots.push(current.clone());
            }
            FormEvent::Submit { input } => {
                let raw = input.clone().unwrap_or_else(|| current.raw.clone());
                let validating = current.begin_submit(raw);
                snapshots.push(validating.clone());
                current = validating.resolve(config)?;
                snapshots.push(current.clone());
            }
            FormEvent::Reset => {
                current = current.reset();
                snapshots.push(current.clone());
            }
        }
    }

    let mut warnings = Vec::new();
    if events.is_empty() {
        warnings.push("No form events supplied; form remains idle".to_string());
    }

    let replayed = SessionReplay {
        final_status: current.status,
        snapshots,
    };
    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Mortgage form session replay",
        config,
        warnings,
        elapsed,
        replayed,
    ))
}
