use thiserror::Error;

use crate::validation::ValidationErrors;

#[derive(Debug, Error)]
pub enum MortgageCalcError {
    #[error("Invalid input: {field} — {reason}")]
    InvalidInput { field: String, reason: String },

    #[error("Validation failed: {0}")]
    Validation(ValidationErrors),

    #[error("Arithmetic overflow in {context}")]
    Overflow { context: String },

    #[error("Invalid form transition: cannot {action} while {from}")]
    InvalidTransition { from: String, action: String },

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl From<serde_json::Error> for MortgageCalcError {
    fn from(e: serde_json::Error) -> Self {
        MortgageCalcError::SerializationError(e.to_string())
    }
}

impl From<ValidationErrors> for MortgageCalcError {
    fn from(errors: ValidationErrors) -> Self {
        MortgageCalcError::Validation(errors)
    }
}
