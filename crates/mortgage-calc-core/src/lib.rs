pub mod calculator;
pub mod error;
pub mod format;
pub mod time_value;
pub mod types;
pub mod validation;

#[cfg(feature = "form")]
pub mod form;

pub use error::MortgageCalcError;
pub use types::*;

/// Standard result type for all mortgage-calc operations
pub type MortgageCalcResult<T> = Result<T, MortgageCalcError>;
