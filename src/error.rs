use thiserror::Error;

/// Errors raised by the calculation engine.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CalculationError {
    #[error("Invalid input '{field}': {reason}")]
    InvalidInput { field: &'static str, reason: String },

    #[error("Loan term cannot be zero.")]
    ZeroTerm,

    #[error("Numeric overflow while computing {stage}")]
    Overflow { stage: &'static str },
}

impl CalculationError {
    pub(crate) fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidInput {
            field,
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, CalculationError>;
