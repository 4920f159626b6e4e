//! Error types.
//!
//! - `FitError`: failures of the fitting core (LP solves, search, numeric faults)
//! - `AppError`: what the binary reports, carrying the process exit code

use std::time::Duration;

use thiserror::Error;

/// Failures raised by the fitting core.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FitError {
    #[error("The linear program is infeasible.")]
    Infeasible,

    #[error("The linear program is unbounded.")]
    Unbounded,

    #[error("LP solver failed: {0}")]
    Solver(String),

    #[error("LP solve did not finish within {0:?}.")]
    SolveTimeout(Duration),

    #[error("All solutions are trivial: no r in 0.01..=0.99 yields a non-zero total violation.")]
    AllTrivial,

    #[error("Numeric fault while computing {quantity}: {detail}")]
    NumericFault {
        quantity: &'static str,
        detail: String,
    },

    #[error("Malformed input: {0}")]
    Shape(String),

    #[error("Computation was cancelled.")]
    Cancelled,
}

impl FitError {
    pub fn numeric(quantity: &'static str, detail: impl Into<String>) -> Self {
        FitError::NumericFault {
            quantity,
            detail: detail.into(),
        }
    }

    pub fn shape(message: impl Into<String>) -> Self {
        FitError::Shape(message.into())
    }
}

#[derive(Clone)]
pub struct AppError {
    exit_code: u8,
    message: String,
}

impl AppError {
    pub fn new(exit_code: u8, message: impl Into<String>) -> Self {
        Self {
            exit_code,
            message: message.into(),
        }
    }

    pub fn exit_code(&self) -> u8 {
        self.exit_code
    }
}

impl From<FitError> for AppError {
    fn from(err: FitError) -> Self {
        let exit_code = match err {
            FitError::Shape(_) => 2,
            FitError::Infeasible
            | FitError::Unbounded
            | FitError::Solver(_)
            | FitError::SolveTimeout(_) => 4,
            FitError::AllTrivial => 5,
            FitError::NumericFault { .. } => 6,
            FitError::Cancelled => 130,
        };
        AppError::new(exit_code, err.to_string())
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::fmt::Debug for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppError")
            .field("exit_code", &self.exit_code)
            .field("message", &self.message)
            .finish()
    }
}

impl std::error::Error for AppError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fit_errors_map_to_distinct_exit_codes() {
        assert_eq!(AppError::from(FitError::Infeasible).exit_code(), 4);
        assert_eq!(AppError::from(FitError::AllTrivial).exit_code(), 5);
        assert_eq!(AppError::from(FitError::numeric("e", "y=0")).exit_code(), 6);
        assert_eq!(AppError::from(FitError::shape("ragged")).exit_code(), 2);
    }
}
