//! Error types for solver operations.

use pt_core::FieldKind;
use pt_fem::FemError;
use thiserror::Error;

/// Errors that can occur during a velocity–pressure pass.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SolverError {
    #[error("Problem setup error: {what}")]
    ProblemSetup { what: String },

    #[error("Linear solve did not converge after {iterations} iterations (residual {residual:e})")]
    ConvergenceFailed { iterations: usize, residual: f64 },

    #[error("Non-finite values in {field} after the pass")]
    NonFinite { field: FieldKind },

    #[error("Numeric error: {what}")]
    Numeric { what: String },

    #[error("Discretization error: {0}")]
    Fem(#[from] FemError),
}

impl SolverError {
    /// Residual of the failed linear solve, when there was one.
    pub fn residual(&self) -> Option<f64> {
        match self {
            SolverError::ConvergenceFailed { residual, .. } => Some(*residual),
            _ => None,
        }
    }
}

pub type SolverResult<T> = Result<T, SolverError>;

