//! Error types for the solve loop.

use pt_fem::FemError;
use pt_problem::ProblemError;
use pt_results::ResultsError;
use pt_solver::SolverError;
use thiserror::Error;

/// Errors encountered while setting up or running the iteration.
#[derive(Error, Debug)]
pub enum SimError {
    #[error("Invalid argument: {what}")]
    InvalidArg { what: &'static str },

    #[error("Invalid state: {what}")]
    InvalidState { what: String },

    #[error("Configuration error: {0}")]
    Problem(#[from] ProblemError),

    #[error("Discretization error: {0}")]
    Fem(#[from] FemError),

    #[error("Solver setup error: {0}")]
    Solver(#[from] SolverError),

    #[error("Solve failed at iteration {iteration}: {source}")]
    SolveFailed {
        iteration: usize,
        /// Largest convergence residual of the last completed pass.
        residual: Option<f64>,
        #[source]
        source: SolverError,
    },

    #[error("Output error: {0}")]
    Results(#[from] ResultsError),
}

pub type SimResult<T> = Result<T, SimError>;
