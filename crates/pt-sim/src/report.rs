//! What a run reports while it iterates and when it ends.

use std::path::PathBuf;

use pt_core::FieldMap;
use pt_results::RunOutcomeKind;
use pt_solver::SchemeReport;

/// How the iteration ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RunOutcome {
    Converged,
    MaxIterationsReached,
}

impl From<RunOutcome> for RunOutcomeKind {
    fn from(outcome: RunOutcome) -> Self {
        match outcome {
            RunOutcome::Converged => RunOutcomeKind::Converged,
            RunOutcome::MaxIterationsReached => RunOutcomeKind::MaxIterationsReached,
        }
    }
}

/// One completed pass.
#[derive(Clone, Debug, PartialEq)]
pub struct IterationEvent {
    pub iteration: usize,
    pub pseudo_time: f64,
    /// RMS change of each field over the pass.
    pub residuals: FieldMap<f64>,
    pub dumped: bool,
    pub scheme: SchemeReport,
}

impl IterationEvent {
    pub fn max_residual(&self) -> f64 {
        max_residual(&self.residuals)
    }
}

pub(crate) fn max_residual(residuals: &FieldMap<f64>) -> f64 {
    residuals
        .iter()
        .map(|(_, r)| *r)
        .fold(0.0, |acc, r| if r.is_nan() { r } else { acc.max(r) })
}

#[derive(Clone, Debug, PartialEq)]
pub struct RunReport {
    pub outcome: RunOutcome,
    pub iterations: usize,
    pub pseudo_time: f64,
    /// Per-field residuals of the last pass.
    pub residuals: FieldMap<f64>,
    pub final_residual: f64,
    pub dumps_written: usize,
    /// Run directory, on the leader.
    pub output_dir: Option<PathBuf>,
}

impl RunReport {
    pub fn converged(&self) -> bool {
        self.outcome == RunOutcome::Converged
    }
}
