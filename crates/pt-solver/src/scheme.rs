//! The seam between the solve loop and a velocity–pressure coupling scheme.

use pt_core::Communicator;
use pt_fem::{DirichletBc, DiscreteOperators, FieldSet};

use crate::error::SolverResult;

/// Everything a scheme needs for one pass besides the fields themselves.
pub struct SolveInputs<'a> {
    pub operators: &'a dyn DiscreteOperators,
    /// Velocity conditions in force, already evaluated for this pass.
    pub velocity_bcs: &'a [DirichletBc],
    /// Pressure conditions in force, already evaluated for this pass.
    pub pressure_bcs: &'a [DirichletBc],
    /// Body force per unit mass, one entry per axis.
    pub body_force: &'a [f64],
    /// Effective kinematic viscosity.
    pub viscosity: f64,
    pub density: f64,
    /// Pseudo-time step.
    pub dt: f64,
    pub comm: &'a dyn Communicator,
}

/// Diagnostics from one pass.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SchemeReport {
    pub pressure_iterations: usize,
    pub pressure_residual: f64,
    /// RMS divergence of the velocity before the pressure correction.
    pub predicted_divergence: f64,
    /// RMS divergence of the corrected velocity.
    pub divergence: f64,
}

/// A segregated or coupled velocity–pressure algorithm.
///
/// A scheme reads and overwrites the current iterates in `fields`; the
/// previous iterates belong to the caller.
pub trait CouplingScheme: Send {
    fn name(&self) -> &'static str;

    fn solve(&mut self, fields: &mut FieldSet, inputs: &SolveInputs<'_>)
    -> SolverResult<SchemeReport>;
}
