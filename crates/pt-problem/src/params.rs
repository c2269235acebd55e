//! Problem parameter set.

use pt_conditions::{BoundaryConditions, InitialConditions};
use pt_core::Real;
use pt_core::units::{Density, Time, constants, kg_per_m3, s};
use pt_mesh::Domain;

/// Everything a [`crate::Problem`] is built from.
///
/// Obtain a fresh set with [`crate::Problem::default_parameters`], fill it
/// in, and hand it to [`crate::Problem::new`].
#[derive(Debug)]
pub struct ProblemParameters {
    /// Fluid density.
    pub rho: Density,
    /// Background kinematic viscosity (m²/s).
    pub nu: Real,
    /// Body force per unit mass; zero vector of the domain's dimension if unset.
    pub body_forces: Option<Vec<Real>>,
    pub bcs: Option<BoundaryConditions>,
    /// Falls back to zero velocity and pressure when unset.
    pub ics: Option<InitialConditions>,
    /// Pseudo-time step budget.
    pub max_iterations: usize,
    /// Pseudo-time step.
    pub dt: Time,
    pub domain: Option<Domain>,
}

impl Default for ProblemParameters {
    fn default() -> Self {
        Self {
            rho: kg_per_m3(constants::AIR_DENSITY),
            nu: constants::AIR_KINEMATIC_VISCOSITY,
            body_forces: None,
            bcs: None,
            ics: None,
            max_iterations: 200,
            dt: s(1.0),
            domain: None,
        }
    }
}
