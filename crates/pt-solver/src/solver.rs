//! Velocity–pressure solver facade.

use pt_core::{Communicator, FieldKind, FieldMap};
use pt_fem::{DirichletBc, DiscreteOperators, FieldSet};

use crate::error::{SolverError, SolverResult};
use crate::projection::ProjectionScheme;
use crate::scheme::{CouplingScheme, SchemeReport, SolveInputs};

/// Physical inputs to every pass.
#[derive(Clone, Debug, PartialEq)]
pub struct SolverSettings {
    pub density: f64,
    /// Molecular kinematic viscosity.
    pub background_viscosity: f64,
    /// Eddy viscosity from a turbulence closure; `None` is laminar.
    pub turbulent_viscosity: Option<f64>,
    /// Body force per unit mass, one entry per axis.
    pub body_force: Vec<f64>,
    /// Pseudo-time step.
    pub dt: f64,
}

impl SolverSettings {
    pub fn effective_viscosity(&self) -> f64 {
        self.background_viscosity + self.turbulent_viscosity.unwrap_or(0.0)
    }

    /// Stability estimate `dt * sum over axes of (|u| / h + 2 nu / h^2)` for
    /// the explicit predictor, with `velocity_scale` on every axis.
    ///
    /// Above 1 the predictor is expected to stall or blow up.
    pub fn stability_number(&self, velocity_scale: f64, h_min: f64, dimension: usize) -> f64 {
        let per_axis =
            velocity_scale.abs() / h_min + 2.0 * self.effective_viscosity() / (h_min * h_min);
        self.dt * dimension as f64 * per_axis
    }

    fn validate(&self) -> SolverResult<()> {
        let positive = [
            ("density", self.density),
            ("background viscosity", self.background_viscosity),
            ("pseudo-time step", self.dt),
        ];
        for (what, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(SolverError::ProblemSetup {
                    what: format!("{what} must be positive and finite, got {value}"),
                });
            }
        }
        if let Some(nu_t) = self.turbulent_viscosity
            && !(nu_t.is_finite() && nu_t >= 0.0)
        {
            return Err(SolverError::ProblemSetup {
                what: format!("turbulent viscosity must be non-negative and finite, got {nu_t}"),
            });
        }
        if self.body_force.iter().any(|f| !f.is_finite()) {
            return Err(SolverError::ProblemSetup {
                what: "body force has non-finite components".to_string(),
            });
        }
        Ok(())
    }
}

/// Advances the current velocity and pressure by one pseudo-time pass.
pub struct VelocityPressureSolver {
    settings: SolverSettings,
    scheme: Box<dyn CouplingScheme>,
}

impl VelocityPressureSolver {
    /// Solver using the projection scheme with default linear-solve settings.
    pub fn new(settings: SolverSettings) -> SolverResult<Self> {
        Self::with_scheme(settings, Box::new(ProjectionScheme::default()))
    }

    pub fn with_scheme(
        settings: SolverSettings,
        scheme: Box<dyn CouplingScheme>,
    ) -> SolverResult<Self> {
        settings.validate()?;
        Ok(Self { settings, scheme })
    }

    pub fn settings(&self) -> &SolverSettings {
        &self.settings
    }

    pub fn scheme_name(&self) -> &'static str {
        self.scheme.name()
    }

    /// Run one pass on the current iterates of `fields`.
    ///
    /// `bcs` must already be evaluated for the pseudo-time of this pass.
    pub fn solve(
        &mut self,
        fields: &mut FieldSet,
        operators: &dyn DiscreteOperators,
        bcs: &FieldMap<Vec<DirichletBc>>,
        comm: &dyn Communicator,
    ) -> SolverResult<SchemeReport> {
        let inputs = SolveInputs {
            operators,
            velocity_bcs: &bcs[FieldKind::Velocity],
            pressure_bcs: &bcs[FieldKind::Pressure],
            body_force: &self.settings.body_force,
            viscosity: self.settings.effective_viscosity(),
            density: self.settings.density,
            dt: self.settings.dt,
            comm,
        };
        self.scheme.solve(fields, &inputs)
    }
}

impl std::fmt::Debug for VelocityPressureSolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VelocityPressureSolver")
            .field("settings", &self.settings)
            .field("scheme", &self.scheme.name())
            .finish()
    }
}
