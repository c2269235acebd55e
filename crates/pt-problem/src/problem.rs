//! Validated, read-only problem configuration.

use pt_conditions::{BoundaryConditions, InitialConditions};
use pt_core::numeric::{ensure_all_finite, ensure_positive};
use pt_core::{FieldKind, Real};
use pt_mesh::Domain;

use crate::error::{ProblemError, ProblemResult};
use crate::params::ProblemParameters;

/// A steady incompressible flow problem on a labelled domain.
///
/// All validation happens in [`Problem::new`]; nothing about the
/// configuration can change afterwards.
#[derive(Debug)]
pub struct Problem {
    domain: Domain,
    bcs: BoundaryConditions,
    ics: InitialConditions,
    rho: Real,
    nu: Real,
    body_forces: Vec<Real>,
    max_iterations: usize,
    dt: Real,
}

impl Problem {
    /// A fresh parameter set. Each call returns an independent value.
    pub fn default_parameters() -> ProblemParameters {
        ProblemParameters::default()
    }

    pub fn new(params: ProblemParameters) -> ProblemResult<Self> {
        let domain = params.domain.ok_or(ProblemError::MissingDomain)?;
        let dim = domain.dimension();

        let rho = ensure_positive(params.rho.value, "density")?;
        let nu = ensure_positive(params.nu, "viscosity")?;
        let dt = ensure_positive(params.dt.value, "pseudo-time step")?;
        if params.max_iterations == 0 {
            return Err(pt_core::PtError::InvalidArg {
                what: "max_iterations must be positive",
            }
            .into());
        }

        let body_forces = match params.body_forces {
            Some(f) if f.len() != dim => {
                return Err(ProblemError::BodyForceDimension {
                    expected: dim,
                    actual: f.len(),
                });
            }
            Some(f) => {
                ensure_all_finite(&f, "body force")?;
                f
            }
            None => vec![0.0; dim],
        };

        let bcs = params.bcs.ok_or(ProblemError::MissingBoundaryConditions)?;
        for bc in bcs.iter() {
            if !domain.has_facet(bc.facet) {
                return Err(ProblemError::UnknownFacet {
                    field: bc.field,
                    facet: bc.facet,
                });
            }
            let expected = bc.field.value_size(dim);
            let actual = bc.expression.value_size();
            if actual != expected {
                return Err(ProblemError::ConditionDimension {
                    field: bc.field,
                    facet: bc.facet,
                    expected,
                    actual,
                });
            }
        }

        let ics = params
            .ics
            .unwrap_or_else(|| InitialConditions::with_domain_defaults(dim));
        for (field, expr) in ics.resolve()?.iter() {
            let expected = field.value_size(dim);
            if expr.value_size() != expected {
                return Err(ProblemError::InitialDimension {
                    field,
                    expected,
                    actual: expr.value_size(),
                });
            }
        }

        tracing::debug!(
            dim,
            rho,
            nu,
            dt,
            max_iterations = params.max_iterations,
            conditions = bcs.len(),
            "problem configured"
        );

        Ok(Self {
            domain,
            bcs,
            ics,
            rho,
            nu,
            body_forces,
            max_iterations: params.max_iterations,
            dt,
        })
    }

    pub fn domain(&self) -> &Domain {
        &self.domain
    }

    pub fn dimension(&self) -> usize {
        self.domain.dimension()
    }

    pub fn boundary_conditions(&self) -> &BoundaryConditions {
        &self.bcs
    }

    pub fn initial_conditions(&self) -> &InitialConditions {
        &self.ics
    }

    /// Density (kg/m³).
    pub fn density(&self) -> Real {
        self.rho
    }

    /// Background kinematic viscosity (m²/s).
    pub fn viscosity(&self) -> Real {
        self.nu
    }

    pub fn body_forces(&self) -> &[Real] {
        &self.body_forces
    }

    pub fn max_iterations(&self) -> usize {
        self.max_iterations
    }

    /// Pseudo-time step (s).
    pub fn dt(&self) -> Real {
        self.dt
    }

    /// Number of components of `field` on this domain.
    pub fn value_size(&self, field: FieldKind) -> usize {
        field.value_size(self.dimension())
    }
}
