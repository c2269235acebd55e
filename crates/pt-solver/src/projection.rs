//! Incremental pressure-correction.
//!
//! One pass:
//! 1. predict `u*` explicitly from the momentum equation with the current
//!    pressure gradient, and impose the velocity conditions on it;
//! 2. solve `lap(phi) = rho / dt * div(u*) - D(p)` with `phi = 0` on
//!    pressure condition nodes (one node is pinned when there are none);
//! 3. correct `u = u* - dt / rho * grad(phi)` and `p += phi`, then impose
//!    both sets of conditions again.
//!
//! `D` is [`DiscreteOperators::pressure_dissipation`]. Velocity and pressure
//! share nodes, so the wide gradient and divergence alone leave the odd-even
//! pressure mode (and the velocity zig-zag it drives) unconstrained. With
//! `D` in the source, a converged state satisfies
//! `div(u) = dt / rho * D(p)`, which pins that mode down.

use nalgebra::DVector;
use pt_core::{Communicator, FieldKind};
use pt_fem::{DiscreteOperators, FieldSet};
use rayon::prelude::*;

use crate::error::{SolverError, SolverResult};
use crate::linear::{CgConfig, masked_cg};
use crate::scheme::{CouplingScheme, SchemeReport, SolveInputs};

#[derive(Clone, Debug, Default)]
pub struct ProjectionScheme {
    pub pressure_solve: CgConfig,
}

impl ProjectionScheme {
    pub fn new(pressure_solve: CgConfig) -> Self {
        Self { pressure_solve }
    }
}

fn rms(values: &[f64], comm: &dyn Communicator) -> f64 {
    let sum_sq = comm.all_reduce_sum(values.iter().map(|v| v * v).sum());
    let count = comm.all_reduce_sum(values.len() as f64);
    if count > 0.0 {
        (sum_sq / count).sqrt()
    } else {
        0.0
    }
}

fn divergence_rms(ops: &dyn DiscreteOperators, velocity: &[f64], comm: &dyn Communicator) -> f64 {
    let mut div = vec![0.0; ops.num_nodes()];
    ops.divergence(velocity, &mut div);
    rms(&div, comm)
}

impl CouplingScheme for ProjectionScheme {
    fn name(&self) -> &'static str {
        "projection"
    }

    fn solve(
        &mut self,
        fields: &mut FieldSet,
        inputs: &SolveInputs<'_>,
    ) -> SolverResult<SchemeReport> {
        let ops = inputs.operators;
        let dim = ops.dimension();
        let n = ops.num_nodes();
        let (rho, nu, dt) = (inputs.density, inputs.viscosity, inputs.dt);
        let force = inputs.body_force;

        let (velocity, pressure) = fields.currents_mut();
        if velocity.as_slice().len() != n * dim || pressure.as_slice().len() != n {
            return Err(SolverError::ProblemSetup {
                what: format!(
                    "fields do not match the operators: {} velocity and {} pressure dofs for {n} nodes",
                    velocity.as_slice().len(),
                    pressure.as_slice().len()
                ),
            });
        }
        if force.len() != dim {
            return Err(SolverError::ProblemSetup {
                what: format!("body force has {} components, expected {dim}", force.len()),
            });
        }

        // Predictor.
        let u = velocity.as_slice();
        let p = pressure.as_slice();
        let mut grad_p = vec![0.0; n * dim];
        let mut advection = vec![0.0; n * dim];
        let mut diffusion = vec![0.0; n * dim];
        ops.gradient(p, &mut grad_p);
        ops.convection(u, u, dim, &mut advection);
        ops.laplacian(u, dim, &mut diffusion);

        let mut u_star: Vec<f64> = (0..n * dim)
            .into_par_iter()
            .map(|k| {
                u[k] + dt
                    * (nu * diffusion[k] - advection[k] - grad_p[k] / rho + force[k % dim])
            })
            .collect();
        for bc in inputs.velocity_bcs {
            bc.apply_slice(&mut u_star);
        }
        let mut div = vec![0.0; n];
        ops.divergence(&u_star, &mut div);
        let predicted_divergence = rms(&div, inputs.comm);

        // Pressure increment.
        let mut fixed = vec![false; n];
        for bc in inputs.pressure_bcs {
            bc.mark(&mut fixed);
        }
        let local_pins = fixed.iter().filter(|f| **f).count() as f64;
        if inputs.comm.all_reduce_sum(local_pins) == 0.0 && inputs.comm.is_leader() && n > 0 {
            fixed[0] = true;
        }
        let mut dissipation = vec![0.0; n];
        ops.pressure_dissipation(pressure.as_slice(), &mut dissipation);
        let weights = ops.node_weights();
        let b = DVector::from_iterator(
            n,
            (0..n).map(|i| {
                if fixed[i] {
                    0.0
                } else {
                    -weights[i] * (rho / dt * div[i] - dissipation[i])
                }
            }),
        );
        let apply = |x: &DVector<f64>, out: &mut DVector<f64>| {
            ops.laplacian(x.as_slice(), 1, out.as_mut_slice());
            for (o, w) in out.iter_mut().zip(weights) {
                *o *= -w;
            }
        };
        let mut phi = DVector::zeros(n);
        let cg = masked_cg(
            apply,
            &b,
            &mut phi,
            &fixed,
            inputs.comm,
            &self.pressure_solve,
        )?;

        // Correction.
        let mut grad_phi = vec![0.0; n * dim];
        ops.gradient(phi.as_slice(), &mut grad_phi);
        velocity
            .as_mut_slice()
            .par_iter_mut()
            .zip(u_star.par_iter())
            .zip(grad_phi.par_iter())
            .for_each(|((u, us), g)| *u = us - dt / rho * g);
        for bc in inputs.velocity_bcs {
            bc.apply(velocity)?;
        }
        *pressure.values_mut() += &phi;
        for bc in inputs.pressure_bcs {
            bc.apply(pressure)?;
        }

        if !velocity.is_finite() {
            return Err(SolverError::NonFinite {
                field: FieldKind::Velocity,
            });
        }
        if !pressure.is_finite() {
            return Err(SolverError::NonFinite {
                field: FieldKind::Pressure,
            });
        }

        let report = SchemeReport {
            pressure_iterations: cg.iterations,
            pressure_residual: cg.residual_norm,
            predicted_divergence,
            divergence: divergence_rms(ops, velocity.as_slice(), inputs.comm),
        };
        tracing::trace!(?report, "projection pass");
        Ok(report)
    }
}
