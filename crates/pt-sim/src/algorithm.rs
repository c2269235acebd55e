//! The pseudo-time iteration state machine.
//!
//! `Init -> IcsApplied -> BcsApplied -> Iterating -> {Converged |
//! MaxIterationsReached} -> Terminated`. A solver failure aborts the run
//! from `Iterating` with [`SimError::SolveFailed`].

use std::sync::Arc;

use pt_core::console::{Colour, Style, info_out};
use pt_core::{Communicator, FieldKind, FieldMap, SerialCommunicator};
use pt_fem::{FemBackend, GridBackend};
use pt_problem::{CaseDef, Problem};
use pt_results::{RunSettings, RunSummary, compute_case_hash};
use pt_solver::{
    CgConfig, CouplingScheme, ProjectionScheme, SolverSettings, VelocityPressureSolver,
};

use crate::SOLVER_VERSION;
use crate::backend::{BackendParameters, NsBackend};
use crate::error::{SimError, SimResult};
use crate::report::{IterationEvent, RunOutcome, RunReport, max_residual};

/// Iteration settings.
#[derive(Clone, Debug, PartialEq)]
pub struct AlgorithmParameters {
    pub backend: BackendParameters,
    /// Converged once the largest per-field RMS change drops strictly below this.
    pub convergence_tolerance: f64,
    /// Eddy viscosity added to the molecular one; `None` is laminar.
    pub turbulent_viscosity: Option<f64>,
    /// Linear solve used for the pressure correction.
    pub pressure_solve: CgConfig,
}

impl Default for AlgorithmParameters {
    fn default() -> Self {
        Self {
            backend: BackendParameters::default(),
            convergence_tolerance: 1e-6,
            turbulent_viscosity: None,
            pressure_solve: CgConfig::default(),
        }
    }
}

impl AlgorithmParameters {
    /// Defaults overridden by the `algorithm` section of a case.
    pub fn from_case(case: &CaseDef) -> Self {
        let mut params = Self::default();
        let def = &case.algorithm;
        if let Some(period) = def.dump_period {
            params.backend.dump_period = period;
        }
        if let Some(dir) = &def.output_dir {
            params.backend.output_dir = dir.clone();
        }
        if let Some(tol) = def.convergence_tolerance {
            params.convergence_tolerance = tol;
        }
        params.turbulent_viscosity = def.turbulent_viscosity;
        params.backend.case_name = case.name.clone();
        params.backend.case_hash = Some(compute_case_hash(case, SOLVER_VERSION));
        params
    }
}

/// Where the state machine is.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AlgorithmState {
    Init,
    IcsApplied,
    BcsApplied,
    Iterating,
    Converged,
    MaxIterationsReached,
    Terminated,
}

/// Drives a problem to a steady state by pseudo-time stepping.
#[derive(Debug)]
pub struct Algorithm {
    backend: NsBackend,
    solver: VelocityPressureSolver,
    convergence_tolerance: f64,
    state: AlgorithmState,
    iteration: usize,
    pseudo_time: f64,
    last_residuals: Option<FieldMap<f64>>,
    stability_number: f64,
}

impl Algorithm {
    /// A fresh parameter set. Each call returns an independent value.
    pub fn default_parameters() -> AlgorithmParameters {
        AlgorithmParameters::default()
    }

    /// Serial run on the grid backend with the projection scheme.
    pub fn new(params: AlgorithmParameters, problem: Problem) -> SimResult<Self> {
        let scheme = Box::new(ProjectionScheme::new(params.pressure_solve.clone()));
        Self::with_components(
            params,
            problem,
            &GridBackend,
            scheme,
            Arc::new(SerialCommunicator),
        )
    }

    pub fn with_components(
        params: AlgorithmParameters,
        problem: Problem,
        fem: &dyn FemBackend,
        scheme: Box<dyn CouplingScheme>,
        comm: Arc<dyn Communicator>,
    ) -> SimResult<Self> {
        let tol = params.convergence_tolerance;
        if tol.is_nan() || tol < 0.0 {
            return Err(SimError::InvalidArg {
                what: "convergence tolerance must be non-negative",
            });
        }
        let settings = SolverSettings {
            density: problem.density(),
            background_viscosity: problem.viscosity(),
            turbulent_viscosity: params.turbulent_viscosity,
            body_force: problem.body_forces().to_vec(),
            dt: problem.dt(),
        };
        let solver = VelocityPressureSolver::with_scheme(settings, scheme)?;
        let backend = NsBackend::new(params.backend, problem, fem, comm)?;
        let (h_min, _) = backend.problem().domain().mesh().cell_size_range();
        let stability_number = solver.settings().stability_number(
            backend.velocity_scale(),
            h_min,
            backend.problem().dimension(),
        );
        if stability_number > 1.0 && backend.context().is_leader() {
            tracing::warn!(
                stability_number,
                dt = solver.settings().dt,
                h_min,
                "pseudo-time step exceeds the explicit stability estimate, iterates may oscillate or diverge"
            );
        }
        Ok(Self {
            backend,
            solver,
            convergence_tolerance: tol,
            state: AlgorithmState::Init,
            iteration: 0,
            pseudo_time: 0.0,
            last_residuals: None,
            stability_number,
        })
    }

    pub fn state(&self) -> AlgorithmState {
        self.state
    }

    pub fn iteration(&self) -> usize {
        self.iteration
    }

    pub fn pseudo_time(&self) -> f64 {
        self.pseudo_time
    }

    /// `dt * dim * (|u| / h + 2 nu / h^2)` for the starting velocity scale
    /// and the smallest cell; values above one are warned about at setup.
    pub fn stability_number(&self) -> f64 {
        self.stability_number
    }

    pub fn backend(&self) -> &NsBackend {
        &self.backend
    }

    pub fn run(&mut self) -> SimResult<RunReport> {
        self.run_with_progress(|_| {})
    }

    /// Run to termination, calling `on_pass` after every completed pass.
    pub fn run_with_progress(
        &mut self,
        mut on_pass: impl FnMut(&IterationEvent),
    ) -> SimResult<RunReport> {
        if self.state != AlgorithmState::Init {
            return Err(SimError::InvalidState {
                what: format!("run requested in state {:?}", self.state),
            });
        }
        let ctx = self.backend.context();
        let max_iterations = self.backend.problem().max_iterations();
        let dt = self.backend.problem().dt();

        let settings = self.run_settings();
        let scheme_name = self.solver.scheme_name();
        self.backend.open_output(settings, scheme_name)?;

        self.backend.apply_initial_conditions()?;
        self.state = AlgorithmState::IcsApplied;

        self.backend.apply_boundary_conditions(self.pseudo_time)?;
        self.state = AlgorithmState::BcsApplied;

        self.backend.dump_to_file(self.iteration, self.pseudo_time)?;
        self.state = AlgorithmState::Iterating;
        info_out(
            ctx,
            &format!(
                "Iterating: at most {max_iterations} passes, dt = {dt}, scheme {scheme_name}"
            ),
            Style::colour(Colour::Blue),
        );

        let outcome = loop {
            let pass = self.iteration + 1;
            let t = pass as f64 * dt;
            let scheme = self
                .backend
                .solve_pass(&mut self.solver, t)
                .map_err(|source| SimError::SolveFailed {
                    iteration: pass,
                    residual: self.last_residuals.as_ref().map(max_residual),
                    source,
                })?;

            let residuals = self.backend.convergence_residuals();
            self.backend.advance()?;
            self.iteration = pass;
            self.pseudo_time = t;
            let dumped = self.backend.dump_to_file(pass, t)?;

            let event = IterationEvent {
                iteration: pass,
                pseudo_time: t,
                residuals: residuals.clone(),
                dumped,
                scheme,
            };
            if ctx.is_leader() {
                tracing::info!(
                    iteration = pass,
                    pseudo_time = t,
                    velocity = residuals[FieldKind::Velocity],
                    pressure = residuals[FieldKind::Pressure],
                    dumped,
                    "pass complete"
                );
            }
            on_pass(&event);
            let residual = event.max_residual();
            self.last_residuals = Some(residuals);

            if residual < self.convergence_tolerance {
                break RunOutcome::Converged;
            }
            if pass >= max_iterations {
                break RunOutcome::MaxIterationsReached;
            }
        };
        self.state = match outcome {
            RunOutcome::Converged => AlgorithmState::Converged,
            RunOutcome::MaxIterationsReached => AlgorithmState::MaxIterationsReached,
        };

        self.backend.final_dump(self.iteration, self.pseudo_time)?;
        self.state = AlgorithmState::Terminated;

        let residuals = self.last_residuals.clone().unwrap_or_default();
        let final_residual = max_residual(&residuals);
        self.backend.finish(&RunSummary {
            outcome: outcome.into(),
            iterations: self.iteration,
            pseudo_time: self.pseudo_time,
            final_residual: Some(final_residual),
            dumps_written: self.backend.dumps_written(),
        })?;

        let (message, colour) = match outcome {
            RunOutcome::Converged => (
                format!(
                    "Converged after {} iterations (residual {final_residual:e})",
                    self.iteration
                ),
                Colour::Green,
            ),
            RunOutcome::MaxIterationsReached => (
                format!(
                    "Stopped after {} iterations without converging (residual {final_residual:e})",
                    self.iteration
                ),
                Colour::Yellow,
            ),
        };
        info_out(ctx, &message, Style::colour(colour).bold());

        Ok(RunReport {
            outcome,
            iterations: self.iteration,
            pseudo_time: self.pseudo_time,
            residuals,
            final_residual,
            dumps_written: self.backend.dumps_written(),
            output_dir: self.backend.output_dir().map(Into::into),
        })
    }

    fn run_settings(&self) -> RunSettings {
        let problem = self.backend.problem();
        RunSettings {
            density: problem.density(),
            viscosity: problem.viscosity(),
            turbulent_viscosity: self.solver.settings().turbulent_viscosity,
            dt: problem.dt(),
            max_iterations: problem.max_iterations(),
            dump_period: self.backend.schedule().period,
            convergence_tolerance: self.convergence_tolerance,
        }
    }
}
