//! Discrete state of a problem and its output.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use pt_conditions::Expression;
use pt_core::{Communicator, ExecutionContext, FieldKind, FieldMap};
use pt_fem::{Continuity, DirichletBc, DiscreteOperators, FemBackend, FieldSet};
use pt_problem::Problem;
use pt_results::{
    FieldLayout, FieldSnapshot, RunManifest, RunSettings, RunStore, RunSummary, RunWriter,
    compute_case_hash, run_dir_name,
};
use pt_solver::{SchemeReport, SolverResult, VelocityPressureSolver};

use crate::SOLVER_VERSION;
use crate::error::SimResult;

/// Output settings.
#[derive(Clone, Debug, PartialEq)]
pub struct BackendParameters {
    /// Dump every `dump_period` iterations; 0 dumps every iteration.
    pub dump_period: usize,
    /// Parent directory of the run directory.
    pub output_dir: PathBuf,
    pub case_name: String,
    /// Hash of the case definition, when the run came from a case file.
    pub case_hash: Option<String>,
}

impl Default for BackendParameters {
    fn default() -> Self {
        Self {
            dump_period: 0,
            output_dir: PathBuf::from("results"),
            case_name: "peryton".to_string(),
            case_hash: None,
        }
    }
}

/// When dumps are due.
///
/// The initial state (iteration 0) is always dumped, and so is every
/// iteration that is a multiple of the period. A period of 0 dumps every
/// iteration.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DumpSchedule {
    pub period: usize,
}

impl DumpSchedule {
    pub fn is_due(&self, iteration: usize) -> bool {
        self.period == 0 || iteration % self.period == 0
    }
}

/// Owns the problem, its discrete fields and the run directory.
pub struct NsBackend {
    params: BackendParameters,
    problem: Problem,
    fields: FieldSet,
    operators: Box<dyn DiscreteOperators>,
    bcs: FieldMap<Vec<DirichletBc>>,
    comm: Arc<dyn Communicator>,
    schedule: DumpSchedule,
    writer: Option<RunWriter>,
    dumps_written: usize,
    last_dump: Option<usize>,
    velocity_scale: f64,
}

/// Largest velocity component the run starts from: prescribed boundary
/// values at pseudo-time 0 and constant initial values.
fn velocity_scale(problem: &Problem, bcs: &mut [DirichletBc]) -> f64 {
    let mesh = problem.domain().mesh();
    let mut scale: f64 = 0.0;
    for bc in bcs.iter_mut() {
        bc.evaluate(mesh, 0.0);
        scale = bc.values().iter().fold(scale, |m, v| m.max(v.abs()));
    }
    if let Some(Expression::Constant(value)) = problem.initial_conditions().get(FieldKind::Velocity)
    {
        scale = value.components().iter().fold(scale, |m, v| m.max(v.abs()));
    }
    scale
}

impl NsBackend {
    /// Allocate velocity and pressure spaces and their iterate pairs.
    pub fn new(
        params: BackendParameters,
        problem: Problem,
        fem: &dyn FemBackend,
        comm: Arc<dyn Communicator>,
    ) -> SimResult<Self> {
        let mesh = problem.domain().mesh();
        let spaces = FieldMap::try_from_fn(|kind| {
            fem.function_space(mesh, Continuity::Continuous, 1, problem.value_size(kind))
        })?;
        let operators = fem.operators(mesh)?;
        let mut bcs = FieldMap::try_from_fn(|kind| {
            problem
                .boundary_conditions()
                .resolved(kind)
                .into_iter()
                .map(|bc| DirichletBc::new(fem, mesh, bc))
                .collect::<Result<Vec<_>, _>>()
        })?;
        let velocity_scale = velocity_scale(&problem, &mut bcs[FieldKind::Velocity]);
        tracing::debug!(
            backend = fem.name(),
            velocity_dofs = spaces[FieldKind::Velocity].num_dofs(),
            pressure_dofs = spaces[FieldKind::Pressure].num_dofs(),
            "allocated fields"
        );

        Ok(Self {
            schedule: DumpSchedule {
                period: params.dump_period,
            },
            params,
            fields: FieldSet::allocate(spaces),
            operators,
            bcs,
            problem,
            comm,
            writer: None,
            dumps_written: 0,
            last_dump: None,
            velocity_scale,
        })
    }

    pub fn problem(&self) -> &Problem {
        &self.problem
    }

    pub fn fields(&self) -> &FieldSet {
        &self.fields
    }

    pub fn context(&self) -> ExecutionContext {
        self.comm.context()
    }

    pub fn schedule(&self) -> DumpSchedule {
        self.schedule
    }

    /// Largest starting velocity component, for step-size checks.
    pub fn velocity_scale(&self) -> f64 {
        self.velocity_scale
    }

    /// Interpolate the initial conditions into the current iterates, then
    /// copy them into the previous iterates.
    pub fn apply_initial_conditions(&mut self) -> SimResult<()> {
        let ics = self
            .problem
            .initial_conditions()
            .resolve()
            .map_err(pt_problem::ProblemError::from)?;
        let mesh = self.problem.domain().mesh();
        for kind in FieldKind::ALL {
            self.fields.current_mut(kind).interpolate(mesh, &ics[kind], 0.0)?;
        }
        self.fields.advance()?;
        Ok(())
    }

    fn evaluate_boundary_conditions(&mut self, pseudo_time: f64) {
        let mesh = self.problem.domain().mesh();
        for (_, bcs) in self.bcs.iter_mut() {
            for bc in bcs {
                bc.evaluate(mesh, pseudo_time);
            }
        }
    }

    /// Impose every boundary condition on the current iterates.
    ///
    /// Conditions on the same facet were resolved at construction, so only
    /// the last one registered is applied; where facets share nodes the
    /// later facet wins.
    pub fn apply_boundary_conditions(&mut self, pseudo_time: f64) -> SimResult<()> {
        self.evaluate_boundary_conditions(pseudo_time);
        for kind in FieldKind::ALL {
            let field = self.fields.current_mut(kind);
            for bc in &self.bcs[kind] {
                bc.apply(field)?;
            }
        }
        Ok(())
    }

    /// One solver pass at `pseudo_time`, with conditions evaluated there.
    pub fn solve_pass(
        &mut self,
        solver: &mut VelocityPressureSolver,
        pseudo_time: f64,
    ) -> SolverResult<SchemeReport> {
        self.evaluate_boundary_conditions(pseudo_time);
        solver.solve(
            &mut self.fields,
            self.operators.as_ref(),
            &self.bcs,
            self.comm.as_ref(),
        )
    }

    /// RMS change of each field between the current and previous iterates,
    /// taken over all workers.
    pub fn convergence_residuals(&self) -> FieldMap<f64> {
        self.fields.local_changes().map(|_, &(sum_sq, dofs)| {
            let mut totals = [sum_sq, dofs as f64];
            self.comm.all_reduce_sum_slice(&mut totals);
            if totals[1] > 0.0 {
                (totals[0] / totals[1]).sqrt()
            } else {
                0.0
            }
        })
    }

    /// Copy current into previous.
    pub fn advance(&mut self) -> SimResult<()> {
        self.fields.advance()?;
        Ok(())
    }

    /// Create the run directory on the leader and write its manifest.
    pub fn open_output(&mut self, settings: RunSettings, scheme: &str) -> SimResult<()> {
        if !self.comm.is_leader() || self.writer.is_some() {
            return Ok(());
        }
        let mesh = self.problem.domain().mesh();
        let case_hash = match &self.params.case_hash {
            Some(hash) => hash.clone(),
            None => compute_case_hash(
                &(&self.params.case_name, &settings, mesh.num_vertices()),
                SOLVER_VERSION,
            ),
        };
        let started = chrono::Utc::now();
        let manifest = RunManifest {
            run_id: run_dir_name(&self.params.case_name, started),
            case_name: self.params.case_name.clone(),
            case_hash,
            timestamp: started.to_rfc3339(),
            solver_version: SOLVER_VERSION.to_string(),
            scheme: scheme.to_string(),
            dimension: self.problem.dimension(),
            num_vertices: mesh.num_vertices(),
            fields: FieldKind::ALL
                .into_iter()
                .map(|kind| FieldLayout {
                    kind,
                    value_size: self.problem.value_size(kind),
                    num_dofs: self.fields.current(kind).space().num_dofs(),
                })
                .collect(),
            settings,
        };
        let store = RunStore::new(self.params.output_dir.clone())?;
        let writer = store.create_run(manifest)?;
        tracing::info!(dir = %writer.dir().display(), "writing results");
        self.writer = Some(writer);
        Ok(())
    }

    /// Run directory, on the leader once output is open.
    pub fn output_dir(&self) -> Option<&Path> {
        self.writer.as_ref().map(RunWriter::dir)
    }

    pub fn dumps_written(&self) -> usize {
        self.dumps_written
    }

    /// Dump the current fields if `iteration` is due. Returns whether it was.
    pub fn dump_to_file(&mut self, iteration: usize, pseudo_time: f64) -> SimResult<bool> {
        if !self.schedule.is_due(iteration) {
            return Ok(false);
        }
        self.write_dump(iteration, pseudo_time)?;
        Ok(true)
    }

    /// Dump the final state unless `iteration` was already dumped.
    pub fn final_dump(&mut self, iteration: usize, pseudo_time: f64) -> SimResult<bool> {
        if self.last_dump == Some(iteration) {
            return Ok(false);
        }
        self.write_dump(iteration, pseudo_time)?;
        Ok(true)
    }

    fn write_dump(&mut self, iteration: usize, pseudo_time: f64) -> SimResult<()> {
        if let Some(writer) = self.writer.as_mut() {
            let snapshots = FieldKind::ALL
                .into_iter()
                .map(|kind| {
                    let field = self.fields.current(kind);
                    FieldSnapshot {
                        kind,
                        name: field.name().to_string(),
                        value_size: field.space().value_size,
                        values: field.as_slice().to_vec(),
                    }
                })
                .collect();
            let path = writer.write_dump(iteration, pseudo_time, snapshots)?;
            tracing::debug!(iteration, path = %path.display(), "dumped fields");
        }
        self.dumps_written += 1;
        self.last_dump = Some(iteration);
        Ok(())
    }

    /// Record how the run ended.
    pub fn finish(&self, summary: &RunSummary) -> SimResult<()> {
        if let Some(writer) = &self.writer {
            writer.write_summary(summary)?;
        }
        Ok(())
    }
}

impl std::fmt::Debug for NsBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NsBackend")
            .field("params", &self.params)
            .field("context", &self.comm.context())
            .field("dumps_written", &self.dumps_written)
            .finish_non_exhaustive()
    }
}
