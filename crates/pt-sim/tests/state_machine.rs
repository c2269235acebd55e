mod common;

use std::sync::Arc;

use common::{algorithm_params, facet, facets, quiescent_parameters};
use pt_conditions::{BoundaryConditions, Expression};
use pt_core::{FacetId, FieldKind, SerialCommunicator};
use pt_fem::{FemError, FieldSet, GridBackend};
use pt_mesh::{Domain, GridGeometry, Mesh, StructuredMesh};
use pt_problem::Problem;
use pt_sim::{Algorithm, AlgorithmState, RunOutcome, SimError};
use pt_solver::{CouplingScheme, SchemeReport, SolveInputs, SolverError, SolverResult};

#[test]
fn quiescent_problem_converges_after_one_pass() {
    for (period, expected_dumps) in [(1, 2), (3, 2), (0, 2)] {
        let problem = Problem::new(quiescent_parameters(50)).unwrap();
        let params = algorithm_params(&format!("pt_sim_quiescent_{period}"), period, 1e-6);
        let mut algorithm = Algorithm::new(params, problem).unwrap();

        let report = algorithm.run().unwrap();
        assert_eq!(report.outcome, RunOutcome::Converged);
        assert!(report.converged());
        assert_eq!(report.iterations, 1);
        assert_eq!(report.final_residual, 0.0);
        assert_eq!(report.dumps_written, expected_dumps);
    }
}

#[test]
fn zero_tolerance_never_converges() {
    let problem = Problem::new(quiescent_parameters(3)).unwrap();
    let params = algorithm_params("pt_sim_zero_tolerance", 1, 0.0);
    let report = Algorithm::new(params, problem).unwrap().run().unwrap();
    assert_eq!(report.outcome, RunOutcome::MaxIterationsReached);
    assert_eq!(report.iterations, 3);
    assert_eq!(report.dumps_written, 4);
}

#[test]
fn pseudo_time_does_not_drift_over_many_passes() {
    let passes = 1251;
    let dt = 0.01;
    let mut params = quiescent_parameters(passes);
    params.dt = pt_core::units::s(dt);
    let problem = Problem::new(params).unwrap();
    let mut algorithm =
        Algorithm::new(algorithm_params("pt_sim_no_drift", 100_000, 0.0), problem).unwrap();

    let mut times = Vec::new();
    let report = algorithm
        .run_with_progress(|event| times.push((event.iteration, event.pseudo_time)))
        .unwrap();

    assert_eq!(report.iterations, passes);
    assert_eq!(report.pseudo_time, passes as f64 * dt);
    assert_eq!(report.pseudo_time.to_string(), "12.51");
    assert!(times.iter().all(|&(i, t)| t == i as f64 * dt));
    assert_eq!(report.dumps_written, 2);
}

#[test]
fn stability_number_follows_step_size_and_driving_velocity() {
    let problem = Problem::new(quiescent_parameters(1)).unwrap();
    let algorithm = Algorithm::new(algorithm_params("pt_sim_stable", 1, 1e-6), problem).unwrap();
    assert_eq!(algorithm.backend().velocity_scale(), 0.0);
    assert!(algorithm.stability_number() < 1.0);

    // Lid at 50 m/s over 0.25 m cells with dt = 1 s.
    let mut params = quiescent_parameters(1);
    let mut bcs = BoundaryConditions::new();
    bcs.add_velocity_condition([0.0, 0.0], facets(&[1, 2, 3]), false)
        .unwrap();
    bcs.add_velocity_condition([50.0, 0.0], facet(4), false)
        .unwrap();
    params.bcs = Some(bcs);
    let problem = Problem::new(params).unwrap();
    let algorithm = Algorithm::new(algorithm_params("pt_sim_lid", 1, 1e-6), problem).unwrap();
    assert_eq!(algorithm.backend().velocity_scale(), 50.0);
    assert!(algorithm.stability_number() > 400.0);

    let mut params = quiescent_parameters(1);
    params.nu = 1.0;
    params.dt = pt_core::units::s(0.01);
    let problem = Problem::new(params).unwrap();
    let algorithm = Algorithm::new(algorithm_params("pt_sim_viscous", 1, 1e-6), problem).unwrap();
    assert!((algorithm.stability_number() - 0.64).abs() < 1e-12);
}

#[test]
fn second_run_is_rejected() {
    let problem = Problem::new(quiescent_parameters(2)).unwrap();
    let params = algorithm_params("pt_sim_second_run", 1, 1e-6);
    let mut algorithm = Algorithm::new(params, problem).unwrap();
    assert_eq!(algorithm.state(), AlgorithmState::Init);
    algorithm.run().unwrap();
    assert!(matches!(
        algorithm.run(),
        Err(SimError::InvalidState { .. })
    ));
}

/// Nudges the pressure every pass and fails on a chosen pass.
struct FailOnPass {
    calls: usize,
    fail_at: usize,
}

impl CouplingScheme for FailOnPass {
    fn name(&self) -> &'static str {
        "fail-on-pass"
    }

    fn solve(&mut self, fields: &mut FieldSet, _: &SolveInputs<'_>) -> SolverResult<SchemeReport> {
        self.calls += 1;
        if self.calls == self.fail_at {
            return Err(SolverError::Numeric {
                what: "injected failure".to_string(),
            });
        }
        fields.current_mut(FieldKind::Pressure).as_mut_slice()[0] += 1.0;
        Ok(SchemeReport::default())
    }
}

#[test]
fn solve_failure_reports_the_failing_iteration() {
    let problem = Problem::new(quiescent_parameters(10)).unwrap();
    let params = algorithm_params("pt_sim_failure", 1, 1e-6);
    let mut algorithm = Algorithm::with_components(
        params,
        problem,
        &GridBackend,
        Box::new(FailOnPass {
            calls: 0,
            fail_at: 3,
        }),
        Arc::new(SerialCommunicator),
    )
    .unwrap();

    match algorithm.run() {
        Err(SimError::SolveFailed {
            iteration,
            residual,
            source,
        }) => {
            assert_eq!(iteration, 3);
            assert!(residual.unwrap() > 0.0);
            assert!(matches!(source, SolverError::Numeric { .. }));
        }
        other => panic!("expected a solve failure, got {other:?}"),
    }
    assert_eq!(algorithm.iteration(), 2);
    assert_eq!(algorithm.state(), AlgorithmState::Iterating);
    assert_eq!(algorithm.backend().dumps_written(), 3);
}

#[test]
fn time_dependent_conditions_follow_pseudo_time() {
    for (time_dependent, expected) in [(true, 0.75), (false, 0.0)] {
        let mut params = quiescent_parameters(3);
        let ramp = Expression::function(2, |_, t, out| {
            out[0] = t;
            out[1] = 0.0;
        });
        let mut bcs = BoundaryConditions::new();
        bcs.add_velocity_condition([0.0, 0.0], facets(&[2, 3, 4]), false)
            .unwrap();
        bcs.add_velocity_condition(ramp, facet(1), time_dependent)
            .unwrap();
        params.bcs = Some(bcs);
        params.dt = pt_core::units::s(0.25);

        let problem = Problem::new(params).unwrap();
        let output = format!("pt_sim_ramp_{time_dependent}");
        let mut algorithm = Algorithm::new(algorithm_params(&output, 1, 0.0), problem).unwrap();
        let report = algorithm.run().unwrap();
        assert_eq!(report.pseudo_time, 0.75);

        // Vertex (0, 2) on the 4 x 4 grid: on the inflow facet, off the corners.
        let u = algorithm.backend().fields().current(FieldKind::Velocity);
        assert_eq!(u.node(10), &[expected, 0.0]);
    }
}

#[test]
fn negative_turbulent_viscosity_is_rejected() {
    let problem = Problem::new(quiescent_parameters(3)).unwrap();
    let mut params = algorithm_params("pt_sim_bad_turbulence", 1, 1e-6);
    params.turbulent_viscosity = Some(-1.0);
    assert!(matches!(
        Algorithm::new(params, problem),
        Err(SimError::Solver(SolverError::ProblemSetup { .. }))
    ));
}

/// A grid that hides its structure, as an unstructured mesh would.
#[derive(Debug)]
struct Unstructured(StructuredMesh);

impl Mesh for Unstructured {
    fn geometric_dimension(&self) -> usize {
        self.0.geometric_dimension()
    }

    fn num_cells(&self) -> usize {
        self.0.num_cells()
    }

    fn num_vertices(&self) -> usize {
        self.0.num_vertices()
    }

    fn vertex(&self, index: usize) -> &[f64] {
        self.0.vertex(index)
    }

    fn facet_ids(&self) -> Vec<FacetId> {
        self.0.facet_ids()
    }

    fn facet_vertices(&self, facet: FacetId) -> Option<&[usize]> {
        self.0.facet_vertices(facet)
    }

    fn cell_size_range(&self) -> (f64, f64) {
        self.0.cell_size_range()
    }

    fn grid(&self) -> Option<&GridGeometry> {
        None
    }
}

#[test]
fn unstructured_mesh_is_unsupported_by_the_grid_backend() {
    let mut params = quiescent_parameters(3);
    params.domain = Some(Domain::from_mesh(Unstructured(
        StructuredMesh::rectangle(4, 4, 1.0, 1.0).unwrap(),
    )));
    let problem = Problem::new(params).unwrap();
    assert!(matches!(
        Algorithm::new(algorithm_params("pt_sim_unstructured", 1, 1e-6), problem),
        Err(SimError::Fem(FemError::Unsupported { .. }))
    ));
}
