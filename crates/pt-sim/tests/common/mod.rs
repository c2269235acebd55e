#![allow(dead_code)]

use std::path::PathBuf;

use pt_conditions::BoundaryConditions;
use pt_core::{FacetId, FacetTarget};
use pt_mesh::{Domain, FacetCategory, StructuredMesh};
use pt_problem::{Problem, ProblemParameters};
use pt_sim::{Algorithm, AlgorithmParameters};

pub fn facet(id: u32) -> FacetId {
    FacetId::new(id).unwrap()
}

pub fn facets(ids: &[u32]) -> FacetTarget {
    FacetTarget::from_raw(ids).unwrap()
}

pub fn fresh_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(name);
    let _ = std::fs::remove_dir_all(&dir);
    dir
}

pub fn algorithm_params(output: &str, dump_period: usize, tolerance: f64) -> AlgorithmParameters {
    let mut params = Algorithm::default_parameters();
    params.backend.output_dir = fresh_dir(output);
    params.backend.case_name = output.to_string();
    params.backend.dump_period = dump_period;
    params.convergence_tolerance = tolerance;
    params
}

/// Parameters for a labelled channel `[0, 2] x [0, 1]`.
pub fn channel_parameters(max_iterations: usize) -> ProblemParameters {
    let mut domain = Domain::from_mesh(StructuredMesh::rectangle(20, 10, 2.0, 1.0).unwrap());
    domain
        .label_facet(facet(1), "Inflow", &[FacetCategory::Inlet])
        .unwrap();
    domain
        .label_facet(facet(2), "Outlet", &[FacetCategory::Outlet])
        .unwrap();
    domain
        .label_facet(facets(&[3, 4]), "Walls", &[FacetCategory::Wall])
        .unwrap();

    let mut params = Problem::default_parameters();
    let reynolds = 100.0;
    let u_in = reynolds * params.nu / 1.0;

    let mut bcs = BoundaryConditions::new();
    bcs.add_velocity_condition([u_in, 0.0], facet(1), false)
        .unwrap();
    bcs.add_velocity_condition([0.0, 0.0], facets(&[3, 4]), false)
        .unwrap();
    bcs.add_pressure_condition(0.0, facet(2), false).unwrap();

    params.domain = Some(domain);
    params.bcs = Some(bcs);
    params.max_iterations = max_iterations;
    params
}

/// Unit square with no-slip walls all round and nothing to drive a flow.
pub fn quiescent_parameters(max_iterations: usize) -> ProblemParameters {
    let domain = Domain::from_mesh(StructuredMesh::rectangle(4, 4, 1.0, 1.0).unwrap());
    let mut bcs = BoundaryConditions::new();
    bcs.add_velocity_condition([0.0, 0.0], facets(&[1, 2, 3, 4]), false)
        .unwrap();

    let mut params = Problem::default_parameters();
    params.domain = Some(domain);
    params.bcs = Some(bcs);
    params.max_iterations = max_iterations;
    params
}
