//! Configuration errors raised while assembling a problem.

use std::path::PathBuf;

use pt_conditions::ConditionError;
use pt_core::{FacetId, FieldKind, PtError};
use pt_mesh::{DomainError, MeshError};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ProblemError {
    #[error("Problem has no domain")]
    MissingDomain,

    #[error("Problem has no boundary conditions")]
    MissingBoundaryConditions,

    #[error("Body force has {actual} components but the domain is {expected}-dimensional")]
    BodyForceDimension { expected: usize, actual: usize },

    #[error("{field} on facet {facet} has {actual} components, expected {expected}")]
    ConditionDimension {
        field: FieldKind,
        facet: FacetId,
        expected: usize,
        actual: usize,
    },

    #[error("Initial {field} has {actual} components, expected {expected}")]
    InitialDimension {
        field: FieldKind,
        expected: usize,
        actual: usize,
    },

    #[error("{field} condition targets facet {facet}, which the mesh does not have")]
    UnknownFacet { field: FieldKind, facet: FacetId },

    #[error("Invalid parameter: {0}")]
    Parameter(#[from] PtError),

    #[error("Condition error: {0}")]
    Condition(#[from] ConditionError),

    #[error("Domain error: {0}")]
    Domain(#[from] DomainError),

    #[error("Mesh error: {0}")]
    Mesh(#[from] MeshError),

    #[error("Failed to read case file: {path}")]
    CaseRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Invalid case: {what}")]
    Case { what: String },

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type ProblemResult<T> = Result<T, ProblemError>;
