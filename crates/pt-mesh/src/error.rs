//! Mesh and domain error types.

use pt_core::{FacetId, PtError};
use std::path::PathBuf;
use thiserror::Error;

use crate::domain::FacetCategory;

/// Errors raised while building or reading a mesh.
#[derive(Error, Debug)]
pub enum MeshError {
    #[error("Invalid grid: {what}")]
    InvalidGrid { what: String },

    #[error("Failed to read mesh file: {path}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Unsupported mesh file format: {path} (expected .yaml, .yml or .json)")]
    UnsupportedFormat { path: PathBuf },

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type MeshResult<T> = Result<T, MeshError>;

/// Configuration errors raised while assembling a domain.
#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Mesh error: {0}")]
    Mesh(#[from] MeshError),

    #[error("Facet {facet} is not a boundary facet of the mesh")]
    UnknownFacet { facet: FacetId },

    #[error("Facet {facet} cannot be both {existing} and {requested}")]
    CategoryConflict {
        facet: FacetId,
        existing: FacetCategory,
        requested: FacetCategory,
    },

    #[error("Facet {facet} cannot be filed under several categories at once: {categories:?}")]
    MultipleCategories {
        facet: FacetId,
        categories: Vec<FacetCategory>,
    },

    #[error("No facets given for label '{label}'")]
    EmptyTarget { label: String },

    #[error("Invalid argument: {0}")]
    Core(#[from] PtError),
}

pub type DomainResult<T> = Result<T, DomainError>;
