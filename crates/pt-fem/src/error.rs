use pt_core::FacetId;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum FemError {
    #[error("Unsupported by this backend: {what}")]
    Unsupported { what: String },

    #[error("Size mismatch for {what}: expected {expected}, got {actual}")]
    SizeMismatch {
        what: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("Facet {facet} is not on the mesh")]
    UnknownFacet { facet: FacetId },
}

pub type FemResult<T> = Result<T, FemError>;
