//! Meshes and the labelled problem domain built on top of them.
//!
//! The `Mesh` trait is the seam to whatever mesh provider hosts the run; the
//! structured grid here is the in-tree provider used by the reference
//! discretization.

pub mod domain;
pub mod error;
pub mod file;
pub mod mesh;
pub mod structured;

pub use domain::{Domain, DomainSource, FacetCategory};
pub use error::{DomainError, DomainResult, MeshError, MeshResult};
pub use file::{MeshDef, load_mesh};
pub use mesh::{GridGeometry, Mesh};
pub use structured::StructuredMesh;
