//! Discretization backend seam.
//!
//! The orchestration layer only needs a handful of primitives from a
//! finite-element backend: function spaces over a mesh, fields living on
//! them, interpolation, strong boundary conditions, and the discrete
//! operators a coupling scheme is built from. This crate defines those
//! primitives as traits and types, and provides a nodal backend for
//! structured grids.

pub mod backend;
pub mod dirichlet;
pub mod error;
pub mod field;
pub mod field_set;
pub mod operators;
pub mod space;

pub use backend::{FemBackend, GridBackend};
pub use dirichlet::DirichletBc;
pub use error::{FemError, FemResult};
pub use field::Field;
pub use field_set::{FieldPair, FieldSet};
pub use operators::{DiscreteOperators, GridOperators};
pub use space::{Continuity, FunctionSpace};
