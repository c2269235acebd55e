//! pt-solver: velocity–pressure coupling for one pseudo-time pass.
//!
//! - `linear`: matrix-free conjugate gradients with pinned unknowns
//! - `scheme`: the `CouplingScheme` seam and its inputs
//! - `projection`: incremental pressure-correction reference scheme
//! - `solver`: `VelocityPressureSolver`, which owns settings and a scheme

pub mod error;
pub mod linear;
pub mod projection;
pub mod scheme;
pub mod solver;

pub use error::{SolverError, SolverResult};
pub use linear::{CgConfig, CgResult, masked_cg};
pub use projection::ProjectionScheme;
pub use scheme::{CouplingScheme, SchemeReport, SolveInputs};
pub use solver::{SolverSettings, VelocityPressureSolver};
