//! Boundary and initial condition registries.
//!
//! User input (numeric literals or prebuilt expressions) is checked and
//! normalised into [`Expression`]s at registration, so everything downstream
//! sees one representation per field kind.

pub mod boundary;
pub mod error;
pub mod expression;
pub mod initial;

pub use boundary::{BoundaryCondition, BoundaryConditions};
pub use error::{ConditionError, ConditionResult};
pub use expression::{ConditionValue, Expression, Value};
pub use initial::InitialConditions;
