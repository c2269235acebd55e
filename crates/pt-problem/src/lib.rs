//! pt-problem: validated problem configuration and case files.

pub mod case;
pub mod error;
pub mod params;
pub mod problem;

pub use case::{CaseDef, load_case};
pub use error::{ProblemError, ProblemResult};
pub use params::ProblemParameters;
pub use problem::Problem;
