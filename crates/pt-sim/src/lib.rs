//! pt-sim: pseudo-time iteration to a steady state.
//!
//! - `backend`: field allocation, condition application, dump scheduling
//! - `algorithm`: the iteration state machine
//! - `report`: per-pass events and the final run report

pub mod algorithm;
pub mod backend;
pub mod error;
pub mod report;

pub use algorithm::{Algorithm, AlgorithmParameters, AlgorithmState};
pub use backend::{BackendParameters, DumpSchedule, NsBackend};
pub use error::{SimError, SimResult};
pub use report::{IterationEvent, RunOutcome, RunReport};

/// Version string recorded in run manifests and mixed into case hashes.
pub const SOLVER_VERSION: &str = concat!("peryton ", env!("CARGO_PKG_VERSION"));
