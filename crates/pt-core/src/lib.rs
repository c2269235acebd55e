//! pt-core: shared foundation for peryton.
//!
//! Contains:
//! - numeric (Real + parameter checks)
//! - ids (facet identifiers and facet targets)
//! - field (the finite set of solved quantities and maps keyed by them)
//! - units (uom SI types + constructors)
//! - parallel (execution context and collective operations)
//! - console (leader-only coloured diagnostics)
//! - error (shared error types)

pub mod console;
pub mod error;
pub mod field;
pub mod ids;
pub mod numeric;
pub mod parallel;
pub mod units;

// Re-exports: nice ergonomics for downstream crates
pub use error::{PtError, PtResult};
pub use field::{FieldKind, FieldMap};
pub use ids::{FacetId, FacetTarget};
pub use numeric::*;
pub use parallel::{Communicator, ExecutionContext, SerialCommunicator};
