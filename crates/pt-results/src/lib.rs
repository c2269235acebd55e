//! pt-results: run directories and field dumps.

pub mod hash;
pub mod store;
pub mod types;

pub use hash::compute_case_hash;
pub use store::{RunStore, RunWriter, run_dir_name};
pub use types::*;

pub type ResultsResult<T> = Result<T, ResultsError>;

#[derive(thiserror::Error, Debug)]
pub enum ResultsError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Run not found: {run_id}")]
    RunNotFound { run_id: String },

    #[error("Dump {index} not found in run {run_id}")]
    DumpNotFound { run_id: String, index: usize },

    #[error("Invalid path: {message}")]
    InvalidPath { message: String },
}
