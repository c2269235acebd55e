//! Content hashing of run inputs.

use serde::Serialize;
use sha2::{Digest, Sha256};

/// Hex SHA-256 of the serialized case together with the solver version.
pub fn compute_case_hash<T: Serialize + ?Sized>(case: &T, solver_version: &str) -> String {
    let mut hasher = Sha256::new();

    let case_json = serde_json::to_string(case).unwrap_or_default();
    hasher.update(case_json.as_bytes());
    hasher.update(solver_version.as_bytes());

    format!("{:x}", hasher.finalize())
}
