//! Result data types.

use pt_core::FieldKind;
use serde::{Deserialize, Serialize};

pub type RunId = String;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RunManifest {
    pub run_id: RunId,
    pub case_name: String,
    pub case_hash: String,
    pub timestamp: String,
    pub solver_version: String,
    pub scheme: String,
    pub dimension: usize,
    pub num_vertices: usize,
    pub fields: Vec<FieldLayout>,
    pub settings: RunSettings,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FieldLayout {
    pub kind: FieldKind,
    pub value_size: usize,
    pub num_dofs: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RunSettings {
    pub density: f64,
    pub viscosity: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub turbulent_viscosity: Option<f64>,
    pub dt: f64,
    pub max_iterations: usize,
    pub dump_period: usize,
    pub convergence_tolerance: f64,
}

/// Snapshot of every field at one iteration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DumpRecord {
    pub index: usize,
    pub iteration: usize,
    pub pseudo_time: f64,
    pub fields: Vec<FieldSnapshot>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FieldSnapshot {
    pub kind: FieldKind,
    pub name: String,
    pub value_size: usize,
    /// Node-major values.
    pub values: Vec<f64>,
}

impl DumpRecord {
    pub fn field(&self, kind: FieldKind) -> Option<&FieldSnapshot> {
        self.fields.iter().find(|f| f.kind == kind)
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum RunOutcomeKind {
    Converged,
    MaxIterationsReached,
}

/// Written once the run terminates.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RunSummary {
    pub outcome: RunOutcomeKind,
    pub iterations: usize,
    pub pseudo_time: f64,
    /// Largest per-field residual of the last completed pass.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub final_residual: Option<f64>,
    pub dumps_written: usize,
}
