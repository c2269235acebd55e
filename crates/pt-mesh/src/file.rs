//! Mesh descriptor files.
//!
//! A descriptor names a generator and its parameters; the file extension
//! picks the format.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{MeshError, MeshResult};
use crate::structured::StructuredMesh;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MeshDef {
    Rectangle {
        nx: usize,
        ny: usize,
        lx: f64,
        ly: f64,
    },
    Box {
        nx: usize,
        ny: usize,
        nz: usize,
        lx: f64,
        ly: f64,
        lz: f64,
    },
}

impl MeshDef {
    pub fn build(&self) -> MeshResult<StructuredMesh> {
        match *self {
            MeshDef::Rectangle { nx, ny, lx, ly } => StructuredMesh::rectangle(nx, ny, lx, ly),
            MeshDef::Box {
                nx,
                ny,
                nz,
                lx,
                ly,
                lz,
            } => StructuredMesh::cuboid(nx, ny, nz, lx, ly, lz),
        }
    }
}

/// Read a descriptor from `.yaml`/`.yml`/`.json` and build the mesh.
pub fn load_mesh(path: &Path) -> MeshResult<StructuredMesh> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);
    let content = std::fs::read_to_string(path).map_err(|source| MeshError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let def: MeshDef = match ext.as_deref() {
        Some("yaml") | Some("yml") => serde_yaml::from_str(&content)?,
        Some("json") => serde_json::from_str(&content)?,
        _ => {
            return Err(MeshError::UnsupportedFormat {
                path: path.to_path_buf(),
            });
        }
    };
    def.build()
}
