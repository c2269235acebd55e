//! Axis-aligned structured grids (rectangles and boxes).
//!
//! Boundary facets follow the usual generator numbering: 1 and 2 are the
//! low and high x faces, 3 and 4 the y faces, 5 and 6 the z faces.

use std::collections::BTreeMap;

use pt_core::FacetId;

use crate::error::{MeshError, MeshResult};
use crate::mesh::{GridGeometry, Mesh};

#[derive(Clone, Debug)]
pub struct StructuredMesh {
    geometry: GridGeometry,
    coords: Vec<f64>,
    facets: BTreeMap<FacetId, Vec<usize>>,
}

impl StructuredMesh {
    /// Rectangle `[0, lx] x [0, ly]` with `nx x ny` cells.
    pub fn rectangle(nx: usize, ny: usize, lx: f64, ly: f64) -> MeshResult<Self> {
        Self::new(GridGeometry {
            cells: vec![nx, ny],
            lengths: vec![lx, ly],
        })
    }

    /// Box `[0, lx] x [0, ly] x [0, lz]` with `nx x ny x nz` cells.
    pub fn cuboid(
        nx: usize,
        ny: usize,
        nz: usize,
        lx: f64,
        ly: f64,
        lz: f64,
    ) -> MeshResult<Self> {
        Self::new(GridGeometry {
            cells: vec![nx, ny, nz],
            lengths: vec![lx, ly, lz],
        })
    }

    pub fn new(geometry: GridGeometry) -> MeshResult<Self> {
        let dim = geometry.dimension();
        if !(2..=3).contains(&dim) || geometry.lengths.len() != dim {
            return Err(MeshError::InvalidGrid {
                what: format!(
                    "expected 2 or 3 axes with one length each, got {} cell counts and {} lengths",
                    dim,
                    geometry.lengths.len()
                ),
            });
        }
        if let Some(axis) = geometry.cells.iter().position(|&n| n == 0) {
            return Err(MeshError::InvalidGrid {
                what: format!("axis {axis} has zero cells"),
            });
        }
        if let Some(axis) = geometry
            .lengths
            .iter()
            .position(|l| !l.is_finite() || *l <= 0.0)
        {
            return Err(MeshError::InvalidGrid {
                what: format!("axis {axis} length must be positive"),
            });
        }

        let n = geometry.num_vertices();
        let spacing = geometry.spacing();
        let mut coords = Vec::with_capacity(n * dim);
        for v in 0..n {
            let ijk = geometry.vertex_ijk(v);
            coords.extend(ijk.iter().zip(&spacing).map(|(&i, &h)| i as f64 * h));
        }

        let counts = geometry.vertex_counts();
        let mut facets = BTreeMap::new();
        for axis in 0..dim {
            let mut low = Vec::new();
            let mut high = Vec::new();
            for v in 0..n {
                let i = geometry.vertex_ijk(v)[axis];
                if i == 0 {
                    low.push(v);
                }
                if i == counts[axis] - 1 {
                    high.push(v);
                }
            }
            // axis < 3, so ids are in 1..=6
            facets.insert(facet(2 * axis as u32 + 1), low);
            facets.insert(facet(2 * axis as u32 + 2), high);
        }

        Ok(Self {
            geometry,
            coords,
            facets,
        })
    }

    pub fn geometry(&self) -> &GridGeometry {
        &self.geometry
    }
}

fn facet(raw: u32) -> FacetId {
    match FacetId::new(raw) {
        Ok(id) => id,
        Err(_) => unreachable!("structured facet ids start at 1"),
    }
}

impl Mesh for StructuredMesh {
    fn geometric_dimension(&self) -> usize {
        self.geometry.dimension()
    }

    fn num_cells(&self) -> usize {
        self.geometry.cells.iter().product()
    }

    fn num_vertices(&self) -> usize {
        self.geometry.num_vertices()
    }

    fn vertex(&self, index: usize) -> &[f64] {
        let dim = self.geometric_dimension();
        &self.coords[index * dim..(index + 1) * dim]
    }

    fn facet_ids(&self) -> Vec<FacetId> {
        self.facets.keys().copied().collect()
    }

    fn facet_vertices(&self, facet: FacetId) -> Option<&[usize]> {
        self.facets.get(&facet).map(Vec::as_slice)
    }

    fn cell_size_range(&self) -> (f64, f64) {
        let spacing = self.geometry.spacing();
        let hmin = spacing.iter().copied().fold(f64::INFINITY, f64::min);
        let hmax = spacing.iter().map(|h| h * h).sum::<f64>().sqrt();
        (hmin, hmax)
    }

    fn grid(&self) -> Option<&GridGeometry> {
        Some(&self.geometry)
    }
}
