//! Mesh trait consumed by the domain and the discretization backend.

use core::fmt;
use pt_core::FacetId;

/// Axis-aligned vertex grid layout, for meshes that have one.
///
/// Vertices are numbered with the x index varying fastest, then y, then z.
#[derive(Clone, Debug, PartialEq)]
pub struct GridGeometry {
    /// Cells per axis.
    pub cells: Vec<usize>,
    /// Domain extent per axis.
    pub lengths: Vec<f64>,
}

impl GridGeometry {
    pub fn dimension(&self) -> usize {
        self.cells.len()
    }

    /// Vertices per axis.
    pub fn vertex_counts(&self) -> Vec<usize> {
        self.cells.iter().map(|n| n + 1).collect()
    }

    /// Uniform spacing per axis.
    pub fn spacing(&self) -> Vec<f64> {
        self.cells
            .iter()
            .zip(&self.lengths)
            .map(|(&n, &l)| l / n as f64)
            .collect()
    }

    /// Axis stride of the flat vertex numbering.
    pub fn strides(&self) -> Vec<usize> {
        let counts = self.vertex_counts();
        let mut strides = Vec::with_capacity(counts.len());
        let mut s = 1;
        for c in counts {
            strides.push(s);
            s *= c;
        }
        strides
    }

    pub fn num_vertices(&self) -> usize {
        self.vertex_counts().iter().product()
    }

    /// Flat vertex index from per-axis indices.
    pub fn vertex_index(&self, ijk: &[usize]) -> usize {
        ijk.iter().zip(self.strides()).map(|(i, s)| i * s).sum()
    }

    /// Per-axis indices of a flat vertex index.
    pub fn vertex_ijk(&self, mut index: usize) -> Vec<usize> {
        self.vertex_counts()
            .into_iter()
            .map(|c| {
                let i = index % c;
                index /= c;
                i
            })
            .collect()
    }
}

/// A mesh as seen by the orchestration layer.
///
/// Point coordinates are flat with `geometric_dimension()` entries per vertex.
pub trait Mesh: fmt::Debug + Send + Sync {
    fn geometric_dimension(&self) -> usize;

    fn num_cells(&self) -> usize;

    fn num_vertices(&self) -> usize;

    /// Coordinates of one vertex.
    fn vertex(&self, index: usize) -> &[f64];

    /// Boundary facet ids, ascending.
    fn facet_ids(&self) -> Vec<FacetId>;

    /// Vertices lying on a boundary facet, or `None` for an unknown id.
    fn facet_vertices(&self, facet: FacetId) -> Option<&[usize]>;

    /// Smallest and largest element size.
    fn cell_size_range(&self) -> (f64, f64);

    /// Structured layout, if the mesh is a regular grid.
    fn grid(&self) -> Option<&GridGeometry> {
        None
    }

    fn has_facet(&self, facet: FacetId) -> bool {
        self.facet_vertices(facet).is_some()
    }
}
