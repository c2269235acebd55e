//! Backend seam: function spaces and operators for a mesh.

use pt_core::FacetId;
use pt_mesh::Mesh;

use crate::error::{FemError, FemResult};
use crate::operators::{DiscreteOperators, GridOperators};
use crate::space::{Continuity, FunctionSpace};

/// A discretization provider.
pub trait FemBackend: Send + Sync {
    fn name(&self) -> &'static str;

    fn function_space(
        &self,
        mesh: &dyn Mesh,
        continuity: Continuity,
        degree: usize,
        value_size: usize,
    ) -> FemResult<FunctionSpace>;

    fn operators(&self, mesh: &dyn Mesh) -> FemResult<Box<dyn DiscreteOperators>>;

    /// Nodes carrying degrees of freedom on a boundary facet.
    fn facet_nodes(&self, mesh: &dyn Mesh, facet: FacetId) -> FemResult<Vec<usize>> {
        mesh.facet_vertices(facet)
            .map(<[usize]>::to_vec)
            .ok_or(FemError::UnknownFacet { facet })
    }
}

/// Nodal backend for structured grids: continuous, first degree, one node per vertex.
#[derive(Clone, Copy, Debug, Default)]
pub struct GridBackend;

impl FemBackend for GridBackend {
    fn name(&self) -> &'static str {
        "grid"
    }

    fn function_space(
        &self,
        mesh: &dyn Mesh,
        continuity: Continuity,
        degree: usize,
        value_size: usize,
    ) -> FemResult<FunctionSpace> {
        if continuity != Continuity::Continuous || degree != 1 {
            return Err(FemError::Unsupported {
                what: format!("{continuity:?} degree-{degree} space on the grid backend"),
            });
        }
        if value_size == 0 {
            return Err(FemError::Unsupported {
                what: "zero-sized values".to_string(),
            });
        }
        Ok(FunctionSpace {
            continuity,
            degree,
            value_size,
            num_nodes: mesh.num_vertices(),
        })
    }

    fn operators(&self, mesh: &dyn Mesh) -> FemResult<Box<dyn DiscreteOperators>> {
        let grid = mesh.grid().ok_or_else(|| FemError::Unsupported {
            what: "unstructured mesh on the grid backend".to_string(),
        })?;
        tracing::debug!(cells = ?grid.cells, "building grid operators");
        Ok(Box::new(GridOperators::new(grid)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pt_mesh::StructuredMesh;

    #[test]
    fn spaces_follow_the_mesh() {
        let mesh = StructuredMesh::rectangle(2, 3, 1.0, 1.0).unwrap();
        let space = GridBackend
            .function_space(&mesh, Continuity::Continuous, 1, 2)
            .unwrap();
        assert_eq!(space.num_nodes, 12);
        assert_eq!(space.num_dofs(), 24);
        assert!(space.is_vector());

        let ops = GridBackend.operators(&mesh).unwrap();
        assert_eq!(ops.num_nodes(), 12);
        assert_eq!(ops.dimension(), 2);
    }

    #[test]
    fn higher_degree_is_unsupported() {
        let mesh = StructuredMesh::rectangle(2, 2, 1.0, 1.0).unwrap();
        assert!(matches!(
            GridBackend.function_space(&mesh, Continuity::Continuous, 2, 2),
            Err(FemError::Unsupported { .. })
        ));
        assert!(
            GridBackend
                .function_space(&mesh, Continuity::Discontinuous, 1, 1)
                .is_err()
        );
    }
}
