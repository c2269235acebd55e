//! Discrete fields.

use nalgebra::DVector;
use pt_conditions::Expression;
use pt_mesh::Mesh;
use rayon::prelude::*;

use crate::error::{FemError, FemResult};
use crate::space::FunctionSpace;

/// Values of one quantity on a function space.
#[derive(Clone, Debug, PartialEq)]
pub struct Field {
    name: String,
    space: FunctionSpace,
    values: DVector<f64>,
}

impl Field {
    /// A zero-valued field.
    pub fn new(space: FunctionSpace, name: impl Into<String>) -> Self {
        let values = DVector::zeros(space.num_dofs());
        Self {
            name: name.into(),
            space,
            values,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn space(&self) -> &FunctionSpace {
        &self.space
    }

    pub fn values(&self) -> &DVector<f64> {
        &self.values
    }

    pub fn values_mut(&mut self) -> &mut DVector<f64> {
        &mut self.values
    }

    pub fn as_slice(&self) -> &[f64] {
        self.values.as_slice()
    }

    pub fn as_mut_slice(&mut self) -> &mut [f64] {
        self.values.as_mut_slice()
    }

    /// Components at one node.
    pub fn node(&self, node: usize) -> &[f64] {
        let n = self.space.value_size;
        &self.values.as_slice()[node * n..(node + 1) * n]
    }

    pub fn node_mut(&mut self, node: usize) -> &mut [f64] {
        let n = self.space.value_size;
        &mut self.values.as_mut_slice()[node * n..(node + 1) * n]
    }

    /// Set every node to the value of `expr` at that node's position.
    pub fn interpolate(&mut self, mesh: &dyn Mesh, expr: &Expression, t: f64) -> FemResult<()> {
        let n = self.space.value_size;
        if expr.value_size() != n {
            return Err(FemError::SizeMismatch {
                what: "interpolated expression",
                expected: n,
                actual: expr.value_size(),
            });
        }
        if mesh.num_vertices() != self.space.num_nodes {
            return Err(FemError::SizeMismatch {
                what: "mesh vertices",
                expected: self.space.num_nodes,
                actual: mesh.num_vertices(),
            });
        }
        self.values
            .as_mut_slice()
            .par_chunks_mut(n)
            .enumerate()
            .for_each(|(node, out)| expr.eval(mesh.vertex(node), t, out));
        Ok(())
    }

    /// Copy values from a field on the same space.
    pub fn assign(&mut self, other: &Field) -> FemResult<()> {
        if other.space != self.space {
            return Err(FemError::SizeMismatch {
                what: "assigned field",
                expected: self.space.num_dofs(),
                actual: other.space.num_dofs(),
            });
        }
        self.values.copy_from(&other.values);
        Ok(())
    }

    /// Squared Euclidean distance to another field on the same space.
    pub fn distance_sq(&self, other: &Field) -> f64 {
        (&self.values - &other.values).norm_squared()
    }

    pub fn is_finite(&self) -> bool {
        self.values.iter().all(|v| v.is_finite())
    }
}
