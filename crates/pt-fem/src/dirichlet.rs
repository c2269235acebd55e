//! Strong boundary conditions bound to mesh nodes.

use pt_conditions::{BoundaryCondition, Expression};
use pt_core::{FacetId, FieldKind};
use pt_mesh::Mesh;

use crate::backend::FemBackend;
use crate::error::{FemError, FemResult};
use crate::field::Field;

/// A boundary condition resolved to the nodes of one facet.
///
/// Static conditions are evaluated on first use and cached; time-dependent
/// ones are re-evaluated whenever the pseudo-time changes.
#[derive(Clone, Debug)]
pub struct DirichletBc {
    field: FieldKind,
    facet: FacetId,
    nodes: Vec<usize>,
    expression: Expression,
    time_dependent: bool,
    value_size: usize,
    values: Vec<f64>,
    evaluated_at: Option<f64>,
}

impl DirichletBc {
    pub fn new(
        backend: &dyn FemBackend,
        mesh: &dyn Mesh,
        bc: &BoundaryCondition,
    ) -> FemResult<Self> {
        let nodes = backend.facet_nodes(mesh, bc.facet)?;
        let value_size = bc.expression.value_size();
        Ok(Self {
            field: bc.field,
            facet: bc.facet,
            values: vec![0.0; nodes.len() * value_size],
            nodes,
            expression: bc.expression.clone(),
            time_dependent: bc.time_dependent,
            value_size,
            evaluated_at: None,
        })
    }

    pub fn field(&self) -> FieldKind {
        self.field
    }

    pub fn facet(&self) -> FacetId {
        self.facet
    }

    pub fn nodes(&self) -> &[usize] {
        &self.nodes
    }

    pub fn is_time_dependent(&self) -> bool {
        self.time_dependent
    }

    /// Prescribed values from the last evaluation, node-major.
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Refresh the prescribed nodal values for pseudo-time `t`.
    pub fn evaluate(&mut self, mesh: &dyn Mesh, t: f64) {
        let fresh = match self.evaluated_at {
            None => false,
            Some(_) if !self.time_dependent => true,
            Some(at) => at == t,
        };
        if fresh {
            return;
        }
        let n = self.value_size;
        for (k, &node) in self.nodes.iter().enumerate() {
            self.expression
                .eval(mesh.vertex(node), t, &mut self.values[k * n..(k + 1) * n]);
        }
        self.evaluated_at = Some(t);
        tracing::trace!(field = %self.field, facet = %self.facet, t, "evaluated boundary values");
    }

    /// Write the prescribed values into `field`.
    pub fn apply(&self, field: &mut Field) -> FemResult<()> {
        let n = field.space().value_size;
        if n != self.value_size {
            return Err(FemError::SizeMismatch {
                what: "boundary value",
                expected: n,
                actual: self.value_size,
            });
        }
        self.apply_slice(field.as_mut_slice());
        Ok(())
    }

    /// Write the prescribed values into a node-major slice.
    pub fn apply_slice(&self, values: &mut [f64]) {
        let n = self.value_size;
        for (k, &node) in self.nodes.iter().enumerate() {
            values[node * n..(node + 1) * n]
                .copy_from_slice(&self.values[k * n..(k + 1) * n]);
        }
    }

    /// Mark the constrained nodes.
    pub fn mark(&self, constrained: &mut [bool]) {
        for &node in &self.nodes {
            constrained[node] = true;
        }
    }
}
