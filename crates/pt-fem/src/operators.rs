//! Discrete differential operators.
//!
//! All operators act on node-major slices: a field with `value_size`
//! components per node stores node `v`'s components at
//! `v * value_size..(v + 1) * value_size`.

use pt_mesh::GridGeometry;
use rayon::prelude::*;

/// The spatial operators a velocity–pressure coupling scheme is built from.
pub trait DiscreteOperators: Send + Sync {
    fn dimension(&self) -> usize;

    fn num_nodes(&self) -> usize;

    /// Control volume owned by each node.
    ///
    /// Scaling the Laplacian row by row with these weights makes it
    /// symmetric, which the pressure solve relies on.
    fn node_weights(&self) -> &[f64];

    /// Gradient of a scalar; `out` holds `dimension()` entries per node.
    fn gradient(&self, scalar: &[f64], out: &mut [f64]);

    /// Divergence of a vector field; `out` holds one entry per node.
    fn divergence(&self, vector: &[f64], out: &mut [f64]);

    /// Component-wise Laplacian with zero normal gradient on the boundary.
    fn laplacian(&self, field: &[f64], value_size: usize, out: &mut [f64]);

    /// Advection `(u . grad) q`, component-wise over `field`.
    fn convection(&self, velocity: &[f64], field: &[f64], value_size: usize, out: &mut [f64]);

    /// Compact Laplacian minus divergence of the gradient, on interior nodes.
    ///
    /// Vanishes for fields the difference stencils resolve and is largest for
    /// the odd-even mode that the wide first-derivative stencils cannot see.
    /// Boundary nodes get zero.
    fn pressure_dissipation(&self, scalar: &[f64], out: &mut [f64]);
}

/// Finite-difference operators on the vertices of a structured grid.
///
/// Interior nodes use central differences. Boundary nodes use one-sided
/// differences for first derivatives and a mirrored ghost node for the
/// Laplacian. Advection is first-order upwind.
#[derive(Clone, Debug)]
pub struct GridOperators {
    counts: Vec<usize>,
    strides: Vec<usize>,
    spacing: Vec<f64>,
    weights: Vec<f64>,
}

impl GridOperators {
    pub fn new(geometry: &GridGeometry) -> Self {
        let counts = geometry.vertex_counts();
        let strides = geometry.strides();
        let spacing = geometry.spacing();
        let cell_volume: f64 = spacing.iter().product();
        let weights = (0..geometry.num_vertices())
            .map(|v| {
                let mut w = cell_volume;
                for axis in 0..counts.len() {
                    let i = (v / strides[axis]) % counts[axis];
                    if i == 0 || i + 1 == counts[axis] {
                        w *= 0.5;
                    }
                }
                w
            })
            .collect();
        Self {
            counts,
            strides,
            spacing,
            weights,
        }
    }

    /// Neighbours of `v` along `axis`, below and above.
    fn neighbours(&self, v: usize, axis: usize) -> (Option<usize>, Option<usize>) {
        let i = (v / self.strides[axis]) % self.counts[axis];
        let s = self.strides[axis];
        let lo = (i > 0).then(|| v - s);
        let hi = (i + 1 < self.counts[axis]).then(|| v + s);
        (lo, hi)
    }

    fn is_interior(&self, v: usize) -> bool {
        (0..self.counts.len()).all(|axis| {
            let i = (v / self.strides[axis]) % self.counts[axis];
            i > 0 && i + 1 < self.counts[axis]
        })
    }

    /// First derivative along `axis` of component `c` of a field.
    fn derivative(&self, q: &[f64], n: usize, c: usize, v: usize, axis: usize) -> f64 {
        let h = self.spacing[axis];
        let at = |node: usize| q[node * n + c];
        match self.neighbours(v, axis) {
            (Some(lo), Some(hi)) => (at(hi) - at(lo)) / (2.0 * h),
            (None, Some(hi)) => (at(hi) - at(v)) / h,
            (Some(lo), None) => (at(v) - at(lo)) / h,
            (None, None) => 0.0,
        }
    }

    fn upwind_derivative(&self, q: &[f64], n: usize, c: usize, v: usize, axis: usize, a: f64) -> f64 {
        let h = self.spacing[axis];
        let at = |node: usize| q[node * n + c];
        match (self.neighbours(v, axis), a >= 0.0) {
            ((Some(lo), _), true) => (at(v) - at(lo)) / h,
            ((_, Some(hi)), false) => (at(hi) - at(v)) / h,
            ((None, Some(hi)), true) => (at(hi) - at(v)) / h,
            ((Some(lo), None), false) => (at(v) - at(lo)) / h,
            _ => 0.0,
        }
    }
}

impl DiscreteOperators for GridOperators {
    fn dimension(&self) -> usize {
        self.counts.len()
    }

    fn num_nodes(&self) -> usize {
        self.weights.len()
    }

    fn node_weights(&self) -> &[f64] {
        &self.weights
    }

    fn gradient(&self, scalar: &[f64], out: &mut [f64]) {
        let dim = self.dimension();
        out.par_chunks_mut(dim).enumerate().for_each(|(v, g)| {
            for (axis, g) in g.iter_mut().enumerate() {
                *g = self.derivative(scalar, 1, 0, v, axis);
            }
        });
    }

    fn divergence(&self, vector: &[f64], out: &mut [f64]) {
        let dim = self.dimension();
        out.par_iter_mut().enumerate().for_each(|(v, d)| {
            *d = (0..dim)
                .map(|axis| self.derivative(vector, dim, axis, v, axis))
                .sum();
        });
    }

    fn laplacian(&self, field: &[f64], value_size: usize, out: &mut [f64]) {
        let n = value_size;
        out.par_chunks_mut(n).enumerate().for_each(|(v, l)| {
            for (c, l) in l.iter_mut().enumerate() {
                let at = |node: usize| field[node * n + c];
                let centre = at(v);
                *l = (0..self.dimension())
                    .map(|axis| {
                        let h2 = self.spacing[axis] * self.spacing[axis];
                        match self.neighbours(v, axis) {
                            (Some(lo), Some(hi)) => (at(hi) - 2.0 * centre + at(lo)) / h2,
                            (None, Some(hi)) => 2.0 * (at(hi) - centre) / h2,
                            (Some(lo), None) => 2.0 * (at(lo) - centre) / h2,
                            (None, None) => 0.0,
                        }
                    })
                    .sum();
            }
        });
    }

    fn convection(&self, velocity: &[f64], field: &[f64], value_size: usize, out: &mut [f64]) {
        let dim = self.dimension();
        let n = value_size;
        out.par_chunks_mut(n).enumerate().for_each(|(v, a)| {
            let u = &velocity[v * dim..(v + 1) * dim];
            for (c, a) in a.iter_mut().enumerate() {
                *a = (0..dim)
                    .map(|axis| u[axis] * self.upwind_derivative(field, n, c, v, axis, u[axis]))
                    .sum();
            }
        });
    }

    fn pressure_dissipation(&self, scalar: &[f64], out: &mut [f64]) {
        let mut grad = vec![0.0; scalar.len() * self.dimension()];
        self.gradient(scalar, &mut grad);
        let mut wide = vec![0.0; scalar.len()];
        self.divergence(&grad, &mut wide);
        self.laplacian(scalar, 1, out);
        out.par_iter_mut()
            .zip(wide.par_iter())
            .enumerate()
            .for_each(|(v, (o, w))| {
                *o = if self.is_interior(v) { *o - w } else { 0.0 };
            });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid(cells: &[usize], lengths: &[f64]) -> GridOperators {
        GridOperators::new(&GridGeometry {
            cells: cells.to_vec(),
            lengths: lengths.to_vec(),
        })
    }

    fn coords(ops: &GridOperators, v: usize) -> Vec<f64> {
        (0..ops.dimension())
            .map(|axis| ((v / ops.strides[axis]) % ops.counts[axis]) as f64 * ops.spacing[axis])
            .collect()
    }

    #[test]
    fn weights_sum_to_domain_volume() {
        let ops = grid(&[4, 3], &[2.0, 1.5]);
        let total: f64 = ops.node_weights().iter().sum();
        assert!((total - 3.0).abs() < 1e-12);
    }

    #[test]
    fn gradient_of_linear_is_exact() {
        let ops = grid(&[4, 3], &[2.0, 1.5]);
        let p: Vec<f64> = (0..ops.num_nodes())
            .map(|v| {
                let x = coords(&ops, v);
                3.0 * x[0] - 2.0 * x[1]
            })
            .collect();
        let mut g = vec![0.0; 2 * ops.num_nodes()];
        ops.gradient(&p, &mut g);
        for chunk in g.chunks(2) {
            assert!((chunk[0] - 3.0).abs() < 1e-12);
            assert!((chunk[1] + 2.0).abs() < 1e-12);
        }
    }

    #[test]
    fn divergence_of_solenoidal_linear_field_vanishes() {
        let ops = grid(&[3, 3], &[1.0, 1.0]);
        let mut u = vec![0.0; 2 * ops.num_nodes()];
        for v in 0..ops.num_nodes() {
            let x = coords(&ops, v);
            u[2 * v] = x[0];
            u[2 * v + 1] = -x[1];
        }
        let mut d = vec![1.0; ops.num_nodes()];
        ops.divergence(&u, &mut d);
        assert!(d.iter().all(|d| d.abs() < 1e-12));
    }

    #[test]
    fn laplacian_of_constant_is_zero_and_weighted_form_is_symmetric() {
        let ops = grid(&[3, 2], &[1.5, 1.0]);
        let n = ops.num_nodes();
        let mut out = vec![1.0; n];
        ops.laplacian(&vec![4.0; n], 1, &mut out);
        assert!(out.iter().all(|l| l.abs() < 1e-12));

        // Column j of W L is W L e_j; check (W L)_ij == (W L)_ji.
        let mut columns = Vec::with_capacity(n);
        for j in 0..n {
            let mut e = vec![0.0; n];
            e[j] = 1.0;
            let mut col = vec![0.0; n];
            ops.laplacian(&e, 1, &mut col);
            for (i, c) in col.iter_mut().enumerate() {
                *c *= ops.node_weights()[i];
            }
            columns.push(col);
        }
        for i in 0..n {
            for j in 0..n {
                assert!((columns[j][i] - columns[i][j]).abs() < 1e-9);
            }
        }
    }

    #[test]
    fn dissipation_ignores_smooth_fields_and_sees_odd_even_modes() {
        let ops = grid(&[6, 6], &[6.0, 6.0]);
        let n = ops.num_nodes();
        let mut out = vec![1.0; n];

        let linear: Vec<f64> = (0..n)
            .map(|v| {
                let x = coords(&ops, v);
                2.0 * x[0] - x[1] + 0.5
            })
            .collect();
        ops.pressure_dissipation(&linear, &mut out);
        assert!(out.iter().all(|d| d.abs() < 1e-12));

        let checkerboard: Vec<f64> = (0..n)
            .map(|v| {
                let x = coords(&ops, v);
                if (x[0] + x[1]) as usize % 2 == 0 { 1.0 } else { -1.0 }
            })
            .collect();
        ops.pressure_dissipation(&checkerboard, &mut out);
        for v in 0..n {
            let x = coords(&ops, v);
            let on_boundary = x.iter().any(|&c| c == 0.0 || c == 6.0);
            if on_boundary {
                assert_eq!(out[v], 0.0);
            } else if x.iter().all(|&c| (2.0..=4.0).contains(&c)) {
                // The wide stencil sees nothing here; the compact one sees -8 p.
                assert!((out[v] + 8.0 * checkerboard[v]).abs() < 1e-12);
            }
        }
    }

    #[test]
    fn uniform_advection_of_linear_field() {
        let ops = grid(&[4, 4], &[1.0, 1.0]);
        let n = ops.num_nodes();
        let u: Vec<f64> = (0..n).flat_map(|_| [2.0, 0.0]).collect();
        let q: Vec<f64> = (0..n).map(|v| coords(&ops, v)[0]).collect();
        let mut out = vec![0.0; n];
        ops.convection(&u, &q, 1, &mut out);
        assert!(out.iter().all(|a| (a - 2.0).abs() < 1e-12));
    }
}
