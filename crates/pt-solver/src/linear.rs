//! Conjugate gradients on a symmetric operator with pinned unknowns.

use nalgebra::DVector;
use pt_core::Communicator;

use crate::error::{SolverError, SolverResult};

/// Conjugate-gradient configuration.
#[derive(Clone, Debug, PartialEq)]
pub struct CgConfig {
    /// Maximum iterations
    pub max_iterations: usize,
    /// Absolute tolerance for the residual norm
    pub abs_tol: f64,
    /// Tolerance relative to the right-hand side norm
    pub rel_tol: f64,
}

impl Default for CgConfig {
    fn default() -> Self {
        Self {
            max_iterations: 5000,
            abs_tol: 1e-14,
            rel_tol: 1e-10,
        }
    }
}

/// Conjugate-gradient result.
#[derive(Clone, Debug, PartialEq)]
pub struct CgResult {
    /// Iterations performed
    pub iterations: usize,
    /// Final residual norm
    pub residual_norm: f64,
}

/// Solve `A x = b` for the free unknowns, leaving `fixed` entries of `x` untouched.
///
/// `apply` computes `A v`; it is only ever called with vectors that vanish on
/// the fixed entries, and its output is masked there. `A` must be symmetric
/// positive definite on the free subspace. Inner products are summed across
/// workers with `comm`.
pub fn masked_cg<A>(
    apply: A,
    b: &DVector<f64>,
    x: &mut DVector<f64>,
    fixed: &[bool],
    comm: &dyn Communicator,
    config: &CgConfig,
) -> SolverResult<CgResult>
where
    A: Fn(&DVector<f64>, &mut DVector<f64>),
{
    let n = b.len();
    if x.len() != n || fixed.len() != n {
        return Err(SolverError::ProblemSetup {
            what: format!(
                "CG sizes disagree: rhs {n}, solution {}, mask {}",
                x.len(),
                fixed.len()
            ),
        });
    }
    let mask = |v: &mut DVector<f64>| {
        for (vi, &f) in v.iter_mut().zip(fixed) {
            if f {
                *vi = 0.0;
            }
        }
    };
    let dot = |a: &DVector<f64>, b: &DVector<f64>| comm.all_reduce_sum(a.dot(b));

    // Search directions must vanish on the fixed entries, so work with the
    // free part of x and add the fixed part back at the end.
    let mut pinned = x.clone();
    for (pi, &f) in pinned.iter_mut().zip(fixed) {
        if !f {
            *pi = 0.0;
        }
    }
    mask(x);

    let mut ax = DVector::zeros(n);
    apply(x, &mut ax);
    let mut r = b - &ax;
    mask(&mut r);

    let target = config.abs_tol.max(config.rel_tol * dot(b, b).sqrt());
    let mut rr = dot(&r, &r);
    let mut p = r.clone();
    let mut ap = DVector::zeros(n);

    for iter in 0..config.max_iterations {
        if rr.sqrt() <= target {
            *x += &pinned;
            return Ok(CgResult {
                iterations: iter,
                residual_norm: rr.sqrt(),
            });
        }

        apply(&p, &mut ap);
        mask(&mut ap);
        let pap = dot(&p, &ap);
        if pap.is_nan() || pap <= 0.0 {
            return Err(SolverError::Numeric {
                what: format!("CG breakdown: p.Ap = {pap:e}"),
            });
        }

        let alpha = rr / pap;
        x.axpy(alpha, &p, 1.0);
        r.axpy(-alpha, &ap, 1.0);

        let rr_new = dot(&r, &r);
        let beta = rr_new / rr;
        rr = rr_new;
        p.axpy(1.0, &r, beta);
    }

    if rr.sqrt() <= target {
        *x += &pinned;
        return Ok(CgResult {
            iterations: config.max_iterations,
            residual_norm: rr.sqrt(),
        });
    }
    Err(SolverError::ConvergenceFailed {
        iterations: config.max_iterations,
        residual: rr.sqrt(),
    })
}
