//! Function spaces.

/// Inter-element continuity of a function space.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Continuity {
    /// Continuous Galerkin.
    Continuous,
    /// Discontinuous Galerkin.
    Discontinuous,
}

/// Layout of the degrees of freedom of a field.
///
/// Degrees of freedom are stored node-major: the `value_size` components of
/// node 0, then node 1, and so on.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FunctionSpace {
    pub continuity: Continuity,
    pub degree: usize,
    pub value_size: usize,
    pub num_nodes: usize,
}

impl FunctionSpace {
    pub fn num_dofs(&self) -> usize {
        self.num_nodes * self.value_size
    }

    pub fn is_vector(&self) -> bool {
        self.value_size > 1
    }
}
